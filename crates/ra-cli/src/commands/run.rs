//! Run command: allocate a snapshot and print the outcome.
//!
//! Three renderings of the same [`RunReport`]: a per-section table with a
//! summary (default), a timetable grouped by slot (`--timetable`), and the
//! full report as JSON (`--json`).

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use ra_core::{RunReport, run_allocation};

use super::load_snapshot;
use crate::Config;

/// How the report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Timetable,
    Json,
}

pub fn run<W: Write>(
    writer: &mut W,
    snapshot_path: &Path,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = load_snapshot(snapshot_path)?;
    let report = run_allocation(&snapshot, &config.allocation).context("allocation failed")?;

    match format {
        OutputFormat::Table => write_table(writer, &report)?,
        OutputFormat::Timetable => write_timetable(writer, &report)?,
        OutputFormat::Json => write_json(writer, &report)?,
    }
    Ok(())
}

/// One row per section, sorted by section ID, followed by the summary.
pub fn write_table<W: Write>(writer: &mut W, report: &RunReport) -> std::io::Result<()> {
    let summary = &report.summary;
    writeln!(
        writer,
        "Run {}: {} of {} sections allocated ({:.1}%)",
        report.status,
        summary.allocated,
        summary.total,
        summary.success_ratio * 100.0
    )?;
    if report.results.is_empty() {
        return Ok(());
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "{:<10} {:<8} {:>8}  {:<11}  DETAIL",
        "SECTION", "COURSE", "STUDENTS", "STATUS"
    )?;
    for result in &report.results {
        let detail = match (result.room(), result.slot()) {
            (Some(room), Some(slot)) => format!("{room} {slot}"),
            _ => result.reason().unwrap_or_default(),
        };
        writeln!(
            writer,
            "{:<10} {:<8} {:>8}  {:<11}  {detail}",
            result.section.as_str(),
            result.course_code,
            result.students,
            result.status().as_str()
        )?;
    }

    writeln!(writer)?;
    writeln!(writer, "Conflict:       {}", summary.conflict)?;
    writeln!(writer, "Unallocated:    {}", summary.unallocated)?;
    writeln!(writer, "Not processed:  {}", summary.not_processed)?;
    writeln!(
        writer,
        "Mean occupancy: {:.1}%",
        summary.mean_occupancy * 100.0
    )?;
    if !summary.by_building.is_empty() {
        writeln!(writer, "By building:")?;
        for (building, count) in &summary.by_building {
            writeln!(writer, "  {building}: {count}")?;
        }
    }
    Ok(())
}

/// Allocated sections grouped by slot, in grid order.
pub fn write_timetable<W: Write>(writer: &mut W, report: &RunReport) -> std::io::Result<()> {
    let table = report.timetable();
    if table.is_empty() {
        writeln!(writer, "No sections allocated.")?;
        return Ok(());
    }
    for (slot, results) in table {
        writeln!(writer, "{slot}")?;
        for result in results {
            let room = result.room().map_or("", |r| r.as_str());
            writeln!(
                writer,
                "  {:<8} {} ({}, {} students)",
                room,
                result.section.as_str(),
                result.course_code,
                result.students
            )?;
        }
    }
    Ok(())
}

pub fn write_json<W: Write>(writer: &mut W, report: &RunReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report).context("failed to serialize report")?;
    writeln!(writer)?;
    Ok(())
}
