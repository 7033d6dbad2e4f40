//! Validate command: check a snapshot without allocating.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use ra_core::{ConflictReason, SlotGrid, plan_all};

use super::load_snapshot;
use crate::Config;

/// Prints every validation problem, or a short inventory if there are none.
///
/// A valid snapshot may still contain sections no run can place: those whose
/// candidate space is empty and those whose professor lacks the subject area.
/// They are listed but do not fail validation.
pub fn run<W: Write>(writer: &mut W, snapshot_path: &Path, config: &Config) -> Result<()> {
    let snapshot = load_snapshot(snapshot_path)?;
    let grid = SlotGrid::from_config(&config.allocation).context("invalid configuration")?;

    let indexed = match snapshot.index(&grid) {
        Ok(indexed) => indexed,
        Err(errors) => {
            writeln!(writer, "Snapshot has {} problem(s):", errors.len())?;
            for error in errors.errors() {
                writeln!(writer, "- {error}")?;
            }
            bail!("snapshot failed validation");
        }
    };

    writeln!(
        writer,
        "Snapshot is valid: {} rooms, {} professors, {} courses, {} sections on a {}-slot grid.",
        snapshot.rooms.len(),
        snapshot.professors.len(),
        snapshot.courses.len(),
        snapshot.sections.len(),
        grid.len()
    )?;

    let hopeless: Vec<_> = plan_all(&indexed, config.allocation.period_weighting)
        .iter()
        .filter_map(|plan| {
            let section = plan.section();
            let reason = match plan.shortfall() {
                Some(reason) => reason.message(),
                None if !indexed.professor_qualified(section) => {
                    ConflictReason::ProfessorUnqualified.message()
                }
                None => return None,
            };
            Some((&indexed.section(section).id, reason))
        })
        .collect();

    if !hopeless.is_empty() {
        writeln!(writer, "Sections that cannot be placed:")?;
        for (section, reason) in hopeless {
            writeln!(writer, "- {section}: {reason}")?;
        }
    }
    Ok(())
}
