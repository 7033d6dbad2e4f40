//! Grid command: show the weekly slot grid of the effective configuration.

use std::io::Write;

use anyhow::{Context, Result};
use ra_core::SlotGrid;

use crate::Config;

/// Prints one line per teaching day listing its slot start times.
pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let run = &config.allocation;
    let grid = SlotGrid::from_config(run).context("invalid configuration")?;

    writeln!(
        writer,
        "{} slots ({} minutes each, {}, {} period weighting)",
        grid.len(),
        run.slot_granularity_minutes,
        run.operating_hours,
        run.period_weighting
    )?;

    let mut day = None;
    for slot in grid.slots() {
        if day != Some(slot.day) {
            if day.is_some() {
                writeln!(writer)?;
            }
            write!(writer, "{}", slot.day)?;
            day = Some(slot.day);
        }
        write!(writer, " {}", slot.start.format("%H:%M"))?;
    }
    if day.is_some() {
        writeln!(writer)?;
    }
    Ok(())
}
