//! Allocation engine.
//!
//! Assigns every section of a snapshot to a room and weekly slot, or records
//! why it could not.
//!
//! # Algorithm Summary
//!
//! 1. Build the slot grid from the configuration and validate the snapshot
//!    against it. Any problem rejects the run before anything is assigned.
//! 2. Plan every section's static candidate space (in parallel; read-only).
//! 3. Order sections most-constrained first: pinned sections, then ascending
//!    static candidate count, descending student count, section ID.
//! 4. For each section in order, walk its candidate stream and commit the
//!    first feasible candidate into the availability index. Sections are
//!    never revisited: there is no backtracking.
//!
//! The commit phase is a single writer over the availability index, which is
//! what keeps rooms and professors from being double-booked.

use std::cmp::Reverse;

use thiserror::Error;

use crate::availability::{AvailabilityIndex, ReservationClash};
use crate::candidate::{CandidatePlan, plan_all};
use crate::config::{ConfigError, RunConfig};
use crate::conflict::{Feasibility, check};
use crate::index::SectionIdx;
use crate::monitor::{NoopMonitor, RunMonitor};
use crate::outcome::{AllocationResult, ConflictReason, Outcome};
use crate::slot::SlotGrid;
use crate::snapshot::{IndexedSnapshot, Snapshot};
use crate::summary::{RunReport, RunStatus};
use crate::types::{SectionId, ValidationErrors};

/// Errors that stop a run.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// The run configuration does not describe a usable slot grid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The snapshot is malformed; nothing was allocated.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// A commitment would have double-booked a room or professor. This is a
    /// defect in the engine, not a property of the input.
    #[error("internal error while committing section {section}: {clash}")]
    Internal {
        section: SectionId,
        clash: ReservationClash,
    },
}

/// Runs an allocation over `snapshot`.
pub fn run_allocation(
    snapshot: &Snapshot,
    config: &RunConfig,
) -> Result<RunReport, AllocationError> {
    run_allocation_with(snapshot, config, &mut NoopMonitor)
}

/// Runs an allocation, reporting progress to `monitor` and stopping early if
/// it asks to.
///
/// An aborted run still returns every outcome decided before the stop;
/// sections never reached are reported as not processed.
pub fn run_allocation_with(
    snapshot: &Snapshot,
    config: &RunConfig,
    monitor: &mut dyn RunMonitor,
) -> Result<RunReport, AllocationError> {
    let grid = SlotGrid::from_config(config)?;
    let indexed = snapshot.index(&grid)?;

    let plans = plan_all(&indexed, config.period_weighting);
    let order = processing_order(&indexed, &plans);
    let mut index = AvailabilityIndex::new(&indexed);

    let total = order.len();
    tracing::debug!(
        sections = total,
        rooms = indexed.room_count(),
        slots = grid.len(),
        "starting allocation run"
    );
    monitor.on_start(total);

    let mut decided: Vec<Option<AllocationResult>> = vec![None; total];
    let mut status = RunStatus::Completed;

    for (done, &section) in order.iter().enumerate() {
        if monitor.should_stop() {
            tracing::warn!(
                processed = done,
                remaining = total - done,
                "allocation run aborted"
            );
            status = RunStatus::Aborted;
            break;
        }

        let plan = &plans[section.get()];
        let outcome = allocate_section(&indexed, plan, &mut index).map_err(|clash| {
            AllocationError::Internal {
                section: indexed.section(section).id.clone(),
                clash,
            }
        })?;

        tracing::debug!(
            section = %indexed.section(section).id,
            candidates = plan.static_count(),
            status = %outcome.status(),
            "section decided"
        );

        let result = make_result(&indexed, section, outcome);
        monitor.on_section(done + 1, total, &result);
        decided[section.get()] = Some(result);
    }

    let results = indexed
        .sections()
        .zip(decided)
        .map(|(section, result)| {
            result.unwrap_or_else(|| make_result(&indexed, section, Outcome::NotProcessed))
        })
        .collect();

    let report = RunReport::new(status, results, snapshot);
    tracing::info!(
        status = %report.status,
        total = report.summary.total,
        reservations = index.committed(),
        allocated = report.summary.allocated,
        conflict = report.summary.conflict,
        unallocated = report.summary.unallocated,
        "allocation run finished"
    );
    Ok(report)
}

/// Orders sections for processing, most constrained first.
fn processing_order(snapshot: &IndexedSnapshot<'_>, plans: &[CandidatePlan]) -> Vec<SectionIdx> {
    let mut order: Vec<SectionIdx> = snapshot.sections().collect();
    order.sort_by_cached_key(|&idx| {
        let plan = &plans[idx.get()];
        let section = snapshot.section(idx);
        if plan.is_pinned() {
            (false, 0, Reverse(0), &section.id)
        } else {
            (true, plan.static_count(), Reverse(section.students), &section.id)
        }
    });
    order
}

/// Drives one section to a terminal outcome, committing its placement if it
/// gets one.
fn allocate_section(
    snapshot: &IndexedSnapshot<'_>,
    plan: &CandidatePlan,
    index: &mut AvailabilityIndex,
) -> Result<Outcome, ReservationClash> {
    if let Some(reason) = plan.shortfall() {
        return Ok(Outcome::Unallocated { reason });
    }

    let section = plan.section();
    let professor = snapshot.refs(section).professor;
    let mut professor_ever_free = false;

    for candidate in plan.iter() {
        match check(snapshot, section, candidate, index) {
            Feasibility::Feasible => {
                index.reserve(section, candidate.room, professor, candidate.slot)?;
                return Ok(Outcome::Allocated {
                    room: snapshot.room(candidate.room).id.clone(),
                    slot: *snapshot.grid().slot(candidate.slot),
                });
            }
            Feasibility::ProfessorUnqualified => {
                return Ok(Outcome::Conflict {
                    reason: ConflictReason::ProfessorUnqualified,
                });
            }
            Feasibility::RoomTaken => professor_ever_free = true,
            Feasibility::ProfessorUnavailable => {}
        }
    }

    let reason = if professor_ever_free {
        ConflictReason::RoomCommitted
    } else {
        ConflictReason::ProfessorUnavailable
    };
    Ok(Outcome::Conflict { reason })
}

fn make_result(
    snapshot: &IndexedSnapshot<'_>,
    section: SectionIdx,
    outcome: Outcome,
) -> AllocationResult {
    let record = snapshot.section(section);
    let course = snapshot.course_of(section);
    AllocationResult {
        section: record.id.clone(),
        professor: record.professor.clone(),
        course_code: course.code.clone(),
        students: record.students,
        weekly_hours: course.weekly_hours,
        outcome,
    }
}
