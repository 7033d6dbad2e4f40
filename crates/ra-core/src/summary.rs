//! Result aggregation.
//!
//! Collects the per-section results of a run into the report handed to
//! reporting and export. Read-only: nothing here feeds back into the engine.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::outcome::{AllocationResult, Status};
use crate::slot::TimeSlot;
use crate::snapshot::{Room, Snapshot};
use crate::types::{RoomId, SectionId};

/// Whether the run processed every section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    /// Cancelled at a section boundary; unreached sections are
    /// [`Status::NotProcessed`].
    Aborted,
}

impl RunStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Counts and ratios over a run's results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub allocated: usize,
    pub conflict: usize,
    pub unallocated: usize,
    pub not_processed: usize,
    /// `allocated / total`, or 0 for an empty run.
    pub success_ratio: f64,
    /// Mean of `students / capacity` over allocated sections, or 0 if none.
    pub mean_occupancy: f64,
    /// Allocated sections per building.
    pub by_building: BTreeMap<String, usize>,
}

#[expect(
    clippy::cast_precision_loss,
    reason = "section counts are far below 2^52"
)]
fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

impl Summary {
    /// Aggregates `results`, looking up allocated rooms in `snapshot`.
    pub fn from_results(results: &[AllocationResult], snapshot: &Snapshot) -> Self {
        let rooms: HashMap<&RoomId, &Room> = snapshot.rooms.iter().map(|r| (&r.id, r)).collect();

        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };
        let mut occupancy_sum = 0.0;

        for result in results {
            match result.status() {
                Status::Allocated => summary.allocated += 1,
                Status::Conflict => summary.conflict += 1,
                Status::Unallocated => summary.unallocated += 1,
                Status::NotProcessed => summary.not_processed += 1,
            }
            if let Some(room) = result.room().and_then(|id| rooms.get(id)) {
                occupancy_sum += f64::from(result.students) / f64::from(room.capacity);
                *summary.by_building.entry(room.building.clone()).or_default() += 1;
            }
        }

        #[expect(
            clippy::cast_precision_loss,
            reason = "section counts are far below 2^52"
        )]
        let allocated = summary.allocated as f64;
        summary.success_ratio = ratio(allocated, summary.total);
        summary.mean_occupancy = ratio(occupancy_sum, summary.allocated);
        summary
    }
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub status: RunStatus,
    /// One result per section, sorted by section ID.
    pub results: Vec<AllocationResult>,
    pub summary: Summary,
}

impl RunReport {
    /// Builds a report, sorting `results` by section ID.
    pub fn new(status: RunStatus, mut results: Vec<AllocationResult>, snapshot: &Snapshot) -> Self {
        results.sort_by(|a, b| a.section.cmp(&b.section));
        let summary = Summary::from_results(&results, snapshot);
        Self {
            status,
            results,
            summary,
        }
    }

    /// The result of one section.
    pub fn get(&self, section: &SectionId) -> Option<&AllocationResult> {
        self.results
            .binary_search_by(|r| r.section.cmp(section))
            .ok()
            .map(|i| &self.results[i])
    }

    /// Allocated results only.
    pub fn allocated(&self) -> impl Iterator<Item = &AllocationResult> {
        self.results
            .iter()
            .filter(|r| r.status() == Status::Allocated)
    }

    /// Allocated results grouped by slot, in grid order. Within a slot,
    /// results keep section order.
    pub fn timetable(&self) -> Vec<(TimeSlot, Vec<&AllocationResult>)> {
        let mut by_slot: BTreeMap<TimeSlot, Vec<&AllocationResult>> = BTreeMap::new();
        for result in self.allocated() {
            if let Some(slot) = result.slot() {
                by_slot.entry(*slot).or_default().push(result);
            }
        }
        by_slot.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{ConflictReason, Outcome, UnallocatedReason};
    use crate::snapshot::fixtures::room;
    use crate::types::{ProfessorId, RoomKind};

    #[test]
    fn test_run_status_display_matches_serde_name() {
        for status in [RunStatus::Completed, RunStatus::Aborted] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    fn result(section: &str, students: u32, outcome: Outcome) -> AllocationResult {
        AllocationResult {
            section: SectionId::new(section).unwrap(),
            professor: ProfessorId::new("p1").unwrap(),
            course_code: "MAT001".to_string(),
            students,
            weekly_hours: 4,
            outcome,
        }
    }

    fn allocated(section: &str, students: u32, room: &str, slot: &str) -> AllocationResult {
        result(
            section,
            students,
            Outcome::Allocated {
                room: RoomId::new(room).unwrap(),
                slot: slot.parse().unwrap(),
            },
        )
    }

    fn snapshot() -> Snapshot {
        let mut lab = room("Lab-201", 25, RoomKind::Laboratory);
        lab.building = "Block B".to_string();
        Snapshot {
            rooms: vec![room("A-101", 40, RoomKind::Standard), lab],
            ..Snapshot::default()
        }
    }

    #[test]
    #[expect(
        clippy::float_cmp,
        reason = "exact equality intended for simple fractions"
    )]
    fn counts_and_ratios() {
        let results = vec![
            allocated("s1", 20, "A-101", "Mon 08:00-10:00"),
            allocated("s2", 25, "Lab-201", "Tue 14:00-16:00"),
            result(
                "s3",
                30,
                Outcome::Conflict {
                    reason: ConflictReason::ProfessorUnavailable,
                },
            ),
            result(
                "s4",
                90,
                Outcome::Unallocated {
                    reason: UnallocatedReason::NoCompatibleRoom,
                },
            ),
        ];
        let summary = Summary::from_results(&results, &snapshot());

        assert_eq!(summary.total, 4);
        assert_eq!(summary.allocated, 2);
        assert_eq!(summary.conflict, 1);
        assert_eq!(summary.unallocated, 1);
        assert_eq!(summary.not_processed, 0);
        assert_eq!(summary.success_ratio, 0.5);
        // (20/40 + 25/25) / 2
        assert_eq!(summary.mean_occupancy, 0.75);
        assert_eq!(summary.by_building.get("Block A"), Some(&1));
        assert_eq!(summary.by_building.get("Block B"), Some(&1));
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact zero expected")]
    fn test_empty_run_has_zero_ratio() {
        let summary = Summary::from_results(&[], &snapshot());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.success_ratio, 0.0);
        assert_eq!(summary.mean_occupancy, 0.0);
    }

    #[test]
    fn test_report_sorts_and_finds_by_section() {
        let report = RunReport::new(
            RunStatus::Completed,
            vec![
                allocated("s2", 10, "A-101", "Mon 10:00-12:00"),
                allocated("s1", 10, "A-101", "Mon 08:00-10:00"),
            ],
            &snapshot(),
        );
        let order: Vec<_> = report.results.iter().map(|r| r.section.as_str()).collect();
        assert_eq!(order, ["s1", "s2"]);
        let s2 = report.get(&SectionId::new("s2").unwrap()).unwrap();
        assert_eq!(s2.room().map(RoomId::as_str), Some("A-101"));
        assert!(report.get(&SectionId::new("s9").unwrap()).is_none());
    }

    #[test]
    fn test_timetable_groups_by_slot_in_grid_order() {
        let report = RunReport::new(
            RunStatus::Completed,
            vec![
                allocated("s1", 10, "A-101", "Tue 08:00-10:00"),
                allocated("s2", 10, "Lab-201", "Mon 08:00-10:00"),
                allocated("s3", 10, "A-101", "Mon 08:00-10:00"),
                result("s4", 10, Outcome::NotProcessed),
            ],
            &snapshot(),
        );
        let table = report.timetable();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].0.to_string(), "Mon 08:00-10:00");
        let sections: Vec<_> = table[0].1.iter().map(|r| r.section.as_str()).collect();
        assert_eq!(sections, ["s2", "s3"]);
        assert_eq!(table[1].0.to_string(), "Tue 08:00-10:00");
    }
}
