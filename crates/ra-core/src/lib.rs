//! Core room allocation engine.
//!
//! This crate contains the domain types and logic for:
//! - Snapshot validation: rooms, professors, courses, and sections checked
//!   and indexed against the weekly slot grid
//! - Candidate generation: static (room, slot) spaces per section, best fit
//!   first
//! - Allocation: most-constrained-first greedy assignment with conflict
//!   detection
//! - Summaries: counts, success ratio, occupancy, and timetable views

mod allocation;
mod availability;
mod candidate;
pub mod config;
mod conflict;
mod index;
pub mod monitor;
mod outcome;
pub mod slot;
pub mod snapshot;
mod summary;
mod types;

pub use allocation::{AllocationError, run_allocation, run_allocation_with};
pub use availability::{AvailabilityIndex, ReservationClash};
pub use candidate::{Candidate, CandidatePlan, plan_all};
pub use config::{ConfigError, PeriodWeighting, RunConfig};
pub use conflict::{Feasibility, check, feasible};
pub use index::{CourseIdx, ProfessorIdx, RoomIdx, SectionIdx, SlotIdx};
pub use monitor::{CompositeMonitor, InterruptMonitor, NoopMonitor, RunMonitor};
pub use outcome::{AllocationResult, ConflictReason, Outcome, Status, UnallocatedReason};
pub use slot::{HoursWindow, SlotGrid, SlotParseError, SlotStart, TimeSlot};
pub use snapshot::{
    Course, IndexedSnapshot, Placement, Professor, Room, Section, SectionRefs, Snapshot,
};
pub use summary::{RunReport, RunStatus, Summary};
pub use types::{
    CourseId, EntityKind, Period, ProfessorId, RoomId, RoomKind, SectionId, ValidationError,
    ValidationErrors,
};
