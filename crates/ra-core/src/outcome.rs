//! Per-section outcomes.
//!
//! Every section ends a run in exactly one of these states. Conflicts and
//! unallocatable sections are results, not errors: the run still completes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::slot::TimeSlot;
use crate::types::{ProfessorId, RoomId, SectionId};

/// Why a section whose candidate space was non-empty could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    /// The professor was undeclared or already teaching at every candidate
    /// slot.
    ProfessorUnavailable,
    /// The professor was free somewhere, but every such candidate room was
    /// already taken.
    RoomCommitted,
    /// The professor does not list the course's subject area.
    ProfessorUnqualified,
}

impl ConflictReason {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ProfessorUnavailable => "professor unavailable at all matching slots",
            Self::RoomCommitted => "room already committed at all matching slots",
            Self::ProfessorUnqualified => "professor lacks the course's subject area",
        }
    }
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Why a section had no candidates at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnallocatedReason {
    /// No room is both large enough and of an acceptable kind.
    NoCompatibleRoom,
    /// Strict period weighting left no grid slot in the desired period.
    NoSlotInPeriod,
    /// The pinned room is too small or of the wrong kind.
    PinnedIncompatible,
}

impl UnallocatedReason {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoCompatibleRoom => "no room satisfies capacity/kind requirement",
            Self::NoSlotInPeriod => "no grid slot lies in the desired period",
            Self::PinnedIncompatible => "pinned room does not satisfy capacity/kind requirement",
        }
    }
}

impl fmt::Display for UnallocatedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Terminal state of a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Allocated { room: RoomId, slot: TimeSlot },
    Conflict { reason: ConflictReason },
    Unallocated { reason: UnallocatedReason },
    /// The run was aborted before this section was reached.
    NotProcessed,
}

/// Outcome tag without payload, for counting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Allocated,
    Conflict,
    Unallocated,
    NotProcessed,
}

impl Status {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Allocated => "allocated",
            Self::Conflict => "conflict",
            Self::Unallocated => "unallocated",
            Self::NotProcessed => "not_processed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Outcome {
    #[must_use]
    pub const fn status(&self) -> Status {
        match self {
            Self::Allocated { .. } => Status::Allocated,
            Self::Conflict { .. } => Status::Conflict,
            Self::Unallocated { .. } => Status::Unallocated,
            Self::NotProcessed => Status::NotProcessed,
        }
    }
}

/// The outcome of one section, with the fields reports need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub section: SectionId,
    pub professor: ProfessorId,
    pub course_code: String,
    pub students: u32,
    pub weekly_hours: u32,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl AllocationResult {
    pub const fn status(&self) -> Status {
        self.outcome.status()
    }

    pub const fn room(&self) -> Option<&RoomId> {
        match &self.outcome {
            Outcome::Allocated { room, .. } => Some(room),
            _ => None,
        }
    }

    pub const fn slot(&self) -> Option<&TimeSlot> {
        match &self.outcome {
            Outcome::Allocated { slot, .. } => Some(slot),
            _ => None,
        }
    }

    /// Human-readable reason, present whenever the section was not allocated.
    pub fn reason(&self) -> Option<String> {
        match &self.outcome {
            Outcome::Allocated { .. } => None,
            Outcome::Conflict { reason } => Some(reason.to_string()),
            Outcome::Unallocated { reason } => Some(reason.to_string()),
            Outcome::NotProcessed => Some("run aborted before this section".to_string()),
        }
    }
}
