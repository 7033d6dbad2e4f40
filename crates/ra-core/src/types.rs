//! Core type definitions with validation.

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::slot::SlotStart;

/// Kind of entity in a snapshot, used when reporting duplicate identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Room,
    Professor,
    Course,
    Section,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Room => "room",
            Self::Professor => "professor",
            Self::Course => "course",
            Self::Section => "section",
        };
        write!(f, "{s}")
    }
}

/// Validation errors for snapshot records.
///
/// Every variant is a precondition failure: a snapshot that produces any of
/// these is rejected before allocation starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Two records of the same kind share an identifier.
    #[error("duplicate {kind} ID: {id}")]
    DuplicateId { kind: EntityKind, id: String },

    /// A room declares zero seats.
    #[error("room {room} must have a positive capacity")]
    ZeroCapacity { room: RoomId },

    /// A section declares zero students.
    #[error("section {section} must have a positive student count")]
    ZeroStudents { section: SectionId },

    /// A course declares zero weekly hours.
    #[error("course {course} must require positive weekly hours")]
    ZeroWeeklyHours { course: CourseId },

    /// Two courses share a code.
    #[error("duplicate course code: {code}")]
    DuplicateCourseCode { code: String },

    /// A section references a course that does not exist.
    #[error("section {section} references unknown course {course}")]
    UnknownCourse {
        section: SectionId,
        course: CourseId,
    },

    /// A section references a professor that does not exist.
    #[error("section {section} references unknown professor {professor}")]
    UnknownProfessor {
        section: SectionId,
        professor: ProfessorId,
    },

    /// A pinned placement references a room that does not exist.
    #[error("section {section} is pinned to unknown room {room}")]
    UnknownPinnedRoom { section: SectionId, room: RoomId },

    /// A pinned placement starts at a time that is not on the slot grid.
    #[error("section {section} is pinned to {slot}, which is not on the slot grid")]
    PinnedSlotOffGrid { section: SectionId, slot: SlotStart },
}

/// All problems found in a snapshot, in discovery order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("snapshot failed validation: {}", join_errors(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    /// Returns the individual errors.
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated room identifier.
    RoomId, "room ID"
);

define_string_id!(
    /// A validated professor identifier.
    ProfessorId, "professor ID"
);

define_string_id!(
    /// A validated course identifier.
    ///
    /// Distinct from the course code, which is a human-facing label that must
    /// also be unique within a snapshot.
    CourseId, "course ID"
);

define_string_id!(
    /// A validated section identifier.
    ///
    /// Section IDs are supplied by the registry and are the sort key for
    /// run output, so they must be stable across runs.
    SectionId, "section ID"
);

/// Physical kind of a room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    /// Ordinary lecture room.
    #[default]
    Standard,
    Laboratory,
    Auditorium,
    Library,
}

impl RoomKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Laboratory => "laboratory",
            Self::Auditorium => "auditorium",
            Self::Library => "library",
        }
    }

    /// Ranks how well a room of this kind serves a course that requires
    /// `required`.
    ///
    /// Returns `Some(0)` for an exact match, `Some(1)` for an acceptable
    /// substitute (an auditorium hosting a standard lecture), and `None` when
    /// the room cannot host the course at all.
    #[must_use]
    pub const fn fit_rank(self, required: Self) -> Option<u8> {
        match (self, required) {
            (Self::Standard, Self::Standard)
            | (Self::Laboratory, Self::Laboratory)
            | (Self::Auditorium, Self::Auditorium)
            | (Self::Library, Self::Library) => Some(0),
            (Self::Auditorium, Self::Standard) => Some(1),
            _ => None,
        }
    }

    /// Whether a room of this kind can host a course that requires `required`.
    #[must_use]
    pub const fn accepts(self, required: Self) -> bool {
        self.fit_rank(required).is_some()
    }
}

impl fmt::Display for RoomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Part of the day a section would like to meet in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Morning,
    Afternoon,
    Evening,
    /// Any time of day is equally preferred.
    FullDay,
}

impl Period {
    /// Morning ends at this hour.
    pub const AFTERNOON_START_HOUR: u32 = 12;
    /// Afternoon ends at this hour.
    pub const EVENING_START_HOUR: u32 = 18;

    /// Returns the period a slot starting at `start` belongs to.
    ///
    /// Never returns [`Period::FullDay`].
    #[must_use]
    pub fn of(start: NaiveTime) -> Self {
        match start.hour() {
            h if h < Self::AFTERNOON_START_HOUR => Self::Morning,
            h if h < Self::EVENING_START_HOUR => Self::Afternoon,
            _ => Self::Evening,
        }
    }

    /// Whether a slot in `slot_period` satisfies a request for `self`.
    #[must_use]
    pub fn admits(self, slot_period: Self) -> bool {
        self == Self::FullDay || self == slot_period
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::FullDay => "full_day",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
