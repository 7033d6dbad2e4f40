//! Domain snapshot: the immutable input of one allocation run.
//!
//! The registry hands the engine rooms, professors, courses, and sections as
//! plain records. [`Snapshot::index`] validates them against the slot grid and
//! resolves every cross-reference into dense indices, producing an
//! [`IndexedSnapshot`] that the rest of the run reads from.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::index::{CourseIdx, ProfessorIdx, RoomIdx, SectionIdx, SlotIdx};
use crate::slot::{SlotGrid, SlotStart};
use crate::types::{
    CourseId, EntityKind, Period, ProfessorId, RoomId, RoomKind, SectionId, ValidationError,
    ValidationErrors,
};

/// A physical room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    #[serde(default)]
    pub name: String,
    pub building: String,
    pub capacity: u32,
    #[serde(default)]
    pub kind: RoomKind,
}

/// A professor and the weekly slots they can teach in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    pub id: ProfessorId,
    #[serde(default)]
    pub name: String,
    /// Subject areas the professor may teach.
    #[serde(default)]
    pub specialties: BTreeSet<String>,
    /// Weekly slot starts the professor declared as available. An empty set
    /// means the professor is available nowhere.
    #[serde(default)]
    pub availability: BTreeSet<SlotStart>,
}

/// A course offered by the institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    /// Human-facing code, unique within a snapshot (e.g. `MAT001`).
    pub code: String,
    #[serde(default)]
    pub name: String,
    pub subject_area: String,
    pub weekly_hours: u32,
    /// Kind of room the course must be taught in.
    #[serde(default)]
    pub room_kind: RoomKind,
}

/// A fixed room and slot for a section, supplied as input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub room: RoomId,
    pub slot: SlotStart,
}

/// One offering of a course, to be placed in a room and slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    #[serde(default)]
    pub name: String,
    pub course: CourseId,
    pub professor: ProfessorId,
    pub students: u32,
    pub period: Period,
    /// When present, the section may only be placed here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<Placement>,
}

/// The full input of an allocation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub professors: Vec<Professor>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// A section with its references resolved.
#[derive(Debug, Clone, Copy)]
pub struct SectionRefs {
    pub course: CourseIdx,
    pub professor: ProfessorIdx,
    /// Resolved pinned placement, if any.
    pub pinned: Option<(RoomIdx, SlotIdx)>,
}

/// A validated snapshot with dense indices for every record.
///
/// Borrowed from the [`Snapshot`] and [`SlotGrid`] it was built from; never
/// mutated during a run.
#[derive(Debug, Clone)]
pub struct IndexedSnapshot<'a> {
    snapshot: &'a Snapshot,
    grid: &'a SlotGrid,
    section_refs: Vec<SectionRefs>,
    /// Declared availability per professor, as grid indices.
    availability: Vec<Vec<SlotIdx>>,
}

/// Records the first occurrence of every id and reports the rest.
fn check_unique<'s, I>(kind: EntityKind, ids: I, errors: &mut Vec<ValidationError>)
where
    I: IntoIterator<Item = &'s str>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
}

impl Snapshot {
    /// Validates the snapshot against `grid` and resolves its references.
    ///
    /// Every problem is collected; the snapshot is rejected if there is at
    /// least one. Professor availability entries that fall off the grid are
    /// not errors: they can never match a slot, so they are dropped with a
    /// warning.
    pub fn index<'a>(&'a self, grid: &'a SlotGrid) -> Result<IndexedSnapshot<'a>, ValidationErrors> {
        let mut errors = Vec::new();

        check_unique(
            EntityKind::Room,
            self.rooms.iter().map(|r| r.id.as_str()),
            &mut errors,
        );
        check_unique(
            EntityKind::Professor,
            self.professors.iter().map(|p| p.id.as_str()),
            &mut errors,
        );
        check_unique(
            EntityKind::Course,
            self.courses.iter().map(|c| c.id.as_str()),
            &mut errors,
        );
        check_unique(
            EntityKind::Section,
            self.sections.iter().map(|s| s.id.as_str()),
            &mut errors,
        );

        for room in &self.rooms {
            if room.capacity == 0 {
                errors.push(ValidationError::ZeroCapacity {
                    room: room.id.clone(),
                });
            }
        }

        let mut codes = HashSet::new();
        for course in &self.courses {
            if course.weekly_hours == 0 {
                errors.push(ValidationError::ZeroWeeklyHours {
                    course: course.id.clone(),
                });
            }
            if !codes.insert(course.code.as_str()) {
                errors.push(ValidationError::DuplicateCourseCode {
                    code: course.code.clone(),
                });
            }
        }

        // First occurrence wins; duplicates were reported above.
        let room_by_id = first_index(self.rooms.iter().map(|r| &r.id));
        let professor_by_id = first_index(self.professors.iter().map(|p| &p.id));
        let course_by_id = first_index(self.courses.iter().map(|c| &c.id));

        let mut section_refs = Vec::with_capacity(self.sections.len());
        for section in &self.sections {
            if section.students == 0 {
                errors.push(ValidationError::ZeroStudents {
                    section: section.id.clone(),
                });
            }
            let course = course_by_id.get(&section.course).copied();
            if course.is_none() {
                errors.push(ValidationError::UnknownCourse {
                    section: section.id.clone(),
                    course: section.course.clone(),
                });
            }
            let professor = professor_by_id.get(&section.professor).copied();
            if professor.is_none() {
                errors.push(ValidationError::UnknownProfessor {
                    section: section.id.clone(),
                    professor: section.professor.clone(),
                });
            }

            let mut pinned = None;
            if let Some(placement) = &section.pinned {
                let room = room_by_id.get(&placement.room).copied();
                if room.is_none() {
                    errors.push(ValidationError::UnknownPinnedRoom {
                        section: section.id.clone(),
                        room: placement.room.clone(),
                    });
                }
                let slot = grid.find(&placement.slot);
                if slot.is_none() {
                    errors.push(ValidationError::PinnedSlotOffGrid {
                        section: section.id.clone(),
                        slot: placement.slot,
                    });
                }
                pinned = room.zip(slot).map(|(r, s)| (RoomIdx::new(r), s));
            }

            if let (Some(course), Some(professor)) = (course, professor) {
                section_refs.push(SectionRefs {
                    course: CourseIdx::new(course),
                    professor: ProfessorIdx::new(professor),
                    pinned,
                });
            }
        }

        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        let availability = self
            .professors
            .iter()
            .map(|professor| {
                professor
                    .availability
                    .iter()
                    .filter_map(|start| {
                        let found = grid.find(start);
                        if found.is_none() {
                            tracing::warn!(
                                professor = %professor.id,
                                slot = %start,
                                "availability entry is not on the slot grid; ignoring"
                            );
                        }
                        found
                    })
                    .collect()
            })
            .collect();

        Ok(IndexedSnapshot {
            snapshot: self,
            grid,
            section_refs,
            availability,
        })
    }
}

fn first_index<'a, K>(ids: impl Iterator<Item = &'a K>) -> HashMap<&'a K, usize>
where
    K: Eq + std::hash::Hash + 'a,
{
    let mut map = HashMap::new();
    for (i, id) in ids.enumerate() {
        map.entry(id).or_insert(i);
    }
    map
}

impl<'a> IndexedSnapshot<'a> {
    pub const fn grid(&self) -> &'a SlotGrid {
        self.grid
    }

    pub fn room_count(&self) -> usize {
        self.snapshot.rooms.len()
    }

    pub fn professor_count(&self) -> usize {
        self.snapshot.professors.len()
    }

    pub fn section_count(&self) -> usize {
        self.snapshot.sections.len()
    }

    pub fn room(&self, idx: RoomIdx) -> &'a Room {
        &self.snapshot.rooms[idx.get()]
    }

    pub fn professor(&self, idx: ProfessorIdx) -> &'a Professor {
        &self.snapshot.professors[idx.get()]
    }

    pub fn course(&self, idx: CourseIdx) -> &'a Course {
        &self.snapshot.courses[idx.get()]
    }

    pub fn section(&self, idx: SectionIdx) -> &'a Section {
        &self.snapshot.sections[idx.get()]
    }

    /// Resolved references of a section.
    pub fn refs(&self, idx: SectionIdx) -> SectionRefs {
        self.section_refs[idx.get()]
    }

    /// The course a section teaches.
    pub fn course_of(&self, idx: SectionIdx) -> &'a Course {
        self.course(self.refs(idx).course)
    }

    /// On-grid slots a professor declared as available.
    pub fn declared_availability(&self, idx: ProfessorIdx) -> &[SlotIdx] {
        &self.availability[idx.get()]
    }

    /// Whether the section's professor may teach its course's subject area.
    pub fn professor_qualified(&self, idx: SectionIdx) -> bool {
        let refs = self.refs(idx);
        self.professor(refs.professor)
            .specialties
            .contains(&self.course(refs.course).subject_area)
    }

    pub fn rooms(&self) -> impl Iterator<Item = (RoomIdx, &'a Room)> + use<'a> {
        self.snapshot
            .rooms
            .iter()
            .enumerate()
            .map(|(i, room)| (RoomIdx::new(i), room))
    }

    pub fn sections(&self) -> impl Iterator<Item = SectionIdx> + use<> {
        (0..self.snapshot.sections.len()).map(SectionIdx::new)
    }
}
