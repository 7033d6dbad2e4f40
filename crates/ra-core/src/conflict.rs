//! Conflict detection: dynamic feasibility of a single candidate.

use crate::availability::AvailabilityIndex;
use crate::candidate::Candidate;
use crate::index::SectionIdx;
use crate::snapshot::IndexedSnapshot;

/// Result of checking one candidate against the current commitments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feasibility {
    Feasible,
    /// The professor does not teach the course's subject area.
    ProfessorUnqualified,
    /// The professor did not declare the slot, or already teaches in it.
    ProfessorUnavailable,
    /// The room is already held at the slot.
    RoomTaken,
}

/// Checks `candidate` for `section` against `index`.
///
/// Qualification is checked first because it does not depend on the slot;
/// professor availability is checked before the room so that a clash on both
/// is attributed to the professor.
pub fn check(
    snapshot: &IndexedSnapshot<'_>,
    section: SectionIdx,
    candidate: Candidate,
    index: &AvailabilityIndex,
) -> Feasibility {
    if !snapshot.professor_qualified(section) {
        return Feasibility::ProfessorUnqualified;
    }
    let professor = snapshot.refs(section).professor;
    if !index.professor_free(professor, candidate.slot) {
        return Feasibility::ProfessorUnavailable;
    }
    if !index.room_free(candidate.room, candidate.slot) {
        return Feasibility::RoomTaken;
    }
    Feasibility::Feasible
}

/// Whether `candidate` can be committed for `section` right now.
pub fn feasible(
    snapshot: &IndexedSnapshot<'_>,
    section: SectionIdx,
    candidate: Candidate,
    index: &AvailabilityIndex,
) -> bool {
    check(snapshot, section, candidate, index) == Feasibility::Feasible
}
