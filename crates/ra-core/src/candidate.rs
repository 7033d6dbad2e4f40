//! Candidate generation.
//!
//! For each section, a [`CandidatePlan`] holds the rooms and slots that pass
//! the static constraints (capacity, room kind, and under strict weighting the
//! desired period). Its candidate stream is the ordered product of the two,
//! generated lazily and restartable by calling [`CandidatePlan::iter`] again.
//! Busy-ness is not considered here: availability changes as the run commits
//! assignments, so that is left to the conflict detector.
//!
//! # Ordering
//!
//! 1. Capacity fit: smallest sufficient capacity first.
//! 2. Kind fit: exact room kind before an accepted substitute.
//! 3. Room identifier, for determinism.
//! 4. Slot preference: desired-period slots first, then the rest, each group
//!    in grid order (day, then time).
//!
//! Under [`PeriodWeighting::Dominant`] the slot-preference group is decided
//! before the room, so every room is tried in the desired period before any
//! room is tried outside it.

use std::ops::Range;

use rayon::prelude::*;

use crate::config::PeriodWeighting;
use crate::index::{RoomIdx, SectionIdx, SlotIdx};
use crate::outcome::UnallocatedReason;
use crate::snapshot::IndexedSnapshot;

/// A (room, slot) pair that passes the static constraints for a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub room: RoomIdx,
    pub slot: SlotIdx,
}

/// The static candidate space of one section.
#[derive(Debug, Clone)]
pub struct CandidatePlan {
    section: SectionIdx,
    rooms: Vec<RoomIdx>,
    /// Preferred slots first; `slots[..preferred]` lie in the desired period.
    slots: Vec<SlotIdx>,
    preferred: usize,
    weighting: PeriodWeighting,
    pinned: bool,
}

impl CandidatePlan {
    /// Computes the candidate space of `section`. Read-only over the snapshot.
    pub fn build(
        snapshot: &IndexedSnapshot<'_>,
        section: SectionIdx,
        weighting: PeriodWeighting,
    ) -> Self {
        let refs = snapshot.refs(section);
        let students = snapshot.section(section).students;
        let required = snapshot.course_of(section).room_kind;

        if let Some((room, slot)) = refs.pinned {
            let r = snapshot.room(room);
            let fits = r.capacity >= students && r.kind.accepts(required);
            return Self {
                section,
                rooms: if fits { vec![room] } else { Vec::new() },
                slots: vec![slot],
                preferred: 1,
                weighting,
                pinned: true,
            };
        }

        let mut ranked: Vec<_> = snapshot
            .rooms()
            .filter(|(_, room)| room.capacity >= students)
            .filter_map(|(idx, room)| {
                room.kind
                    .fit_rank(required)
                    .map(|rank| (room.capacity, rank, &room.id, idx))
            })
            .collect();
        ranked.sort_unstable();
        let rooms = ranked.into_iter().map(|(.., idx)| idx).collect();

        let desired = snapshot.section(section).period;
        let (mut slots, other): (Vec<_>, Vec<_>) = snapshot
            .grid()
            .iter()
            .partition(|(_, slot)| desired.admits(slot.period()));
        let preferred = slots.len();
        if weighting != PeriodWeighting::Strict {
            slots.extend(other);
        }

        Self {
            section,
            rooms,
            slots: slots.into_iter().map(|(idx, _)| idx).collect(),
            preferred,
            weighting,
            pinned: false,
        }
    }

    pub const fn section(&self) -> SectionIdx {
        self.section
    }

    /// Whether the plan comes from a pinned placement.
    pub const fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Compatible rooms, best fit first.
    pub fn rooms(&self) -> &[RoomIdx] {
        &self.rooms
    }

    /// Number of candidates the stream will yield.
    pub fn static_count(&self) -> usize {
        self.rooms.len() * self.slots.len()
    }

    /// Why the stream is empty, or `None` if it is not.
    pub fn shortfall(&self) -> Option<UnallocatedReason> {
        if self.rooms.is_empty() {
            Some(if self.pinned {
                UnallocatedReason::PinnedIncompatible
            } else {
                UnallocatedReason::NoCompatibleRoom
            })
        } else if self.slots.is_empty() {
            Some(UnallocatedReason::NoSlotInPeriod)
        } else {
            None
        }
    }

    fn passes(&self) -> [Range<usize>; 2] {
        let len = self.slots.len();
        match self.weighting {
            PeriodWeighting::Dominant => [0..self.preferred, self.preferred..len],
            PeriodWeighting::Soft | PeriodWeighting::Strict => [0..len, len..len],
        }
    }

    /// Lazily yields the candidates in preference order.
    pub fn iter(&self) -> impl Iterator<Item = Candidate> + '_ {
        self.passes().into_iter().flat_map(move |pass| {
            self.rooms.iter().flat_map(move |&room| {
                self.slots[pass.clone()]
                    .iter()
                    .map(move |&slot| Candidate { room, slot })
            })
        })
    }
}

/// Builds the plans of every section, in section order.
///
/// Planning never touches the availability index, so sections are planned in
/// parallel.
pub fn plan_all(snapshot: &IndexedSnapshot<'_>, weighting: PeriodWeighting) -> Vec<CandidatePlan> {
    (0..snapshot.section_count())
        .into_par_iter()
        .map(|i| CandidatePlan::build(snapshot, SectionIdx::new(i), weighting))
        .collect()
}
