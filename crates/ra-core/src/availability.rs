//! Availability index: the single source of truth for "is this slot free".
//!
//! Built once per run from the snapshot's declared professor availability.
//! Commitments made during the run are written back through
//! [`AvailabilityIndex::reserve`], so later queries observe them
//! immediately. Storage is flat: one entry per (room, slot) and per
//! (professor, slot), addressed by `owner * slot_count + slot`.

use thiserror::Error;

use crate::index::{ProfessorIdx, RoomIdx, SectionIdx, SlotIdx};
use crate::snapshot::IndexedSnapshot;

/// A reservation that would double-book a room or a professor.
///
/// The engine only reserves candidates it has just checked, so seeing one of
/// these means the run's bookkeeping is broken.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReservationClash {
    /// The room is already held at this slot.
    #[error("{room} is already held at {slot} by {holder}")]
    Room {
        room: RoomIdx,
        slot: SlotIdx,
        holder: SectionIdx,
    },

    /// The professor is already teaching at this slot.
    #[error("{professor} is already teaching at {slot} for {holder}")]
    Professor {
        professor: ProfessorIdx,
        slot: SlotIdx,
        holder: SectionIdx,
    },
}

/// Busy/free state of every room and professor over the slot grid.
#[derive(Debug, Clone)]
pub struct AvailabilityIndex {
    slot_count: usize,
    declared: Vec<bool>,
    professor_holder: Vec<Option<SectionIdx>>,
    room_holder: Vec<Option<SectionIdx>>,
    committed: usize,
}

impl AvailabilityIndex {
    /// Creates an index with no commitments.
    pub fn new(snapshot: &IndexedSnapshot<'_>) -> Self {
        let slot_count = snapshot.grid().len();
        let professors = snapshot.professor_count();

        let mut declared = vec![false; professors * slot_count];
        for p in 0..professors {
            let professor = ProfessorIdx::new(p);
            for slot in snapshot.declared_availability(professor) {
                declared[p * slot_count + slot.get()] = true;
            }
        }

        Self {
            slot_count,
            declared,
            professor_holder: vec![None; professors * slot_count],
            room_holder: vec![None; snapshot.room_count() * slot_count],
            committed: 0,
        }
    }

    #[inline]
    const fn cell(&self, owner: usize, slot: SlotIdx) -> usize {
        owner * self.slot_count + slot.get()
    }

    /// Whether no section holds `room` at `slot`.
    #[inline]
    pub fn room_free(&self, room: RoomIdx, slot: SlotIdx) -> bool {
        self.room_holder(room, slot).is_none()
    }

    /// Whether the professor declared `slot` as available.
    #[inline]
    pub fn professor_declared(&self, professor: ProfessorIdx, slot: SlotIdx) -> bool {
        self.declared[self.cell(professor.get(), slot)]
    }

    /// Whether the professor already teaches at `slot` in this run.
    #[inline]
    pub fn professor_committed(&self, professor: ProfessorIdx, slot: SlotIdx) -> bool {
        self.professor_holder[self.cell(professor.get(), slot)].is_some()
    }

    /// Whether the professor can take a new section at `slot`: declared
    /// available and not yet committed.
    #[inline]
    pub fn professor_free(&self, professor: ProfessorIdx, slot: SlotIdx) -> bool {
        self.professor_declared(professor, slot) && !self.professor_committed(professor, slot)
    }

    /// The section holding `room` at `slot`, if any.
    fn room_holder(&self, room: RoomIdx, slot: SlotIdx) -> Option<SectionIdx> {
        self.room_holder[self.cell(room.get(), slot)]
    }

    /// Number of reservations made so far.
    pub const fn committed(&self) -> usize {
        self.committed
    }

    /// Atomically reserves `room` and `professor` at `slot` for `section`.
    ///
    /// Either both cells are written or neither is. Declared availability is
    /// not re-checked here; that is the conflict detector's job.
    pub fn reserve(
        &mut self,
        section: SectionIdx,
        room: RoomIdx,
        professor: ProfessorIdx,
        slot: SlotIdx,
    ) -> Result<(), ReservationClash> {
        let room_cell = self.cell(room.get(), slot);
        let professor_cell = self.cell(professor.get(), slot);

        if let Some(holder) = self.room_holder[room_cell] {
            return Err(ReservationClash::Room { room, slot, holder });
        }
        if let Some(holder) = self.professor_holder[professor_cell] {
            return Err(ReservationClash::Professor {
                professor,
                slot,
                holder,
            });
        }

        self.room_holder[room_cell] = Some(section);
        self.professor_holder[professor_cell] = Some(section);
        self.committed += 1;
        Ok(())
    }
}
