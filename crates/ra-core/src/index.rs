//! Dense typed indices into an indexed snapshot.
//!
//! Identifiers are strings supplied by the registry; inside a run every
//! record is addressed by its position instead, which keeps the availability
//! index a set of flat vectors.

use std::fmt;

macro_rules! define_index {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(usize);

        impl $name {
            #[inline]
            #[must_use]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            #[inline]
            #[must_use]
            pub const fn get(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $label, self.0)
            }
        }
    };
}

define_index!(
    /// Position of a room in the snapshot.
    RoomIdx, "RoomIdx"
);
define_index!(
    /// Position of a professor in the snapshot.
    ProfessorIdx, "ProfessorIdx"
);
define_index!(
    /// Position of a course in the snapshot.
    CourseIdx, "CourseIdx"
);
define_index!(
    /// Position of a section in the snapshot.
    SectionIdx, "SectionIdx"
);
define_index!(
    /// Position of a slot in the weekly grid. Grid order is day-then-time.
    SlotIdx, "SlotIdx"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrips_and_displays() {
        let idx = SlotIdx::new(7);
        assert_eq!(idx.get(), 7);
        assert_eq!(idx.to_string(), "SlotIdx(7)");
    }
}
