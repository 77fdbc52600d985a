//! Level definitions and the ordered catalog.
//!
//! A level is an authored assignment of the four rope ends to the five pegs,
//! with exactly one peg left empty. The catalog is immutable; progression
//! wraps back to the first level after the last.

use crate::game::error::GameError;

/// Number of pegs on the pole.
pub const PEG_COUNT: usize = 5;
/// Number of ropes wrapped around the wrist.
pub const ROPE_COUNT: usize = 4;

/// Immutable starting assignment for one level. `slots[peg]` holds the rope
/// id occupying that peg, or `None` for the single empty peg.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Level {
    pub name: &'static str,
    pub slots: [Option<u8>; PEG_COUNT],
}

/// The six shipped levels. Each is a permutation of ropes 0..3 over the five
/// pegs, ordered roughly by how many moves the untangle takes.
static SHIPPED_LEVELS: [Level; 6] = [
    Level { name: "Loose Knot", slots: [Some(0), Some(1), Some(3), Some(2), None] },
    Level { name: "First Twist", slots: [Some(0), Some(2), Some(1), Some(3), None] },
    Level { name: "Double Cross", slots: [Some(0), Some(2), Some(3), Some(1), None] },
    Level { name: "Tight Weave", slots: [Some(1), Some(3), Some(0), None, Some(2)] },
    Level { name: "Full Tangle", slots: [Some(3), Some(2), Some(0), None, Some(1)] },
    Level { name: "Hopeless Snarl", slots: [Some(3), Some(2), None, Some(1), Some(0)] },
];

/// Fixed ordered sequence of levels.
#[derive(Clone, Copy, Debug)]
pub struct LevelCatalog {
    levels: &'static [Level],
}

impl LevelCatalog {
    /// Catalog backed by the shipped level set.
    pub fn shipped() -> Self {
        Self { levels: &SHIPPED_LEVELS }
    }

    /// Catalog over a caller-provided slice (used by tests).
    pub fn from_levels(levels: &'static [Level]) -> Self {
        Self { levels }
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level_at(&self, index: usize) -> Result<&'static Level, GameError> {
        self.levels.get(index).ok_or(GameError::LevelOutOfRange {
            index,
            count: self.levels.len(),
        })
    }

    /// Whether `index` names the last level of the catalog.
    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.levels.len()
    }

    /// Index of the level after `index`, wrapping to 0 past the end.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.levels.len()
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::shipped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_catalog_has_six_levels() {
        let catalog = LevelCatalog::shipped();
        assert_eq!(catalog.level_count(), 6);
        assert!(catalog.level_at(0).is_ok());
        assert!(catalog.level_at(5).is_ok());
    }

    #[test]
    fn level_at_rejects_out_of_range_index() {
        let catalog = LevelCatalog::shipped();
        assert_eq!(
            catalog.level_at(6),
            Err(GameError::LevelOutOfRange { index: 6, count: 6 })
        );
    }

    #[test]
    fn every_level_has_one_empty_slot_and_each_rope_once() {
        let catalog = LevelCatalog::shipped();
        for i in 0..catalog.level_count() {
            let level = catalog.level_at(i).unwrap();
            let empties = level.slots.iter().filter(|s| s.is_none()).count();
            assert_eq!(empties, 1, "level {i} ('{}') empty slots", level.name);
            for rope in 0..ROPE_COUNT as u8 {
                let hits = level.slots.iter().filter(|s| **s == Some(rope)).count();
                assert_eq!(hits, 1, "level {i} rope {rope} occurrences");
            }
        }
    }

    #[test]
    fn next_index_wraps_past_last_level() {
        let catalog = LevelCatalog::shipped();
        assert_eq!(catalog.next_index(0), 1);
        assert_eq!(catalog.next_index(5), 0);
        assert!(catalog.is_last(5));
        assert!(!catalog.is_last(4));
    }
}
