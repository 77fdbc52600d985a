//! Mutable puzzle state for the level currently in play.
//!
//! Holds the peg -> rope assignment plus the player's current selection, and
//! evaluates the crossing count that drives win detection. Two ropes cross
//! exactly when their peg order is inverted relative to their id order: the
//! anchors on the wrist are stacked by rope id, so the strands stay apart
//! only while peg order matches id order.

use crate::game::error::GameError;
use crate::game::levels::{Level, PEG_COUNT, ROPE_COUNT};

/// Outcome of a peg pick. All three are normal gameplay, not errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The peg held a rope; it is now the selection (replacing any prior one).
    Selected(usize),
    /// The picked peg was empty and a rope was selected: the rope moved.
    Moved {
        rope: u8,
        from: usize,
        to: usize,
        crossings: u32,
    },
    /// The picked peg was empty but nothing was selected; no change.
    NeedsSelection,
}

/// Current peg assignment and selection for one level.
#[derive(Clone, Debug)]
pub struct PuzzleState {
    slots: [Option<u8>; PEG_COUNT],
    selected_peg: Option<usize>,
}

impl PuzzleState {
    pub fn new(level: &Level) -> Self {
        Self {
            slots: level.slots,
            selected_peg: None,
        }
    }

    /// Replace the assignment with the given level's and clear the selection.
    pub fn load(&mut self, level: &Level) {
        self.slots = level.slots;
        self.selected_peg = None;
    }

    pub fn slots(&self) -> &[Option<u8>; PEG_COUNT] {
        &self.slots
    }

    pub fn selected_peg(&self) -> Option<usize> {
        self.selected_peg
    }

    /// Peg currently holding `rope`. The invariant that every rope id occurs
    /// exactly once makes this total for rope ids 0..4.
    pub fn peg_of(&self, rope: u8) -> Option<usize> {
        self.slots.iter().position(|s| *s == Some(rope))
    }

    /// Index of the single empty peg.
    pub fn empty_peg(&self) -> usize {
        self.slots
            .iter()
            .position(|s| s.is_none())
            .unwrap_or(PEG_COUNT - 1)
    }

    /// Process a pick on `peg`. See `SelectOutcome` for the three results.
    /// Fails only on an out-of-range index, which valid hit-test input never
    /// produces.
    pub fn select_peg(&mut self, peg: usize) -> Result<SelectOutcome, GameError> {
        if peg >= PEG_COUNT {
            return Err(GameError::PegOutOfRange(peg));
        }

        if self.slots[peg].is_some() {
            // Picking a rope always (re)selects it.
            self.selected_peg = Some(peg);
            return Ok(SelectOutcome::Selected(peg));
        }

        let Some(from) = self.selected_peg else {
            return Ok(SelectOutcome::NeedsSelection);
        };

        let rope = self.slots[from].unwrap_or(0);
        self.slots[peg] = Some(rope);
        self.slots[from] = None;
        self.selected_peg = None;

        Ok(SelectOutcome::Moved {
            rope,
            from,
            to: peg,
            crossings: self.crossing_count(),
        })
    }

    /// Number of rope pairs (i, j), i < j, whose peg positions are inverted
    /// relative to id order.
    pub fn crossing_count(&self) -> u32 {
        let mut peg_of = [0usize; ROPE_COUNT];
        for (peg, slot) in self.slots.iter().enumerate() {
            if let Some(rope) = slot {
                peg_of[*rope as usize] = peg;
            }
        }
        let mut crossings = 0;
        for i in 0..ROPE_COUNT {
            for j in i + 1..ROPE_COUNT {
                if peg_of[i] > peg_of[j] {
                    crossings += 1;
                }
            }
        }
        crossings
    }

    pub fn is_solved(&self) -> bool {
        self.crossing_count() == 0
    }
}
