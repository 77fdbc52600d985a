//! Top-level game session: owns the puzzle, the animator, and the level
//! lifecycle, and is ticked once per rendered frame by the platform glue.
//!
//! Per-level phases: `Loaded -> Playing -> Solved -> (continue) -> Loaded`
//! of the next level, wrapping past the end of the catalog. The sequence is
//! cyclic; there is no terminal state.

use crate::game::error::GameError;
use crate::game::interaction::{InteractionController, PickFeedback};
use crate::game::levels::{LevelCatalog, PEG_COUNT, ROPE_COUNT};
use crate::game::path::{peg_point, PathAnimator};
use crate::game::puzzle::PuzzleState;
use crate::game::render::{Hint, PegVisual, RenderBackend};

/// Upper bound on a frame delta, so a stalled tab does not teleport ropes.
const MAX_FRAME_DELTA: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelPhase {
    /// Level data loaded, no move made yet.
    Loaded,
    /// At least one move applied.
    Playing,
    /// Crossings reached zero and the last animation settled; waiting for
    /// the continue signal.
    Solved,
}

/// One play session. Constructed once at startup; all mutation funnels
/// through `handle_pick`, `tick`, and `handle_continue`.
pub struct GameSession {
    catalog: LevelCatalog,
    level_index: usize,
    puzzle: PuzzleState,
    animator: PathAnimator,
    controller: InteractionController,
    phase: LevelPhase,
}

impl GameSession {
    /// Start a session on level 0 of `catalog`.
    pub fn new(catalog: LevelCatalog, backend: &mut dyn RenderBackend) -> Result<Self, GameError> {
        let level = catalog.level_at(0)?;
        let mut session = Self {
            catalog,
            level_index: 0,
            puzzle: PuzzleState::new(level),
            animator: PathAnimator::new(),
            controller: InteractionController::new(),
            phase: LevelPhase::Loaded,
        };
        session.load_level(0, backend)?;
        Ok(session)
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn puzzle(&self) -> &PuzzleState {
        &self.puzzle
    }

    pub fn animator(&self) -> &PathAnimator {
        &self.animator
    }

    /// Reset onto `index`: fresh assignment, ropes snapped to their pegs.
    pub fn load_level(
        &mut self,
        index: usize,
        backend: &mut dyn RenderBackend,
    ) -> Result<(), GameError> {
        let level = self.catalog.level_at(index)?;
        self.level_index = index;
        self.puzzle.load(level);
        self.controller.clear_pending();
        self.phase = LevelPhase::Loaded;

        for rope in 0..ROPE_COUNT as u8 {
            // peg_of is total while the invariants hold; fall back to the
            // empty peg rather than panic if a hand-built level is broken.
            let peg = self.puzzle.peg_of(rope).unwrap_or(self.puzzle.empty_peg());
            self.animator.set_target(rope as usize, peg_point(peg), true)?;
            backend.rope_path_changed(rope as usize, self.animator.path(rope as usize)?);
        }

        backend.level_loaded(index, self.catalog.level_count());
        backend.crossings_changed(self.puzzle.crossing_count());
        backend.hint_changed(Hint::SelectRope);
        backend.peg_visuals_changed(&self.peg_visuals());
        Ok(())
    }

    /// Route a hit-test result to the puzzle. Called by the platform glue
    /// before the same frame's `tick`, so an accepted move starts animating
    /// in the very frame it was made.
    pub fn handle_pick(
        &mut self,
        pick: Option<usize>,
        backend: &mut dyn RenderBackend,
    ) -> Result<PickFeedback, GameError> {
        let overlay_shown = self.phase == LevelPhase::Solved;
        let feedback = self.controller.handle_pick(
            pick,
            &mut self.puzzle,
            &mut self.animator,
            overlay_shown,
            backend,
        )?;
        match feedback {
            PickFeedback::Moved { rope, .. } => {
                self.phase = LevelPhase::Playing;
                backend.rope_path_changed(rope as usize, self.animator.path(rope as usize)?);
                backend.peg_visuals_changed(&self.peg_visuals());
            }
            PickFeedback::RopeSelected(_) => {
                backend.peg_visuals_changed(&self.peg_visuals());
            }
            PickFeedback::Ignored | PickFeedback::NeedsSelection => {}
        }
        Ok(feedback)
    }

    /// Per-frame advance. `dt` is the frame's elapsed seconds, clamped.
    pub fn tick(&mut self, dt: f64, backend: &mut dyn RenderBackend) -> Result<(), GameError> {
        let dt = dt.clamp(0.0, MAX_FRAME_DELTA);

        for rope in 0..ROPE_COUNT {
            if self.animator.advance(rope, dt)? {
                backend.rope_path_changed(rope, self.animator.path(rope)?);
            }
        }

        if self.controller.pending_complete() && !self.animator.is_any_animating() {
            self.controller.clear_pending();
            self.phase = LevelPhase::Solved;
            backend.show_level_complete(self.catalog.is_last(self.level_index));
        }

        backend.peg_visuals_changed(&self.peg_visuals());
        Ok(())
    }

    /// External continue signal from the completion UI. Honored only in the
    /// `Solved` phase; returns whether a new level was loaded.
    pub fn handle_continue(&mut self, backend: &mut dyn RenderBackend) -> Result<bool, GameError> {
        if self.phase != LevelPhase::Solved {
            return Ok(false);
        }
        let next = self.catalog.next_index(self.level_index);
        self.load_level(next, backend)?;
        Ok(true)
    }

    fn peg_visuals(&self) -> [PegVisual; PEG_COUNT] {
        core::array::from_fn(|peg| {
            if self.puzzle.selected_peg() == Some(peg) {
                PegVisual::Selected
            } else if self.puzzle.slots()[peg].is_none() {
                PegVisual::Empty
            } else {
                PegVisual::Occupied
            }
        })
    }
}
