//! Translates peg picks into puzzle moves and animation targets.
//!
//! Input is ignored outright while the completion overlay is up or while any
//! rope is still settling; both would otherwise race the animation pipeline
//! against new assignment state.

use crate::game::error::GameError;
use crate::game::path::{peg_point, PathAnimator};
use crate::game::puzzle::{PuzzleState, SelectOutcome};
use crate::game::render::{Hint, RenderBackend};

/// What a pick amounted to, after gating.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickFeedback {
    /// Pick arrived while input was blocked (overlay up or ropes settling),
    /// or the hit test found no peg.
    Ignored,
    RopeSelected(usize),
    NeedsSelection,
    Moved { rope: u8, to: usize, crossings: u32 },
}

/// Gates picks and forwards accepted moves to the animator.
pub struct InteractionController {
    pending_complete: bool,
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            pending_complete: false,
        }
    }

    /// Set after a move that brought crossings to zero; the game loop fires
    /// level-complete once the animation settles.
    pub fn pending_complete(&self) -> bool {
        self.pending_complete
    }

    pub fn clear_pending(&mut self) {
        self.pending_complete = false;
    }

    /// Handle one hit-test result. `overlay_shown` blocks input while the
    /// completion UI is up.
    pub fn handle_pick(
        &mut self,
        pick: Option<usize>,
        puzzle: &mut PuzzleState,
        animator: &mut PathAnimator,
        overlay_shown: bool,
        backend: &mut dyn RenderBackend,
    ) -> Result<PickFeedback, GameError> {
        let Some(peg) = pick else {
            return Ok(PickFeedback::Ignored);
        };
        if overlay_shown || animator.is_any_animating() {
            return Ok(PickFeedback::Ignored);
        }

        match puzzle.select_peg(peg)? {
            SelectOutcome::Selected(peg) => {
                backend.hint_changed(Hint::PlaceOnEmpty);
                Ok(PickFeedback::RopeSelected(peg))
            }
            SelectOutcome::NeedsSelection => {
                backend.hint_changed(Hint::SelectRopeFirst);
                Ok(PickFeedback::NeedsSelection)
            }
            SelectOutcome::Moved {
                rope,
                to,
                crossings,
                ..
            } => {
                animator.set_target(rope as usize, peg_point(to), false)?;
                self.pending_complete = crossings == 0;
                backend.crossings_changed(crossings);
                backend.hint_changed(if self.pending_complete {
                    Hint::Solved
                } else {
                    Hint::KeepGoing
                });
                Ok(PickFeedback::Moved {
                    rope,
                    to,
                    crossings,
                })
            }
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::levels::{Level, PEG_COUNT};
    use crate::game::path::RopePath;
    use crate::game::render::PegVisual;

    struct NullBackend;

    impl RenderBackend for NullBackend {
        fn rope_path_changed(&mut self, _rope: usize, _path: &RopePath) {}
        fn peg_visuals_changed(&mut self, _visuals: &[PegVisual; PEG_COUNT]) {}
        fn crossings_changed(&mut self, _crossings: u32) {}
        fn level_loaded(&mut self, _index: usize, _count: usize) {}
        fn show_level_complete(&mut self, _is_finale: bool) {}
        fn hint_changed(&mut self, _hint: Hint) {}
    }

    fn setup() -> (PuzzleState, PathAnimator) {
        let level = Level {
            name: "test",
            slots: [Some(0), Some(1), Some(3), Some(2), None],
        };
        let puzzle = PuzzleState::new(&level);
        let mut animator = PathAnimator::new();
        for rope in 0..4u8 {
            let peg = puzzle.peg_of(rope).unwrap();
            animator.set_target(rope as usize, peg_point(peg), true).unwrap();
        }
        (puzzle, animator)
    }

    #[test]
    fn pick_is_ignored_while_overlay_is_shown() {
        let (mut puzzle, mut animator) = setup();
        let mut controller = InteractionController::new();
        let fb = controller
            .handle_pick(Some(0), &mut puzzle, &mut animator, true, &mut NullBackend)
            .unwrap();
        assert_eq!(fb, PickFeedback::Ignored);
        assert_eq!(puzzle.selected_peg(), None);
    }

    #[test]
    fn pick_is_ignored_while_a_rope_is_settling() {
        let (mut puzzle, mut animator) = setup();
        let mut controller = InteractionController::new();
        // Accepted move starts an animation...
        controller
            .handle_pick(Some(2), &mut puzzle, &mut animator, false, &mut NullBackend)
            .unwrap();
        controller
            .handle_pick(Some(4), &mut puzzle, &mut animator, false, &mut NullBackend)
            .unwrap();
        assert!(animator.is_any_animating());
        // ...which blocks the next pick until it settles.
        let fb = controller
            .handle_pick(Some(0), &mut puzzle, &mut animator, false, &mut NullBackend)
            .unwrap();
        assert_eq!(fb, PickFeedback::Ignored);
    }

    #[test]
    fn solving_move_raises_pending_complete() {
        let (mut puzzle, mut animator) = setup();
        let mut controller = InteractionController::new();
        controller
            .handle_pick(Some(2), &mut puzzle, &mut animator, false, &mut NullBackend)
            .unwrap();
        let fb = controller
            .handle_pick(Some(4), &mut puzzle, &mut animator, false, &mut NullBackend)
            .unwrap();
        assert_eq!(
            fb,
            PickFeedback::Moved {
                rope: 3,
                to: 4,
                crossings: 0
            }
        );
        assert!(controller.pending_complete());
    }

    #[test]
    fn non_solving_move_leaves_pending_clear() {
        let (mut puzzle, mut animator) = setup();
        let mut controller = InteractionController::new();
        // Move rope 2 (peg 3) onto the empty peg: still one crossing left.
        controller
            .handle_pick(Some(3), &mut puzzle, &mut animator, false, &mut NullBackend)
            .unwrap();
        let fb = controller
            .handle_pick(Some(4), &mut puzzle, &mut animator, false, &mut NullBackend)
            .unwrap();
        assert_eq!(
            fb,
            PickFeedback::Moved {
                rope: 2,
                to: 4,
                crossings: 1
            }
        );
        assert!(!controller.pending_complete());
    }

    #[test]
    fn missed_hit_test_is_ignored() {
        let (mut puzzle, mut animator) = setup();
        let mut controller = InteractionController::new();
        let fb = controller
            .handle_pick(None, &mut puzzle, &mut animator, false, &mut NullBackend)
            .unwrap();
        assert_eq!(fb, PickFeedback::Ignored);
    }
}
