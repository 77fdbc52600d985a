//! Rope Untangle core crate.
//!
//! Four ropes run from a wrapped wrist to five pegs on a pole, one peg
//! always empty. `start_game()` boots the browser frontend; the puzzle
//! logic, animation engine, and session driver live in [`game`] and are
//! plain Rust, usable (and tested) without a browser.

use wasm_bindgen::prelude::*;

pub mod game;

pub use game::error::GameError;
pub use game::interaction::{InteractionController, PickFeedback};
pub use game::levels::{Level, LevelCatalog, PEG_COUNT, ROPE_COUNT};
pub use game::path::{PathAnimator, RopePath, anchor_point, peg_point};
pub use game::puzzle::{PuzzleState, SelectOutcome};
pub use game::render::{Hint, PegVisual, RenderBackend};
pub use game::session::{GameSession, LevelPhase};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Launch the puzzle in the page (creates canvas, HUD, and overlay).
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    game::start_untangle_mode()
}

/// Continue signal from the completion UI. The built-in overlay button calls
/// this internally; pages providing their own UI can call it from JS.
#[wasm_bindgen]
pub fn handle_continue() {
    game::handle_continue_signal();
}
