//! Narrow interface between the core and whatever draws the scene.
//!
//! The core pushes curve descriptors and peg visual flags out through this
//! trait; the backend never calls back in except to deliver a peg hit-test
//! result and the continue signal, both of which arrive through the session.

use crate::game::levels::PEG_COUNT;
use crate::game::path::RopePath;

/// Per-frame visual state of a peg.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PegVisual {
    /// Holds the rope the player has picked up.
    Selected,
    /// The single open peg.
    Empty,
    /// Holds an unselected rope.
    Occupied,
}

/// Player-facing guidance, emitted as abstract states so backends can word
/// (and localize) the messages themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hint {
    /// Fresh level: pick a rope end.
    SelectRope,
    /// A rope is selected: pick the empty peg.
    PlaceOnEmpty,
    /// Empty peg picked with no selection.
    SelectRopeFirst,
    /// Move applied but crossings remain.
    KeepGoing,
    /// Last move untangled everything.
    Solved,
}

/// Rendering collaborator. Implementations draw however they like; the core
/// only promises to call these when the corresponding state changes.
pub trait RenderBackend {
    /// `rope`'s curve was regenerated this tick.
    fn rope_path_changed(&mut self, rope: usize, path: &RopePath);
    /// Selection / occupancy flags for all pegs.
    fn peg_visuals_changed(&mut self, visuals: &[PegVisual; PEG_COUNT]);
    /// Crossing count after a load or an accepted move.
    fn crossings_changed(&mut self, crossings: u32);
    /// A level was loaded; `index` is zero-based, `count` the catalog size.
    fn level_loaded(&mut self, index: usize, count: usize);
    /// All animations settled on a solved board. `is_finale` marks the last
    /// catalog level. The backend shows its overlay and later feeds the
    /// continue signal back through the session.
    fn show_level_complete(&mut self, is_finale: bool);
    fn hint_changed(&mut self, hint: Hint);
}
