//! Path animation: turns discrete peg changes into smooth rope curves.
//!
//! Each rope keeps one animated endpoint. A move captures the current
//! position as the start, the new peg as the target, and resets progress;
//! every tick eases progress forward and regenerates the rope's curve
//! descriptor from its fixed wrist anchor to the moving endpoint. A full
//! traversal takes about 0.3 s (cubic ease-out, so most of the motion lands
//! early in the window).

use glam::DVec3;

use crate::game::error::GameError;
use crate::game::levels::{PEG_COUNT, ROPE_COUNT};

/// Peg heights on the pole, top to bottom.
pub const PEG_Y: [f64; PEG_COUNT] = [2.6, 1.35, 0.1, -1.15, -2.4];
/// Heights of the four rope wraps on the wrist, top to bottom.
pub const WRAP_Y: [f64; ROPE_COUNT] = [1.2, 0.45, -0.3, -1.05];
/// X of the wrist-side rope anchors.
pub const ROPE_ANCHOR_X: f64 = -4.82;
/// X of the peg-side rope endpoints.
pub const ROPE_END_X: f64 = 4.72;

/// Progress gained per second; 1/RATE ~ 0.3 s per move.
const SETTLE_RATE: f64 = 3.3;

/// Number of control points in a rope curve descriptor.
pub const PATH_POINTS: usize = 6;

/// Fixed wrist-side anchor of a rope. Anchors fan out slightly in z so the
/// strands do not share a plane.
pub fn anchor_point(rope: usize) -> DVec3 {
    DVec3::new(ROPE_ANCHOR_X, WRAP_Y[rope], 0.18 - rope as f64 * 0.05)
}

/// World position of a peg's rope attachment.
pub fn peg_point(peg: usize) -> DVec3 {
    DVec3::new(ROPE_END_X, PEG_Y[peg], 0.0)
}

/// Renderable curve descriptor: ordered control points from the wrist anchor
/// to the animated endpoint, suitable for tube or polyline rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RopePath {
    pub points: [DVec3; PATH_POINTS],
}

impl RopePath {
    /// Build the descriptor for `rope` ending at `end`. The two midpoints
    /// are biased by the rise between anchor and endpoint so a rope heading
    /// for a far peg bellies out instead of cutting straight across, and by
    /// a per-rope z offset so parallel ropes stay visually separated.
    fn for_rope(rope: usize, end: DVec3) -> Self {
        let anchor = anchor_point(rope);
        let rise = end.y - anchor.y;
        let z_bias = (rope as f64 - 1.5) * 0.05;

        Self {
            points: [
                anchor,
                DVec3::new(anchor.x + 1.06, anchor.y, 0.4 + z_bias),
                DVec3::new(anchor.x + 2.05, anchor.y + 0.6 + rise * 0.18, 0.44 + z_bias),
                DVec3::new(end.x - 2.45, end.y - 0.34 - rise * 0.2, 0.34 + z_bias * 0.5),
                DVec3::new(end.x - 0.58, end.y, 0.15 + z_bias * 0.3),
                end,
            ],
        }
    }

    /// Sample the curve as `segments + 1` points along a Catmull-Rom spline
    /// through the control points (endpoints clamped by duplication).
    pub fn sample(&self, segments: usize) -> Vec<DVec3> {
        let segments = segments.max(1);
        let mut out = Vec::with_capacity(segments + 1);
        let spans = (PATH_POINTS - 1) as f64;
        for s in 0..=segments {
            let u = s as f64 / segments as f64 * spans;
            let span = (u.floor() as usize).min(PATH_POINTS - 2);
            let t = u - span as f64;

            let p0 = self.points[span.saturating_sub(1)];
            let p1 = self.points[span];
            let p2 = self.points[span + 1];
            let p3 = self.points[(span + 2).min(PATH_POINTS - 1)];
            out.push(catmull_rom(p0, p1, p2, p3, t));
        }
        out
    }
}

/// Uniform Catmull-Rom interpolation between `p1` and `p2`.
fn catmull_rom(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3, t: f64) -> DVec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - 3.0 * p2 + p3 - p0) * t3)
}

/// Animated endpoint of one rope.
#[derive(Clone, Copy, Debug)]
struct RopeAnimation {
    start: DVec3,
    target: DVec3,
    current: DVec3,
    /// 0..1; 1 means settled on the target.
    progress: f64,
}

impl RopeAnimation {
    fn settled_at(point: DVec3) -> Self {
        Self {
            start: point,
            target: point,
            current: point,
            progress: 1.0,
        }
    }
}

/// Owns the animated endpoint and curve descriptor of every rope.
pub struct PathAnimator {
    ropes: [RopeAnimation; ROPE_COUNT],
    paths: [RopePath; ROPE_COUNT],
}

impl PathAnimator {
    /// All ropes settled at their wrist anchors. Callers snap them onto pegs
    /// with `set_target(.., instant = true)` when a level loads.
    pub fn new() -> Self {
        let ropes = core::array::from_fn(|i| RopeAnimation::settled_at(anchor_point(i)));
        let paths = core::array::from_fn(|i| RopePath::for_rope(i, anchor_point(i)));
        Self { ropes, paths }
    }

    fn check_rope(rope: usize) -> Result<(), GameError> {
        if rope >= ROPE_COUNT {
            return Err(GameError::InvalidRope(rope));
        }
        Ok(())
    }

    /// Aim `rope` at `target`. `instant` snaps the endpoint (used on level
    /// load); otherwise the rope animates from wherever it currently is.
    pub fn set_target(&mut self, rope: usize, target: DVec3, instant: bool) -> Result<(), GameError> {
        Self::check_rope(rope)?;
        let anim = &mut self.ropes[rope];
        if instant {
            *anim = RopeAnimation::settled_at(target);
        } else {
            anim.start = anim.current;
            anim.target = target;
            anim.progress = 0.0;
        }
        self.paths[rope] = RopePath::for_rope(rope, self.ropes[rope].current);
        Ok(())
    }

    /// Advance `rope` by `dt` seconds. Returns true when the curve was
    /// regenerated (i.e. the rope was still moving).
    pub fn advance(&mut self, rope: usize, dt: f64) -> Result<bool, GameError> {
        Self::check_rope(rope)?;
        let anim = &mut self.ropes[rope];
        if anim.progress >= 1.0 {
            return Ok(false);
        }

        anim.progress = (anim.progress + dt * SETTLE_RATE).min(1.0);
        if anim.progress >= 1.0 {
            // Land exactly on the target; lerp would leave float dust.
            anim.current = anim.target;
        } else {
            let eased = 1.0 - (1.0 - anim.progress).powi(3);
            anim.current = anim.start.lerp(anim.target, eased);
        }
        self.paths[rope] = RopePath::for_rope(rope, anim.current);
        Ok(true)
    }

    pub fn is_any_animating(&self) -> bool {
        self.ropes.iter().any(|r| r.progress < 1.0)
    }

    pub fn path(&self, rope: usize) -> Result<&RopePath, GameError> {
        Self::check_rope(rope)?;
        Ok(&self.paths[rope])
    }

    pub fn current_position(&self, rope: usize) -> Result<DVec3, GameError> {
        Self::check_rope(rope)?;
        Ok(self.ropes[rope].current)
    }
}

impl Default for PathAnimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_target_settles_immediately() {
        let mut animator = PathAnimator::new();
        animator.set_target(0, peg_point(3), true).unwrap();
        assert!(!animator.is_any_animating());
        assert_eq!(animator.current_position(0).unwrap(), peg_point(3));
        // Path ends exactly at the endpoint and starts at the anchor.
        let path = animator.path(0).unwrap();
        assert_eq!(path.points[0], anchor_point(0));
        assert_eq!(path.points[PATH_POINTS - 1], peg_point(3));
    }

    #[test]
    fn animated_target_converges_exactly() {
        let mut animator = PathAnimator::new();
        animator.set_target(1, peg_point(0), true).unwrap();
        animator.set_target(1, peg_point(4), false).unwrap();
        assert!(animator.is_any_animating());

        let mut steps = 0;
        while animator.is_any_animating() {
            animator.advance(1, 1.0 / 60.0).unwrap();
            steps += 1;
            assert!(steps < 120, "animation failed to settle");
        }
        // ~0.3 s traversal at 60 fps.
        assert!((15..25).contains(&steps), "settled in {steps} steps");
        assert_eq!(animator.current_position(1).unwrap(), peg_point(4));
        let path = animator.path(1).unwrap();
        assert_eq!(path.points[PATH_POINTS - 1], peg_point(4));
    }

    #[test]
    fn advance_is_a_noop_once_settled() {
        let mut animator = PathAnimator::new();
        animator.set_target(2, peg_point(2), true).unwrap();
        assert_eq!(animator.advance(2, 0.5), Ok(false));
        assert_eq!(animator.current_position(2).unwrap(), peg_point(2));
    }

    #[test]
    fn easing_moves_most_of_the_way_early() {
        let mut animator = PathAnimator::new();
        animator.set_target(0, peg_point(0), true).unwrap();
        animator.set_target(0, peg_point(4), false).unwrap();
        // Half the traversal time should cover well over half the distance.
        animator.advance(0, 0.15).unwrap();
        let current = animator.current_position(0).unwrap();
        let covered = (current.y - PEG_Y[0]).abs() / (PEG_Y[4] - PEG_Y[0]).abs();
        assert!(covered > 0.6, "covered only {covered:.2} at half time");
    }

    #[test]
    fn rope_id_out_of_range_is_rejected() {
        let mut animator = PathAnimator::new();
        assert_eq!(
            animator.set_target(4, peg_point(0), true),
            Err(GameError::InvalidRope(4))
        );
        assert_eq!(animator.advance(7, 0.016), Err(GameError::InvalidRope(7)));
        assert!(animator.path(4).is_err());
    }

    #[test]
    fn sampled_curve_passes_through_anchor_and_endpoint() {
        let mut animator = PathAnimator::new();
        animator.set_target(3, peg_point(1), true).unwrap();
        let samples = animator.path(3).unwrap().sample(48);
        assert_eq!(samples.len(), 49);
        assert!((samples[0] - anchor_point(3)).length() < 1e-9);
        assert!((samples[48] - peg_point(1)).length() < 1e-9);
    }

    #[test]
    fn z_bias_separates_neighboring_ropes() {
        let mut animator = PathAnimator::new();
        animator.set_target(0, peg_point(0), true).unwrap();
        animator.set_target(1, peg_point(1), true).unwrap();
        let a = animator.path(0).unwrap().points[2].z;
        let b = animator.path(1).unwrap().points[2].z;
        assert!((a - b).abs() > 1e-3);
    }
}
