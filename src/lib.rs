//! Duck & Jam - a balance-scale catching arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, catching, balance physics)
//! - `renderer`: Canvas2D scene painter (wasm only)
//! - `highscores`: Local leaderboard persistence
//! - `settings`: Player preferences
//! - `audio`: Procedural sound effects (wasm only)

pub mod highscores;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod renderer;

pub use highscores::HighScores;
pub use settings::Settings;

use glam::Vec2;

/// Game tuning constants
pub mod consts {
    /// Frame duration that corresponds to a normalized dt of 1.0 (60 Hz)
    pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;
    /// Elapsed-time cap per update; a stalled tab resumes without a huge jump
    pub const MAX_FRAME_DELTA_MS: f32 = 50.0;

    /// Default viewport (host may resize)
    pub const GAME_WIDTH: f32 = 960.0;
    pub const GAME_HEIGHT: f32 = 640.0;

    /// Scale geometry - pans hang PAN_OFFSET to each side of the pivot
    pub const PLAYER_SPEED: f32 = 11.0;
    pub const PAN_OFFSET: f32 = 92.0;
    pub const PAN_RADIUS: f32 = 38.0;
    /// Local Y of the pan anchor, below the beam pivot
    pub const PAN_ANCHOR_Y: f32 = 10.0;
    /// Distance from the bottom of the screen to the beam pivot
    pub const SCALE_BASELINE_OFFSET: f32 = 96.0;

    /// Falling items
    pub const FALLING_ITEM_MIN_SIZE: f32 = 28.0;
    pub const FALLING_ITEM_MAX_SIZE: f32 = 56.0;
    pub const FALLING_SPEED_MIN: f32 = 2.4;
    pub const FALLING_SPEED_MAX: f32 = 4.6;
    pub const FALLING_SPEED_BOOST_PER_SCORE: f32 = 0.045;
    pub const FALLING_SPEED_BOOST_MAX: f32 = 3.2;
    pub const SPAWN_EDGE_MARGIN: f32 = 10.0;

    /// Spawn pacing
    pub const BASE_SPAWN_INTERVAL_MS: f32 = 500.0;
    pub const MIN_SPAWN_INTERVAL_MS: f32 = 170.0;
    pub const SPAWN_RAMP_PER_SCORE_MS: f32 = 10.0;
    pub const BURST_SPAWN_BASE_CHANCE: f64 = 0.12;
    pub const BURST_SPAWN_SCORE_FACTOR: f64 = 0.005;
    pub const BURST_SPAWN_MAX_CHANCE: f64 = 0.42;
    /// Spawn timer never accumulates more than this many intervals of backlog
    pub const MAX_SPAWN_BACKLOG_INTERVALS: f32 = 3.0;
    pub const MAX_SPAWNS_PER_FRAME: u32 = 6;

    /// Catch windows
    pub const CATCH_HORIZONTAL_WINDOW_RATIO: f32 = 0.9;
    pub const CATCH_ITEM_SIZE_FACTOR: f32 = 0.42;
    pub const CATCH_VERTICAL_WINDOW_MIN: f32 = 14.0;
    pub const CATCH_VERTICAL_WINDOW_MULTIPLIER: f32 = 1.25;

    /// Stacking - items overlap rather than resting at full height
    pub const STACK_COMPRESSION: f32 = 0.56;
    pub const STACK_PADDING: f32 = 2.0;
    pub const STACK_JITTER_RATIO: f32 = 0.35;
    pub const STACKED_ROTATION_MAX: f32 = 0.16;

    /// Balance dynamics
    pub const MAX_WEIGHT_IMBALANCE: f32 = 100.0;
    pub const BALANCE_ROTATION_DIVISOR: f32 = 420.0;
    pub const BALANCE_ROTATION_MAX: f32 = 0.24;
    pub const BALANCE_ROTATION_LERP: f32 = 0.14;
    pub const DIAL_MAX_NEEDLE_ANGLE: f32 = 1.1;
    pub const DIAL_NEEDLE_LERP: f32 = 0.18;

    /// Death sequence - several full rotations, then a launch
    pub const DEATH_SPIN_TOTAL: f32 = std::f32::consts::PI * 6.0;
    pub const DEATH_SPIN_SPEED: f32 = 0.4;
    pub const DEATH_FLIGHT_GRAVITY: f32 = 0.72;
    pub const DEATH_FLIGHT_SPIN_RATE: f32 = 0.32;

    /// Debris
    pub const DEBRIS_GRAVITY: f32 = 0.42;
    pub const DEBRIS_DRAG: f32 = 0.992;
    pub const DEBRIS_DESPAWN_MARGIN: f32 = 120.0;

    /// HUD feedback fade
    pub const FEEDBACK_DURATION_MS: f32 = 760.0;
}

/// Transform a beam-local point to world space given the beam's pivot
/// position and rotation. Catch detection, stack placement and debris
/// spill all go through this one function.
#[inline]
pub fn local_to_world(origin: Vec2, rotation: f32, local: Vec2) -> Vec2 {
    let (sin, cos) = rotation.sin_cos();
    Vec2::new(
        origin.x + local.x * cos - local.y * sin,
        origin.y + local.x * sin + local.y * cos,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_local_to_world_identity() {
        let origin = Vec2::new(480.0, 544.0);
        let p = local_to_world(origin, 0.0, Vec2::new(-92.0, 10.0));
        assert!((p.x - 388.0).abs() < 0.001);
        assert!((p.y - 554.0).abs() < 0.001);
    }

    #[test]
    fn test_local_to_world_quarter_turn() {
        // A quarter turn sends local +x to world +y (y-down screen space)
        let p = local_to_world(Vec2::ZERO, FRAC_PI_2, Vec2::new(10.0, 0.0));
        assert!(p.x.abs() < 0.001);
        assert!((p.y - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_local_to_world_preserves_distance() {
        let origin = Vec2::new(100.0, 200.0);
        let local = Vec2::new(-92.0, 10.0);
        let p = local_to_world(origin, 0.37, local);
        assert!(((p - origin).length() - local.length()).abs() < 0.001);
    }
}
