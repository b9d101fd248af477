//! Spawn pacing and falling-item generation
//!
//! The difficulty curve is pure in the score; the generator is
//! deterministic given the session RNG.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{FallingItem, ShapeKind};
use crate::consts::*;

/// Milliseconds between spawns at the given score. Ramps down with score
/// and never drops below the floor.
pub fn spawn_interval_for_score(score: u32) -> f32 {
    (BASE_SPAWN_INTERVAL_MS - score as f32 * SPAWN_RAMP_PER_SCORE_MS).max(MIN_SPAWN_INTERVAL_MS)
}

/// Probability of an extra spawn immediately after a regular one. Ramps up
/// with score and is capped.
pub fn burst_chance_for_score(score: u32) -> f64 {
    (BURST_SPAWN_BASE_CHANCE + score as f64 * BURST_SPAWN_SCORE_FACTOR).min(BURST_SPAWN_MAX_CHANCE)
}

/// Create one falling item: random size and kind, speed boosted by score,
/// spawn X inset so the item never starts partially off-screen, spawn Y
/// just above the visible area.
pub fn random_falling_item(id: u32, rng: &mut Pcg32, score: u32, view_width: f32) -> FallingItem {
    let size = rng.random_range(FALLING_ITEM_MIN_SIZE..FALLING_ITEM_MAX_SIZE);
    let kind = if rng.random_bool(0.5) {
        ShapeKind::Duck
    } else {
        ShapeKind::Jam
    };
    let boost = (score as f32 * FALLING_SPEED_BOOST_PER_SCORE).min(FALLING_SPEED_BOOST_MAX);
    let speed = rng.random_range(FALLING_SPEED_MIN..FALLING_SPEED_MAX) + boost;

    let inset = size * 0.5 + SPAWN_EDGE_MARGIN;
    let x = if view_width > inset * 2.0 {
        rng.random_range(inset..view_width - inset)
    } else {
        view_width * 0.5
    };

    FallingItem {
        id,
        kind,
        size,
        speed,
        pos: Vec2::new(x, -size),
    }
}
