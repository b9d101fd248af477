//! Balance-beam dynamics
//!
//! Two mutually exclusive modes: steady-state tilt smoothed toward the
//! weight delta, and the scripted death sequence (spin, then launch and
//! fall). Also owns debris motion and the knock/spill paths that feed it.

use glam::Vec2;
use rand::Rng;

use super::state::{DeathSequence, GameState, LooseBlock, Side};
use crate::consts::*;
use crate::local_to_world;

/// Smooth the beam toward the tilt implied by the current weight delta.
/// The tilt is capped; the game-over check runs on raw imbalance, not on
/// this clamped angle.
pub fn update_steady(state: &mut GameState, dt: f32) {
    let target = (state.stacks.weight_delta() / BALANCE_ROTATION_DIVISOR)
        .clamp(-BALANCE_ROTATION_MAX, BALANCE_ROTATION_MAX);
    let lerp = (BALANCE_ROTATION_LERP * dt).min(1.0);
    state.scale_rotation += (target - state.scale_rotation) * lerp;
}

/// Smooth the cosmetic dial needle toward the normalized weight delta
pub fn update_dial(state: &mut GameState, dt: f32) {
    let target = -(state.stacks.weight_delta() / MAX_WEIGHT_IMBALANCE).clamp(-1.0, 1.0)
        * DIAL_MAX_NEEDLE_ANGLE;
    let lerp = (DIAL_NEEDLE_LERP * dt).min(1.0);
    state.dial_rotation += (target - state.dial_rotation) * lerp;
}

/// Arm the death sequence. The beam tips toward the heavier side; on an
/// exact tie the direction is a coin flip.
pub fn begin_death_sequence(state: &mut GameState, weight_delta: f32) {
    let tip_direction = if weight_delta == 0.0 {
        if state.rng.random_bool(0.5) { -1.0 } else { 1.0 }
    } else if weight_delta > 0.0 {
        1.0
    } else {
        -1.0
    };
    state.death = DeathSequence {
        active: true,
        tip_direction,
        spin_remaining: DEATH_SPIN_TOTAL,
        flight_active: false,
        flight_vel: Vec2::ZERO,
    };
}

/// Advance the scripted tip/spin/flight animation. The spin phase consumes
/// a fixed amount of total rotation; the flight phase launches once and
/// then falls under gravity until the run is reset.
pub fn update_death_sequence(state: &mut GameState, dt: f32) {
    let tip = state.death.tip_direction;

    if state.death.spin_remaining > 0.0 {
        let step = state.death.spin_remaining.min(DEATH_SPIN_SPEED * dt);
        state.scale_rotation += step * tip;
        state.death.spin_remaining -= step;
        return;
    }

    if !state.death.flight_active {
        state.death.flight_active = true;
        state.death.flight_vel = Vec2::new(
            tip * state.rng.random_range(14.0..20.0),
            state.rng.random_range(-16.0..-11.0),
        );
    }

    state.scale_pos += state.death.flight_vel * dt;
    state.death.flight_vel.y += DEATH_FLIGHT_GRAVITY * dt;
    state.scale_rotation += tip * DEATH_FLIGHT_SPIN_RATE * dt;
}

/// Knock the top item off the named side's stack into debris, pushed
/// outward from the scale. Returns false when the stack was empty.
pub fn knock_top_item(state: &mut GameState, side: Side) -> bool {
    let Some(removed) = state.stacks.pop(side) else {
        return false;
    };

    let pos = local_to_world(state.scale_pos, state.scale_rotation, removed.offset);
    let rotation = state.scale_rotation + removed.rotation;
    let push = side.push_direction();
    state.debris.push(LooseBlock {
        id: removed.id,
        kind: removed.kind,
        size: removed.size,
        pos,
        rotation,
        vel: Vec2::new(
            push * state.rng.random_range(3.6..6.8),
            state.rng.random_range(-6.4..-3.2),
        ),
        spin: state.rng.random_range(-0.18..0.18),
    });
    true
}

/// Convert every stacked item on both sides into debris, flung in the tip
/// direction with a bias away from its own side. Count is conserved.
pub fn spill_stacks(state: &mut GameState) {
    let tip = state.death.tip_direction;
    for side in [Side::Left, Side::Right] {
        let push = side.push_direction();
        while let Some(item) = state.stacks.pop(side) {
            let pos = local_to_world(state.scale_pos, state.scale_rotation, item.offset);
            let rotation = state.scale_rotation + item.rotation;
            state.debris.push(LooseBlock {
                id: item.id,
                kind: item.kind,
                size: item.size,
                pos,
                rotation,
                vel: Vec2::new(
                    tip * state.rng.random_range(3.4..6.6)
                        + push * state.rng.random_range(0.6..1.8),
                    state.rng.random_range(-5.8..-2.4),
                ),
                spin: tip * state.rng.random_range(0.03..0.1)
                    + state.rng.random_range(-0.05..0.05),
            });
        }
    }
}

/// Advance debris under gravity; blocks leave once below the visible area
pub fn update_debris(state: &mut GameState, dt: f32) {
    let floor = state.view_height + DEBRIS_DESPAWN_MARGIN;
    for block in &mut state.debris {
        block.vel.y += DEBRIS_GRAVITY * dt;
        block.pos += block.vel * dt;
        block.rotation += block.spin * dt;
        block.vel.x *= DEBRIS_DRAG;
    }
    state.debris.retain(|block| block.pos.y <= floor);
}
