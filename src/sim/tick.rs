//! Per-frame simulation update
//!
//! The host calls [`tick`] once per rendered frame with the elapsed wall
//! time; everything else in the sim is driven from here.

use super::balance;
use super::catch;
use super::spawn::{burst_chance_for_score, random_falling_item, spawn_interval_for_score};
use super::state::{Feedback, FeedbackKind, GameEvent, GamePhase, GameState, Side};
use crate::consts::*;
use rand::Rng;

/// Abstract input signals for a single frame. Held-key state for movement,
/// edge-triggered flags for everything else; the host clears the one-shot
/// flags after each tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Pause toggle
    pub pause: bool,
    /// Resume from pause
    pub resume: bool,
    /// Start a fresh run from game over
    pub reset: bool,
}

/// Advance the simulation by `elapsed_ms` of wall time. Elapsed time is
/// capped so a backgrounded tab resumes without a simulation jump; dt is
/// normalized so one 60 Hz frame equals 1.0.
pub fn tick(state: &mut GameState, input: &TickInput, elapsed_ms: f32) {
    let elapsed = elapsed_ms.clamp(0.0, MAX_FRAME_DELTA_MS);
    let dt = elapsed / REFERENCE_FRAME_MS;

    if input.pause && state.phase != GamePhase::GameOver {
        state.phase = if state.phase == GamePhase::Paused {
            GamePhase::Playing
        } else {
            GamePhase::Paused
        };
        return;
    }

    match state.phase {
        GamePhase::Paused => {
            // Frozen: spawn timer, item motion and debris all hold
            if input.resume {
                state.phase = GamePhase::Playing;
            }
            return;
        }
        GamePhase::GameOver => {
            if input.reset {
                state.reset();
                return;
            }
        }
        GamePhase::Playing => {}
    }

    if state.phase == GamePhase::Playing {
        move_scale(state, input, dt);
        update_spawner(state, elapsed);
        update_falling_items(state, dt);

        // Checked once per frame; equality at the threshold is still alive
        if state.stacks.imbalance() > MAX_WEIGHT_IMBALANCE {
            trigger_death(state);
        }
    }

    // The death animation and debris keep running under GameOver
    if state.death.active {
        balance::update_death_sequence(state, dt);
    } else {
        balance::update_steady(state, dt);
    }
    balance::update_debris(state, dt);

    if let Some(feedback) = &mut state.feedback {
        feedback.timer_ms -= elapsed;
        if feedback.timer_ms <= 0.0 {
            state.feedback = None;
        }
    }

    balance::update_dial(state, dt);
}

/// Input-driven horizontal movement, clamped to the screen minus the
/// scale's half-width
fn move_scale(state: &mut GameState, input: &TickInput, dt: f32) {
    let direction = (input.move_right as i32 - input.move_left as i32) as f32;
    state.scale_pos.x += direction * PLAYER_SPEED * dt;
    let half = GameState::scale_half_width();
    state.scale_pos.x = state.scale_pos.x.clamp(half, state.view_width - half);
}

/// Accumulate the spawn timer and drain it one interval at a time, rolling
/// the burst chance after each regular spawn. The curve is re-evaluated at
/// the score current at each check.
fn update_spawner(state: &mut GameState, elapsed_ms: f32) {
    let backlog_cap = spawn_interval_for_score(state.score) * MAX_SPAWN_BACKLOG_INTERVALS;
    state.spawn_timer_ms = (state.spawn_timer_ms + elapsed_ms).min(backlog_cap);

    let mut spawns = 0;
    loop {
        let interval = spawn_interval_for_score(state.score);
        if state.spawn_timer_ms < interval || spawns >= MAX_SPAWNS_PER_FRAME {
            break;
        }
        state.spawn_timer_ms -= interval;
        spawn_one(state);
        spawns += 1;

        if spawns < MAX_SPAWNS_PER_FRAME
            && state.rng.random_bool(burst_chance_for_score(state.score))
        {
            spawn_one(state);
            spawns += 1;
        }
    }
}

fn spawn_one(state: &mut GameState) {
    let id = state.next_entity_id();
    let item = random_falling_item(id, &mut state.rng, state.score, state.view_width);
    state.falling.push(item);
}

/// Advance every falling item, resolve catches against both pans, and
/// discard items that fell past the bottom of the screen
fn update_falling_items(state: &mut GameState, dt: f32) {
    let mut index = state.falling.len();
    while index > 0 {
        index -= 1;
        state.falling[index].pos.y += state.falling[index].speed * dt;
        let item = state.falling[index];

        let left_landing = catch::landing_position(
            Side::Left,
            item.size,
            &state.stacks,
            state.scale_pos,
            state.scale_rotation,
        );
        let right_landing = catch::landing_position(
            Side::Right,
            item.size,
            &state.stacks,
            state.scale_pos,
            state.scale_rotation,
        );

        match catch::try_catch(&item, dt, left_landing, right_landing) {
            Some(side) => {
                // The item is consumed whether or not the catch was correct
                state.falling.remove(index);
                if side == item.kind.expected_side() {
                    state
                        .stacks
                        .push(side, item.id, item.kind, item.size, &mut state.rng);
                    state.score += 1;
                    state.feedback = Some(Feedback::new(FeedbackKind::Caught));
                    state.push_event(GameEvent::Caught { side });
                } else if balance::knock_top_item(state, side) {
                    state.score = state.score.saturating_sub(1);
                    state.feedback = Some(Feedback::new(FeedbackKind::WrongSide));
                    state.push_event(GameEvent::Knocked { side });
                }
            }
            None => {
                if item.pos.y - item.size > state.view_height {
                    state.falling.remove(index);
                }
            }
        }
    }
}

/// End the run: emit the final score, arm the death sequence, discard
/// in-flight items and spill both stacks into debris
fn trigger_death(state: &mut GameState) {
    if state.death.active {
        return;
    }
    let weight_delta = state.stacks.weight_delta();
    state.phase = GamePhase::GameOver;
    state.feedback = Some(Feedback::new(FeedbackKind::Imbalanced));
    state.push_event(GameEvent::RunEnded { score: state.score });
    log::info!(
        "run ended at score {} (imbalance {:.0})",
        state.score,
        state.stacks.imbalance()
    );

    balance::begin_death_sequence(state, weight_delta);
    state.falling.clear();
    balance::spill_stacks(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{FallingItem, ShapeKind};
    use glam::Vec2;

    fn state() -> GameState {
        GameState::new(12345, GAME_WIDTH, GAME_HEIGHT)
    }

    /// A falling item that will be exactly on the side's landing point
    /// after one frame of movement
    fn drop_on_pan(state: &mut GameState, side: Side, kind: ShapeKind, size: f32) {
        let speed = 3.0;
        let landing = catch::landing_position(
            side,
            size,
            &state.stacks,
            state.scale_pos,
            state.scale_rotation,
        );
        let id = state.next_entity_id();
        state.falling.push(FallingItem {
            id,
            kind,
            size,
            speed,
            pos: Vec2::new(landing.x, landing.y - speed),
        });
    }

    fn stack_raw(state: &mut GameState, side: Side, kind: ShapeKind, size: f32) {
        let id = state.next_entity_id();
        state.stacks.push(side, id, kind, size, &mut state.rng);
    }

    #[test]
    fn test_correct_catch_scores_and_stacks() {
        let mut state = state();
        drop_on_pan(&mut state, Side::Left, ShapeKind::Duck, 40.0);
        tick(&mut state, &TickInput::default(), REFERENCE_FRAME_MS);

        assert!(state.falling.is_empty());
        assert_eq!(state.stacks.items(Side::Left).len(), 1);
        assert_eq!(state.score, 1);
        assert_eq!(
            state.take_events(),
            vec![GameEvent::Caught { side: Side::Left }]
        );
    }

    #[test]
    fn test_wrong_side_catch_knocks_and_penalizes() {
        let mut state = state();
        state.score = 5;
        stack_raw(&mut state, Side::Right, ShapeKind::Jam, 30.0);
        // A duck falling into the right pan is a wrong-side catch
        drop_on_pan(&mut state, Side::Right, ShapeKind::Duck, 40.0);
        tick(&mut state, &TickInput::default(), REFERENCE_FRAME_MS);

        assert!(state.falling.is_empty());
        assert!(state.stacks.items(Side::Right).is_empty());
        assert_eq!(state.debris.len(), 1);
        assert_eq!(state.score, 4);
        assert_eq!(
            state.take_events(),
            vec![GameEvent::Knocked { side: Side::Right }]
        );
    }

    #[test]
    fn test_wrong_side_penalty_floors_at_zero() {
        let mut state = state();
        stack_raw(&mut state, Side::Right, ShapeKind::Jam, 30.0);
        drop_on_pan(&mut state, Side::Right, ShapeKind::Duck, 40.0);
        tick(&mut state, &TickInput::default(), REFERENCE_FRAME_MS);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_wrong_side_on_empty_stack_has_no_penalty() {
        let mut state = state();
        state.score = 3;
        drop_on_pan(&mut state, Side::Right, ShapeKind::Duck, 40.0);
        tick(&mut state, &TickInput::default(), REFERENCE_FRAME_MS);

        // Rejected without a knock: item consumed, nothing else changes
        assert!(state.falling.is_empty());
        assert!(state.debris.is_empty());
        assert_eq!(state.score, 3);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_missed_item_is_discarded_off_screen() {
        let mut state = state();
        let id = state.next_entity_id();
        state.falling.push(FallingItem {
            id,
            kind: ShapeKind::Duck,
            size: 40.0,
            speed: 5.0,
            pos: Vec2::new(50.0, state.view_height + 41.0),
        });
        tick(&mut state, &TickInput::default(), REFERENCE_FRAME_MS);
        assert!(state.falling.is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_imbalance_boundary_does_not_end_run() {
        let mut state = state();
        stack_raw(&mut state, Side::Left, ShapeKind::Duck, MAX_WEIGHT_IMBALANCE);
        tick(&mut state, &TickInput::default(), REFERENCE_FRAME_MS);
        assert_eq!(state.phase, GamePhase::Playing);

        // The smallest nudge past the threshold ends the run on the next check
        stack_raw(&mut state, Side::Left, ShapeKind::Duck, 0.5);
        tick(&mut state, &TickInput::default(), REFERENCE_FRAME_MS);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_death_spills_stacks_and_reports_once() {
        let mut state = state();
        state.score = 7;
        stack_raw(&mut state, Side::Left, ShapeKind::Duck, 56.0);
        stack_raw(&mut state, Side::Left, ShapeKind::Duck, 56.0);
        stack_raw(&mut state, Side::Left, ShapeKind::Duck, 56.0);
        stack_raw(&mut state, Side::Right, ShapeKind::Jam, 30.0);
        let stacked = state.stacks.total_len();
        drop_on_pan(&mut state, Side::Left, ShapeKind::Duck, 40.0);
        drop_on_pan(&mut state, Side::Right, ShapeKind::Jam, 40.0);

        tick(&mut state, &TickInput::default(), REFERENCE_FRAME_MS);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.death.active);
        // Left was heavier, so the beam tips left
        assert_eq!(state.death.tip_direction, -1.0);
        // In-flight items were consumed (both landed correctly this frame
        // before the imbalance check); all stacked items became debris
        assert!(state.falling.is_empty());
        assert_eq!(state.stacks.total_len(), 0);
        assert_eq!(state.debris.len(), stacked + 2);

        let events = state.take_events();
        let ended: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::RunEnded { .. }))
            .collect();
        assert_eq!(ended.len(), 1);
        assert_eq!(*ended[0], GameEvent::RunEnded { score: 9 });

        // Later frames never re-emit the end-of-run event
        tick(&mut state, &TickInput::default(), REFERENCE_FRAME_MS);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut state = state();
        drop_on_pan(&mut state, Side::Left, ShapeKind::Duck, 40.0);
        // Move the item off the landing point so it stays in flight
        state.falling[0].pos.y -= 200.0;
        state.spawn_timer_ms = 100.0;

        tick(
            &mut state,
            &TickInput {
                pause: true,
                ..Default::default()
            },
            REFERENCE_FRAME_MS,
        );
        assert_eq!(state.phase, GamePhase::Paused);

        let frozen_y = state.falling[0].pos.y;
        let frozen_timer = state.spawn_timer_ms;
        tick(&mut state, &TickInput::default(), REFERENCE_FRAME_MS);
        assert_eq!(state.falling[0].pos.y, frozen_y);
        assert_eq!(state.spawn_timer_ms, frozen_timer);

        tick(
            &mut state,
            &TickInput {
                resume: true,
                ..Default::default()
            },
            REFERENCE_FRAME_MS,
        );
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_pause_input_toggles() {
        let mut state = state();
        let toggle = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &toggle, REFERENCE_FRAME_MS);
        assert_eq!(state.phase, GamePhase::Paused);
        tick(&mut state, &toggle, REFERENCE_FRAME_MS);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_reset_restores_fresh_run() {
        let mut state = state();
        state.score = 3;
        stack_raw(&mut state, Side::Left, ShapeKind::Duck, 120.0);
        tick(&mut state, &TickInput::default(), REFERENCE_FRAME_MS);
        assert_eq!(state.phase, GamePhase::GameOver);
        state.take_events();

        // Game over is terminal until the explicit reset
        tick(&mut state, &TickInput::default(), REFERENCE_FRAME_MS);
        assert_eq!(state.phase, GamePhase::GameOver);

        tick(
            &mut state,
            &TickInput {
                reset: true,
                ..Default::default()
            },
            REFERENCE_FRAME_MS,
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.stacks.total_len(), 0);
        assert!(state.falling.is_empty());
        assert!(state.debris.is_empty());
        assert_eq!(state.scale_rotation, 0.0);
        assert!(!state.death.active);
    }

    #[test]
    fn test_spawner_produces_items_over_time() {
        let mut state = state();
        // 40 frames is past the base interval but too soon for any item to
        // have reached the pans or the bottom of the screen
        for _ in 0..40 {
            tick(&mut state, &TickInput::default(), REFERENCE_FRAME_MS);
        }
        assert!(!state.falling.is_empty());
    }

    #[test]
    fn test_spawn_backlog_is_clamped() {
        let mut state = state();
        state.spawn_timer_ms = 1_000_000.0;
        tick(&mut state, &TickInput::default(), REFERENCE_FRAME_MS);
        let cap = spawn_interval_for_score(state.score) * MAX_SPAWN_BACKLOG_INTERVALS;
        assert!(state.spawn_timer_ms <= cap);
        assert!(state.falling.len() <= MAX_SPAWNS_PER_FRAME as usize);
    }

    #[test]
    fn test_scale_movement_clamps_to_bounds() {
        let mut state = state();
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state, &input, REFERENCE_FRAME_MS);
        }
        let half = GameState::scale_half_width();
        assert!((state.scale_pos.x - (state.view_width - half)).abs() < 0.001);

        let input = TickInput {
            move_left: true,
            ..Default::default()
        };
        for _ in 0..1200 {
            tick(&mut state, &input, REFERENCE_FRAME_MS);
        }
        assert!((state.scale_pos.x - half).abs() < 0.001);
    }

    #[test]
    fn test_elapsed_time_is_capped() {
        let mut state = state();
        drop_on_pan(&mut state, Side::Left, ShapeKind::Duck, 40.0);
        state.falling[0].pos.y = 0.0;
        let speed = state.falling[0].speed;
        // A 5-second stall advances the item by at most the frame cap
        tick(&mut state, &TickInput::default(), 5000.0);
        let max_step = speed * (MAX_FRAME_DELTA_MS / REFERENCE_FRAME_MS);
        assert!(state.falling[0].pos.y <= max_step + 0.001);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = GameState::new(777, GAME_WIDTH, GAME_HEIGHT);
        let mut b = GameState::new(777, GAME_WIDTH, GAME_HEIGHT);
        let inputs = [
            TickInput::default(),
            TickInput {
                move_left: true,
                ..Default::default()
            },
            TickInput {
                move_right: true,
                ..Default::default()
            },
        ];
        for frame in 0..600 {
            let input = inputs[frame % inputs.len()];
            tick(&mut a, &input, REFERENCE_FRAME_MS);
            tick(&mut b, &input, REFERENCE_FRAME_MS);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.falling.len(), b.falling.len());
        assert_eq!(a.stacks.total_len(), b.stacks.total_len());
        assert_eq!(a.scale_pos, b.scale_pos);
    }
}