//! Catch detection
//!
//! A falling item is caught when it enters an axis-aligned window around a
//! pan's landing point. The vertical window widens with item speed so fast
//! items cannot tunnel past the pan between frames.

use glam::Vec2;

use super::stacks::Stacks;
use super::state::{FallingItem, Side};
use crate::consts::*;
use crate::local_to_world;

/// World position where an incoming item of the given size would come to
/// rest on this side: the pan anchor, raised by the current stack height,
/// pushed through the beam transform.
pub fn landing_position(
    side: Side,
    incoming_size: f32,
    stacks: &Stacks,
    scale_pos: Vec2,
    scale_rotation: f32,
) -> Vec2 {
    let local = Vec2::new(
        side.pan_x(),
        PAN_ANCHOR_Y - PAN_RADIUS - incoming_size * 0.5 - stacks.height_of(side),
    );
    local_to_world(scale_pos, scale_rotation, local)
}

/// Single-frame catch check against both landing points. Returns the caught
/// side, resolving a double hit to the Euclidean-closer landing point.
pub fn try_catch(
    item: &FallingItem,
    dt: f32,
    left_landing: Vec2,
    right_landing: Vec2,
) -> Option<Side> {
    let horizontal_window =
        PAN_RADIUS * CATCH_HORIZONTAL_WINDOW_RATIO + item.size * CATCH_ITEM_SIZE_FACTOR;
    let vertical_window =
        (item.speed * dt * CATCH_VERTICAL_WINDOW_MULTIPLIER).max(CATCH_VERTICAL_WINDOW_MIN);

    let left_delta = (item.pos - left_landing).abs();
    let right_delta = (item.pos - right_landing).abs();

    let can_catch_left = left_delta.x <= horizontal_window && left_delta.y <= vertical_window;
    let can_catch_right = right_delta.x <= horizontal_window && right_delta.y <= vertical_window;

    match (can_catch_left, can_catch_right) {
        (false, false) => None,
        (true, false) => Some(Side::Left),
        (false, true) => Some(Side::Right),
        (true, true) => {
            if left_delta.length() <= right_delta.length() {
                Some(Side::Left)
            } else {
                Some(Side::Right)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ShapeKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn item_at(pos: Vec2, speed: f32) -> FallingItem {
        FallingItem {
            id: 1,
            kind: ShapeKind::Duck,
            size: 40.0,
            speed,
            pos,
        }
    }

    #[test]
    fn test_landing_rises_with_stack_height() {
        let mut stacks = Stacks::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let scale_pos = Vec2::new(480.0, 544.0);
        let empty = landing_position(Side::Left, 40.0, &stacks, scale_pos, 0.0);
        stacks.push(Side::Left, 1, ShapeKind::Duck, 50.0, &mut rng);
        let loaded = landing_position(Side::Left, 40.0, &stacks, scale_pos, 0.0);
        // Taller stack catches higher (smaller screen Y)
        assert!(loaded.y < empty.y);
        assert!((loaded.x - empty.x).abs() < 0.001);
    }

    #[test]
    fn test_catch_inside_window() {
        let left = Vec2::new(388.0, 500.0);
        let right = Vec2::new(572.0, 500.0);
        let item = item_at(Vec2::new(390.0, 505.0), 3.0);
        assert_eq!(try_catch(&item, 1.0, left, right), Some(Side::Left));
    }

    #[test]
    fn test_miss_outside_horizontal_window() {
        let left = Vec2::new(388.0, 500.0);
        let right = Vec2::new(572.0, 500.0);
        let window = PAN_RADIUS * CATCH_HORIZONTAL_WINDOW_RATIO + 40.0 * CATCH_ITEM_SIZE_FACTOR;
        let item = item_at(Vec2::new(388.0 + window + 1.0, 500.0), 3.0);
        assert_eq!(try_catch(&item, 1.0, left, right), None);
    }

    #[test]
    fn test_miss_when_already_below_window() {
        let left = Vec2::new(388.0, 500.0);
        let right = Vec2::new(572.0, 500.0);
        let item = item_at(Vec2::new(388.0, 500.0 + CATCH_VERTICAL_WINDOW_MIN + 5.0), 1.0);
        assert_eq!(try_catch(&item, 1.0, left, right), None);
    }

    #[test]
    fn test_fast_items_get_a_looser_vertical_window() {
        let left = Vec2::new(388.0, 500.0);
        let right = Vec2::new(572.0, 500.0);
        // 30 px above the landing point: outside the minimum window, inside
        // the speed-scaled one
        let pos = Vec2::new(388.0, 470.0);
        let slow = item_at(pos, 1.0);
        let fast = item_at(pos, 30.0);
        assert_eq!(try_catch(&slow, 1.0, left, right), None);
        assert_eq!(try_catch(&fast, 1.0, left, right), Some(Side::Left));
    }

    #[test]
    fn test_double_hit_resolves_to_closer_pan() {
        // Landing points close together, item nearer the right one
        let left = Vec2::new(480.0, 500.0);
        let right = Vec2::new(500.0, 500.0);
        let item = item_at(Vec2::new(495.0, 502.0), 3.0);
        assert_eq!(try_catch(&item, 1.0, left, right), Some(Side::Right));
    }
}
