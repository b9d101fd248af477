//! Per-side stacks of caught items
//!
//! Owns all height and weight accounting. Pushing and popping are the only
//! mutators; height/weight reads never change state.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{ShapeKind, Side, StackedItem};
use crate::consts::*;

/// The two ordered stacks resting in the scale's pans. Index order is
/// stack order; the last element is the top.
#[derive(Debug, Clone, Default)]
pub struct Stacks {
    left: Vec<StackedItem>,
    right: Vec<StackedItem>,
}

impl Stacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self, side: Side) -> &[StackedItem] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn items_mut(&mut self, side: Side) -> &mut Vec<StackedItem> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Place a caught item on top of the named side's stack. Vertical
    /// position compresses against the items below; horizontal position
    /// gets a small jitter within the pan.
    pub fn push(&mut self, side: Side, id: u32, kind: ShapeKind, size: f32, rng: &mut Pcg32) {
        let jitter = PAN_RADIUS * STACK_JITTER_RATIO;
        let offset = Vec2::new(
            side.pan_x() + rng.random_range(-jitter..jitter),
            PAN_ANCHOR_Y - PAN_RADIUS - size * 0.5 - self.height_of(side),
        );
        let rotation = rng.random_range(-STACKED_ROTATION_MAX..STACKED_ROTATION_MAX);
        self.items_mut(side).push(StackedItem {
            id,
            kind,
            size,
            offset,
            rotation,
        });
    }

    /// Remove and return the top item, or `None` when the stack is empty.
    /// An empty pop is an expected case, not an error.
    pub fn pop(&mut self, side: Side) -> Option<StackedItem> {
        self.items_mut(side).pop()
    }

    /// Stack height used to place the next incoming item
    pub fn height_of(&self, side: Side) -> f32 {
        self.items(side)
            .iter()
            .map(|item| item.size * STACK_COMPRESSION + STACK_PADDING)
            .sum()
    }

    /// Summed item sizes; size doubles as weight
    pub fn weight_of(&self, side: Side) -> f32 {
        self.items(side).iter().map(|item| item.size).sum()
    }

    /// Right weight minus left weight; positive tips the beam rightward
    pub fn weight_delta(&self) -> f32 {
        self.weight_of(Side::Right) - self.weight_of(Side::Left)
    }

    /// Absolute weight difference between the pans
    pub fn imbalance(&self) -> f32 {
        self.weight_delta().abs()
    }

    pub fn clear(&mut self, side: Side) {
        self.items_mut(side).clear();
    }

    pub fn clear_all(&mut self) {
        self.left.clear();
        self.right.clear();
    }

    pub fn total_len(&self) -> usize {
        self.left.len() + self.right.len()
    }
}
