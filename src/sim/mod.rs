//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only
//! - Plain-data state the renderer reads after each tick
//! - No rendering or platform dependencies

pub mod balance;
pub mod catch;
pub mod spawn;
pub mod stacks;
pub mod state;
pub mod tick;

pub use catch::{landing_position, try_catch};
pub use spawn::{burst_chance_for_score, random_falling_item, spawn_interval_for_score};
pub use stacks::Stacks;
pub use state::{
    DeathSequence, FallingItem, Feedback, FeedbackKind, GameEvent, GamePhase, GameState,
    LooseBlock, ShapeKind, Side, StackedItem,
};
pub use tick::{TickInput, tick};
