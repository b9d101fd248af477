//! Game state and core simulation types
//!
//! Everything the renderer needs to draw a frame lives here as plain data.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::stacks::Stacks;
use crate::consts::*;

/// One of the two pans of the balance scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Local X of this side's pan anchor
    #[inline]
    pub fn pan_x(self) -> f32 {
        match self {
            Side::Left => -PAN_OFFSET,
            Side::Right => PAN_OFFSET,
        }
    }

    /// Horizontal direction pointing away from the scale's center
    #[inline]
    pub fn push_direction(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// The two item shapes; each has a fixed correct pan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Duck,
    Jam,
}

impl ShapeKind {
    /// Ducks belong in the left pan, jam jars in the right. Fixed for the
    /// lifetime of the game.
    #[inline]
    pub fn expected_side(self) -> Side {
        match self {
            ShapeKind::Duck => Side::Left,
            ShapeKind::Jam => Side::Right,
        }
    }
}

/// An item currently descending toward the scale
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FallingItem {
    /// Opaque handle for the rendering layer; never read by the sim
    pub id: u32,
    pub kind: ShapeKind,
    /// Diameter-like extent; doubles as weight once stacked
    pub size: f32,
    /// Vertical pixels per normalized frame
    pub speed: f32,
    pub pos: Vec2,
}

/// An item resting in one pan's stack. The offset is beam-local so the
/// whole stack tilts with the scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StackedItem {
    pub id: u32,
    pub kind: ShapeKind,
    pub size: f32,
    pub offset: Vec2,
    /// Cosmetic jitter, not load-bearing
    pub rotation: f32,
}

/// Free-falling debris, knocked off a stack or spilled at death
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LooseBlock {
    pub id: u32,
    pub kind: ShapeKind,
    pub size: f32,
    pub pos: Vec2,
    pub rotation: f32,
    pub vel: Vec2,
    pub spin: f32,
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frozen; spawn timer and item motion hold their values
    Paused,
    /// Run ended; terminal until an explicit reset
    GameOver,
}

/// Transient HUD message kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackKind {
    Caught,
    WrongSide,
    Imbalanced,
}

impl FeedbackKind {
    pub fn message(self) -> &'static str {
        match self {
            FeedbackKind::Caught => "+1 caught",
            FeedbackKind::WrongSide => "Wrong side!",
            FeedbackKind::Imbalanced => "Too imbalanced!",
        }
    }
}

/// A fading on-screen message
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub timer_ms: f32,
}

impl Feedback {
    pub fn new(kind: FeedbackKind) -> Self {
        Self {
            kind,
            timer_ms: FEEDBACK_DURATION_MS,
        }
    }

    /// Opacity for the renderer, 1.0 fresh down to 0.0 expired
    pub fn alpha(&self) -> f32 {
        (self.timer_ms / FEEDBACK_DURATION_MS).clamp(0.0, 1.0)
    }
}

/// Scripted tip-and-fly animation state
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DeathSequence {
    pub active: bool,
    /// -1.0 tips left, +1.0 tips right
    pub tip_direction: f32,
    /// Radians of spin left before the flight phase starts
    pub spin_remaining: f32,
    pub flight_active: bool,
    pub flight_vel: Vec2,
}

/// Discrete notifications for the host (audio, leaderboard)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// An item landed in its correct pan
    Caught { side: Side },
    /// A wrong-side catch knocked the top item off this side's stack
    Knocked { side: Side },
    /// Imbalance crossed the threshold; emitted exactly once per run
    RunEnded { score: u32 },
}

/// Complete per-session state. Constructed explicitly and owned by the
/// host; every sim operation goes through it.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub score: u32,
    pub phase: GamePhase,
    pub spawn_timer_ms: f32,
    pub feedback: Option<Feedback>,
    /// World position of the beam pivot
    pub scale_pos: Vec2,
    pub scale_rotation: f32,
    /// Cosmetic imbalance gauge needle
    pub dial_rotation: f32,
    pub death: DeathSequence,
    pub falling: Vec<FallingItem>,
    pub stacks: Stacks,
    pub debris: Vec<LooseBlock>,
    pub view_width: f32,
    pub view_height: f32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh session for the given seed and viewport
    pub fn new(seed: u64, view_width: f32, view_height: f32) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            phase: GamePhase::Playing,
            spawn_timer_ms: 0.0,
            feedback: None,
            scale_pos: Vec2::new(view_width * 0.5, view_height - SCALE_BASELINE_OFFSET),
            scale_rotation: 0.0,
            dial_rotation: 0.0,
            death: DeathSequence::default(),
            falling: Vec::new(),
            stacks: Stacks::new(),
            debris: Vec::new(),
            view_width,
            view_height,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain pending events; the host calls this once per frame
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Half the scale's footprint, used for movement clamping
    pub fn scale_half_width() -> f32 {
        PAN_OFFSET + PAN_RADIUS * 1.025 + 2.0
    }

    /// Update viewport bounds; the pivot re-baselines and stays on screen
    pub fn resize(&mut self, view_width: f32, view_height: f32) {
        self.view_width = view_width;
        self.view_height = view_height;
        if !self.death.flight_active {
            self.scale_pos.y = view_height - SCALE_BASELINE_OFFSET;
            let half = Self::scale_half_width();
            self.scale_pos.x = self.scale_pos.x.clamp(half, view_width - half);
        }
    }

    /// Start a fresh run, discarding all items, stacks and debris.
    /// Invoked explicitly by the host, never as a navigation side effect.
    pub fn reset(&mut self) {
        self.score = 0;
        self.phase = GamePhase::Playing;
        self.spawn_timer_ms = 0.0;
        self.feedback = None;
        self.scale_pos = Vec2::new(
            self.view_width * 0.5,
            self.view_height - SCALE_BASELINE_OFFSET,
        );
        self.scale_rotation = 0.0;
        self.dial_rotation = 0.0;
        self.death = DeathSequence::default();
        self.falling.clear();
        self.stacks.clear_all();
        self.debris.clear();
        self.events.clear();
        log::info!("run reset (seed {})", self.seed);
    }
}
