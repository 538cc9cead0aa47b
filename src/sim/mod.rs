//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick
//! - Seeded RNG only
//! - Fixed phase order and fixed collision order (walls, then flippers)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod geometry;
pub mod scoring;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{
    CollisionResult, Contact, Surface, ball_segment_collision, ball_wall_collision, reflect_velocity,
};
pub use effects::{Deformation, EffectColor, Effects, Particle, Ripple};
pub use geometry::{Edge, FlipperKind, FlipperMount, Geometry, Side};
pub use scoring::{ScoreDelta, Wedge};
pub use snapshot::Snapshot;
pub use state::{Ball, ClockState, Flipper, GameEvent, GamePhase, GameState, ScoreState};
pub use tick::{TickInput, clock_second, tick};
