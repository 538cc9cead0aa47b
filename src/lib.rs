//! Tri-Spin - A rotating triangle arena pinball engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, flippers, collisions, effects, scoring)
//! - `settings`: Data-driven physics tuning and variant presets

pub mod settings;
pub mod sim;

pub use settings::{RotationMode, ScoringMode, Settings, Variant};

use glam::Vec2;

/// Game configuration constants
///
/// All rates are per tick; the host drives one tick per display refresh.
pub mod consts {
    /// Fraction of the smaller viewport dimension kept clear around the triangle
    pub const ARENA_MARGIN_FRACTION: f32 = 0.15;
    /// Scoring wedge size as a fraction of the triangle side
    pub const ZONE_FRACTION: f32 = 0.1;
    /// Extra vertical reach of the apex score wedge
    pub const SCORE_ZONE_PAD: f32 = 5.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Ball spawns this far above the bottom edge
    pub const BALL_SPAWN_LIFT: f32 = 60.0;
    /// Scale applied on impact (eases back to 1.0)
    pub const SQUASH_SCALE: f32 = 1.5;
    pub const SQUASH_EASING: f32 = 0.2;

    /// Flipper defaults
    pub const FLIPPER_LENGTH: f32 = 100.0;
    pub const FLIPPER_THICKNESS: f32 = 10.0;
    /// Horizontal gap between the two bottom flipper tips at rest
    pub const FLIPPER_GAP: f32 = 20.0;
    pub const MAX_FLIP_ANGLE: f32 = std::f32::consts::FRAC_PI_4;
    /// Radians per tick
    pub const FLIP_SPEED: f32 = 0.1;

    /// Effect bursts
    pub const SPARK_COUNT: usize = 30;
    pub const SPARK_LIFE: u32 = 30;
    pub const SPARK_MIN_SPEED: f32 = 1.0;
    pub const SPARK_MAX_SPEED: f32 = 4.0;
    pub const RIPPLE_LIFE: u32 = 60;
    pub const DEFORMATION_LIFE: u32 = 30;
    /// Most bursts one tick can spawn: two wall passes, every flipper, one wedge
    pub const MAX_BURSTS_PER_TICK: usize = 3 + 4 + 3 + 1;
    /// Live sparks at the worst sustained spawn rate
    pub const PARTICLE_BUDGET: usize = MAX_BURSTS_PER_TICK * SPARK_COUNT * SPARK_LIFE as usize;

    /// Points per wedge visit
    pub const ZONE_POINTS: i64 = 10;

    /// Simulated frame rate used by the headless runner for the 1 Hz clock
    pub const TICKS_PER_SECOND: u32 = 60;
}

/// Rotate `point` about `origin` by `angle` radians
#[inline]
pub fn rotate_about(point: Vec2, origin: Vec2, angle: f32) -> Vec2 {
    origin + Vec2::from_angle(angle).rotate(point - origin)
}

/// Unit direction for an angle
#[inline]
pub fn direction(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
