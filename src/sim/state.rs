//! Game state and core simulation types
//!
//! Everything the engine mutates lives in `GameState`; each tick phase borrows it mutably.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{EffectColor, Effects};
use super::geometry::{Edge, FlipperKind, FlipperMount, Geometry};
use crate::consts::*;
use crate::direction;
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Clock ran out (terminal until reset)
    GameOver,
}

/// Something that happened during a tick, for hosts that react to it (sound, HUD)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WallHit { edge: Edge, point: Vec2 },
    FlipperHit { kind: FlipperKind, point: Vec2, boosted: bool },
    ZoneScored { delta: i64, point: Vec2 },
    LevelUp { level: u32 },
    GameOver { score: i64 },
}

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Visual squash (1.0 = round)
    pub scale: f32,
    /// Set by a flipper hit, cleared by the next wall hit
    pub boosted: bool,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius: BALL_RADIUS,
            scale: 1.0,
            boosted: false,
        }
    }

    /// Fresh ball at `pos` heading along `angle` at `speed`
    pub fn launch(pos: Vec2, angle: f32, speed: f32) -> Self {
        Self::new(pos, direction(angle) * speed)
    }

    /// Advance one tick: gravity, motion, squash decay
    pub fn integrate(&mut self, gravity: f32) {
        self.vel.y += gravity;
        self.pos += self.vel;
        self.scale += (1.0 - self.scale) * SQUASH_EASING;
    }

    pub fn squash(&mut self) {
        self.scale = SQUASH_SCALE;
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// A player-actuated paddle segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flipper {
    pub kind: FlipperKind,
    pub pivot: Vec2,
    pub base_angle: f32,
    /// Flip amount in [0, max_angle]
    pub current_angle: f32,
    pub direction: f32,
    pub length: f32,
    pub thickness: f32,
    pub max_angle: f32,
}

impl Flipper {
    pub fn from_mount(mount: &FlipperMount) -> Self {
        Self {
            kind: mount.kind,
            pivot: mount.pivot,
            base_angle: mount.base_angle,
            current_angle: 0.0,
            direction: mount.direction,
            length: FLIPPER_LENGTH,
            thickness: FLIPPER_THICKNESS,
            max_angle: MAX_FLIP_ANGLE,
        }
    }

    /// Move to a new mount (after resize), keeping the current flip
    pub fn remount(&mut self, mount: &FlipperMount) {
        self.pivot = mount.pivot;
        self.base_angle = mount.base_angle;
        self.direction = mount.direction;
    }

    /// Swing toward extended (active) or rest by one step
    pub fn step(&mut self, active: bool) {
        let delta = if active { FLIP_SPEED } else { -FLIP_SPEED };
        self.current_angle = (self.current_angle + delta).clamp(0.0, self.max_angle);
    }

    /// Absolute segment angle
    pub fn angle(&self) -> f32 {
        self.base_angle + self.direction * self.current_angle
    }

    pub fn tip(&self) -> Vec2 {
        self.pivot + direction(self.angle()) * self.length
    }

    pub fn is_extended(&self) -> bool {
        self.current_angle >= self.max_angle
    }
}

/// Score counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    pub total: i64,
    /// Points earned since the last level up
    pub level_score: i64,
    pub level: u32,
    /// Debounce latches: ball was inside the wedge last tick
    pub in_score_zone: bool,
    pub in_penalty_zone: bool,
}

impl ScoreState {
    pub fn new() -> Self {
        Self {
            level: 1,
            ..Default::default()
        }
    }
}

/// Countdown driven by the host's 1 Hz timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockState {
    pub remaining: u32,
}

/// Complete engine state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from (0 when injected)
    pub seed: u64,
    pub settings: Settings,
    pub geometry: Geometry,
    /// Accumulated arena spin about the centroid (render-only)
    pub rotation: f32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub ball: Ball,
    /// Stored in `FlipperKind::ALL` order
    pub flippers: [Flipper; 4],
    pub effects: Effects,
    pub score: ScoreState,
    pub clock: ClockState,
    /// Events since the last snapshot
    pub events: Vec<GameEvent>,
    rng: Pcg32,
}

impl GameState {
    /// Create a new session for a viewport with a seeded RNG
    pub fn new(settings: Settings, width: f32, height: f32, seed: u64) -> Self {
        let mut state = Self::with_rng(settings, width, height, Pcg32::seed_from_u64(seed));
        state.seed = seed;
        state
    }

    /// Create a new session using a caller-provided RNG
    pub fn with_rng(settings: Settings, width: f32, height: f32, rng: Pcg32) -> Self {
        let geometry = Geometry::new(width, height);
        let flippers = geometry.mounts.map(|m| Flipper::from_mount(&m));
        let ball = Ball::new(geometry.ball_spawn(), Vec2::ZERO);

        let mut state = Self {
            seed: 0,
            effects: Effects::new(settings.max_particles),
            clock: ClockState {
                remaining: settings.game_duration,
            },
            settings,
            geometry,
            rotation: 0.0,
            phase: GamePhase::Running,
            time_ticks: 0,
            ball,
            flippers,
            score: ScoreState::new(),
            events: Vec::new(),
            rng,
        };

        state.launch_ball();
        state
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Burst of effects at `point`, scattered with the session RNG
    pub fn spawn_effect(&mut self, point: Vec2, color: EffectColor) {
        self.effects.spawn(point, color, &mut self.rng);
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn flipper(&self, kind: FlipperKind) -> &Flipper {
        &self.flippers[kind as usize]
    }

    pub fn flipper_mut(&mut self, kind: FlipperKind) -> &mut Flipper {
        &mut self.flippers[kind as usize]
    }

    /// Relaunch the ball from the spawn point in a random direction
    pub fn launch_ball(&mut self) {
        let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
        self.launch_ball_at_angle(angle);
    }

    /// Relaunch the ball from the spawn point along `angle`
    pub fn launch_ball_at_angle(&mut self, angle: f32) {
        self.ball = Ball::launch(self.geometry.ball_spawn(), angle, self.settings.base_speed);
        log::info!(
            "Ball launched at ({:.1}, {:.1}), angle {:.3}",
            self.ball.pos.x,
            self.ball.pos.y,
            angle
        );
    }

    /// Start a fresh session on the same arena
    pub fn reset(&mut self) {
        self.score = ScoreState::new();
        self.clock = ClockState {
            remaining: self.settings.game_duration,
        };
        self.phase = GamePhase::Running;
        self.rotation = 0.0;
        self.time_ticks = 0;
        self.effects.clear();
        self.events.clear();
        for flipper in &mut self.flippers {
            flipper.current_angle = 0.0;
        }
        self.launch_ball();
        log::info!("Session reset ({}s on the clock)", self.clock.remaining);
    }

    /// Rebuild geometry for a new viewport size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.geometry = Geometry::new(width, height);
        for (flipper, mount) in self.flippers.iter_mut().zip(self.geometry.mounts.iter()) {
            flipper.remount(mount);
        }
        log::info!(
            "Arena resized to {}x{} (side {:.1})",
            width,
            height,
            self.geometry.side
        );
        self.launch_ball();
    }
}
