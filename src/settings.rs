//! Engine settings and variant presets
//!
//! Loaded from JSON; every field falls back to the `Arcade` preset when absent.

use serde::{Deserialize, Serialize};

use crate::consts::PARTICLE_BUDGET;

/// Physics variant presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Constant-speed ball, large flipper boost, steady arena spin
    #[default]
    Arcade,
    /// Light gravity, gentler boost, spin that speeds up with each level
    Classic,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Arcade => "Arcade",
            Variant::Classic => "Classic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "arcade" => Some(Variant::Arcade),
            "classic" | "gravity" => Some(Variant::Classic),
            _ => None,
        }
    }

    /// Speed the ball returns to after every wall bounce
    pub fn base_speed(&self) -> f32 {
        match self {
            Variant::Arcade => 2.7,
            Variant::Classic => 3.0,
        }
    }

    /// One-shot multiplier applied on flipper contact
    pub fn boost_factor(&self) -> f32 {
        match self {
            // Boosted speed lands on 4.5
            Variant::Arcade => 4.5 / 2.7,
            Variant::Classic => 1.5,
        }
    }

    /// Downward acceleration per tick
    pub fn gravity(&self) -> f32 {
        match self {
            Variant::Arcade => 0.0,
            Variant::Classic => 0.05,
        }
    }

    pub fn rotation_mode(&self) -> RotationMode {
        match self {
            Variant::Arcade => RotationMode::Constant,
            Variant::Classic => RotationMode::ScaledByLevel,
        }
    }
}

/// How the arena spin rate is derived each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RotationMode {
    /// `rotation_speed` every tick
    #[default]
    Constant,
    /// `rotation_speed * (level - 1)`; level 1 is stationary
    ScaledByLevel,
}

/// Whether a ball lingering inside a wedge scores once or on every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScoringMode {
    /// Every tick inside a wedge counts
    #[default]
    PerTick,
    /// Counts once per entry; re-arms after the ball leaves the wedge
    Debounced,
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Preset these values were derived from
    pub variant: Variant,

    // === Ball ===
    pub base_speed: f32,
    pub boost_factor: f32,
    pub gravity: f32,

    // === Arena ===
    /// Radians per tick
    pub rotation_speed: f32,
    pub rotation_mode: RotationMode,

    // === Session ===
    pub scoring_mode: ScoringMode,
    /// Seconds on the clock at session start and after each level up
    pub game_duration: u32,
    /// Level score needed to advance
    pub level_score_threshold: i64,

    // === Effects ===
    /// Particle pool cap. The default never binds; a smaller cap evicts the
    /// oldest sparks before their life runs out.
    pub max_particles: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_preset(Variant::default())
    }
}

impl Settings {
    /// Settings for a variant preset
    pub fn from_preset(variant: Variant) -> Self {
        Self {
            variant,
            base_speed: variant.base_speed(),
            boost_factor: variant.boost_factor(),
            gravity: variant.gravity(),
            rotation_speed: 0.001,
            rotation_mode: variant.rotation_mode(),
            scoring_mode: ScoringMode::PerTick,
            game_duration: 30,
            level_score_threshold: 30,
            max_particles: PARTICLE_BUDGET,
        }
    }

    /// Apply a variant preset (updates the physics values tied to it)
    pub fn apply_preset(&mut self, variant: Variant) {
        self.variant = variant;
        self.base_speed = variant.base_speed();
        self.boost_factor = variant.boost_factor();
        self.gravity = variant.gravity();
        self.rotation_mode = variant.rotation_mode();
    }

    /// Arena spin for the given level
    pub fn rotation_for_level(&self, level: u32) -> f32 {
        match self.rotation_mode {
            RotationMode::Constant => self.rotation_speed,
            RotationMode::ScaledByLevel => self.rotation_speed * level.saturating_sub(1) as f32,
        }
    }

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
