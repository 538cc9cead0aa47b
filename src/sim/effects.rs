//! Transient visual effects: spark bursts, ripples and wall dents
//!
//! Nothing here feeds back into gameplay. Every entry counts its life down by one
//! per tick and is dropped the tick it reaches zero.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::direction;

/// Burst colours, one per event source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectColor {
    /// Wall bounce
    Cyan,
    /// Bottom flipper
    Amber,
    /// Slope flipper
    Yellow,
    /// Score wedge
    Lime,
    /// Penalty wedge
    Red,
}

impl EffectColor {
    /// CSS-style colour for renderers
    pub fn hex(&self) -> &'static str {
        match self {
            EffectColor::Cyan => "#00ffff",
            EffectColor::Amber => "#ffcc5c",
            EffectColor::Yellow => "#ffff00",
            EffectColor::Lime => "#00ff00",
            EffectColor::Red => "#ff0000",
        }
    }
}

/// A spark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks left
    pub life: u32,
    pub color: EffectColor,
}

/// Expanding ring at an impact point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ripple {
    pub pos: Vec2,
    pub life: u32,
}

/// Dent marker at an impact point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deformation {
    pub pos: Vec2,
    pub life: u32,
}

/// The three effect pools
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub particles: Vec<Particle>,
    pub ripples: Vec<Ripple>,
    pub deformations: Vec<Deformation>,
    max_particles: usize,
}

impl Effects {
    pub fn new(max_particles: usize) -> Self {
        Self {
            max_particles,
            ..Default::default()
        }
    }

    /// Burst of sparks plus one ripple and one dent at `point`
    pub fn spawn<R: Rng + ?Sized>(&mut self, point: Vec2, color: EffectColor, rng: &mut R) {
        for _ in 0..SPARK_COUNT {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(SPARK_MIN_SPEED..SPARK_MAX_SPEED);
            self.particles.push(Particle {
                pos: point,
                vel: direction(angle) * speed,
                life: SPARK_LIFE,
                color,
            });
        }

        // Evict oldest sparks past the cap
        if self.particles.len() > self.max_particles {
            let excess = self.particles.len() - self.max_particles;
            self.particles.drain(..excess);
        }

        self.ripples.push(Ripple {
            pos: point,
            life: RIPPLE_LIFE,
        });
        self.deformations.push(Deformation {
            pos: point,
            life: DEFORMATION_LIFE,
        });
    }

    /// Advance one tick: sparks drift, everything fades, dead entries go
    pub fn age(&mut self) {
        for particle in &mut self.particles {
            particle.pos += particle.vel;
            particle.life = particle.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);

        for ripple in &mut self.ripples {
            ripple.life = ripple.life.saturating_sub(1);
        }
        self.ripples.retain(|r| r.life > 0);

        for dent in &mut self.deformations {
            dent.life = dent.life.saturating_sub(1);
        }
        self.deformations.retain(|d| d.life > 0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.ripples.clear();
        self.deformations.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty() && self.ripples.is_empty() && self.deformations.is_empty()
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }
}
