//! Arena geometry derived from the viewport
//!
//! The triangle is inscribed with a margin on every side:
//! - A: bottom-left, B: bottom-right, C: apex
//! - screen coordinates, y grows downward
//!
//! Recomputed only on resize; the per-tick arena spin is a render transform
//! about the centroid and never touches these values.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Which of the four flippers a descriptor belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlipperKind {
    BottomLeft,
    BottomRight,
    SlopeLeft,
    SlopeRight,
}

impl FlipperKind {
    pub const ALL: [FlipperKind; 4] = [
        FlipperKind::BottomLeft,
        FlipperKind::BottomRight,
        FlipperKind::SlopeLeft,
        FlipperKind::SlopeRight,
    ];

    /// Input side that actuates this flipper
    pub fn side(&self) -> Side {
        match self {
            FlipperKind::BottomLeft | FlipperKind::SlopeLeft => Side::Left,
            FlipperKind::BottomRight | FlipperKind::SlopeRight => Side::Right,
        }
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, FlipperKind::BottomLeft | FlipperKind::BottomRight)
    }
}

/// Player input side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// Where a flipper hinges and which way it swings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlipperMount {
    pub kind: FlipperKind,
    pub pivot: Vec2,
    /// Segment angle at rest (radians)
    pub base_angle: f32,
    /// +1 or -1: sign applied to the flip angle
    pub direction: f32,
}

/// One straight wall of the triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    AB,
    BC,
    CA,
}

/// Triangle arena for a viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub a: Vec2,
    pub b: Vec2,
    pub c: Vec2,
    pub centroid: Vec2,
    pub side: f32,
    /// Triangle height (apex to base)
    pub tri_height: f32,
    /// Size of both scoring wedges
    pub zone: f32,
    pub mounts: [FlipperMount; 4],
}

impl Geometry {
    /// Inscribe the arena in a `width` x `height` viewport
    pub fn new(width: f32, height: f32) -> Self {
        let margin = width.min(height) * ARENA_MARGIN_FRACTION;
        let max_w = width - 2.0 * margin;
        let max_h = (height - 2.0 * margin) * 2.0 / 3f32.sqrt();
        let side = max_w.min(max_h).max(0.0);
        let tri_height = 3f32.sqrt() / 2.0 * side;

        let a = Vec2::new((width - side) / 2.0, height - margin);
        let b = Vec2::new((width + side) / 2.0, height - margin);
        let c = Vec2::new(width / 2.0, height - margin - tri_height);
        let centroid = (a + b + c) / 3.0;
        let zone = side * ZONE_FRACTION;

        let center_x = width / 2.0;
        let bottom_offset = FLIPPER_LENGTH + FLIPPER_GAP / 2.0;
        let bottom_y = a.y - FLIPPER_THICKNESS / 2.0;

        let (ac, bc) = (c - a, c - b);
        let slope_left = ac.y.atan2(ac.x);
        let slope_right = bc.y.atan2(bc.x);

        let mounts = [
            FlipperMount {
                kind: FlipperKind::BottomLeft,
                pivot: Vec2::new(center_x - bottom_offset, bottom_y),
                base_angle: 0.0,
                direction: -1.0,
            },
            FlipperMount {
                kind: FlipperKind::BottomRight,
                pivot: Vec2::new(center_x + bottom_offset, bottom_y),
                base_angle: std::f32::consts::PI,
                direction: 1.0,
            },
            FlipperMount {
                kind: FlipperKind::SlopeLeft,
                pivot: (a + c) / 2.0,
                base_angle: slope_left,
                direction: 1.0,
            },
            FlipperMount {
                kind: FlipperKind::SlopeRight,
                pivot: (b + c) / 2.0,
                base_angle: slope_right,
                direction: -1.0,
            },
        ];

        Self {
            width,
            height,
            margin,
            a,
            b,
            c,
            centroid,
            side,
            tri_height,
            zone,
            mounts,
        }
    }

    /// Endpoints of a wall
    pub fn edge(&self, edge: Edge) -> (Vec2, Vec2) {
        match edge {
            Edge::AB => (self.a, self.b),
            Edge::BC => (self.b, self.c),
            Edge::CA => (self.c, self.a),
        }
    }

    /// All three walls in collision order
    pub fn edges(&self) -> [(Edge, Vec2, Vec2); 3] {
        [Edge::AB, Edge::BC, Edge::CA].map(|e| {
            let (p1, p2) = self.edge(e);
            (e, p1, p2)
        })
    }

    /// Unit normal of a wall pointing into the arena
    pub fn inward_normal(&self, edge: Edge) -> Vec2 {
        let (p1, p2) = self.edge(edge);
        let n = (p2 - p1).perp().normalize_or_zero();
        if n.dot(self.centroid - p1) >= 0.0 { n } else { -n }
    }

    /// Distance from a wall's line, positive on the arena side
    pub fn wall_distance(&self, edge: Edge, point: Vec2) -> f32 {
        let (p1, _) = self.edge(edge);
        (point - p1).dot(self.inward_normal(edge))
    }

    /// Whether `point` lies on the inner side of all three walls
    pub fn contains(&self, point: Vec2) -> bool {
        self.edges()
            .iter()
            .all(|&(edge, _, _)| self.wall_distance(edge, point) >= 0.0)
    }

    pub fn mount(&self, kind: FlipperKind) -> &FlipperMount {
        // Mounts are stored in FlipperKind::ALL order
        &self.mounts[kind as usize]
    }

    /// Where a freshly launched ball starts
    pub fn ball_spawn(&self) -> Vec2 {
        Vec2::new(self.c.x, self.a.y - BALL_SPAWN_LIFT)
    }

    /// Corners of the red penalty wedge at B (for rendering)
    pub fn penalty_wedge(&self) -> [Vec2; 3] {
        let t = if self.side > 0.0 { self.zone / self.side } else { 0.0 };
        [self.b, self.b + (self.a - self.b) * t, self.b + (self.c - self.b) * t]
    }

    /// Corners of the green score wedge under C (for rendering)
    pub fn score_wedge(&self) -> [Vec2; 3] {
        let top = self.c + Vec2::new(0.0, SCORE_ZONE_PAD);
        let base_y = self.c.y + self.zone + SCORE_ZONE_PAD;
        [
            top,
            Vec2::new(self.c.x - self.zone / 2.0, base_y),
            Vec2::new(self.c.x + self.zone / 2.0, base_y),
        ]
    }
}
