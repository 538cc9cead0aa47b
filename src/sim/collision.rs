//! Collision detection and response for straight segments
//!
//! Flippers are finite segments (closest point clamped to the segment, so the ends
//! behave like round caps) and push from whichever side the ball is on. Walls are
//! one-sided: the arena is the intersection of three half-planes, and a ball centre
//! that ends up past a wall line is still pushed back inward.
//!
//! Walls are energy-neutral: every wall bounce puts the ball back on its base speed and
//! ends a boosted episode. Flippers are the only energy source and boost at most once
//! per episode.

use glam::Vec2;

use super::effects::EffectColor;
use super::geometry::{Edge, FlipperKind, Geometry};
use super::state::{Ball, Flipper};

/// Squared length below which a segment is treated as a point and skipped
const DEGENERATE_LEN_SQ: f32 = 1e-8;

/// Wall penetration below this is treated as resting contact
const WALL_SLOP: f32 = 1e-3;

/// Position-only passes used to clear a corner after a wall bounce
const WALL_SETTLE_PASSES: usize = 8;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the segment (if hit)
    pub point: Vec2,
    /// Unit normal from the segment toward the ball centre
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// What the ball bounced off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Wall(Edge),
    Flipper(FlipperKind),
}

impl Surface {
    /// Burst colour for a hit on this surface
    pub fn color(&self) -> EffectColor {
        match self {
            Surface::Wall(_) => EffectColor::Cyan,
            Surface::Flipper(kind) if kind.is_bottom() => EffectColor::Amber,
            Surface::Flipper(_) => EffectColor::Yellow,
        }
    }
}

/// A resolved collision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub surface: Surface,
    pub point: Vec2,
    /// Boost was applied by this contact
    pub boosted: bool,
}

/// Check a ball against the segment `p1`-`p2`
///
/// `toward` picks the normal when the ball centre sits exactly on the segment:
/// the perpendicular with a positive component along it wins.
pub fn ball_segment_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    p1: Vec2,
    p2: Vec2,
    toward: Vec2,
) -> CollisionResult {
    let seg = p2 - p1;
    let len_sq = seg.length_squared();
    if len_sq < DEGENERATE_LEN_SQ {
        return CollisionResult::miss();
    }

    let t = ((ball_pos - p1).dot(seg) / len_sq).clamp(0.0, 1.0);
    let closest = p1 + seg * t;
    let offset = ball_pos - closest;
    let dist_sq = offset.length_squared();

    if dist_sq >= ball_radius * ball_radius {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > f32::EPSILON {
        offset / dist
    } else {
        // Centre on the segment: use the perpendicular
        let perp = seg.perp().normalize();
        if perp.dot(toward) >= 0.0 { perp } else { -perp }
    };

    CollisionResult {
        hit: true,
        point: closest,
        normal,
        penetration: ball_radius - dist,
    }
}

/// Check a ball against the wall `p1`-`p2` whose arena side is `inward`
///
/// `inward` must be the wall's unit normal. Distance is signed, so a centre past the
/// wall line reports a penetration larger than the radius and a normal that still
/// points into the arena. The contact point is the closest point on the segment.
pub fn ball_wall_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    p1: Vec2,
    p2: Vec2,
    inward: Vec2,
) -> CollisionResult {
    let seg = p2 - p1;
    let len_sq = seg.length_squared();
    if len_sq < DEGENERATE_LEN_SQ {
        return CollisionResult::miss();
    }

    let dist = (ball_pos - p1).dot(inward);
    if dist >= ball_radius - WALL_SLOP {
        return CollisionResult::miss();
    }

    let t = ((ball_pos - p1).dot(seg) / len_sq).clamp(0.0, 1.0);
    CollisionResult {
        hit: true,
        point: p1 + seg * t,
        normal: inward,
        penetration: ball_radius - dist,
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Rescale `velocity` to `speed`; a zero vector takes `fallback`'s direction
pub fn renormalize(velocity: Vec2, speed: f32, fallback: Vec2) -> Vec2 {
    let dir = velocity.try_normalize().unwrap_or_else(|| fallback.normalize_or(Vec2::X));
    dir * speed
}

/// Reflect (when moving into the surface), push out, squash
fn bounce(ball: &mut Ball, hit: &CollisionResult) {
    if ball.vel.dot(hit.normal) < 0.0 {
        ball.vel = reflect_velocity(ball.vel, hit.normal);
    }
    ball.pos += hit.normal * hit.penetration;
    ball.squash();
}

/// Resolve wall hits; each one renormalizes to `base_speed` and ends any boost
pub fn resolve_wall_collisions(ball: &mut Ball, geometry: &Geometry, base_speed: f32) -> Vec<Contact> {
    let mut contacts = Vec::new();

    for (edge, p1, p2) in geometry.edges() {
        let inward = geometry.inward_normal(edge);
        let hit = ball_wall_collision(ball.pos, ball.radius, p1, p2, inward);
        if !hit.hit {
            continue;
        }

        bounce(ball, &hit);
        ball.vel = renormalize(ball.vel, base_speed, hit.normal);
        ball.boosted = false;

        log::debug!("Wall {:?} hit at ({:.1}, {:.1})", edge, hit.point.x, hit.point.y);
        contacts.push(Contact {
            surface: Surface::Wall(edge),
            point: hit.point,
            boosted: false,
        });
    }

    if !contacts.is_empty() {
        settle_inside(ball, geometry);
    }
    contacts
}

/// Pushing out of one wall near a corner can push into the next; repeat until clear
fn settle_inside(ball: &mut Ball, geometry: &Geometry) {
    for _ in 0..WALL_SETTLE_PASSES {
        let mut clear = true;
        for (edge, p1, p2) in geometry.edges() {
            let hit = ball_wall_collision(ball.pos, ball.radius, p1, p2, geometry.inward_normal(edge));
            if hit.hit {
                ball.pos += hit.normal * hit.penetration;
                clear = false;
            }
        }
        if clear {
            break;
        }
    }
}

/// Resolve flipper hits; the first one in an episode multiplies speed by `boost_factor`
pub fn resolve_flipper_collisions(
    ball: &mut Ball,
    flippers: &[Flipper],
    boost_factor: f32,
) -> Vec<Contact> {
    let mut contacts = Vec::new();

    for flipper in flippers {
        let hit = ball_segment_collision(
            ball.pos,
            ball.radius,
            flipper.pivot,
            flipper.tip(),
            -ball.vel,
        );
        if !hit.hit {
            continue;
        }

        bounce(ball, &hit);
        let boosted = !ball.boosted;
        if boosted {
            ball.vel *= boost_factor;
            ball.boosted = true;
        }

        log::debug!(
            "Flipper {:?} hit at ({:.1}, {:.1}){}",
            flipper.kind,
            hit.point.x,
            hit.point.y,
            if boosted { " - boost" } else { "" }
        );
        contacts.push(Contact {
            surface: Surface::Flipper(flipper.kind),
            point: hit.point,
            boosted,
        });
    }

    contacts
}

/// Walls first, then flippers
///
/// A flipper push can carry the ball across a wall, so any flipper contact is
/// followed by a second wall pass and the walls always have the last word.
pub fn resolve_collisions(
    ball: &mut Ball,
    geometry: &Geometry,
    flippers: &[Flipper],
    base_speed: f32,
    boost_factor: f32,
) -> Vec<Contact> {
    let mut contacts = resolve_wall_collisions(ball, geometry, base_speed);
    let flipper_contacts = resolve_flipper_collisions(ball, flippers, boost_factor);
    if !flipper_contacts.is_empty() {
        contacts.extend(flipper_contacts);
        contacts.extend(resolve_wall_collisions(ball, geometry, base_speed));
    }
    contacts
}
