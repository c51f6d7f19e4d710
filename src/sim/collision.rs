//! Collision detection and response for the ball
//!
//! The ball is always a circle; it is tested against circles (bumpers,
//! stoppers), closed polygons (walls, paths) and capsules (paddles).
//! Response is a single impulse against an immovable surface that may be
//! moving (a swinging paddle).

use glam::Vec2;

use super::geometry::{closest_point_on_segment, point_in_polygon};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the obstacle surface
    pub point: Vec2,
    /// Surface normal at contact (pointing toward ball center)
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

/// Ball against a circle
pub fn ball_circle_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    center: Vec2,
    radius: f32,
) -> CollisionResult {
    let delta = ball_pos - center;
    let dist = delta.length();
    let reach = ball_radius + radius;
    if dist >= reach {
        return CollisionResult::miss();
    }
    // Concentric: push straight up
    let normal = if dist > 1e-6 { delta / dist } else { Vec2::NEG_Y };
    CollisionResult {
        hit: true,
        point: center + normal * radius,
        normal,
        penetration: reach - dist,
    }
}

/// Ball against a segment inflated by `thickness` (a capsule)
pub fn ball_capsule_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    a: Vec2,
    b: Vec2,
    thickness: f32,
) -> CollisionResult {
    let closest = closest_point_on_segment(ball_pos, a, b);
    let mut result = ball_circle_collision(ball_pos, ball_radius, closest, thickness);
    if result.hit && (ball_pos - closest).length_squared() < 1e-12 {
        // Ball center on the spine: use the segment's left-hand normal
        result.normal = (b - a).perp().normalize_or(Vec2::NEG_Y);
        result.point = closest + result.normal * thickness;
    }
    result
}

/// Ball against a closed polygon outline (world-space vertices)
///
/// If the ball center has ended up inside the outline it is pushed out
/// through the nearest edge.
pub fn ball_polygon_collision(ball_pos: Vec2, ball_radius: f32, vertices: &[Vec2]) -> CollisionResult {
    let n = vertices.len();
    if n < 2 {
        return CollisionResult::miss();
    }

    let mut best_point = vertices[0];
    let mut best_dist_sq = f32::MAX;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let p = closest_point_on_segment(ball_pos, a, b);
        let d = (ball_pos - p).length_squared();
        if d < best_dist_sq {
            best_dist_sq = d;
            best_point = p;
        }
    }

    let dist = best_dist_sq.sqrt();
    let inside = point_in_polygon(ball_pos, vertices);

    if inside {
        let normal = (best_point - ball_pos).normalize_or(Vec2::NEG_Y);
        return CollisionResult {
            hit: true,
            point: best_point,
            normal,
            penetration: ball_radius + dist,
        };
    }

    if dist >= ball_radius {
        return CollisionResult::miss();
    }

    CollisionResult {
        hit: true,
        point: best_point,
        normal: (ball_pos - best_point).normalize_or(Vec2::NEG_Y),
        penetration: ball_radius - dist,
    }
}

/// Velocity after an impulse against a surface moving at `surface_vel`
///
/// Only approaching contacts are resolved; a ball already separating keeps
/// its velocity. Returns the new velocity and the normal impulse magnitude.
pub fn resolve_contact(
    velocity: Vec2,
    normal: Vec2,
    surface_vel: Vec2,
    restitution: f32,
    friction: f32,
) -> (Vec2, f32) {
    let relative = velocity - surface_vel;
    let vn = relative.dot(normal);
    if vn >= 0.0 {
        return (velocity, 0.0);
    }
    let impulse = -(1.0 + restitution) * vn;
    let tangent = relative - normal * vn;
    let resolved = velocity + normal * impulse - tangent * friction;
    (resolved, impulse)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(0.0, 100.0),
        ]
    }

    #[test]
    fn test_ball_circle_hit_and_miss() {
        let result = ball_circle_collision(Vec2::new(0.0, -30.0), 14.0, Vec2::ZERO, 25.0);
        assert!(result.hit);
        assert!((result.penetration - 9.0).abs() < 1e-4);
        assert!((result.normal - Vec2::NEG_Y).length() < 1e-4);

        let result = ball_circle_collision(Vec2::new(0.0, -40.0), 14.0, Vec2::ZERO, 25.0);
        assert!(!result.hit);
    }

    #[test]
    fn test_ball_polygon_outside_edge() {
        // Ball just above the top edge
        let result = ball_polygon_collision(Vec2::new(50.0, -10.0), 14.0, &square());
        assert!(result.hit);
        assert!((result.normal - Vec2::NEG_Y).length() < 1e-4);
        assert!((result.penetration - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_ball_polygon_inside_pushes_out() {
        // Center 5px inside the left edge
        let result = ball_polygon_collision(Vec2::new(5.0, 50.0), 14.0, &square());
        assert!(result.hit);
        assert!((result.normal - Vec2::NEG_X).length() < 1e-4);
        assert!((result.penetration - 19.0).abs() < 1e-4);
    }

    #[test]
    fn test_ball_polygon_miss() {
        let result = ball_polygon_collision(Vec2::new(150.0, 50.0), 14.0, &square());
        assert!(!result.hit);
    }

    #[test]
    fn test_ball_capsule_end_cap() {
        let a = Vec2::ZERO;
        let b = Vec2::new(70.0, 0.0);
        let result = ball_capsule_collision(Vec2::new(90.0, 0.0), 14.0, a, b, 10.0);
        assert!(result.hit);
        assert!((result.normal - Vec2::X).length() < 1e-4);
        assert!((result.penetration - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_resolve_contact_bounces_with_restitution() {
        let (v, impulse) = resolve_contact(Vec2::new(0.0, 10.0), Vec2::NEG_Y, Vec2::ZERO, 1.5, 0.0);
        assert!((v.y - (-15.0)).abs() < 1e-4);
        assert!((impulse - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_resolve_contact_ignores_separating_ball() {
        let (v, impulse) = resolve_contact(Vec2::new(3.0, -5.0), Vec2::NEG_Y, Vec2::ZERO, 1.0, 0.1);
        assert_eq!(v, Vec2::new(3.0, -5.0));
        assert_eq!(impulse, 0.0);
    }

    #[test]
    fn test_resolve_contact_picks_up_surface_velocity() {
        // Resting ball struck by a surface moving up at 20 px/tick
        let (v, _) = resolve_contact(Vec2::ZERO, Vec2::NEG_Y, Vec2::new(0.0, -20.0), 0.0, 0.0);
        assert!((v.y - (-20.0)).abs() < 1e-4);
    }
}
