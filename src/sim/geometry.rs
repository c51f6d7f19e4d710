//! Shape geometry for table bodies
//!
//! Static outlines are closed polygons (concave allowed) stored relative to
//! their area centroid. Paddles are capsules swept from a pivot.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{TableError, TableResult};

/// Polygons with less area than this are rejected as degenerate
const MIN_POLYGON_AREA: f32 = 1e-3;

/// Collision shape of a body, in body-local coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    /// Closed outline; the last vertex connects back to the first
    Polygon { vertices: Vec<Vec2> },
    /// Segment of `length` from the body origin along its angle, inflated by `radius`
    Capsule { length: f32, radius: f32 },
}

impl Shape {
    /// Polygon from world-space vertices. Returns the area centroid and the
    /// shape with vertices relative to it.
    pub fn polygon(label: &str, vertices: &[Vec2]) -> TableResult<(Vec2, Shape)> {
        let distinct = dedup_ring(vertices);
        let (area, centroid) = area_centroid(&distinct);
        if distinct.len() < 3 || area.abs() < MIN_POLYGON_AREA {
            return Err(TableError::DegenerateGeometry {
                label: label.to_string(),
                vertex_count: distinct.len(),
            });
        }
        let local = distinct.iter().map(|v| *v - centroid).collect();
        Ok((centroid, Shape::Polygon { vertices: local }))
    }

    /// Rectangle centred on the origin, rotated by `angle`
    pub fn rectangle(width: f32, height: f32, angle: f32) -> Shape {
        let hw = width / 2.0;
        let hh = height / 2.0;
        let rot = Vec2::from_angle(angle);
        let vertices = [
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ]
        .iter()
        .map(|v| rot.rotate(*v))
        .collect();
        Shape::Polygon { vertices }
    }

    /// Radius of a circle that contains the shape (for broad-phase rejection)
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Shape::Circle { radius } => *radius,
            Shape::Polygon { vertices } => vertices.iter().map(|v| v.length()).fold(0.0, f32::max),
            Shape::Capsule { length, radius } => length + radius,
        }
    }
}

/// Parse an `x y x y ...` vertex path
pub fn parse_path(label: &str, path: &str) -> TableResult<Vec<Vec2>> {
    let mut coords = Vec::new();
    for token in path.split_whitespace() {
        let value = token
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| TableError::MalformedPath {
                label: label.to_string(),
                token: token.to_string(),
            })?;
        coords.push(value);
    }
    if coords.len() % 2 != 0 {
        return Err(TableError::MalformedPath {
            label: label.to_string(),
            token: "<odd coordinate count>".to_string(),
        });
    }
    Ok(coords.chunks(2).map(|c| Vec2::new(c[0], c[1])).collect())
}

/// Drop consecutive duplicates, including a closing vertex equal to the first
fn dedup_ring(vertices: &[Vec2]) -> Vec<Vec2> {
    let mut out: Vec<Vec2> = Vec::with_capacity(vertices.len());
    for v in vertices {
        if out.last().is_none_or(|last| last.distance_squared(*v) > 1e-6) {
            out.push(*v);
        }
    }
    while out.len() > 1 && out[0].distance_squared(out[out.len() - 1]) <= 1e-6 {
        out.pop();
    }
    out
}

/// Signed area and area centroid of a closed polygon
pub fn area_centroid(vertices: &[Vec2]) -> (f32, Vec2) {
    let n = vertices.len();
    if n == 0 {
        return (0.0, Vec2::ZERO);
    }
    let mut area = 0.0;
    let mut centroid = Vec2::ZERO;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let cross = a.perp_dot(b);
        area += cross;
        centroid += (a + b) * cross;
    }
    area *= 0.5;
    if area.abs() < f32::EPSILON {
        // Fall back to the vertex mean for a flat outline
        let mean = vertices.iter().copied().sum::<Vec2>() / n as f32;
        return (0.0, mean);
    }
    (area, centroid / (6.0 * area))
}

/// Even-odd point-in-polygon test (works for concave outlines)
pub fn point_in_polygon(p: Vec2, vertices: &[Vec2]) -> bool {
    let n = vertices.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Closest point to `p` on segment `a`-`b`
#[inline]
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-8 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_shape(label: &str, path: &str) -> TableResult<Shape> {
        let points = parse_path(label, path)?;
        Ok(Shape::polygon(label, &points)?.1)
    }

    #[test]
    fn test_parse_path() {
        let points = parse_path("drop", "0 0 20 0 70 100").unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[2], Vec2::new(70.0, 100.0));
    }

    #[test]
    fn test_parse_path_rejects_garbage() {
        assert!(matches!(
            parse_path("bad", "0 0 x 1"),
            Err(TableError::MalformedPath { .. })
        ));
        assert!(matches!(
            parse_path("odd", "0 0 1"),
            Err(TableError::MalformedPath { .. })
        ));
    }

    #[test]
    fn test_parse_path_rejects_non_finite() {
        for path in ["0 0 NaN 0 10 10", "0 0 inf 0 10 10", "0 0 10 0 -infinity 10"] {
            assert!(matches!(
                parse_path("nan", path),
                Err(TableError::MalformedPath { .. })
            ));
        }
    }

    #[test]
    fn test_polygon_recentres_on_centroid() {
        let square = [
            Vec2::new(10.0, 10.0),
            Vec2::new(30.0, 10.0),
            Vec2::new(30.0, 30.0),
            Vec2::new(10.0, 30.0),
        ];
        let (centroid, shape) = Shape::polygon("square", &square).unwrap();
        assert!((centroid - Vec2::new(20.0, 20.0)).length() < 1e-4);
        let Shape::Polygon { vertices } = shape else {
            panic!("expected polygon");
        };
        assert!((vertices[0] - Vec2::new(-10.0, -10.0)).length() < 1e-4);
    }

    #[test]
    fn test_closing_vertex_is_dropped() {
        let shape = path_shape("apron", "0 0 180 0 0 120 0 0").unwrap();
        let Shape::Polygon { vertices } = shape else {
            panic!("expected polygon");
        };
        assert_eq!(vertices.len(), 3);
    }

    #[test]
    fn test_degenerate_paths_are_rejected() {
        // Two distinct points
        assert!(matches!(
            path_shape("line", "0 0 10 10 0 0"),
            Err(TableError::DegenerateGeometry { vertex_count: 2, .. })
        ));
        // Collinear: three points, no area
        assert!(matches!(
            path_shape("flat", "0 0 10 0 20 0"),
            Err(TableError::DegenerateGeometry { vertex_count: 3, .. })
        ));
    }

    #[test]
    fn test_point_in_concave_polygon() {
        // U shape opening upward
        let u = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 20.0),
            Vec2::new(20.0, 20.0),
            Vec2::new(20.0, 0.0),
            Vec2::new(30.0, 0.0),
            Vec2::new(30.0, 30.0),
            Vec2::new(0.0, 30.0),
        ];
        assert!(point_in_polygon(Vec2::new(5.0, 10.0), &u));
        assert!(!point_in_polygon(Vec2::new(15.0, 10.0), &u));
        assert!(point_in_polygon(Vec2::new(15.0, 25.0), &u));
    }

    #[test]
    fn test_rectangle_rotation() {
        let Shape::Polygon { vertices } = Shape::rectangle(20.0, 40.0, std::f32::consts::FRAC_PI_2)
        else {
            panic!("expected polygon");
        };
        // Rotated a quarter turn, the long side lies along x
        let max_x = vertices.iter().map(|v| v.x).fold(f32::MIN, f32::max);
        assert!((max_x - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_closest_point_clamps_to_ends() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(closest_point_on_segment(Vec2::new(-5.0, 3.0), a, b), a);
        assert_eq!(closest_point_on_segment(Vec2::new(4.0, 3.0), a, b), Vec2::new(4.0, 0.0));
    }
}
