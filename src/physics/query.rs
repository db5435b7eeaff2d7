//! Distance queries for points vs. shape geometry.

use itertools::Itertools;

use super::ShapeGeometry;
use crate::math as m;

/// Nearest point on a shape's surface and the signed distance to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointDistance {
    pub point: m::Vec2,
    /// Negative when the query point is inside the shape.
    pub distance: f64,
}

/// Signed distance from a point to a shape.
/// Returns None for a polygon with no vertices.
pub fn point_shape_distance(point: m::Vec2, geom: &ShapeGeometry) -> Option<PointDistance> {
    match geom {
        ShapeGeometry::Circle { center, radius } => {
            Some(point_capsule(point, *center, *center, *radius))
        }
        ShapeGeometry::Segment { a, b, radius } => Some(point_capsule(point, *a, *b, *radius)),
        ShapeGeometry::Polygon { vertices, radius } => match vertices.as_slice() {
            [] => None,
            [v] => Some(point_capsule(point, *v, *v, *radius)),
            [a, b] => Some(point_capsule(point, *a, *b, *radius)),
            _ => Some(point_polygon(point, vertices, *radius)),
        },
    }
}

/// Check whether or not a point is inside a shape.
pub fn point_shape_bool(point: m::Vec2, geom: &ShapeGeometry) -> bool {
    point_shape_distance(point, geom).map_or(false, |d| d.distance < 0.0)
}

// a circle is a capsule of zero length
fn point_capsule(point: m::Vec2, a: m::Vec2, b: m::Vec2, radius: f64) -> PointDistance {
    let closest = m::closest_point_on_segment(point, a, b);
    let offset = point - closest;
    let dist = offset.mag();
    let surface = if dist > 0.0 {
        closest + offset / dist * radius
    } else {
        closest + m::Vec2::new(radius, 0.0)
    };
    PointDistance {
        point: surface,
        distance: dist - radius,
    }
}

fn point_polygon(point: m::Vec2, vertices: &[m::Vec2], radius: f64) -> PointDistance {
    let mut closest = vertices[0];
    let mut closest_dist_sq = f64::MAX;
    // convex polygon of either winding contains the point
    // if it's on the same side of every edge
    let mut left = true;
    let mut right = true;
    for (a, b) in vertices.iter().copied().circular_tuple_windows::<(m::Vec2, m::Vec2)>() {
        let side = m::cross(b - a, point - a);
        left &= side >= 0.0;
        right &= side <= 0.0;

        let on_edge = m::closest_point_on_segment(point, a, b);
        let dist_sq = (point - on_edge).mag_sq();
        if dist_sq < closest_dist_sq {
            closest_dist_sq = dist_sq;
            closest = on_edge;
        }
    }
    let edge_dist = closest_dist_sq.sqrt();
    let inside = left || right;
    // push the core edge point out onto the rounded surface
    let outward = if edge_dist > 0.0 {
        let to_point = (point - closest) / edge_dist;
        if inside {
            -to_point
        } else {
            to_point
        }
    } else {
        m::Vec2::zero()
    };
    PointDistance {
        point: closest + outward * radius,
        distance: if inside { -edge_dist } else { edge_dist } - radius,
    }
}
