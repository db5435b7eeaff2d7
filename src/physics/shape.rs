use super::space::BodyKey;
use crate::math as m;

/// The closed set of shape geometries the debug layer understands.
///
/// In a [`Shape`] this is relative to the owning body;
/// what a [`PhysicsWorld`][super::PhysicsWorld] reports is in world space.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeGeometry {
    Circle { center: m::Vec2, radius: f64 },
    /// A capsule around a line segment.
    Segment { a: m::Vec2, b: m::Vec2, radius: f64 },
    /// A convex polygon, optionally with rounded corners.
    Polygon { vertices: Vec<m::Vec2>, radius: f64 },
}

impl ShapeGeometry {
    pub fn circle(radius: f64) -> Self {
        ShapeGeometry::Circle {
            center: m::Vec2::zero(),
            radius,
        }
    }

    pub fn segment(a: m::Vec2, b: m::Vec2, radius: f64) -> Self {
        ShapeGeometry::Segment { a, b, radius }
    }

    pub fn polygon(vertices: impl Into<Vec<m::Vec2>>) -> Self {
        ShapeGeometry::Polygon {
            vertices: vertices.into(),
            radius: 0.0,
        }
    }

    /// An axis-aligned box centered on the origin.
    pub fn rect(width: f64, height: f64) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self::polygon(vec![
            m::Vec2::new(-hw, -hh),
            m::Vec2::new(hw, -hh),
            m::Vec2::new(hw, hh),
            m::Vec2::new(-hw, hh),
        ])
    }

    /// Move the geometry by a pose, e.g. from body space into world space.
    pub fn transformed(&self, pose: &m::Pose) -> Self {
        match self {
            ShapeGeometry::Circle { center, radius } => ShapeGeometry::Circle {
                center: *pose * *center,
                radius: *radius,
            },
            ShapeGeometry::Segment { a, b, radius } => ShapeGeometry::Segment {
                a: *pose * *a,
                b: *pose * *b,
                radius: *radius,
            },
            ShapeGeometry::Polygon { vertices, radius } => ShapeGeometry::Polygon {
                vertices: vertices.iter().map(|v| *pose * *v).collect(),
                radius: *radius,
            },
        }
    }
}

/// Collision geometry attached to a body in a [`Space`][super::Space].
#[derive(Clone, Debug)]
pub struct Shape {
    pub body: BodyKey,
    /// Geometry relative to the body's pose.
    pub geometry: ShapeGeometry,
}

impl Shape {
    pub fn new(body: BodyKey, geometry: ShapeGeometry) -> Self {
        Self { body, geometry }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_moves_every_point() {
        let pose = m::pose(m::Vec2::new(10.0, 5.0), m::Angle::default());
        let rect = ShapeGeometry::rect(2.0, 4.0).transformed(&pose);
        match rect {
            ShapeGeometry::Polygon { vertices, .. } => {
                assert_eq!(vertices[0], m::Vec2::new(9.0, 3.0));
                assert_eq!(vertices[2], m::Vec2::new(11.0, 7.0));
            }
            other => panic!("rect became {:?}", other),
        }

        let circle = ShapeGeometry::circle(3.0).transformed(&pose);
        assert_eq!(
            circle,
            ShapeGeometry::Circle {
                center: m::Vec2::new(10.0, 5.0),
                radius: 3.0
            }
        );
    }
}
