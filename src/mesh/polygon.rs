//! Planar convex polygons, the faces of a [`Mesh`](crate::mesh::Mesh).

use crate::float_types::Real;
use crate::mesh::plane::Plane;
use nalgebra::{Matrix4, Point3};

/// A planar polygon with counter-clockwise winding seen from its front.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Point3<Real>>,
    pub plane: Plane,
}

impl Polygon {
    /// Builds a polygon, computing its plane. Returns `None` for rings that
    /// enclose no area.
    pub fn new(vertices: Vec<Point3<Real>>) -> Option<Self> {
        let plane = Plane::from_points(&vertices)?;
        Some(Polygon { vertices, plane })
    }

    /// Builds a polygon on a known plane, e.g. a fragment of a split polygon.
    pub const fn with_plane(vertices: Vec<Point3<Real>>, plane: Plane) -> Self {
        Polygon { vertices, plane }
    }

    /// Reverses winding and plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }

    /// Applies `matrix` to every vertex, recomputing the plane. Mirroring
    /// transforms reverse the winding so the polygon keeps facing outward.
    pub fn transformed(&self, matrix: &Matrix4<Real>, mirrored: bool) -> Option<Polygon> {
        let mut vertices: Vec<_> = self.vertices.iter().map(|v| matrix.transform_point(v)).collect();
        if mirrored {
            vertices.reverse();
        }
        Polygon::new(vertices)
    }

    /// Fan triangulation. Polygons are convex, so the fan never folds over.
    pub fn triangulate(&self) -> Vec<[Point3<Real>; 3]> {
        let Some((first, rest)) = self.vertices.split_first() else {
            return Vec::new();
        };
        rest.windows(2).map(|w| [*first, w[0], w[1]]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Translation3, Vector3};

    fn quad() -> Polygon {
        Polygon::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn quad_fans_into_two_triangles() {
        let triangles = quad().triangulate();
        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[0][0], triangles[1][0]);
    }

    #[test]
    fn flip_reverses_normal() {
        let mut polygon = quad();
        polygon.flip();
        assert!((polygon.plane.normal + Vector3::z()).norm() < 1e-12);
        assert_eq!(polygon.vertices[0], Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn mirroring_keeps_the_face_outward() {
        let mirror = Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, 1.0, -1.0));
        let moved = quad()
            .transformed(&Translation3::new(0.0, 0.0, 1.0).to_homogeneous(), false)
            .unwrap();
        let mirrored = moved.transformed(&mirror, true).unwrap();
        // the face looked up at z = 1; mirrored through z = 0 it must look down
        assert!((mirrored.plane.normal + Vector3::z()).norm() < 1e-12);
        assert!((mirrored.plane.w - 1.0).abs() < 1e-12);
    }
}
