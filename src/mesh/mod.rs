//! `Mesh` struct and implementations of boolean operations on it.
//!
//! A mesh is a polygon soup: a list of planar convex polygons that together
//! bound a closed volume. Boolean operations use BSP trees.

use crate::aabb::Aabb;
use crate::errors::GeometryError;
use crate::float_types::{EPSILON, Real};
use crate::triangulated::{Facet, Triangulated3D};
use nalgebra::{Matrix4, Point3, Vector3};

pub mod bsp;
pub mod engine;
pub mod plane;
pub mod polygon;

use bsp::Node;
use polygon::Polygon;

pub use engine::MeshEngine;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// 3D polygons for volumetric shapes
    pub polygons: Vec<Polygon>,
}

impl Mesh {
    /// Returns a new empty Mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a Mesh from an existing polygon list
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Mesh { polygons }
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Box from the origin to `size`.
    pub fn cuboid(size: Vector3<Real>) -> Result<Mesh, GeometryError> {
        if !size.iter().all(|v| v.is_finite()) {
            return Err(GeometryError::InvalidCoordinate(Point3::from(size)));
        }
        if !(size.x > 0.0 && size.y > 0.0 && size.z > 0.0) {
            return Err(GeometryError::degenerate(format!(
                "box needs a positive size, got {size:?}"
            )));
        }
        let corner = |i: usize| {
            Point3::new(
                if i & 1 != 0 { size.x } else { 0.0 },
                if i & 2 != 0 { size.y } else { 0.0 },
                if i & 4 != 0 { size.z } else { 0.0 },
            )
        };
        // faces as corner indices, counter-clockwise seen from outside
        const FACES: [[usize; 4]; 6] = [
            [0, 4, 6, 2], // -x
            [1, 3, 7, 5], // +x
            [0, 1, 5, 4], // -y
            [2, 6, 7, 3], // +y
            [0, 2, 3, 1], // -z
            [4, 5, 7, 6], // +z
        ];
        let polygons = FACES
            .iter()
            .filter_map(|face| Polygon::new(face.iter().map(|&i| corner(i)).collect()))
            .collect();
        Ok(Mesh { polygons })
    }

    /// Closed solid from points and faces wound counter-clockwise seen from
    /// outside. Faces that are not flat are split into triangles.
    pub fn polyhedron(points: &[Point3<Real>], faces: &[Vec<usize>]) -> Result<Mesh, GeometryError> {
        if let Some(p) = points.iter().find(|p| !p.iter().all(|v| v.is_finite())) {
            return Err(GeometryError::InvalidCoordinate(*p));
        }
        let mut polygons = Vec::with_capacity(faces.len());
        for face in faces {
            if face.len() < 3 {
                return Err(GeometryError::TooFewPoints {
                    expected: 3,
                    actual: face.len(),
                });
            }
            if let Some(&index) = face.iter().find(|&&i| i >= points.len()) {
                return Err(GeometryError::FaceIndexOutOfRange {
                    index,
                    len: points.len(),
                });
            }
            let vertices: Vec<Point3<Real>> = face.iter().map(|&i| points[i]).collect();
            let Some(polygon) = Polygon::new(vertices.clone()) else {
                // zero-area face, e.g. a sliver at a thread cap
                continue;
            };
            let flat = vertices
                .iter()
                .all(|v| polygon.plane.signed_distance(v).abs() < EPSILON);
            if flat {
                polygons.push(polygon);
            } else {
                polygons.extend(
                    (1..vertices.len() - 1)
                        .filter_map(|k| Polygon::new(vec![vertices[0], vertices[k], vertices[k + 1]])),
                );
            }
        }
        if polygons.is_empty() {
            return Err(GeometryError::degenerate("polyhedron has no faces with area"));
        }
        Ok(Mesh { polygons })
    }

    /// Return a new Mesh representing union of the two Meshes.
    ///
    /// ```text
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    pub fn union(&self, other: &Mesh) -> Mesh {
        if !self.may_overlap(other) {
            let mut polygons = self.polygons.clone();
            polygons.extend_from_slice(&other.polygons);
            return Mesh { polygons };
        }

        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());

        Mesh {
            polygons: a.all_polygons(),
        }
    }

    /// Return a new Mesh representing difference of the two Meshes.
    ///
    /// ```text
    /// let c = a.difference(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    pub fn difference(&self, other: &Mesh) -> Mesh {
        if !self.may_overlap(other) {
            return self.clone();
        }

        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());
        a.invert();

        Mesh {
            polygons: a.all_polygons(),
        }
    }

    fn may_overlap(&self, other: &Mesh) -> bool {
        match (self.bounding_box(), other.bounding_box()) {
            (Some(a), Some(b)) => a.intersects(&b),
            _ => false,
        }
    }

    /// Apply an arbitrary 3D transform (as a 4x4 matrix) to the mesh.
    pub fn transform(&self, matrix: &Matrix4<Real>) -> Mesh {
        let mirrored = matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0;
        Mesh {
            polygons: self
                .polygons
                .iter()
                .filter_map(|p| p.transformed(matrix, mirrored))
                .collect(),
        }
    }

    /// Bounds of all vertices, `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(self.polygons.iter().flat_map(|p| p.vertices.iter()))
    }

    /// Enclosed volume, from the divergence theorem. Only meaningful for
    /// closed meshes.
    pub fn volume(&self) -> Real {
        let mut volume = 0.0;
        self.visit_triangles(|Facet { vertices: [a, b, c], .. }| {
            volume += a.coords.dot(&b.coords.cross(&c.coords)) / 6.0;
        });
        volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Translation3;

    fn cube(size: Real) -> Mesh {
        Mesh::cuboid(Vector3::new(size, size, size)).unwrap()
    }

    fn shifted(mesh: &Mesh, x: Real, y: Real, z: Real) -> Mesh {
        mesh.transform(&Translation3::new(x, y, z).to_homogeneous())
    }

    #[test]
    fn cuboid_faces_point_outward() {
        let mesh = cube(2.0);
        assert_eq!(mesh.polygons.len(), 6);
        let center = Point3::new(1.0, 1.0, 1.0);
        for polygon in &mesh.polygons {
            assert!(polygon.plane.signed_distance(&center) < 0.0);
        }
        assert!((mesh.volume() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn union_of_overlapping_cubes() {
        let a = cube(2.0);
        let b = shifted(&a, 1.0, 1.0, 1.0);
        let u = a.union(&b);
        assert!((u.volume() - 15.0).abs() < 1e-9);
        let bb = u.bounding_box().unwrap();
        assert_eq!(bb.maxs, Point3::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn difference_carves_a_corner() {
        let a = cube(2.0);
        let b = shifted(&a, 1.0, 1.0, 1.0);
        let d = a.difference(&b);
        assert!((d.volume() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_operands_short_circuit() {
        let a = cube(1.0);
        let b = shifted(&a, 5.0, 0.0, 0.0);
        assert_eq!(a.union(&b).polygons.len(), 12);
        assert_eq!(a.difference(&b), a);
    }

    #[test]
    fn mirroring_keeps_volume_positive() {
        let mirror = Matrix4::new_nonuniform_scaling(&Vector3::new(-1.0, 1.0, 1.0));
        let mirrored = cube(2.0).transform(&mirror);
        assert!((mirrored.volume() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn polyhedron_checks_indices() {
        let points = [Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)];
        assert!(matches!(
            Mesh::polyhedron(&points, &[vec![0, 1, 7]]),
            Err(GeometryError::FaceIndexOutOfRange { index: 7, len: 3 })
        ));
        assert!(matches!(
            Mesh::polyhedron(&points, &[vec![0, 1]]),
            Err(GeometryError::TooFewPoints { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn tetrahedron_polyhedron_is_closed() {
        let points = [
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let faces = [vec![0, 2, 1], vec![0, 1, 3], vec![1, 2, 3], vec![0, 3, 2]];
        let mesh = Mesh::polyhedron(&points, &faces).unwrap();
        assert!((mesh.volume() - 1.0 / 6.0).abs() < 1e-12);
    }
}
