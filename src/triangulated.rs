use crate::float_types::Real;
use crate::mesh::Mesh;
use nalgebra::{Point3, Vector3};

/// One triangle of a surface with its outward unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facet {
    pub normal: Vector3<Real>,
    pub vertices: [Point3<Real>; 3],
}

/// A triangulated 3D surface.
///
/// Anything that can present itself as a bunch of triangles in 3D
/// can use the triangle-based export backends.
pub trait Triangulated3D {
    /// Call `f` for each triangle.
    fn visit_triangles<F>(&self, f: F)
    where
        F: FnMut(Facet);

    fn triangle_count(&self) -> usize {
        let mut count = 0;
        self.visit_triangles(|_| count += 1);
        count
    }
}

impl Triangulated3D for Mesh {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut(Facet),
    {
        for polygon in &self.polygons {
            for vertices in polygon.triangulate() {
                f(Facet {
                    normal: polygon.plane.normal,
                    vertices,
                });
            }
        }
    }
}
