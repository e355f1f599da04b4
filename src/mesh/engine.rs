use crate::config::Resolution;
use crate::edge::EdgeProfile;
use crate::errors::GeometryError;
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::sketch::Sketch;
use crate::traits::GeometryEngine;
use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector2, Vector3};

/// Evaluates every operation eagerly into triangle-ready polygon meshes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeshEngine {
    pub resolution: Resolution,
}

impl MeshEngine {
    pub const fn new(resolution: Resolution) -> Self {
        MeshEngine { resolution }
    }
}

impl GeometryEngine for MeshEngine {
    type Profile = Sketch;
    type Solid = Mesh;

    fn circle(&self, diameter: Real) -> Result<Sketch, GeometryError> {
        Sketch::circle(diameter, self.resolution.segments)
    }

    fn rectangle(&self, size: Vector2<Real>) -> Result<Sketch, GeometryError> {
        Sketch::rectangle(size)
    }

    fn polygon(&self, points: &[Point2<Real>]) -> Result<Sketch, GeometryError> {
        Sketch::polygon(points)
    }

    fn regular_polygon(&self, sides: usize, circumradius: Real) -> Result<Sketch, GeometryError> {
        Sketch::regular_ngon(sides, circumradius)
    }

    fn cuboid(&self, size: Vector3<Real>) -> Result<Mesh, GeometryError> {
        Mesh::cuboid(size)
    }

    fn polyhedron(&self, points: &[Point3<Real>], faces: &[Vec<usize>]) -> Result<Mesh, GeometryError> {
        Mesh::polyhedron(points, faces)
    }

    fn union_2d(&self, a: &Sketch, b: &Sketch) -> Sketch {
        a.union(b)
    }

    fn transform_2d(&self, profile: &Sketch, matrix: &Matrix3<Real>) -> Sketch {
        profile.transform(matrix)
    }

    fn round_inside_corners(&self, profile: &Sketch, radius: Real) -> Result<Sketch, GeometryError> {
        profile.round_inside_corners(radius)
    }

    fn extrude(&self, profile: &Sketch, height: Real, edges: EdgeProfile) -> Result<Mesh, GeometryError> {
        if edges.is_sharp() {
            return profile.extrude(height);
        }
        let layers = edges.layers(height, self.resolution.edge_steps)?;
        profile.loft(&layers)
    }

    fn revolve(&self, profile: &Sketch) -> Result<Mesh, GeometryError> {
        profile.revolve(self.resolution.segments)
    }

    fn union(&self, a: &Mesh, b: &Mesh) -> Mesh {
        a.union(b)
    }

    fn subtract(&self, a: &Mesh, b: &Mesh) -> Mesh {
        a.difference(b)
    }

    fn transform(&self, solid: &Mesh, matrix: &Matrix4<Real>) -> Mesh {
        solid.transform(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeTreatment;

    #[test]
    fn rotate_about_y_flips_z() {
        let engine = MeshEngine::new(Resolution::draft());
        let block = engine.cuboid(Vector3::new(1.0, 2.0, 3.0)).unwrap();
        let flipped = engine.rotate(&block, 0.0, 180.0, 0.0);
        let bb = flipped.bounding_box().unwrap();
        assert!((bb.mins.z + 3.0).abs() < 1e-9 && bb.maxs.z.abs() < 1e-9);
        assert!((bb.mins.x + 1.0).abs() < 1e-9);
    }

    #[test]
    fn repeat_linear_spaces_copies() {
        let engine = MeshEngine::default();
        let block = engine.cuboid(Vector3::new(1.0, 1.0, 1.0)).unwrap();
        let row = engine.repeat_linear(&block, Vector3::new(3.0, 0.0, 0.0), 3);
        let bb = row.bounding_box().unwrap();
        assert!((bb.maxs.x - 7.0).abs() < 1e-9);
        assert!((row.volume() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn treated_extrusion_goes_through_the_loft() {
        let engine = MeshEngine::new(Resolution::draft());
        let hex = engine.regular_polygon(6, 10.0).unwrap();
        let edges = EdgeProfile::top(EdgeTreatment::Fillet { radius: 1.0 });
        let nut = engine.extrude(&hex, 5.0, edges).unwrap();
        let plain = engine.extrude(&hex, 5.0, EdgeProfile::SHARP).unwrap();
        assert!(nut.volume() < plain.volume());
        assert!(nut.volume() > 0.9 * plain.volume());
    }

    #[test]
    fn mirror_y_2d_is_symmetric() {
        let engine = MeshEngine::default();
        let square = engine.rectangle(Vector2::new(2.0, 1.0)).unwrap();
        let square = engine.translate_2d(&square, Vector2::new(-1.0, 3.0));
        let pair = engine.mirror_y_2d(&square);
        let rect = pair.bounding_rect().unwrap();
        assert!((rect.min().y + 4.0).abs() < 1e-9 && (rect.max().y - 4.0).abs() < 1e-9);
        assert!((pair.area() - 4.0).abs() < 1e-9);
    }
}
