use crate::edge::EdgeProfile;
use crate::errors::GeometryError;
use crate::float_types::Real;
use nalgebra::{Matrix3, Matrix4, Point2, Point3, Rotation3, Translation2, Translation3, Vector2, Vector3};
use std::fmt::Debug;

/// Capabilities a geometry backend offers to the mount builders.
///
/// Every operation returns a new value; inputs are never modified, so
/// solids can be shared freely between builds.
///
/// Conventions shared by all engines:
/// - `rectangle` and `cuboid` have their minimum corner at the origin,
/// - `circle` and `regular_polygon` are centered on the origin, the first
///   polygon vertex lies on +x,
/// - `revolve` sweeps a profile drawn in the XY plane around the Z axis,
///   X becoming the radius and Y becoming Z,
/// - `polyhedron` faces wind counter-clockwise seen from outside.
pub trait GeometryEngine {
    type Profile: Clone + Debug;
    type Solid: Clone + Debug;

    // ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
    // Primitive shapes
    // ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
    fn circle(&self, diameter: Real) -> Result<Self::Profile, GeometryError>;
    fn rectangle(&self, size: Vector2<Real>) -> Result<Self::Profile, GeometryError>;
    fn polygon(&self, points: &[Point2<Real>]) -> Result<Self::Profile, GeometryError>;
    fn regular_polygon(
        &self,
        sides: usize,
        circumradius: Real,
    ) -> Result<Self::Profile, GeometryError>;
    fn cuboid(&self, size: Vector3<Real>) -> Result<Self::Solid, GeometryError>;
    fn polyhedron(
        &self,
        points: &[Point3<Real>],
        faces: &[Vec<usize>],
    ) -> Result<Self::Solid, GeometryError>;

    // ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
    // Profiles
    // ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
    fn union_2d(&self, a: &Self::Profile, b: &Self::Profile) -> Self::Profile;
    /// Applies a homogeneous 2D transform.
    fn transform_2d(&self, profile: &Self::Profile, matrix: &Matrix3<Real>) -> Self::Profile;
    /// Rounds every concave corner with `radius`, leaving convex corners sharp.
    fn round_inside_corners(
        &self,
        profile: &Self::Profile,
        radius: Real,
    ) -> Result<Self::Profile, GeometryError>;

    // ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
    // Extrusion and revolution
    // ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
    /// Extrudes from z = 0 to z = `height`. Treated edges require a convex profile.
    fn extrude(
        &self,
        profile: &Self::Profile,
        height: Real,
        edges: EdgeProfile,
    ) -> Result<Self::Solid, GeometryError>;
    fn revolve(&self, profile: &Self::Profile) -> Result<Self::Solid, GeometryError>;

    // ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
    // Booleans and placement
    // ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
    fn union(&self, a: &Self::Solid, b: &Self::Solid) -> Self::Solid;
    fn subtract(&self, a: &Self::Solid, b: &Self::Solid) -> Self::Solid;
    fn transform(&self, solid: &Self::Solid, matrix: &Matrix4<Real>) -> Self::Solid;

    /// Returns a new solid translated by `offset`.
    fn translate(&self, solid: &Self::Solid, offset: Vector3<Real>) -> Self::Solid {
        self.transform(solid, &Translation3::from(offset).to_homogeneous())
    }

    /// Rotates by x_degrees, then y_degrees, then z_degrees.
    fn rotate(&self, solid: &Self::Solid, x_deg: Real, y_deg: Real, z_deg: Real) -> Self::Solid {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), x_deg.to_radians());
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), y_deg.to_radians());
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), z_deg.to_radians());
        self.transform(solid, &(rz * ry * rx).to_homogeneous())
    }

    fn translate_2d(&self, profile: &Self::Profile, offset: Vector2<Real>) -> Self::Profile {
        self.transform_2d(profile, &Translation2::from(offset).to_homogeneous())
    }

    /// Unions the profile with its reflection across the X axis (y → -y).
    fn mirror_y_2d(&self, profile: &Self::Profile) -> Self::Profile {
        let flip = Matrix3::new(1.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 1.0);
        self.union_2d(profile, &self.transform_2d(profile, &flip))
    }

    /// Unions `count` copies of `solid`, each shifted by `step` from the previous one.
    fn repeat_linear(&self, solid: &Self::Solid, step: Vector3<Real>, count: usize) -> Self::Solid {
        (1..count).fold(solid.clone(), |acc, i| {
            self.union(&acc, &self.translate(solid, step * i as Real))
        })
    }

    /// Subtracts each cutter in turn.
    fn subtract_all<I>(&self, base: &Self::Solid, cutters: I) -> Self::Solid
    where
        I: IntoIterator<Item = Self::Solid>,
    {
        cutters
            .into_iter()
            .fold(base.clone(), |acc, cutter| self.subtract(&acc, &cutter))
    }
}
