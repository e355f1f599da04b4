//! Screw threads: external threads and the cutters for matching threaded holes.
//!
//! A thread is realized as a closed polyhedron: rings of points stacked along
//! Z, each point pushed out to the helical profile radius at its angle and
//! height, capped with a fan at both ends. The result is handed to the
//! engine through [`GeometryEngine::polyhedron`].

use crate::config::Resolution;
use crate::errors::GeometryError;
use crate::float_types::{EPSILON, OVERLAP, Real, TAU, all_finite};
use crate::traits::GeometryEngine;
use nalgebra::{Point2, Point3};

/// Cross-section of the thread ridge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThreadForm {
    /// Straight flanks meeting a flat crest; `angle` is the included flank
    /// angle in degrees.
    Trapezoidal { angle: Real, crest_width: Real },
}

/// A right-handed single-start screw thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrewThread {
    pub pitch: Real,
    pub major_diameter: Real,
    pub minor_diameter: Real,
    pub form: ThreadForm,
}

impl ScrewThread {
    /// Radial height of the ridge.
    pub fn depth(&self) -> Real {
        (self.major_diameter - self.minor_diameter) / 2.0
    }

    /// Axial width of one flank.
    fn flank_width(&self) -> Real {
        match self.form {
            ThreadForm::Trapezoidal { angle, .. } => self.depth() * (angle.to_radians() / 2.0).tan(),
        }
    }

    fn crest_width(&self) -> Real {
        match self.form {
            ThreadForm::Trapezoidal { crest_width, .. } => crest_width,
        }
    }

    /// Axial width of the flat root between two ridges.
    pub fn root_width(&self) -> Real {
        self.pitch - self.crest_width() - 2.0 * self.flank_width()
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        if !all_finite(&[self.pitch, self.major_diameter, self.minor_diameter]) {
            return Err(GeometryError::degenerate(format!(
                "thread dimensions must be finite: {self:?}"
            )));
        }
        if !(self.pitch > 0.0) {
            return Err(GeometryError::degenerate(format!(
                "thread pitch must be positive, got {}",
                self.pitch
            )));
        }
        if !(self.minor_diameter > 0.0 && self.minor_diameter < self.major_diameter) {
            return Err(GeometryError::degenerate(format!(
                "thread needs 0 < minor diameter ({}) < major diameter ({})",
                self.minor_diameter, self.major_diameter
            )));
        }
        let ThreadForm::Trapezoidal { angle, crest_width } = self.form;
        if !(angle > 0.0 && angle < 180.0) || !(crest_width >= 0.0) {
            return Err(GeometryError::degenerate(format!(
                "unusable thread form {:?}",
                self.form
            )));
        }
        if self.root_width() < -EPSILON {
            return Err(GeometryError::degenerate(format!(
                "flanks and crest ({}) do not fit in pitch {}",
                self.crest_width() + 2.0 * self.flank_width(),
                self.pitch
            )));
        }
        Ok(())
    }

    /// The same thread with both diameters grown by `clearance`.
    pub fn widened(&self, clearance: Real) -> ScrewThread {
        ScrewThread {
            major_diameter: self.major_diameter + clearance,
            minor_diameter: self.minor_diameter + clearance,
            ..*self
        }
    }

    /// Profile radius at axial position `u` within one pitch, measured from
    /// the start of a root.
    pub fn profile_radius(&self, u: Real) -> Real {
        let u = u.rem_euclid(self.pitch);
        let minor = self.minor_diameter / 2.0;
        let depth = self.depth();
        let root = self.root_width().max(0.0);
        let flank = self.flank_width();
        let crest = self.crest_width();

        let r = if u < root {
            minor
        } else if u < root + flank {
            minor + depth * (u - root) / flank
        } else if u < root + flank + crest {
            minor + depth
        } else {
            minor + depth * (self.pitch - u) / flank
        };
        r.clamp(minor, minor + depth)
    }

    /// Radius of the threaded surface at polar `angle` (radians) and height `z`.
    pub fn radius_at(&self, angle: Real, z: Real) -> Real {
        self.profile_radius(z - self.pitch * angle / TAU)
    }
}

/// Points and counter-clockwise triangular faces of a closed thread body.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadMesh {
    pub points: Vec<Point3<Real>>,
    pub faces: Vec<Vec<usize>>,
}

/// Tessellates the threaded cylinder between `z_start` and `z_end`.
pub fn helical_mesh(
    thread: &ScrewThread,
    z_start: Real,
    z_end: Real,
    resolution: &Resolution,
) -> Result<ThreadMesh, GeometryError> {
    thread.validate()?;
    if !(z_end - z_start > EPSILON) {
        return Err(GeometryError::degenerate(format!(
            "thread length must be positive, got {}",
            z_end - z_start
        )));
    }
    let segments = resolution.thread_segments;
    if segments < 3 {
        return Err(GeometryError::TooFewPoints {
            expected: 3,
            actual: segments,
        });
    }
    let rings = ((z_end - z_start) / resolution.thread_axial_step).ceil().max(1.0) as usize + 1;

    let mut points = Vec::with_capacity(rings * segments + 2);
    for j in 0..rings {
        let z = z_start + (z_end - z_start) * j as Real / (rings - 1) as Real;
        for k in 0..segments {
            let angle = TAU * k as Real / segments as Real;
            let r = thread.radius_at(angle, z);
            points.push(Point3::new(r * angle.cos(), r * angle.sin(), z));
        }
    }
    let bottom_center = points.len();
    points.push(Point3::new(0.0, 0.0, z_start));
    let top_center = points.len();
    points.push(Point3::new(0.0, 0.0, z_end));

    let at = |j: usize, k: usize| j * segments + k % segments;
    let mut faces = Vec::with_capacity(2 * rings * segments);
    for j in 0..rings - 1 {
        for k in 0..segments {
            let (a, b, c, d) = (at(j, k), at(j, k + 1), at(j + 1, k + 1), at(j + 1, k));
            faces.push(vec![a, b, c]);
            faces.push(vec![a, c, d]);
        }
    }
    for k in 0..segments {
        faces.push(vec![bottom_center, at(0, k + 1), at(0, k)]);
        faces.push(vec![top_center, at(rings - 1, k), at(rings - 1, k + 1)]);
    }

    Ok(ThreadMesh { points, faces })
}

/// External thread from z = 0 to z = `length`.
pub fn screw<E: GeometryEngine>(
    engine: &E,
    thread: &ScrewThread,
    length: Real,
    resolution: &Resolution,
) -> Result<E::Solid, GeometryError> {
    let mesh = helical_mesh(thread, 0.0, length, resolution)?;
    engine.polyhedron(&mesh.points, &mesh.faces)
}

/// Cutter for an internal thread entering at z = 0 and running `depth` deep.
///
/// The thread is grown by `clearance` and overshoots both faces slightly; a
/// cone of `lead_in` eases the entry.
pub fn threaded_hole<E: GeometryEngine>(
    engine: &E,
    thread: &ScrewThread,
    depth: Real,
    lead_in: Real,
    clearance: Real,
    resolution: &Resolution,
) -> Result<E::Solid, GeometryError> {
    let hole = thread.widened(clearance);
    let mesh = helical_mesh(&hole, -OVERLAP, depth + OVERLAP, resolution)?;
    let cutter = engine.polyhedron(&mesh.points, &mesh.faces)?;
    if !(lead_in > 0.0) {
        return Ok(cutter);
    }

    let r = hole.major_diameter / 2.0;
    let cone = engine.polygon(&[
        Point2::new(0.0, -OVERLAP),
        Point2::new(r + lead_in + OVERLAP, -OVERLAP),
        Point2::new(r, lead_in),
        Point2::new(0.0, lead_in),
    ])?;
    Ok(engine.union(&cutter, &engine.revolve(&cone)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn mount_thread() -> ScrewThread {
        ScrewThread {
            pitch: 4.0,
            major_diameter: 30.0,
            minor_diameter: 28.0,
            form: ThreadForm::Trapezoidal {
                angle: 90.0,
                crest_width: 0.2,
            },
        }
    }

    #[test]
    fn trapezoid_fits_in_pitch() {
        let thread = mount_thread();
        assert!((thread.depth() - 1.0).abs() < 1e-12);
        assert!((thread.root_width() - 1.8).abs() < 1e-9);
        assert!(thread.validate().is_ok());
    }

    #[test]
    fn profile_radius_walks_root_flank_crest_flank() {
        let thread = mount_thread();
        assert_eq!(thread.profile_radius(0.5), 14.0);
        assert!((thread.profile_radius(2.3) - 14.5).abs() < 1e-9);
        assert_eq!(thread.profile_radius(2.9), 15.0);
        assert!((thread.profile_radius(3.5) - 14.5).abs() < 1e-9);
        // periodic
        assert_eq!(thread.profile_radius(4.5), thread.profile_radius(0.5));
    }

    #[test]
    fn helix_rises_one_pitch_per_turn() {
        let thread = mount_thread();
        let quarter = TAU / 4.0;
        assert!((thread.radius_at(quarter, 2.9 + 1.0) - 15.0).abs() < 1e-9);
        assert!((thread.radius_at(0.0, 2.9) - thread.radius_at(TAU, 2.9 + 4.0)).abs() < 1e-9);
    }

    #[test]
    fn too_steep_flanks_are_rejected() {
        let thread = ScrewThread {
            pitch: 1.0,
            ..mount_thread()
        };
        assert!(matches!(
            thread.validate(),
            Err(GeometryError::DegenerateShape(_))
        ));
    }

    #[test]
    fn helical_mesh_is_closed() {
        let resolution = Resolution::draft();
        let mesh = helical_mesh(&mount_thread(), 0.0, 10.0, &resolution).unwrap();
        let rings = 11;
        assert_eq!(mesh.points.len(), rings * resolution.thread_segments + 2);

        // every directed edge must be matched by its reverse exactly once
        let mut edges: HashMap<(usize, usize), i32> = HashMap::new();
        for face in &mesh.faces {
            assert_eq!(face.len(), 3);
            for i in 0..3 {
                let (a, b) = (face[i], face[(i + 1) % 3]);
                assert!(a < mesh.points.len() && b < mesh.points.len());
                *edges.entry((a, b)).or_default() += 1;
            }
        }
        for (&(a, b), &count) in &edges {
            assert_eq!(count, 1, "edge {a}->{b} repeated");
            assert_eq!(edges.get(&(b, a)), Some(&1), "edge {a}->{b} has no twin");
        }
    }

    #[test]
    fn helical_mesh_stays_between_minor_and_major() {
        let mesh = helical_mesh(&mount_thread(), 0.0, 8.0, &Resolution::draft()).unwrap();
        let ring_points = &mesh.points[..mesh.points.len() - 2];
        for p in ring_points {
            let r = (p.x * p.x + p.y * p.y).sqrt();
            assert!((14.0 - 1e-9..=15.0 + 1e-9).contains(&r), "radius {r}");
        }
    }
}
