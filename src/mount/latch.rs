//! Latch clearance cutouts.
//!
//! Each keystone latch needs a ramped recess let into the bore wall. The
//! recess follows the curvature of the wall: its box spans the chord of the
//! minor circle under the latch, so every slot of a multi-slot mount gets a
//! cutout flush with the wall above it.

use crate::errors::MountError;
use crate::float_types::Real;
use crate::keystone::KeystoneSlotMetrics;
use crate::mount::{LATCH_TILT, MODULE_BODY_WIDTH};
use nalgebra::{Matrix4, Point2, Rotation3, Translation3, Vector3, distance};

/// Positive y of the point on a circle of `diameter` centered at the origin
/// whose x is `x`, or `None` when `x` lies outside the circle.
pub fn circle_y(diameter: Real, x: Real) -> Option<Real> {
    let r = diameter / 2.0;
    let squared = r * r - x * x;
    (r > 0.0 && squared >= 0.0).then(|| squared.sqrt())
}

/// A box placed by tilting about x, turning about z and translating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    /// Chord start on the minor circle
    pub start: Point2<Real>,
    /// Chord end on the minor circle
    pub end: Point2<Real>,
    pub size: Vector3<Real>,
    /// Rotation about x, in degrees
    pub tilt: Real,
    /// Rotation about z, in degrees
    pub heading: Real,
    pub position: Vector3<Real>,
}

impl OrientedBox {
    /// Placement for a box whose minimum corner sits at the origin: the top
    /// face is lowered to z = 0, then the box is tilted, turned and moved.
    pub fn placement(&self) -> Matrix4<Real> {
        let align_top = Translation3::new(0.0, 0.0, -self.size.z).to_homogeneous();
        let tilt = Rotation3::from_axis_angle(&Vector3::x_axis(), self.tilt.to_radians());
        let heading = Rotation3::from_axis_angle(&Vector3::z_axis(), self.heading.to_radians());
        let position = Translation3::from(self.position).to_homogeneous();
        position * (heading * tilt).to_homogeneous() * align_top
    }
}

/// Width spanned by the latches of `slot_count` side-by-side slots.
pub fn latch_space_width(latch_width: Real, slot_count: usize) -> Real {
    latch_width + MODULE_BODY_WIDTH * slot_count.saturating_sub(1) as Real
}

/// Clearance box for the latch of slot `index`.
///
/// `minor_circle_diameter` is the thread's minor diameter less the tolerance;
/// the box starts on that circle at `x1 = -latch_space_width / 2 + 18 * index`
/// and ends on it one latch width further along x.
pub fn latch_cutout_box(
    index: usize,
    latch_space_width: Real,
    minor_circle_diameter: Real,
    metrics: &KeystoneSlotMetrics,
) -> Result<OrientedBox, MountError> {
    let latch = metrics.latch_space_size;
    let x1 = -latch_space_width / 2.0 + MODULE_BODY_WIDTH * index as Real;
    let x2 = x1 + latch.x;

    let on_circle = |x: Real| {
        circle_y(minor_circle_diameter, x)
            .map(|y| Point2::new(x, y))
            .ok_or_else(|| {
                MountError::invalid(
                    "outer_diameter",
                    format!(
                        "latch of slot {index} at x = {x} lies outside the bore (diameter {minor_circle_diameter})"
                    ),
                )
            })
    };
    let start = on_circle(x1)?;
    let end = on_circle(x2)?;
    let chord = end - start;

    Ok(OrientedBox {
        start,
        end,
        size: Vector3::new(distance(&start, &end), metrics.base_size.x, latch.z),
        tilt: LATCH_TILT,
        heading: chord.y.atan2(chord.x).to_degrees(),
        position: Vector3::new(start.x, start.y, metrics.latch_distance_from_front),
    })
}
