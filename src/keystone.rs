//! Keystone connector slot: the keyed opening a keystone module clips into.

use crate::errors::GeometryError;
use crate::float_types::{OVERLAP, Real};
use crate::traits::GeometryEngine;
use nalgebra::{Vector2, Vector3};

/// A size measured across (x) and along the mounting axis (z).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarSize {
    pub x: Real,
    pub z: Real,
}

impl PlanarSize {
    pub const fn new(x: Real, z: Real) -> Self {
        PlanarSize { x, z }
    }
}

/// Fixed dimensions of a keystone slot at a given fit tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeystoneSlotMetrics {
    /// Front opening, width by height
    pub opening_size: Vector2<Real>,
    /// Clearance the spring latch needs to flex
    pub latch_space_size: PlanarSize,
    /// Footprint of the retaining plate: `x` its width, `z` its depth
    pub base_size: PlanarSize,
    /// Distance from the front face to the latch clearance
    pub latch_distance_from_front: Real,
    /// Height of the notch the latch hook passes through
    pub latch_notch_height: Real,
}

impl KeystoneSlotMetrics {
    /// Width and height of the front opening
    pub const NOMINAL_OPENING: [Real; 2] = [14.5, 16.0];
    pub const NOMINAL_LATCH_SPACE: PlanarSize = PlanarSize::new(8.0, 4.5);
    pub const NOMINAL_BASE: PlanarSize = PlanarSize::new(15.0, 2.0);
    pub const LATCH_DISTANCE_FROM_FRONT: Real = 4.0;
    pub const LATCH_NOTCH_HEIGHT: Real = 2.0;

    /// Nominal keystone dimensions with clearances widened by `tolerance`.
    pub fn new(tolerance: Real) -> Self {
        KeystoneSlotMetrics {
            opening_size: Vector2::new(
                Self::NOMINAL_OPENING[0] + tolerance,
                Self::NOMINAL_OPENING[1] + tolerance,
            ),
            latch_space_size: PlanarSize::new(
                Self::NOMINAL_LATCH_SPACE.x + tolerance,
                Self::NOMINAL_LATCH_SPACE.z,
            ),
            base_size: PlanarSize::new(Self::NOMINAL_BASE.x + tolerance, Self::NOMINAL_BASE.z),
            latch_distance_from_front: Self::LATCH_DISTANCE_FROM_FRONT,
            latch_notch_height: Self::LATCH_NOTCH_HEIGHT,
        }
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        let values = [
            self.opening_size.x,
            self.opening_size.y,
            self.latch_space_size.x,
            self.latch_space_size.z,
            self.base_size.x,
            self.base_size.z,
            self.latch_distance_from_front,
            self.latch_notch_height,
        ];
        if values.iter().any(|v| !(v.is_finite() && *v >= 0.0)) {
            return Err(GeometryError::degenerate(format!(
                "keystone metrics must be finite and non-negative: {self:?}"
            )));
        }
        Ok(())
    }
}

/// The slot cutter: the front opening plus the latch notch above it, centered
/// on x and y and running through the plate from z = 0 to `base_size.z`.
pub fn keystone_slot<E: GeometryEngine>(
    engine: &E,
    metrics: &KeystoneSlotMetrics,
) -> Result<E::Solid, GeometryError> {
    metrics.validate()?;
    let depth = metrics.base_size.z + 2.0 * OVERLAP;
    let opening = metrics.opening_size;

    let body = engine.cuboid(Vector3::new(opening.x, opening.y, depth))?;
    let body = engine.translate(&body, Vector3::new(-opening.x / 2.0, -opening.y / 2.0, -OVERLAP));

    if !(metrics.latch_notch_height > 0.0) {
        return Ok(body);
    }
    let notch_width = metrics.latch_space_size.x;
    let notch = engine.cuboid(Vector3::new(
        notch_width,
        metrics.latch_notch_height + OVERLAP,
        depth,
    ))?;
    let notch = engine.translate(
        &notch,
        Vector3::new(-notch_width / 2.0, opening.y / 2.0 - OVERLAP, -OVERLAP),
    );
    Ok(engine.union(&body, &notch))
}
