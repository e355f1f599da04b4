//! Polygon offsetting through `geo-buf`'s straight skeleton.
//!
//! A positive distance grows the profile, a negative one shrinks it. The
//! mitered variant keeps corners sharp, the rounded variant replaces every
//! convex corner of the offset curve with an arc.

use crate::errors::GeometryError;
use crate::float_types::Real;
use crate::sketch::Sketch;
use geo_buf::{buffer_multi_polygon, buffer_multi_polygon_rounded};

impl Sketch {
    /// Offset with sharp (mitered) corners.
    pub fn offset(&self, distance: Real) -> Sketch {
        if self.is_empty() || distance == 0.0 {
            return self.clone();
        }
        Sketch::from_geo(buffer_multi_polygon(&self.geometry, distance))
    }

    /// Offset with rounded corners.
    pub fn offset_rounded(&self, distance: Real) -> Sketch {
        if self.is_empty() || distance == 0.0 {
            return self.clone();
        }
        Sketch::from_geo(buffer_multi_polygon_rounded(&self.geometry, distance))
    }

    /// Rounds the concave corners with `radius` and leaves convex ones alone.
    ///
    /// This is a morphological closing: grow by `radius` with sharp corners,
    /// then shrink back with rounded ones. Concave corners grow an arc, the
    /// rest of the outline returns to where it was.
    pub fn round_inside_corners(&self, radius: Real) -> Result<Sketch, GeometryError> {
        if !(radius >= 0.0 && radius.is_finite()) {
            return Err(GeometryError::degenerate(format!(
                "corner radius must be a non-negative length, got {radius}"
            )));
        }
        let closed = self.offset(radius).offset_rounded(-radius);
        if closed.is_empty() && !self.is_empty() {
            return Err(GeometryError::degenerate(format!(
                "rounding with radius {radius} removed the whole profile"
            )));
        }
        Ok(closed)
    }
}
