//! 2D Shapes as `Sketch`s

use crate::errors::GeometryError;
use crate::float_types::{Real, TAU};
use crate::sketch::Sketch;
use geo::{LineString, MultiPolygon, Polygon as GeoPolygon};
use nalgebra::{Point2, Vector2};

fn ring_to_sketch(coords: Vec<(Real, Real)>) -> Sketch {
    let polygon = GeoPolygon::new(LineString::from(coords), vec![]);
    Sketch::from_geo(MultiPolygon::new(vec![polygon]))
}

fn check_finite(values: &[Real]) -> Result<(), GeometryError> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&bad) => Err(GeometryError::InvalidCoordinate(nalgebra::Point3::new(
            bad, bad, 0.0,
        ))),
        None => Ok(()),
    }
}

impl Sketch {
    /// Rectangle with its minimum corner at the origin.
    pub fn rectangle(size: Vector2<Real>) -> Result<Self, GeometryError> {
        check_finite(size.as_slice())?;
        if !(size.x > 0.0 && size.y > 0.0) {
            return Err(GeometryError::degenerate(format!(
                "rectangle needs a positive size, got {} x {}",
                size.x, size.y
            )));
        }
        Ok(ring_to_sketch(vec![
            (0.0, 0.0),
            (size.x, 0.0),
            (size.x, size.y),
            (0.0, size.y),
            (0.0, 0.0),
        ]))
    }

    /// Circle centered on the origin, approximated by an inscribed `segments`-gon.
    pub fn circle(diameter: Real, segments: usize) -> Result<Self, GeometryError> {
        check_finite(&[diameter])?;
        if !(diameter > 0.0) {
            return Err(GeometryError::degenerate(format!(
                "circle diameter must be positive, got {diameter}"
            )));
        }
        Self::regular_ngon(segments, diameter / 2.0)
    }

    /// Regular polygon centered on the origin with its first vertex on +x.
    pub fn regular_ngon(sides: usize, circumradius: Real) -> Result<Self, GeometryError> {
        check_finite(&[circumradius])?;
        if sides < 3 {
            return Err(GeometryError::TooFewPoints {
                expected: 3,
                actual: sides,
            });
        }
        if !(circumradius > 0.0) {
            return Err(GeometryError::degenerate(format!(
                "polygon circumradius must be positive, got {circumradius}"
            )));
        }
        let mut coords: Vec<(Real, Real)> = (0..sides)
            .map(|i| {
                let theta = TAU * i as Real / sides as Real;
                (circumradius * theta.cos(), circumradius * theta.sin())
            })
            .collect();
        coords.push(coords[0]);
        Ok(ring_to_sketch(coords))
    }

    /// Simple polygon through `points`, in either winding.
    pub fn polygon(points: &[Point2<Real>]) -> Result<Self, GeometryError> {
        if points.len() < 3 {
            return Err(GeometryError::TooFewPoints {
                expected: 3,
                actual: points.len(),
            });
        }
        for p in points {
            if !(p.x.is_finite() && p.y.is_finite()) {
                return Err(GeometryError::InvalidCoordinate(nalgebra::Point3::new(
                    p.x, p.y, 0.0,
                )));
            }
        }
        let mut coords: Vec<(Real, Real)> = points.iter().map(|p| (p.x, p.y)).collect();
        if coords.first() != coords.last() {
            coords.push(coords[0]);
        }
        let sketch = ring_to_sketch(coords);
        if !(sketch.area() > 0.0) {
            return Err(GeometryError::degenerate("polygon encloses no area"));
        }
        Ok(sketch)
    }
}
