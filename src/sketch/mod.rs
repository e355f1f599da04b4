//! 2D profiles backed by [`geo`] multipolygons.
//!
//! Profiles are kept normalized: exterior rings wind counter-clockwise and
//! holes clockwise, which is what the extrusion code relies on to get
//! outward-facing walls.

use crate::float_types::Real;
use geo::orient::Direction;
use geo::{
    Area, BooleanOps, BoundingRect, Coord, CoordsIter, MapCoords, MultiPolygon, Orient, Rect,
    TriangulateEarcut,
};
use nalgebra::{Matrix3, Point2, Point3};

pub mod extrudes;
pub mod offset;
pub mod shapes;

#[derive(Debug, Clone, PartialEq)]
pub struct Sketch {
    pub geometry: MultiPolygon<Real>,
}

impl Default for Sketch {
    fn default() -> Self {
        Sketch {
            geometry: MultiPolygon::new(vec![]),
        }
    }
}

impl Sketch {
    /// An empty sketch
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps `geometry`, normalizing its ring orientation.
    pub fn from_geo(geometry: MultiPolygon<Real>) -> Self {
        Sketch {
            geometry: geometry.orient(Direction::Default),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.0.is_empty()
    }

    pub fn union(&self, other: &Sketch) -> Sketch {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        Sketch::from_geo(self.geometry.union(&other.geometry))
    }

    /// Applies a homogeneous 2D transform to every coordinate.
    pub fn transform(&self, matrix: &Matrix3<Real>) -> Sketch {
        let moved = self.geometry.map_coords(|c| {
            let p = matrix.transform_point(&Point2::new(c.x, c.y));
            Coord { x: p.x, y: p.y }
        });
        // mirroring flips the winding, re-orienting puts it back
        Sketch::from_geo(moved)
    }

    pub fn bounding_rect(&self) -> Option<Rect<Real>> {
        self.geometry.bounding_rect()
    }

    /// Number of coordinates over all rings, closing points included.
    pub fn point_count(&self) -> usize {
        self.geometry.coords_count()
    }

    pub fn area(&self) -> Real {
        self.geometry.unsigned_area()
    }

    /// Ear-clipped triangles at height `z`, counter-clockwise seen from +z.
    pub fn triangulate(&self, z: Real) -> Vec<[Point3<Real>; 3]> {
        let mut triangles = Vec::new();
        for polygon in &self.geometry {
            for tri in polygon.earcut_triangles() {
                let [a, b, c] = [tri.0, tri.1, tri.2].map(|p| Point3::new(p.x, p.y, z));
                let winding = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
                if winding > 0.0 {
                    triangles.push([a, b, c]);
                } else if winding < 0.0 {
                    triangles.push([a, c, b]);
                }
            }
        }
        triangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Winding;
    use nalgebra::Vector2;

    #[test]
    fn new_sketch_is_empty() {
        let empty = Sketch::new();
        assert!(empty.is_empty());
        assert_eq!(empty.area(), 0.0);
        assert!(empty.bounding_rect().is_none());
        let square = Sketch::rectangle(Vector2::new(1.0, 1.0)).unwrap();
        assert_eq!(empty.union(&square), square.union(&Sketch::default()));
    }

    #[test]
    fn union_of_overlapping_squares() {
        let a = Sketch::rectangle(Vector2::new(2.0, 2.0)).unwrap();
        let b = a.transform(&nalgebra::Translation2::new(1.0, 0.0).to_homogeneous());
        let u = a.union(&b);
        assert_eq!(u.geometry.0.len(), 1);
        assert!((u.area() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn mirrored_sketch_keeps_ccw_exterior() {
        let square = Sketch::rectangle(Vector2::new(1.0, 1.0)).unwrap();
        let flip = Matrix3::new(1.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 1.0);
        let mirrored = square.transform(&flip);
        let rect = mirrored.bounding_rect().unwrap();
        assert_eq!(rect.min().y, -1.0);
        for tri in mirrored.triangulate(0.0) {
            let [a, b, c] = tri;
            assert!((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x) > 0.0);
        }
        assert!(mirrored.geometry.0[0].exterior().is_ccw());
    }

    #[test]
    fn triangulation_covers_the_area() {
        let disc = Sketch::circle(10.0, 32).unwrap();
        let covered: Real = disc
            .triangulate(1.0)
            .iter()
            .map(|[a, b, c]| ((b - a).cross(&(c - a))).z / 2.0)
            .sum();
        assert!((covered - disc.area()).abs() < 1e-9);
    }
}
