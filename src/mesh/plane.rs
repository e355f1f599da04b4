//! Oriented planes and polygon splitting.

use crate::float_types::{EPSILON, Real};
use crate::mesh::polygon::Polygon;
use nalgebra::{Point3, Vector3};

// Classification of a point or polygon against a plane. A polygon's class is
// the bitwise OR of its vertices' classes.
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// A plane `normal · p = w` with a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3<Real>,
    pub w: Real,
}

impl Plane {
    /// Plane through a (possibly non-convex) ring of points.
    ///
    /// The normal comes from Newell's method, so it follows the ring's
    /// counter-clockwise winding and tolerates slightly non-planar input.
    /// Returns `None` when the ring encloses no area.
    pub fn from_points(points: &[Point3<Real>]) -> Option<Plane> {
        if points.len() < 3 {
            return None;
        }
        let mut normal = Vector3::<Real>::zeros();
        let mut centroid = Vector3::<Real>::zeros();
        for (i, a) in points.iter().enumerate() {
            let b = &points[(i + 1) % points.len()];
            normal.x += (a.y - b.y) * (a.z + b.z);
            normal.y += (a.z - b.z) * (a.x + b.x);
            normal.z += (a.x - b.x) * (a.y + b.y);
            centroid += a.coords;
        }
        let length = normal.norm();
        if !(length > EPSILON * EPSILON) {
            return None;
        }
        let normal = normal / length;
        let centroid = centroid / points.len() as Real;
        Some(Plane {
            normal,
            w: normal.dot(&centroid),
        })
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let t = self.signed_distance(point);
        if t < -EPSILON {
            BACK
        } else if t > EPSILON {
            FRONT
        } else {
            COPLANAR
        }
    }

    pub fn classify_polygon(&self, polygon: &Polygon) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point(v))
    }

    /// Splits `polygon` by this plane into four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`.
    ///
    /// Coplanar polygons go to the front bucket when they face the same way
    /// as the plane. Pieces keep the plane of the polygon they were cut from.
    #[allow(clippy::type_complexity)]
    pub fn split_polygon(
        &self,
        polygon: &Polygon,
    ) -> (Vec<Polygon>, Vec<Polygon>, Vec<Polygon>, Vec<Polygon>) {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon.vertices.iter().map(|v| self.orient_point(v)).collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let count = polygon.vertices.len();
                let mut split_front = Vec::with_capacity(count + 1);
                let mut split_back = Vec::with_capacity(count + 1);

                for i in 0..count {
                    let j = (i + 1) % count;
                    let (type_i, type_j) = (types[i], types[j]);
                    let (vi, vj) = (&polygon.vertices[i], &polygon.vertices[j]);

                    if type_i != BACK {
                        split_front.push(*vi);
                    }
                    if type_i != FRONT {
                        split_back.push(*vi);
                    }
                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vj - vi));
                        if denom.abs() > Real::EPSILON {
                            let t = (self.w - self.normal.dot(&vi.coords)) / denom;
                            let crossing = vi + (vj - vi) * t;
                            split_front.push(crossing);
                            split_back.push(crossing);
                        }
                    }
                }

                if split_front.len() >= 3 {
                    front.push(Polygon::with_plane(split_front, polygon.plane));
                }
                if split_back.len() >= 3 {
                    back.push(Polygon::with_plane(split_back, polygon.plane));
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(z: Real) -> Polygon {
        Polygon::new(vec![
            Point3::new(0.0, 0.0, z),
            Point3::new(2.0, 0.0, z),
            Point3::new(2.0, 2.0, z),
            Point3::new(0.0, 2.0, z),
        ])
        .unwrap()
    }

    #[test]
    fn newell_normal_follows_winding() {
        let plane = square(1.0).plane;
        assert!((plane.normal - Vector3::z()).norm() < 1e-12);
        assert!((plane.w - 1.0).abs() < 1e-12);

        let collinear = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert!(Plane::from_points(&collinear).is_none());
    }

    #[test]
    fn tilted_ring_gets_unit_normal_through_centroid() {
        let ring = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let plane = Plane::from_points(&ring).unwrap();
        let expected = Vector3::new(-1.0, 0.0, 1.0).normalize();
        assert!((plane.normal - expected).norm() < 1e-12);
        for p in &ring {
            assert!(plane.signed_distance(p).abs() < 1e-12);
        }
    }

    #[test]
    fn spanning_polygon_is_cut_in_two() {
        let cut = Plane {
            normal: Vector3::x(),
            w: 1.0,
        };
        let (cf, cb, front, back) = cut.split_polygon(&square(0.0));
        assert!(cf.is_empty() && cb.is_empty());
        assert_eq!(front.len(), 1);
        assert_eq!(back.len(), 1);
        assert!(front[0].vertices.iter().all(|v| v.x >= 1.0 - 1e-12));
        assert!(back[0].vertices.iter().all(|v| v.x <= 1.0 + 1e-12));
        assert_eq!(front[0].plane, square(0.0).plane);
    }

    #[test]
    fn coplanar_polygons_sort_by_facing() {
        let mut plane = square(0.0).plane;
        let (cf, cb, _, _) = plane.split_polygon(&square(0.0));
        assert_eq!((cf.len(), cb.len()), (1, 0));
        plane.flip();
        let (cf, cb, _, _) = plane.split_polygon(&square(0.0));
        assert_eq!((cf.len(), cb.len()), (0, 1));
    }
}
