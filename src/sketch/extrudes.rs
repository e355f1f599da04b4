//! Turning sketches into solids: straight extrusion, layered lofts for edge
//! treatments, and full revolution about the Z axis.

use crate::edge::Layer;
use crate::errors::GeometryError;
use crate::float_types::{EPSILON, Real, TAU};
use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use crate::sketch::Sketch;
use geo::LineString;
use nalgebra::{Point2, Point3, Vector2};

/// Face through `points` with repeated neighbours dropped, `None` if nothing
/// with area is left.
fn face(mut points: Vec<Point3<Real>>) -> Option<Polygon> {
    points.dedup_by(|b, a| (*a - *b).norm() < EPSILON);
    while points.len() > 1 && (points[0] - points[points.len() - 1]).norm() < EPSILON {
        points.pop();
    }
    if points.len() < 3 {
        return None;
    }
    Polygon::new(points)
}

/// Open ring without the repeated closing coordinate.
fn ring_points(ring: &LineString<Real>) -> Vec<Point2<Real>> {
    let coords = &ring.0;
    let open = if coords.len() > 1 && coords.first() == coords.last() {
        &coords[..coords.len() - 1]
    } else {
        &coords[..]
    };
    open.iter().map(|c| Point2::new(c.x, c.y)).collect()
}

fn outward_normal(a: &Point2<Real>, b: &Point2<Real>) -> Vector2<Real> {
    let e = (b - a).normalize();
    Vector2::new(e.y, -e.x)
}

/// `ring` moved inward by `inset` with mitered corners. Edges keep their
/// direction, so a quad between two insets of the same ring is planar.
fn inset_ring(ring: &[Point2<Real>], inset: Real) -> Result<Vec<Point2<Real>>, GeometryError> {
    let n = ring.len();
    let normals: Vec<_> = (0..n).map(|i| outward_normal(&ring[i], &ring[(i + 1) % n])).collect();
    let moved: Vec<Point2<Real>> = (0..n)
        .map(|i| {
            let (n1, n2) = (normals[(i + n - 1) % n], normals[i]);
            ring[i] - (n1 + n2) * (inset / (1.0 + n1.dot(&n2)))
        })
        .collect();
    for i in 0..n {
        let before = ring[(i + 1) % n] - ring[i];
        let after = moved[(i + 1) % n] - moved[i];
        if !(before.dot(&after) > 0.0) {
            return Err(GeometryError::degenerate(format!(
                "inset of {inset} collapses the profile"
            )));
        }
    }
    Ok(moved)
}

fn is_convex(ring: &[Point2<Real>]) -> bool {
    let n = ring.len();
    (0..n).all(|i| {
        let a = ring[(i + 1) % n] - ring[i];
        let b = ring[(i + 2) % n] - ring[(i + 1) % n];
        a.perp(&b) >= -EPSILON * a.norm() * b.norm()
    })
}

impl Sketch {
    /// Straight extrusion from z = 0 to z = `height`.
    pub fn extrude(&self, height: Real) -> Result<Mesh, GeometryError> {
        if self.is_empty() {
            return Err(GeometryError::degenerate("cannot extrude an empty profile"));
        }
        if !(height > 0.0 && height.is_finite()) {
            return Err(GeometryError::degenerate(format!(
                "extrusion height must be positive, got {height}"
            )));
        }

        let mut polygons = Vec::new();
        for [a, b, c] in self.triangulate(0.0) {
            polygons.extend(face(vec![a, c, b]));
        }
        for tri in self.triangulate(height) {
            polygons.extend(face(tri.to_vec()));
        }
        for polygon in &self.geometry {
            for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
                for line in ring.lines() {
                    let (a, b) = (line.start, line.end);
                    polygons.extend(face(vec![
                        Point3::new(a.x, a.y, 0.0),
                        Point3::new(b.x, b.y, 0.0),
                        Point3::new(b.x, b.y, height),
                        Point3::new(a.x, a.y, height),
                    ]));
                }
            }
        }
        Ok(Mesh::from_polygons(polygons))
    }

    /// Stacks insets of a convex profile at the heights given by `layers`
    /// and skins them.
    pub fn loft(&self, layers: &[Layer]) -> Result<Mesh, GeometryError> {
        if layers.len() < 2 {
            return Err(GeometryError::TooFewPoints {
                expected: 2,
                actual: layers.len(),
            });
        }
        let [polygon] = self.geometry.0.as_slice() else {
            return Err(GeometryError::Unsupported(format!(
                "edge treatments need a single profile, got {}",
                self.geometry.0.len()
            )));
        };
        let ring = ring_points(polygon.exterior());
        if !polygon.interiors().is_empty() || !is_convex(&ring) {
            return Err(GeometryError::Unsupported(
                "edge treatments need a convex profile without holes".into(),
            ));
        }

        let rings = layers
            .iter()
            .map(|layer| {
                Ok(inset_ring(&ring, layer.inset)?
                    .into_iter()
                    .map(|p| Point3::new(p.x, p.y, layer.z))
                    .collect::<Vec<_>>())
            })
            .collect::<Result<Vec<_>, GeometryError>>()?;

        let n = ring.len();
        let mut polygons = Vec::with_capacity(n * rings.len() + 2);
        if let (Some(bottom), Some(top)) = (rings.first(), rings.last()) {
            polygons.extend(face(bottom.iter().rev().copied().collect()));
            polygons.extend(face(top.clone()));
        }
        for pair in rings.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            for i in 0..n {
                let j = (i + 1) % n;
                polygons.extend(face(vec![lower[i], lower[j], upper[j], upper[i]]));
            }
        }
        Ok(Mesh::from_polygons(polygons))
    }

    /// Sweeps the profile once around the Z axis: x becomes the radius and
    /// y becomes the height.
    pub fn revolve(&self, segments: usize) -> Result<Mesh, GeometryError> {
        if segments < 3 {
            return Err(GeometryError::TooFewPoints {
                expected: 3,
                actual: segments,
            });
        }
        if self.is_empty() {
            return Err(GeometryError::degenerate("cannot revolve an empty profile"));
        }
        if let Some(rect) = self.bounding_rect() {
            if rect.min().x < -EPSILON {
                return Err(GeometryError::Unsupported(format!(
                    "revolved profile crosses the axis (min x = {})",
                    rect.min().x
                )));
            }
        }

        let spin = |p: &Point2<Real>, j: usize| {
            let theta = TAU * (j % segments) as Real / segments as Real;
            let r = p.x.max(0.0);
            Point3::new(r * theta.cos(), r * theta.sin(), p.y)
        };

        let mut polygons = Vec::new();
        for polygon in &self.geometry {
            for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
                let points = ring_points(ring);
                for i in 0..points.len() {
                    let (a, b) = (&points[i], &points[(i + 1) % points.len()]);
                    for j in 0..segments {
                        polygons.extend(face(vec![
                            spin(a, j),
                            spin(a, j + 1),
                            spin(b, j + 1),
                            spin(b, j),
                        ]));
                    }
                }
            }
        }
        Ok(Mesh::from_polygons(polygons))
    }
}
