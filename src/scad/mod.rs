//! OpenSCAD backend.
//!
//! Operations build a tree of [`ScadNode`]s instead of evaluating geometry;
//! booleans are left to OpenSCAD when the rendered source is opened there.
//! Subtrees are shared through [`Arc`], so reusing a solid in several places
//! costs nothing.

use crate::config::Resolution;
use crate::edge::EdgeProfile;
use crate::errors::GeometryError;
use crate::float_types::{OVERLAP, Real};
use crate::traits::GeometryEngine;
use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector2, Vector3};
use std::sync::Arc;

mod render;

pub use render::{ScadFile, to_scad};

pub type ScadTree = Arc<ScadNode>;

/// How `offset()` treats corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Offset {
    /// `offset(r = ..)`: rounded corners
    Radius(Real),
    /// `offset(delta = ..)`: sharp corners
    Delta(Real),
}

/// One OpenSCAD module instantiation.
#[derive(Debug, Clone, PartialEq)]
pub enum ScadNode {
    Circle {
        diameter: Real,
        segments: usize,
    },
    /// `circle(r, $fn = sides)`, OpenSCAD's way to get a regular polygon
    RegularPolygon {
        circumradius: Real,
        sides: usize,
    },
    Square {
        size: Vector2<Real>,
    },
    Polygon {
        points: Vec<Point2<Real>>,
    },
    Cube {
        size: Vector3<Real>,
    },
    /// Faces wind counter-clockwise seen from outside; flipped when rendered.
    Polyhedron {
        points: Vec<Point3<Real>>,
        faces: Vec<Vec<usize>>,
    },
    LinearExtrude {
        height: Real,
        child: ScadTree,
    },
    RotateExtrude {
        segments: usize,
        child: ScadTree,
    },
    Offset {
        offset: Offset,
        child: ScadTree,
    },
    Translate {
        offset: Vector3<Real>,
        child: ScadTree,
    },
    MultMatrix {
        matrix: Matrix4<Real>,
        child: ScadTree,
    },
    Hull(Vec<ScadTree>),
    Union(Vec<ScadTree>),
    /// First child minus all others
    Difference(Vec<ScadTree>),
}

impl ScadNode {
    /// Number of nodes in the tree, shared subtrees counted each time they appear.
    pub fn node_count(&self) -> usize {
        1 + match self {
            ScadNode::LinearExtrude { child, .. }
            | ScadNode::RotateExtrude { child, .. }
            | ScadNode::Offset { child, .. }
            | ScadNode::Translate { child, .. }
            | ScadNode::MultMatrix { child, .. } => child.node_count(),
            ScadNode::Hull(children) | ScadNode::Union(children) | ScadNode::Difference(children) => {
                children.iter().map(|c| c.node_count()).sum()
            },
            _ => 0,
        }
    }
}

fn finite(values: &[Real]) -> Result<(), GeometryError> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&bad) => Err(GeometryError::InvalidCoordinate(Point3::new(bad, bad, bad))),
        None => Ok(()),
    }
}

fn positive(what: &str, value: Real) -> Result<(), GeometryError> {
    finite(&[value])?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::degenerate(format!(
            "{what} must be positive, got {value}"
        )))
    }
}

/// Embeds a 2D homogeneous transform in 3D, leaving z alone.
fn lift(matrix: &Matrix3<Real>) -> Matrix4<Real> {
    let mut lifted = Matrix4::identity();
    lifted.fixed_view_mut::<2, 2>(0, 0).copy_from(&matrix.fixed_view::<2, 2>(0, 0));
    lifted.fixed_view_mut::<2, 1>(0, 3).copy_from(&matrix.fixed_view::<2, 1>(0, 2));
    lifted
}

/// Builds OpenSCAD source instead of geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScadEngine {
    pub resolution: Resolution,
}

impl ScadEngine {
    pub const fn new(resolution: Resolution) -> Self {
        ScadEngine { resolution }
    }

    fn placed(child: &ScadTree, matrix: &Matrix4<Real>) -> ScadTree {
        // fold consecutive placements into one
        let (inner, matrix) = match child.as_ref() {
            ScadNode::Translate { offset, child } => (
                child,
                matrix * nalgebra::Translation3::from(*offset).to_homogeneous(),
            ),
            ScadNode::MultMatrix { matrix: m, child } => (child, matrix * m),
            _ => (child, *matrix),
        };
        let linear = matrix.fixed_view::<3, 3>(0, 0);
        if linear == Matrix3::identity() && matrix.row(3) == Matrix4::identity().row(3) {
            let offset = Vector3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]);
            if offset == Vector3::zeros() {
                return inner.clone();
            }
            Arc::new(ScadNode::Translate {
                offset,
                child: inner.clone(),
            })
        } else {
            Arc::new(ScadNode::MultMatrix {
                matrix,
                child: inner.clone(),
            })
        }
    }

    fn combined(a: &ScadTree, b: &ScadTree, difference: bool) -> ScadTree {
        let mut children = match (a.as_ref(), difference) {
            (ScadNode::Union(children), false) | (ScadNode::Difference(children), true) => {
                children.clone()
            },
            _ => vec![a.clone()],
        };
        children.push(b.clone());
        Arc::new(if difference {
            ScadNode::Difference(children)
        } else {
            ScadNode::Union(children)
        })
    }
}

impl GeometryEngine for ScadEngine {
    type Profile = ScadTree;
    type Solid = ScadTree;

    fn circle(&self, diameter: Real) -> Result<ScadTree, GeometryError> {
        positive("circle diameter", diameter)?;
        Ok(Arc::new(ScadNode::Circle {
            diameter,
            segments: self.resolution.segments,
        }))
    }

    fn rectangle(&self, size: Vector2<Real>) -> Result<ScadTree, GeometryError> {
        positive("rectangle width", size.x)?;
        positive("rectangle height", size.y)?;
        Ok(Arc::new(ScadNode::Square { size }))
    }

    fn polygon(&self, points: &[Point2<Real>]) -> Result<ScadTree, GeometryError> {
        if points.len() < 3 {
            return Err(GeometryError::TooFewPoints {
                expected: 3,
                actual: points.len(),
            });
        }
        for p in points {
            finite(&[p.x, p.y])?;
        }
        Ok(Arc::new(ScadNode::Polygon {
            points: points.to_vec(),
        }))
    }

    fn regular_polygon(&self, sides: usize, circumradius: Real) -> Result<ScadTree, GeometryError> {
        if sides < 3 {
            return Err(GeometryError::TooFewPoints {
                expected: 3,
                actual: sides,
            });
        }
        positive("polygon circumradius", circumradius)?;
        Ok(Arc::new(ScadNode::RegularPolygon { circumradius, sides }))
    }

    fn cuboid(&self, size: Vector3<Real>) -> Result<ScadTree, GeometryError> {
        finite(size.as_slice())?;
        if !(size.x > 0.0 && size.y > 0.0 && size.z > 0.0) {
            return Err(GeometryError::degenerate(format!(
                "box needs a positive size, got {size:?}"
            )));
        }
        Ok(Arc::new(ScadNode::Cube { size }))
    }

    fn polyhedron(
        &self,
        points: &[Point3<Real>],
        faces: &[Vec<usize>],
    ) -> Result<ScadTree, GeometryError> {
        if let Some(p) = points.iter().find(|p| !p.iter().all(|v| v.is_finite())) {
            return Err(GeometryError::InvalidCoordinate(*p));
        }
        for face in faces {
            if face.len() < 3 {
                return Err(GeometryError::TooFewPoints {
                    expected: 3,
                    actual: face.len(),
                });
            }
            if let Some(&index) = face.iter().find(|&&i| i >= points.len()) {
                return Err(GeometryError::FaceIndexOutOfRange {
                    index,
                    len: points.len(),
                });
            }
        }
        Ok(Arc::new(ScadNode::Polyhedron {
            points: points.to_vec(),
            faces: faces.to_vec(),
        }))
    }

    fn union_2d(&self, a: &ScadTree, b: &ScadTree) -> ScadTree {
        Self::combined(a, b, false)
    }

    fn transform_2d(&self, profile: &ScadTree, matrix: &Matrix3<Real>) -> ScadTree {
        Self::placed(profile, &lift(matrix))
    }

    fn round_inside_corners(&self, profile: &ScadTree, radius: Real) -> Result<ScadTree, GeometryError> {
        finite(&[radius])?;
        if radius < 0.0 {
            return Err(GeometryError::degenerate(format!(
                "corner radius must not be negative, got {radius}"
            )));
        }
        let grown = Arc::new(ScadNode::Offset {
            offset: Offset::Delta(radius),
            child: profile.clone(),
        });
        Ok(Arc::new(ScadNode::Offset {
            offset: Offset::Radius(-radius),
            child: grown,
        }))
    }

    fn extrude(&self, profile: &ScadTree, height: Real, edges: EdgeProfile) -> Result<ScadTree, GeometryError> {
        let layers = edges.layers(height, self.resolution.edge_steps)?;
        if edges.is_sharp() {
            return Ok(Arc::new(ScadNode::LinearExtrude {
                height,
                child: profile.clone(),
            }));
        }

        // hull of thin slabs, one per layer; exact for convex profiles
        let slab = OVERLAP.min(height / 2.0);
        let slabs = layers
            .iter()
            .map(|layer| {
                let section = if layer.inset > 0.0 {
                    Arc::new(ScadNode::Offset {
                        offset: Offset::Delta(-layer.inset),
                        child: profile.clone(),
                    })
                } else {
                    profile.clone()
                };
                let extruded = Arc::new(ScadNode::LinearExtrude {
                    height: slab,
                    child: section,
                });
                let z = layer.z.min(height - slab);
                if z == 0.0 {
                    extruded
                } else {
                    Arc::new(ScadNode::Translate {
                        offset: Vector3::new(0.0, 0.0, z),
                        child: extruded,
                    })
                }
            })
            .collect();
        Ok(Arc::new(ScadNode::Hull(slabs)))
    }

    fn revolve(&self, profile: &ScadTree) -> Result<ScadTree, GeometryError> {
        Ok(Arc::new(ScadNode::RotateExtrude {
            segments: self.resolution.segments,
            child: profile.clone(),
        }))
    }

    fn union(&self, a: &ScadTree, b: &ScadTree) -> ScadTree {
        Self::combined(a, b, false)
    }

    fn subtract(&self, a: &ScadTree, b: &ScadTree) -> ScadTree {
        Self::combined(a, b, true)
    }

    fn transform(&self, solid: &ScadTree, matrix: &Matrix4<Real>) -> ScadTree {
        Self::placed(solid, matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeTreatment;

    fn engine() -> ScadEngine {
        ScadEngine::new(Resolution::draft())
    }

    #[test]
    fn consecutive_translations_merge() {
        let e = engine();
        let cube = e.cuboid(Vector3::new(1.0, 1.0, 1.0)).unwrap();
        let moved = e.translate(&e.translate(&cube, Vector3::new(1.0, 0.0, 0.0)), Vector3::new(0.0, 2.0, 0.0));
        match moved.as_ref() {
            ScadNode::Translate { offset, child } => {
                assert_eq!(*offset, Vector3::new(1.0, 2.0, 0.0));
                assert!(matches!(child.as_ref(), ScadNode::Cube { .. }));
            },
            other => panic!("expected a translation, got {other:?}"),
        }
        // and cancel out entirely
        let back = e.translate(&moved, Vector3::new(-1.0, -2.0, 0.0));
        assert!(matches!(back.as_ref(), ScadNode::Cube { .. }));
    }

    #[test]
    fn rotation_becomes_multmatrix() {
        let e = engine();
        let cube = e.cuboid(Vector3::new(1.0, 1.0, 1.0)).unwrap();
        let turned = e.rotate(&cube, 0.0, 0.0, 90.0);
        assert!(matches!(turned.as_ref(), ScadNode::MultMatrix { .. }));
    }

    #[test]
    fn subtract_all_flattens_into_one_difference() {
        let e = engine();
        let cube = e.cuboid(Vector3::new(5.0, 5.0, 5.0)).unwrap();
        let small = e.cuboid(Vector3::new(1.0, 1.0, 1.0)).unwrap();
        let cut = e.subtract_all(&cube, vec![small.clone(), small.clone(), small]);
        match cut.as_ref() {
            ScadNode::Difference(children) => assert_eq!(children.len(), 4),
            other => panic!("expected a difference, got {other:?}"),
        }
    }

    #[test]
    fn treated_extrusion_is_a_hull_of_slabs() {
        let e = engine();
        let disc = e.circle(10.0).unwrap();
        let edges = EdgeProfile::bottom(EdgeTreatment::Chamfer { depth: 1.0 });
        let face = e.extrude(&disc, 1.0, edges).unwrap();
        match face.as_ref() {
            ScadNode::Hull(slabs) => assert_eq!(slabs.len(), 2),
            other => panic!("expected a hull, got {other:?}"),
        }
        assert!(e.extrude(&disc, 0.5, edges).is_err());
    }

    #[test]
    fn lift_keeps_2d_translation() {
        let m = nalgebra::Translation2::new(3.0, -4.0).to_homogeneous();
        let lifted = lift(&m);
        let p = lifted.transform_point(&Point3::new(1.0, 1.0, 7.0));
        assert_eq!(p, Point3::new(4.0, -3.0, 7.0));
    }

    #[test]
    fn invalid_primitives_are_rejected() {
        let e = engine();
        assert!(e.circle(-1.0).is_err());
        assert!(matches!(
            e.polyhedron(&[Point3::origin()], &[vec![0, 0, 3]]),
            Err(GeometryError::FaceIndexOutOfRange { index: 3, len: 1 })
        ));
    }
}
