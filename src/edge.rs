//! Edge treatments applied while extruding a profile.
//!
//! Both engines realize a treated extrusion as a stack of layers, each layer
//! being the profile inset by some distance at some height. The engines only
//! differ in how they join the layers (a loft for meshes, a hull for OpenSCAD).

use crate::errors::GeometryError;
use crate::float_types::{EPSILON, FRAC_PI_2, Real};

/// How one horizontal edge of an extrusion is finished.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EdgeTreatment {
    #[default]
    Sharp,
    /// 45° bevel removing `depth` both horizontally and vertically
    Chamfer { depth: Real },
    /// Quarter-round of `radius`
    Fillet { radius: Real },
}

impl EdgeTreatment {
    /// Vertical extent taken by the treatment.
    pub const fn size(&self) -> Real {
        match self {
            EdgeTreatment::Sharp => 0.0,
            EdgeTreatment::Chamfer { depth } => *depth,
            EdgeTreatment::Fillet { radius } => *radius,
        }
    }

    pub const fn is_sharp(&self) -> bool {
        matches!(self, EdgeTreatment::Sharp)
    }

    /// `(height above the edge, inset)` pairs walking away from the edge,
    /// starting at the edge itself and ending where the wall is vertical.
    fn samples(&self, steps: usize) -> Vec<(Real, Real)> {
        match *self {
            EdgeTreatment::Sharp => vec![(0.0, 0.0)],
            EdgeTreatment::Chamfer { depth } => vec![(0.0, depth), (depth, 0.0)],
            EdgeTreatment::Fillet { radius } => {
                let steps = steps.max(1);
                (0..=steps)
                    .map(|i| {
                        let phi = FRAC_PI_2 * i as Real / steps as Real;
                        (radius * (1.0 - phi.cos()), radius * (1.0 - phi.sin()))
                    })
                    .collect()
            },
        }
    }
}

/// Treatments for the bottom (z = 0) and top (z = height) edges of an extrusion.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeProfile {
    pub bottom: EdgeTreatment,
    pub top: EdgeTreatment,
}

/// One slice of a treated extrusion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    pub z: Real,
    pub inset: Real,
}

impl EdgeProfile {
    pub const SHARP: EdgeProfile = EdgeProfile {
        bottom: EdgeTreatment::Sharp,
        top: EdgeTreatment::Sharp,
    };

    pub const fn bottom(treatment: EdgeTreatment) -> Self {
        EdgeProfile {
            bottom: treatment,
            top: EdgeTreatment::Sharp,
        }
    }

    pub const fn top(treatment: EdgeTreatment) -> Self {
        EdgeProfile {
            bottom: EdgeTreatment::Sharp,
            top: treatment,
        }
    }

    pub const fn is_sharp(&self) -> bool {
        self.bottom.is_sharp() && self.top.is_sharp()
    }

    /// Layers from z = 0 up to z = `height`, consecutive duplicates removed.
    ///
    /// Fillets are sampled with `steps` segments per quarter circle.
    pub fn layers(&self, height: Real, steps: usize) -> Result<Vec<Layer>, GeometryError> {
        if !(height > 0.0) {
            return Err(GeometryError::degenerate(format!(
                "extrusion height must be positive, got {height}"
            )));
        }
        for treatment in [self.bottom, self.top] {
            if !(treatment.size() >= 0.0) {
                return Err(GeometryError::degenerate(format!(
                    "edge treatment size must not be negative: {treatment:?}"
                )));
            }
        }
        if self.bottom.size() + self.top.size() > height + EPSILON {
            return Err(GeometryError::degenerate(format!(
                "edge treatments ({} + {}) exceed extrusion height {height}",
                self.bottom.size(),
                self.top.size()
            )));
        }

        let mut layers: Vec<Layer> = self
            .bottom
            .samples(steps)
            .into_iter()
            .map(|(dz, inset)| Layer { z: dz, inset })
            .collect();
        layers.extend(
            self.top
                .samples(steps)
                .into_iter()
                .rev()
                .map(|(dz, inset)| Layer {
                    z: height - dz,
                    inset,
                }),
        );
        layers.dedup_by(|b, a| (a.z - b.z).abs() < EPSILON && (a.inset - b.inset).abs() < EPSILON);
        Ok(layers)
    }
}
