//! Build settings passed explicitly to every build.

use crate::errors::MountError;
use crate::float_types::Real;
use serde::Deserialize;

/// Tolerance used by the default catalog.
pub const DEFAULT_TOLERANCE: Real = 0.3;

/// How finely curved surfaces are tessellated.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Resolution {
    /// Segments per full circle for circles and revolutions
    pub segments: usize,
    /// Segments per turn of a thread
    pub thread_segments: usize,
    /// Axial distance between sampled thread rings
    pub thread_axial_step: Real,
    /// Segments per quarter circle of a fillet
    pub edge_steps: usize,
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution {
            segments: 96,
            thread_segments: 72,
            thread_axial_step: 0.2,
            edge_steps: 6,
        }
    }
}

impl Resolution {
    /// A coarse tessellation, quick enough for the BSP engine to chew through
    /// a whole mount in tests or previews.
    pub const fn draft() -> Self {
        Resolution {
            segments: 24,
            thread_segments: 16,
            thread_axial_step: 1.0,
            edge_steps: 2,
        }
    }

    /// Overrides the circle segment count, keeping threads at least as fine.
    pub fn with_segments(self, segments: usize) -> Self {
        Resolution {
            segments,
            thread_segments: self.thread_segments.max(segments * 3 / 4),
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), MountError> {
        if self.segments < 3 {
            return Err(MountError::invalid(
                "segments",
                format!("need at least 3 segments per circle, got {}", self.segments),
            ));
        }
        if self.thread_segments < 3 {
            return Err(MountError::invalid(
                "thread_segments",
                format!("need at least 3 segments per turn, got {}", self.thread_segments),
            ));
        }
        if !(self.thread_axial_step > 0.0 && self.thread_axial_step.is_finite()) {
            return Err(MountError::invalid(
                "thread_axial_step",
                format!("must be a positive length, got {}", self.thread_axial_step),
            ));
        }
        Ok(())
    }
}

/// Clearance and tessellation shared by every mount in a batch.
///
/// Set once before building; builds only ever read it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Clearance added or removed wherever two printed parts must fit
    pub tolerance: Real,
    pub resolution: Resolution,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            tolerance: DEFAULT_TOLERANCE,
            resolution: Resolution::default(),
        }
    }
}

impl BuildConfig {
    pub fn new(tolerance: Real) -> Self {
        BuildConfig {
            tolerance,
            ..Default::default()
        }
    }

    pub const fn with_resolution(self, resolution: Resolution) -> Self {
        BuildConfig { resolution, ..self }
    }

    pub fn validate(&self) -> Result<(), MountError> {
        if !(self.tolerance >= 0.0 && self.tolerance.is_finite()) {
            return Err(MountError::invalid(
                "tolerance",
                format!("must be a finite, non-negative length, got {}", self.tolerance),
            ));
        }
        self.resolution.validate()
    }
}
