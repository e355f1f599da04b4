//! Threaded hole mounts for keystone modules.
//!
//! A mount is a threaded tube with a face flange that passes through a round
//! hole in a panel, carrying one or more keystone slots at its front, plus a
//! hex nut that clamps it from behind.

use crate::errors::MountError;
use crate::float_types::{Real, all_finite};
use crate::thread::{ScrewThread, ThreadForm};
use serde::Deserialize;

pub mod builder;
pub mod latch;

pub use builder::{MountBuilder, NamedModel};
pub use latch::{OrientedBox, circle_y, latch_cutout_box};

/// Extra diameter of the face flange over the thread
pub const FACE_MARGIN: Real = 10.0;
pub const FACE_THICKNESS: Real = 1.0;
pub const MAX_PANEL_THICKNESS: Real = 20.0;
/// Width of one keystone module, also the spacing between slots
pub const MODULE_BODY_WIDTH: Real = 18.0;
pub const WALL_THICKNESS: Real = 3.0;

pub const NUT_FLANGE_WIDTH: Real = 6.0;
pub const NUT_FLANGE_THICKNESS: Real = 1.0;
pub const NUT_THICKNESS: Real = 10.0;
pub const NUT_CORNER_RADIUS: Real = 1.0;

pub const THREAD_DEPTH: Real = 1.0;
pub const THREAD_PITCH: Real = 4.0;
pub const THREAD_ANGLE: Real = 90.0;
pub const THREAD_CREST_WIDTH: Real = 0.2;
/// Start angle of the thread, keeps the print seam in the same place on every size
pub const THREAD_START_ROTATION: Real = 80.0;
/// Extra depth of the rear lead-in chamfer beyond the thread depth
pub const LEAD_IN_ALLOWANCE: Real = 0.4;
/// Nut lead-in chamfer as a multiple of the thread depth
pub const NUT_LEAD_IN_FACTOR: Real = 1.2;
/// Tilt of the latch clearance ramp about x
pub const LATCH_TILT: Real = 45.0;
/// Gap between the body and the nut when laid out for printing
pub const STACK_SPACING: Real = 3.0;

const fn default_slot_count() -> usize {
    1
}

/// Parameters of one mount. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MountSpec {
    outer_diameter: Real,
    #[serde(default = "default_slot_count")]
    slot_count: usize,
    /// Cut the walls away for sizes too small to insert the module through the bore
    #[serde(default)]
    has_cutout: bool,
    #[serde(default)]
    y_offset: Real,
}

impl MountSpec {
    /// A single-slot mount for a hole of `outer_diameter`.
    pub const fn new(outer_diameter: Real) -> Self {
        MountSpec {
            outer_diameter,
            slot_count: 1,
            has_cutout: false,
            y_offset: 0.0,
        }
    }

    pub const fn with_slot_count(self, slot_count: usize) -> Self {
        MountSpec { slot_count, ..self }
    }

    pub const fn with_y_offset(self, y_offset: Real) -> Self {
        MountSpec { y_offset, ..self }
    }

    pub const fn with_cutout(self, has_cutout: bool) -> Self {
        MountSpec { has_cutout, ..self }
    }

    pub const fn outer_diameter(&self) -> Real {
        self.outer_diameter
    }

    pub const fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub const fn has_cutout(&self) -> bool {
        self.has_cutout
    }

    pub const fn y_offset(&self) -> Real {
        self.y_offset
    }

    pub fn face_diameter(&self) -> Real {
        self.outer_diameter + FACE_MARGIN
    }

    pub fn full_length(&self) -> Real {
        MAX_PANEL_THICKNESS + NUT_THICKNESS * 0.8
    }

    pub fn nut_outer_diameter(&self) -> Real {
        self.outer_diameter + 2.0 * NUT_FLANGE_WIDTH
    }

    pub fn thread(&self) -> ScrewThread {
        ScrewThread {
            pitch: THREAD_PITCH,
            major_diameter: self.outer_diameter,
            minor_diameter: self.outer_diameter - 2.0 * THREAD_DEPTH,
            form: ThreadForm::Trapezoidal {
                angle: THREAD_ANGLE,
                crest_width: THREAD_CREST_WIDTH,
            },
        }
    }

    /// Output name. Only the diameter and slot count take part, so specs
    /// differing in offset or cutout share a name.
    pub fn name(&self) -> String {
        let slots = if self.slot_count > 1 {
            format!("-{}slots", self.slot_count)
        } else {
            String::new()
        };
        format!("keystone-mount-{}mm{slots}", format_g(self.outer_diameter))
    }

    /// Checks every invariant a build relies on.
    pub fn validate(&self) -> Result<(), MountError> {
        if !all_finite(&[self.outer_diameter, self.y_offset]) {
            return Err(MountError::invalid(
                "outer_diameter",
                format!("dimensions must be finite, got {self:?}"),
            ));
        }
        if !(THREAD_DEPTH > 0.0 && self.outer_diameter > 2.0 * THREAD_DEPTH) {
            return Err(MountError::invalid(
                "outer_diameter",
                format!(
                    "must exceed twice the thread depth ({}), got {}",
                    2.0 * THREAD_DEPTH,
                    self.outer_diameter
                ),
            ));
        }
        if self.slot_count < 1 {
            return Err(MountError::invalid("slot_count", "at least one slot is required"));
        }
        if !(self.nut_outer_diameter() > self.outer_diameter) {
            return Err(MountError::invalid(
                "nut_outer_diameter",
                "the nut must fully surround the thread",
            ));
        }
        if !(self.full_length() > 0.0) {
            return Err(MountError::invalid("full_length", "must be positive"));
        }
        Ok(())
    }
}

/// Formats like C's `%g`: six significant digits, trailing zeros dropped,
/// exponent form below 1e-4 and from 1e6 up.
pub fn format_g(value: Real) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    // exponent after rounding to six significant digits
    let scientific = format!("{value:.5e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if (-4..6).contains(&exponent) {
        let decimals = (5 - exponent) as usize;
        trim_fraction(&format!("{value:.decimals$}"))
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.abs())
    }
}

fn trim_fraction(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}
