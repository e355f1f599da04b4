// Our Real scalar type:
pub type Real = f64;

/// Distance below which two points or a point and a plane are treated as
/// coincident by the BSP engine.
pub const EPSILON: Real = 1e-5;

/// Small overlap added to cutters so coplanar faces never survive a difference.
pub const OVERLAP: Real = 0.01;

// Frac Pi 2
/// π/2
pub const FRAC_PI_2: Real = core::f64::consts::FRAC_PI_2;

// Tau
/// The full circle constant (τ)
pub const TAU: Real = core::f64::consts::TAU;

/// Returns `true` when every value is neither NaN nor infinite.
pub fn all_finite(values: &[Real]) -> bool {
    values.iter().all(|v| v.is_finite())
}
