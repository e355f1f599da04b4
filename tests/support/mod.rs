//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use keystone_mount::{
    config::{BuildConfig, Resolution},
    float_types::Real,
    mesh::Mesh,
};

/// Returns the bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]` of a mesh.
pub fn bounding_box(mesh: &Mesh) -> [Real; 6] {
    let bb = mesh.bounding_box().expect("mesh has no vertices");
    [bb.mins.x, bb.mins.y, bb.mins.z, bb.maxs.x, bb.maxs.y, bb.maxs.z]
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Default tolerance with a tessellation coarse enough for the mesh engine
/// to build whole mounts quickly.
pub fn draft_config() -> BuildConfig {
    BuildConfig::default().with_resolution(Resolution::draft())
}
