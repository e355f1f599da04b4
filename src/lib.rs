//! Parametric **threaded hole mounts** for Keystone connector modules.
//!
//! A mount is a threaded tube with a face flange. It passes through a round
//! hole in a panel and carries one or more keystone slots at its front. A hex
//! nut clamps it from behind. Every size is built by the same parametric
//! procedure from a [`MountSpec`](mount::MountSpec), against any backend that
//! implements [`GeometryEngine`](traits::GeometryEngine):
//!
//! - [`MeshEngine`](mesh::MeshEngine) evaluates solids with
//!   [BSP](mesh::bsp) tree booleans and exports `.stl`,
//! - [`ScadEngine`](scad::ScadEngine) emits an OpenSCAD tree and exports `.scad`.
//!
//! ```no_run
//! use keystone_mount::config::BuildConfig;
//! use keystone_mount::mount::{MountBuilder, MountSpec};
//! use keystone_mount::scad::{ScadEngine, to_scad};
//!
//! let config = BuildConfig::default();
//! let engine = ScadEngine::new(config.resolution);
//! let builder = MountBuilder::new(&engine, &config);
//! let model = builder
//!     .assemble(&MountSpec::new(30.0).with_y_offset(-1.0).with_cutout(true))
//!     .unwrap();
//! println!("{}", to_scad(&model.solid));
//! ```
//!
//! # Features
//! #### Optional
//! - **parallel**: build catalog entries on a rayon thread pool

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod aabb;
pub mod catalog;
pub mod config;
pub mod edge;
pub mod errors;
pub mod float_types;
pub mod io;
pub mod keystone;
pub mod mesh;
pub mod mount;
pub mod scad;
pub mod sketch;
pub mod thread;
pub mod traits;
pub mod triangulated;

pub use errors::{GeometryError, MountError};
pub use mount::{MountBuilder, MountSpec, NamedModel};
pub use traits::GeometryEngine;
