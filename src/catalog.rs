//! The list of mounts to build, and the batch driver that builds them.

use crate::config::{BuildConfig, DEFAULT_TOLERANCE, Resolution};
use crate::errors::MountError;
use crate::float_types::Real;
use crate::mount::{MountBuilder, MountSpec, NamedModel};
use crate::traits::GeometryEngine;
use hashbrown::HashMap;
use serde::Deserialize;
use std::path::Path;
use std::time::Instant;

/// Failure to read a catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("cannot read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog: {0}")]
    Parse(#[from] toml::de::Error),
}

/// The mounts shipped by default: small sizes get an offset and side
/// cutouts so the module still fits, the largest size also comes with two slots.
pub fn default_catalog() -> Vec<MountSpec> {
    vec![
        MountSpec::new(30.0).with_y_offset(-1.0).with_cutout(true),
        MountSpec::new(32.0).with_y_offset(-1.0).with_cutout(true),
        MountSpec::new(38.0).with_cutout(true),
        MountSpec::new(40.0).with_cutout(true),
        MountSpec::new(44.0),
        MountSpec::new(50.0),
        MountSpec::new(54.0),
        MountSpec::new(60.0),
        MountSpec::new(60.0).with_slot_count(2),
    ]
}

const fn default_tolerance() -> Real {
    DEFAULT_TOLERANCE
}

/// A batch of mounts sharing one tolerance.
///
/// ```toml
/// tolerance = 0.3
///
/// [[mount]]
/// outer_diameter = 30.0
/// y_offset = -1.0
/// has_cutout = true
///
/// [[mount]]
/// outer_diameter = 60.0
/// slot_count = 2
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    #[serde(default = "default_tolerance")]
    pub tolerance: Real,
    #[serde(default)]
    pub resolution: Option<Resolution>,
    #[serde(rename = "mount", default)]
    pub mounts: Vec<MountSpec>,
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog {
            tolerance: DEFAULT_TOLERANCE,
            resolution: None,
            mounts: default_catalog(),
        }
    }
}

impl Catalog {
    pub fn from_toml_str(text: &str) -> Result<Self, CatalogError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Build settings for this batch; a catalog without a `[resolution]`
    /// table uses the default tessellation.
    pub fn config(&self) -> BuildConfig {
        BuildConfig::new(self.tolerance).with_resolution(self.resolution.unwrap_or_default())
    }

    /// Keeps only the mounts whose output name is listed.
    pub fn retain_names(&mut self, names: &[String]) {
        self.mounts.retain(|spec| names.contains(&spec.name()));
    }
}

/// Outcome of building one catalog entry.
#[derive(Debug)]
pub struct BuildReport<S> {
    pub spec: MountSpec,
    pub result: Result<NamedModel<S>, MountError>,
}

impl<S> BuildReport<S> {
    pub fn name(&self) -> String {
        self.spec.name()
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

fn build_one<E>(builder: &MountBuilder<'_, E>, spec: &MountSpec) -> BuildReport<E::Solid>
where
    E: GeometryEngine,
{
    let started = Instant::now();
    let result = builder.assemble(spec);
    match &result {
        Ok(model) => tracing::info!(
            name = %model.name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "built mount"
        ),
        Err(err) => tracing::error!(name = %spec.name(), error = %err, "mount failed"),
    }
    BuildReport { spec: *spec, result }
}

/// Builds every mount on its own; one failing mount does not stop the others.
/// Reports come back in catalog order.
#[cfg(not(feature = "parallel"))]
pub fn build_all<E>(builder: &MountBuilder<'_, E>, specs: &[MountSpec]) -> Vec<BuildReport<E::Solid>>
where
    E: GeometryEngine + Sync,
    E::Solid: Send,
{
    specs.iter().map(|spec| build_one(builder, spec)).collect()
}

/// Builds every mount on its own rayon task; one failing mount does not stop
/// the others. Reports come back in catalog order.
#[cfg(feature = "parallel")]
pub fn build_all<E>(builder: &MountBuilder<'_, E>, specs: &[MountSpec]) -> Vec<BuildReport<E::Solid>>
where
    E: GeometryEngine + Sync,
    E::Solid: Send,
{
    use rayon::prelude::*;

    specs.par_iter().map(|spec| build_one(builder, spec)).collect()
}

/// One model per output name, in order of first appearance. When several
/// specs share a name the last one built wins.
pub fn collect_models<S>(models: impl IntoIterator<Item = NamedModel<S>>) -> Vec<NamedModel<S>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<NamedModel<S>> = Vec::new();
    for model in models {
        match index.get(&model.name) {
            Some(&i) => {
                tracing::warn!(name = %model.name, "name collision, keeping the later mount");
                out[i] = model;
            },
            None => {
                index.insert(model.name.clone(), out.len());
                out.push(model);
            },
        }
    }
    out
}
