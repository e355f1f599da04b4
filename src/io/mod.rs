//! Writing finished models to disk.

use std::path::{Path, PathBuf};

pub mod stl;

pub use stl::{to_stl_ascii, to_stl_binary};

/// Export errors.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("std::io::Error: {0}")]
    StdIo(#[from] std::io::Error),
    /// Nothing to write, e.g. a model that booleans reduced to nothing
    #[error("model `{0}` has no geometry to export")]
    EmptyGeometry(String),
    #[error("The path is malformed: {0}")]
    MalformedPath(String),
}

/// A model that can be written in some file format.
pub trait ModelFile {
    /// File extension, without the dot.
    fn extension(&self) -> &'static str;

    /// Serialized file contents for a model named `name`.
    fn to_bytes(&self, name: &str) -> Result<Vec<u8>, IoError>;

    /// Writes `<dir>/<name>.<extension>`, replacing any earlier file of the
    /// same name, and returns the path written.
    fn write_to(&self, dir: &Path, name: &str) -> Result<PathBuf, IoError> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(IoError::MalformedPath(format!(
                "`{name}` is not a usable file name"
            )));
        }
        let bytes = self.to_bytes(name)?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{name}.{}", self.extension()));
        std::fs::write(&path, bytes)?;
        tracing::debug!(path = %path.display(), "wrote model");
        Ok(path)
    }
}
