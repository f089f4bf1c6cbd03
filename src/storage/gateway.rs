use std::path::{Path, PathBuf};

use crate::{
    foundation::error::{MemeError, MemeResult},
    identity::digest::ArtifactId,
};

/// Opaque storage token handed out by a gateway and handed back to it.
///
/// The filesystem adapter uses real paths; other adapters may use any path-shaped key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location(PathBuf);

impl Location {
    /// Wrap a gateway-specific path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Borrow the underlying path.
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

/// Outcome of a lookup. `Missing` is an expected outcome, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// The item exists at this location.
    Found(Location),
    /// Nothing exists yet; this is where it would live.
    Missing(Location),
}

impl Lookup {
    /// Location regardless of presence.
    pub fn location(&self) -> &Location {
        match self {
            Self::Found(l) | Self::Missing(l) => l,
        }
    }

    /// Whether the item exists.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Storage capability consumed by the orchestrator.
///
/// Implementations must make [`StorageGateway::save`] atomic: a concurrent or later
/// [`StorageGateway::find_artifact`] sees either no artifact or the complete one.
pub trait StorageGateway: Send + Sync {
    /// Locate a source animation by name.
    fn find_source(&self, name: &str) -> MemeResult<Lookup>;

    /// Locate a generated artifact by identity.
    fn find_artifact(&self, id: &ArtifactId) -> MemeResult<Lookup>;

    /// Names of all available source animations, sorted.
    fn list_sources(&self) -> MemeResult<Vec<String>>;

    /// Read the bytes stored at `location`.
    fn read(&self, location: &Location) -> MemeResult<Vec<u8>>;

    /// Persist encoded artifact bytes at `location`.
    fn save(&self, bytes: &[u8], location: &Location) -> MemeResult<()>;
}

/// Validate a source name: a single non-empty path segment without traversal.
pub fn validate_source_name(name: &str) -> MemeResult<&str> {
    if name.is_empty() {
        return Err(MemeError::invalid_request("source name must be non-empty"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(MemeError::invalid_request(format!(
            "source name '{name}' must not contain path separators"
        )));
    }
    if name == "." || name == ".." {
        return Err(MemeError::invalid_request(format!(
            "source name '{name}' is not a file name"
        )));
    }
    if name.contains('\0') {
        return Err(MemeError::invalid_request("source name contains NUL"));
    }
    Ok(name)
}

/// Whether `name` carries a `.gif` extension, ignoring case.
pub fn has_gif_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gif"))
}

#[cfg(test)]
#[path = "../../tests/unit/storage/gateway.rs"]
mod tests;
