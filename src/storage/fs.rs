use std::{
    io::Write as _,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{
    foundation::error::{MemeError, MemeResult},
    identity::digest::ArtifactId,
    storage::gateway::{Location, Lookup, StorageGateway, has_gif_extension, validate_source_name},
};

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Filesystem gateway: sources in one directory, artifacts in another.
#[derive(Clone, Debug)]
pub struct FsGateway {
    source_dir: PathBuf,
    artifact_dir: PathBuf,
}

impl FsGateway {
    /// Gateway reading sources from `source_dir` and writing artifacts to `artifact_dir`.
    pub fn new(source_dir: impl Into<PathBuf>, artifact_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            artifact_dir: artifact_dir.into(),
        }
    }

    fn find(path: PathBuf) -> MemeResult<Lookup> {
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Ok(Lookup::Found(Location::new(path))),
            Ok(_) => Ok(Lookup::Missing(Location::new(path))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Lookup::Missing(Location::new(path)))
            }
            Err(e) => Err(MemeError::storage(format!(
                "stat '{}': {e}",
                path.display()
            ))),
        }
    }
}

impl StorageGateway for FsGateway {
    fn find_source(&self, name: &str) -> MemeResult<Lookup> {
        let name = validate_source_name(name)?;
        Self::find(self.source_dir.join(name))
    }

    fn find_artifact(&self, id: &ArtifactId) -> MemeResult<Lookup> {
        Self::find(self.artifact_dir.join(id.file_name()))
    }

    fn list_sources(&self) -> MemeResult<Vec<String>> {
        let rd = std::fs::read_dir(&self.source_dir).map_err(|e| {
            MemeError::storage(format!(
                "list sources in '{}': {e}",
                self.source_dir.display()
            ))
        })?;

        let mut names = Vec::new();
        for entry in rd {
            let entry = entry.map_err(|e| MemeError::storage(format!("read dir entry: {e}")))?;
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if !file_type.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if has_gif_extension(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn read(&self, location: &Location) -> MemeResult<Vec<u8>> {
        std::fs::read(location.as_path()).map_err(|e| {
            MemeError::storage(format!("read '{}': {e}", location.as_path().display()))
        })
    }

    fn save(&self, bytes: &[u8], location: &Location) -> MemeResult<()> {
        write_atomic(location.as_path(), bytes)
            .map_err(|e| MemeError::persist_failed(format!("{e:#}")))
    }
}

/// Write `bytes` to a temp sibling of `path`, then rename it into place.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    use anyhow::Context as _;

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)
        .with_context(|| format!("create output directory '{}'", parent.display()))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("'{}' has no file name", path.display()))?;
    let tmp_path = parent.join(format!(
        ".{file_name}.{}.{}.tmp",
        std::process::id(),
        TEMP_SEQ.fetch_add(1, Ordering::Relaxed)
    ));

    let mut guard = TempFileGuard(Some(tmp_path.clone()));
    let mut file = std::fs::File::create(&tmp_path)
        .with_context(|| format!("create '{}'", tmp_path.display()))?;
    file.write_all(bytes)
        .with_context(|| format!("write '{}'", tmp_path.display()))?;
    file.sync_all()
        .with_context(|| format!("sync '{}'", tmp_path.display()))?;
    drop(file);

    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("rename into '{}'", path.display()))?;
    guard.0 = None;
    Ok(())
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storage/fs.rs"]
mod tests;
