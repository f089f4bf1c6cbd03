use std::{
    collections::{BTreeMap, HashMap},
    path::PathBuf,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use crate::{
    foundation::error::{MemeError, MemeResult},
    identity::digest::ArtifactId,
    storage::gateway::{Location, Lookup, StorageGateway, has_gif_extension, validate_source_name},
};

const SOURCE_ROOT: &str = "memory/sources";
const ARTIFACT_ROOT: &str = "memory/artifacts";

/// In-memory gateway for tests and embedding.
///
/// Counts every gateway call and every save, and can be told to fail saves.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    sources: Mutex<BTreeMap<String, Vec<u8>>>,
    blobs: Mutex<HashMap<PathBuf, Vec<u8>>>,
    calls: AtomicUsize,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryGateway {
    /// Empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source animation.
    pub fn insert_source(&self, name: impl Into<String>, bytes: Vec<u8>) {
        let mut sources = self.sources.lock().unwrap_or_else(|e| e.into_inner());
        sources.insert(name.into(), bytes);
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of gateway operations performed so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Number of stored artifacts.
    pub fn artifact_count(&self) -> usize {
        let blobs = self.blobs.lock().unwrap_or_else(|e| e.into_inner());
        blobs
            .keys()
            .filter(|p| p.starts_with(ARTIFACT_ROOT))
            .count()
    }

    /// Bytes stored at `location`, if any.
    pub fn stored(&self, location: &Location) -> Option<Vec<u8>> {
        let blobs = self.blobs.lock().unwrap_or_else(|e| e.into_inner());
        blobs.get(location.as_path()).cloned()
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl StorageGateway for MemoryGateway {
    fn find_source(&self, name: &str) -> MemeResult<Lookup> {
        self.touch();
        let name = validate_source_name(name)?;
        let location = Location::new(PathBuf::from(SOURCE_ROOT).join(name));
        let sources = self.sources.lock().unwrap_or_else(|e| e.into_inner());
        if sources.contains_key(name) {
            Ok(Lookup::Found(location))
        } else {
            Ok(Lookup::Missing(location))
        }
    }

    fn find_artifact(&self, id: &ArtifactId) -> MemeResult<Lookup> {
        self.touch();
        let location = Location::new(PathBuf::from(ARTIFACT_ROOT).join(id.file_name()));
        let blobs = self.blobs.lock().unwrap_or_else(|e| e.into_inner());
        if blobs.contains_key(location.as_path()) {
            Ok(Lookup::Found(location))
        } else {
            Ok(Lookup::Missing(location))
        }
    }

    fn list_sources(&self) -> MemeResult<Vec<String>> {
        self.touch();
        let sources = self.sources.lock().unwrap_or_else(|e| e.into_inner());
        Ok(sources
            .keys()
            .filter(|name| has_gif_extension(name))
            .cloned()
            .collect())
    }

    fn read(&self, location: &Location) -> MemeResult<Vec<u8>> {
        self.touch();
        if let Ok(rest) = location.as_path().strip_prefix(SOURCE_ROOT) {
            let sources = self.sources.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(bytes) = rest.to_str().and_then(|name| sources.get(name)) {
                return Ok(bytes.clone());
            }
        }
        self.stored(location).ok_or_else(|| {
            MemeError::storage(format!(
                "nothing stored at '{}'",
                location.as_path().display()
            ))
        })
    }

    fn save(&self, bytes: &[u8], location: &Location) -> MemeResult<()> {
        self.touch();
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(MemeError::persist_failed(format!(
                "save to '{}' rejected",
                location.as_path().display()
            )));
        }
        let mut blobs = self.blobs.lock().unwrap_or_else(|e| e.into_inner());
        blobs.insert(location.as_path().to_path_buf(), bytes.to_vec());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
