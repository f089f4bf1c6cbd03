use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Instant,
};

use crate::{
    engine::{
        compose::{Compositor, InkColors},
        font::FontAsset,
        preview::{PreviewSize, StillImage, generate_preview},
        text::{CaptionRenderer, GlyphCaptionRenderer},
    },
    foundation::{
        config::MemeConfig,
        error::{MemeError, MemeResult},
    },
    identity::digest::{ArtifactId, Identity},
    orchestrator::{
        locks::IdentityLocks,
        request::{MemeRequest, PreviewRequest},
    },
    storage::{
        fs::FsGateway,
        gateway::{Location, Lookup, StorageGateway},
    },
};

/// Reference to a stored artifact, the same for cache hits and fresh generations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactRef {
    id: ArtifactId,
    location: Location,
    url: String,
}

impl ArtifactRef {
    /// Content address.
    pub fn id(&self) -> &ArtifactId {
        &self.id
    }

    /// Where the gateway keeps the bytes.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Redirect target, `/{url_prefix}/{id}.gif`.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Cache counters since the service was built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ServiceStats {
    /// Requests answered from an existing artifact.
    pub hits: u64,
    /// Requests that found no artifact.
    pub misses: u64,
    /// Artifacts generated and persisted.
    pub generated: u64,
}

/// Serves meme requests: resolve the source, check the cache, generate and persist on a miss.
pub struct MemeService {
    gateway: Arc<dyn StorageGateway>,
    identity: Identity,
    compositor: Compositor,
    url_prefix: String,
    max_preview_px: u32,
    locks: Option<IdentityLocks>,
    hits: AtomicU64,
    misses: AtomicU64,
    generated: AtomicU64,
}

impl std::fmt::Debug for MemeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemeService")
            .field("compositor", &self.compositor)
            .field("url_prefix", &self.url_prefix)
            .field("max_preview_px", &self.max_preview_px)
            .field("single_flight", &self.locks.is_some())
            .finish_non_exhaustive()
    }
}

impl MemeService {
    /// Filesystem-backed service with the configured caption font.
    pub fn from_config(config: &MemeConfig) -> MemeResult<Self> {
        config.validate()?;
        let gateway = Arc::new(FsGateway::new(&config.source_dir, &config.artifact_dir));
        let font = FontAsset::resolve(&config.font, &config.font_dirs)?;
        tracing::debug!(font = font.label(), "caption font loaded");
        let renderer = Arc::new(GlyphCaptionRenderer::new(font, config.caption.clone())?);
        Self::with_parts(config, gateway, renderer)
    }

    /// Service over an arbitrary gateway and caption renderer.
    pub fn with_parts(
        config: &MemeConfig,
        gateway: Arc<dyn StorageGateway>,
        renderer: Arc<dyn CaptionRenderer>,
    ) -> MemeResult<Self> {
        config.validate()?;
        let compositor = Compositor::new(
            renderer,
            InkColors::from_style(&config.caption),
            config.threads,
        )?;
        Ok(Self {
            gateway,
            identity: Identity::new(),
            compositor,
            url_prefix: config.url_prefix.trim_matches('/').to_string(),
            max_preview_px: config.max_preview_px,
            locks: config.single_flight.then(IdentityLocks::new),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            generated: AtomicU64::new(0),
        })
    }

    /// Return the artifact for `request`, generating and persisting it on a cache miss.
    #[tracing::instrument(skip(self, request), fields(source = request.source()))]
    pub fn meme(&self, request: &MemeRequest) -> MemeResult<ArtifactRef> {
        let result = self.meme_inner(request);
        if let Err(err) = &result {
            tracing::warn!(error = %err, status = err.status_code(), "meme request failed");
        }
        result
    }

    fn meme_inner(&self, request: &MemeRequest) -> MemeResult<ArtifactRef> {
        let source = self.resolve_source(request.source())?;
        let id = self.identity.for_params(request.params());
        match &self.locks {
            Some(locks) => locks.with_lock(&id, || self.fetch_or_generate(request, &id, &source)),
            None => self.fetch_or_generate(request, &id, &source),
        }
    }

    fn fetch_or_generate(
        &self,
        request: &MemeRequest,
        id: &ArtifactId,
        source: &Location,
    ) -> MemeResult<ArtifactRef> {
        let target = match self.gateway.find_artifact(id)? {
            Lookup::Found(location) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(%id, "cache hit");
                return Ok(self.artifact_ref(id.clone(), location));
            }
            Lookup::Missing(location) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(%id, "cache miss");
                location
            }
        };

        let started = Instant::now();
        let bytes = self.gateway.read(source)?;
        let animation = self
            .compositor
            .generate_meme(&bytes, request.captions())
            .map_err(generation_error)?;
        let encoded = animation.encode().map_err(generation_error)?;

        self.gateway
            .save(&encoded, &target)
            .map_err(|err| match err {
                MemeError::PersistFailed(_) => err,
                other => MemeError::persist_failed(other.to_string()),
            })?;
        self.generated.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            %id,
            frames = animation.frame_count(),
            bytes = encoded.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "meme generated"
        );

        Ok(self.artifact_ref(id.clone(), target))
    }

    /// Render a still preview of a source's first frame. Never cached.
    #[tracing::instrument(skip(self, request), fields(source = request.source()))]
    pub fn preview(&self, request: &PreviewRequest) -> MemeResult<StillImage> {
        let size = PreviewSize::new(request.width(), request.height(), self.max_preview_px)?;
        let source = self.resolve_source(request.source())?;
        let bytes = self.gateway.read(&source)?;
        generate_preview(
            &bytes,
            size,
            request.captions(),
            self.compositor.renderer().as_ref(),
            self.compositor.inks(),
        )
    }

    /// Names of available source GIFs, sorted.
    pub fn list_sources(&self) -> MemeResult<Vec<String>> {
        self.gateway.list_sources()
    }

    /// Location of source `name`, or `SourceNotFound`.
    pub fn resolve_source(&self, name: &str) -> MemeResult<Location> {
        match self.gateway.find_source(name)? {
            Lookup::Found(location) => Ok(location),
            Lookup::Missing(_) => Err(MemeError::source_not_found(name)),
        }
    }

    /// Redirect URL for `id`.
    pub fn artifact_url(&self, id: &ArtifactId) -> String {
        format!("/{}/{}", self.url_prefix, id.file_name())
    }

    /// Cache counters.
    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            generated: self.generated.load(Ordering::Relaxed),
        }
    }

    fn artifact_ref(&self, id: ArtifactId, location: Location) -> ArtifactRef {
        let url = self.artifact_url(&id);
        ArtifactRef { id, location, url }
    }
}

fn generation_error(err: MemeError) -> MemeError {
    match err {
        MemeError::Decode(_) | MemeError::GenerationFailed(_) => err,
        other => MemeError::generation_failed(other),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/orchestrator/service.rs"]
mod tests;
