//! Captioned animated GIFs generated on demand and cached by content address.
//!
//! A [`MemeRequest`] is resolved against a [`StorageGateway`], hashed into an [`ArtifactId`],
//! and either answered from the artifact cache or generated by the [`Compositor`], which burns
//! caption ink into every frame while keeping palettes and timing intact.

#![forbid(unsafe_code)]

pub mod engine;
pub mod foundation;
pub mod identity;
pub mod orchestrator;
pub mod storage;

pub use engine::{
    animation::{Animation, AnimationFrame, Disposal, LoopCount, decode_animation},
    compose::{ComposeStats, Compositor, InkColors},
    font::FontAsset,
    overlay::{CaptionOverlay, Ink},
    preview::{PreviewSize, StillImage, generate_preview},
    text::{CaptionRenderer, CaptionStyle, Captions, GlyphCaptionRenderer},
};
pub use foundation::{
    config::MemeConfig,
    error::{MemeError, MemeResult},
};
pub use identity::{
    digest::{ArtifactId, Identity, sha256_hex},
    query::QueryParams,
};
pub use orchestrator::{
    locks::IdentityLocks,
    request::{MemeRequest, PreviewRequest},
    service::{ArtifactRef, MemeService, ServiceStats},
};
pub use storage::{
    fs::FsGateway,
    gateway::{Location, Lookup, StorageGateway},
    memory::MemoryGateway,
};
