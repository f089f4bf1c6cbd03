use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    engine::text::CaptionStyle,
    foundation::error::{MemeError, MemeResult},
};

/// Environment variable overriding [`MemeConfig::source_dir`].
pub const ENV_SOURCE_DIR: &str = "MEMEOID_SOURCE_DIR";
/// Environment variable overriding [`MemeConfig::artifact_dir`].
pub const ENV_ARTIFACT_DIR: &str = "MEMEOID_ARTIFACT_DIR";
/// Environment variable overriding [`MemeConfig::font`].
pub const ENV_FONT: &str = "MEMEOID_FONT";
/// Environment variable overriding [`MemeConfig::threads`].
pub const ENV_THREADS: &str = "MEMEOID_THREADS";
/// Environment variable overriding [`MemeConfig::single_flight`].
pub const ENV_SINGLE_FLIGHT: &str = "MEMEOID_SINGLE_FLIGHT";

/// Service configuration.
///
/// Loaded from JSON (every field optional), then overridden by `MEMEOID_*` environment variables
/// and finally by command line flags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemeConfig {
    /// Directory holding the source GIFs.
    pub source_dir: PathBuf,
    /// Directory receiving generated artifacts.
    pub artifact_dir: PathBuf,
    /// URL path segment artifacts are served under (`/{url_prefix}/{id}.gif`).
    pub url_prefix: String,
    /// Font family name or path to a font file.
    pub font: String,
    /// Extra directories scanned for font files.
    pub font_dirs: Vec<PathBuf>,
    /// Caption sizing and ink colors.
    pub caption: CaptionStyle,
    /// Worker threads for frame compositing; `None` uses rayon's default.
    pub threads: Option<usize>,
    /// Serialize generation per identity so concurrent misses generate once.
    pub single_flight: bool,
    /// Largest accepted preview edge in pixels.
    pub max_preview_px: u32,
}

impl Default for MemeConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("./fixtures"),
            artifact_dir: PathBuf::from("./memes"),
            url_prefix: "meme".to_string(),
            font: "Impact".to_string(),
            font_dirs: Vec::new(),
            caption: CaptionStyle::default(),
            threads: None,
            single_flight: false,
            max_preview_px: 2048,
        }
    }
}

impl MemeConfig {
    /// Parse a JSON document.
    pub fn from_json_str(json: &str) -> MemeResult<Self> {
        serde_json::from_str(json).map_err(|e| MemeError::config(format!("invalid config: {e}")))
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: &Path) -> MemeResult<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&raw)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> MemeResult<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides using `lookup` as the environment.
    pub fn apply_env_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> MemeResult<()> {
        if let Some(v) = lookup(ENV_SOURCE_DIR) {
            self.source_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_ARTIFACT_DIR) {
            self.artifact_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_FONT) {
            self.font = v;
        }
        if let Some(v) = lookup(ENV_THREADS) {
            let n = v.trim().parse::<usize>().map_err(|_| {
                MemeError::config(format!("{ENV_THREADS} must be an integer, got '{v}'"))
            })?;
            self.threads = Some(n);
        }
        if let Some(v) = lookup(ENV_SINGLE_FLIGHT) {
            self.single_flight = match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(MemeError::config(format!(
                        "{ENV_SINGLE_FLIGHT} must be a boolean, got '{v}'"
                    )));
                }
            };
        }
        Ok(())
    }

    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> MemeResult<()> {
        if self.url_prefix.trim_matches('/').is_empty() {
            return Err(MemeError::config("url_prefix must be non-empty"));
        }
        if self.font.trim().is_empty() {
            return Err(MemeError::config("font must be non-empty"));
        }
        if self.threads == Some(0) {
            return Err(MemeError::config("threads must be >= 1 when set"));
        }
        if self.max_preview_px == 0 {
            return Err(MemeError::config("max_preview_px must be >= 1"));
        }
        self.caption.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
