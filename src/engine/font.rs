use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::foundation::error::{MemeError, MemeResult};

/// Caption font bytes, loaded once and shared by every request.
#[derive(Clone)]
pub struct FontAsset {
    bytes: Arc<Vec<u8>>,
    index: u32,
    label: String,
}

impl std::fmt::Debug for FontAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontAsset")
            .field("label", &self.label)
            .field("index", &self.index)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

impl FontAsset {
    /// Wrap raw font file bytes.
    pub fn from_bytes(bytes: Vec<u8>, label: impl Into<String>) -> MemeResult<Self> {
        if bytes.is_empty() {
            return Err(MemeError::font("font data is empty"));
        }
        Ok(Self {
            bytes: Arc::new(bytes),
            index: 0,
            label: label.into(),
        })
    }

    /// Resolve `font` as a font file path, or else as a family name among system fonts and
    /// fonts found in `font_dirs`. Unknown families fall back to a sans-serif face.
    pub fn resolve(font: &str, font_dirs: &[PathBuf]) -> MemeResult<Self> {
        let as_path = Path::new(font);
        if as_path.is_file() {
            let bytes = std::fs::read(as_path).map_err(|e| {
                MemeError::font(format!("read font file '{}': {e}", as_path.display()))
            })?;
            return Self::from_bytes(bytes, font);
        }

        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        for dir in font_dirs {
            load_fonts_from_dir(&mut db, dir);
        }

        let families = [
            usvg::fontdb::Family::Name(font),
            usvg::fontdb::Family::SansSerif,
        ];
        let query = usvg::fontdb::Query {
            families: &families,
            weight: usvg::fontdb::Weight::NORMAL,
            stretch: usvg::fontdb::Stretch::Normal,
            style: usvg::fontdb::Style::Normal,
        };
        let id = db
            .query(&query)
            .or_else(|| db.faces().next().map(|f| f.id))
            .ok_or_else(|| MemeError::font(format!("no font matches '{font}'")))?;

        let label = db
            .face(id)
            .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| font.to_string());
        let (bytes, index) = db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| MemeError::font(format!("font data for '{font}' unavailable")))?;

        if label != font {
            tracing::warn!(requested = font, resolved = %label, "caption font fell back");
        }
        Ok(Self {
            bytes: Arc::new(bytes),
            index,
            label,
        })
    }

    /// Raw font file bytes.
    pub fn bytes(&self) -> &Arc<Vec<u8>> {
        &self.bytes
    }

    /// Face index within a collection file.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Family name or path the font was resolved from.
    pub fn label(&self) -> &str {
        &self.label
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        let _ = db.load_font_file(&path);
    }
}
