/// Caption ink at one pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ink {
    /// Glyph body.
    Fill,
    /// Stroke around the glyph body.
    Outline,
}

const NONE: u8 = 0;
const FILL: u8 = 1;
const OUTLINE: u8 = 2;

/// Screen-sized mask of caption ink, shared read-only by all frame workers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionOverlay {
    width: u16,
    height: u16,
    cells: Vec<u8>,
    rows: Option<(u16, u16)>,
}

impl CaptionOverlay {
    /// Overlay without ink.
    pub fn empty(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![NONE; usize::from(width) * usize::from(height)],
            rows: None,
        }
    }

    /// Build from the RGBA8 rasters of the two caption passes.
    ///
    /// A pixel is ink where a pass covers at least half of it; fill coverage wins over outline.
    /// Paint colors are ignored, only alpha is read.
    pub fn from_pass_coverage(width: u16, height: u16, fill: &[u8], outline: &[u8]) -> Self {
        const COVERED: u8 = 128;
        let mut out = Self::empty(width, height);
        let pixels = fill.chunks_exact(4).zip(outline.chunks_exact(4));
        for (i, (f, o)) in pixels.enumerate().take(out.cells.len()) {
            let ink = if f[3] >= COVERED {
                Ink::Fill
            } else if o[3] >= COVERED {
                Ink::Outline
            } else {
                continue;
            };
            let x = (i % usize::from(width)) as u16;
            let y = (i / usize::from(width)) as u16;
            out.set(x, y, ink);
        }
        out
    }

    /// Overlay width.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Overlay height.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Ink at `(x, y)`, `None` outside the overlay or where nothing was drawn.
    pub fn get(&self, x: u16, y: u16) -> Option<Ink> {
        if x >= self.width || y >= self.height {
            return None;
        }
        match self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)] {
            FILL => Some(Ink::Fill),
            OUTLINE => Some(Ink::Outline),
            _ => None,
        }
    }

    /// Paint `ink` at `(x, y)`; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u16, y: u16, ink: Ink) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = usize::from(y) * usize::from(self.width) + usize::from(x);
        self.cells[idx] = match ink {
            Ink::Fill => FILL,
            Ink::Outline => OUTLINE,
        };
        self.rows = Some(match self.rows {
            Some((lo, hi)) => (lo.min(y), hi.max(y)),
            None => (y, y),
        });
    }

    /// Whether any ink was drawn.
    pub fn is_empty(&self) -> bool {
        self.rows.is_none()
    }

    /// Inclusive range of rows holding ink.
    pub fn ink_rows(&self) -> Option<(u16, u16)> {
        self.rows
    }

    /// Whether the frame rectangle at `(left, top)` of size `width x height` overlaps ink rows.
    pub fn touches(&self, left: u16, top: u16, width: u16, height: u16) -> bool {
        let Some((lo, hi)) = self.rows else {
            return false;
        };
        if width == 0 || height == 0 || left >= self.width {
            return false;
        }
        let top = u32::from(top);
        let bottom = top + u32::from(height) - 1;
        top <= u32::from(hi) && bottom >= u32::from(lo)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/overlay.rs"]
mod tests;
