use crate::{
    engine::{
        animation::decode_first_frame,
        compose::InkColors,
        palette::color_at,
        text::{CaptionRenderer, Captions},
    },
    foundation::error::{MemeError, MemeResult},
};

/// Content type of preview bytes.
pub const PREVIEW_CONTENT_TYPE: &str = "image/jpeg";

const JPEG_QUALITY: u8 = 85;

/// Target size of a preview; only constructible with positive dimensions up to a maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PreviewSize {
    width: u32,
    height: u32,
}

impl PreviewSize {
    /// Validate `width x height` against `max` on either side.
    pub fn new(width: u32, height: u32, max: u32) -> MemeResult<Self> {
        if width == 0 || height == 0 {
            return Err(MemeError::invalid_request(format!(
                "preview size must be positive, got {width}x{height}"
            )));
        }
        if width > max || height > max {
            return Err(MemeError::invalid_request(format!(
                "preview size {width}x{height} exceeds the {max}px limit"
            )));
        }
        Ok(Self { width, height })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Encoded still image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StillImage {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`.
    pub content_type: &'static str,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Render the first frame of `source` as a JPEG of exactly `size`, burning in `captions`
/// when any are given.
#[tracing::instrument(skip(source, captions, renderer), fields(source_bytes = source.len()))]
pub fn generate_preview(
    source: &[u8],
    size: PreviewSize,
    captions: &Captions,
    renderer: &dyn CaptionRenderer,
    inks: InkColors,
) -> MemeResult<StillImage> {
    let animation = decode_first_frame(source)?;
    let frame = animation
        .frames
        .first()
        .ok_or_else(|| MemeError::decode("gif has no frames"))?;
    let palette = frame
        .effective_palette(animation.global_palette.as_deref())
        .ok_or_else(|| MemeError::decode("first frame has no color table"))?;

    let backdrop = animation
        .background
        .and_then(|i| animation.global_palette.as_deref().and_then(|p| color_at(p, i)))
        .unwrap_or([0, 0, 0]);
    let mut canvas = image::RgbImage::from_pixel(
        u32::from(animation.width),
        u32::from(animation.height),
        image::Rgb(backdrop),
    );

    let fw = usize::from(frame.width);
    for (i, &idx) in frame.indices.iter().enumerate() {
        if Some(idx) == frame.transparent {
            continue;
        }
        let Some(rgb) = color_at(palette, idx) else {
            continue;
        };
        let x = u32::from(frame.left) + (i % fw) as u32;
        let y = u32::from(frame.top) + (i / fw) as u32;
        if x < canvas.width() && y < canvas.height() {
            canvas.put_pixel(x, y, image::Rgb(rgb));
        }
    }

    if !captions.is_empty() {
        let overlay = renderer.render(captions, animation.width, animation.height)?;
        if let Some((lo, hi)) = overlay.ink_rows() {
            for y in lo..=hi {
                for x in 0..overlay.width() {
                    let Some(ink) = overlay.get(x, y) else {
                        continue;
                    };
                    if let Some(px) = canvas.get_pixel_mut_checked(u32::from(x), u32::from(y)) {
                        *px = image::Rgb(inks.color(ink));
                    }
                }
            }
        }
    }

    let resized = image::imageops::resize(
        &canvas,
        size.width(),
        size.height(),
        image::imageops::FilterType::Triangle,
    );

    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
        .encode_image(&resized)
        .map_err(|e| MemeError::encode(format!("encode jpeg preview: {e}")))?;

    Ok(StillImage {
        bytes,
        content_type: PREVIEW_CONTENT_TYPE,
        width: size.width(),
        height: size.height(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/engine/preview.rs"]
mod tests;
