use std::{borrow::Cow, io::Cursor};

use crate::foundation::error::{MemeError, MemeResult};

/// What a viewer does with a frame's area before drawing the next one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Disposal {
    /// Unspecified; viewers usually keep the frame.
    #[default]
    Any,
    /// Leave the frame in place.
    Keep,
    /// Clear the frame's area to the background.
    Background,
    /// Restore what was there before the frame.
    Previous,
}

impl From<gif::DisposalMethod> for Disposal {
    fn from(d: gif::DisposalMethod) -> Self {
        match d {
            gif::DisposalMethod::Any => Self::Any,
            gif::DisposalMethod::Keep => Self::Keep,
            gif::DisposalMethod::Background => Self::Background,
            gif::DisposalMethod::Previous => Self::Previous,
        }
    }
}

impl From<Disposal> for gif::DisposalMethod {
    fn from(d: Disposal) -> Self {
        match d {
            Disposal::Any => Self::Any,
            Disposal::Keep => Self::Keep,
            Disposal::Background => Self::Background,
            Disposal::Previous => Self::Previous,
        }
    }
}

/// Loop behaviour of an animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopCount {
    /// Loop forever.
    #[default]
    Infinite,
    /// Play `n` additional times.
    Finite(u16),
}

/// One palette-indexed frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationFrame {
    /// Offset of the frame rectangle on the logical screen.
    pub left: u16,
    /// Offset of the frame rectangle on the logical screen.
    pub top: u16,
    /// Frame rectangle width.
    pub width: u16,
    /// Frame rectangle height.
    pub height: u16,
    /// Display time in hundredths of a second.
    pub delay: u16,
    /// Disposal applied after the frame is shown.
    pub dispose: Disposal,
    /// Palette index treated as transparent.
    pub transparent: Option<u8>,
    /// Local color table as packed RGB triples; `None` means the global palette applies.
    pub palette: Option<Vec<u8>>,
    /// Row-major palette indices, `width * height` long, never interlaced.
    pub indices: Vec<u8>,
}

impl AnimationFrame {
    /// Palette this frame is drawn with: its own, else the global one.
    pub fn effective_palette<'a>(&'a self, global: Option<&'a [u8]>) -> Option<&'a [u8]> {
        self.palette.as_deref().or(global)
    }

    fn from_gif(frame: &gif::Frame<'_>) -> MemeResult<Self> {
        let expected = usize::from(frame.width) * usize::from(frame.height);
        if frame.buffer.len() != expected {
            return Err(MemeError::decode(format!(
                "frame buffer holds {} indices, expected {expected}",
                frame.buffer.len()
            )));
        }
        Ok(Self {
            left: frame.left,
            top: frame.top,
            width: frame.width,
            height: frame.height,
            delay: frame.delay,
            dispose: frame.dispose.into(),
            transparent: frame.transparent,
            palette: frame.palette.clone(),
            indices: frame.buffer.to_vec(),
        })
    }

    fn to_gif(&self) -> gif::Frame<'_> {
        gif::Frame {
            delay: self.delay,
            dispose: self.dispose.into(),
            transparent: self.transparent,
            top: self.top,
            left: self.left,
            width: self.width,
            height: self.height,
            interlaced: false,
            palette: self.palette.clone(),
            buffer: Cow::Borrowed(self.indices.as_slice()),
            ..gif::Frame::default()
        }
    }
}

/// Decoded palette-based animation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Animation {
    /// Logical screen width.
    pub width: u16,
    /// Logical screen height.
    pub height: u16,
    /// Global color table as packed RGB triples.
    pub global_palette: Option<Vec<u8>>,
    /// Background color index into the global palette.
    pub background: Option<u8>,
    /// Loop behaviour.
    pub loop_count: LoopCount,
    /// Frames in display order.
    pub frames: Vec<AnimationFrame>,
}

impl Animation {
    /// Number of frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Per-frame delays in display order.
    pub fn delays(&self) -> Vec<u16> {
        self.frames.iter().map(|f| f.delay).collect()
    }

    /// Encode as GIF bytes.
    pub fn encode(&self) -> MemeResult<Vec<u8>> {
        let mut out = Vec::new();
        {
            let global = self.global_palette.as_deref().unwrap_or(&[]);
            let mut encoder = gif::Encoder::new(&mut out, self.width, self.height, global)
                .map_err(|e| MemeError::encode(format!("write gif header: {e}")))?;
            // a zero count means "play once", which is the absence of the loop extension
            let repeat = match self.loop_count {
                LoopCount::Infinite => Some(gif::Repeat::Infinite),
                LoopCount::Finite(0) => None,
                LoopCount::Finite(n) => Some(gif::Repeat::Finite(n)),
            };
            if let Some(repeat) = repeat {
                encoder
                    .set_repeat(repeat)
                    .map_err(|e| MemeError::encode(format!("write loop extension: {e}")))?;
            }

            for (idx, frame) in self.frames.iter().enumerate() {
                if frame.palette.is_none() && self.global_palette.is_none() {
                    return Err(MemeError::encode(format!(
                        "frame {idx} has no color table"
                    )));
                }
                encoder
                    .write_frame(&frame.to_gif())
                    .map_err(|e| MemeError::encode(format!("write frame {idx}: {e}")))?;
            }
            encoder
                .into_inner()
                .map_err(|e| MemeError::encode(format!("write gif trailer: {e}")))?;
        }
        Ok(out)
    }
}

/// Largest logical screen, in pixels, a source may declare. Caption rasters are screen-sized.
pub const MAX_SCREEN_PIXELS: u32 = 4096 * 4096;

/// Decode every frame of a GIF, keeping palettes and indices.
pub fn decode_animation(bytes: &[u8]) -> MemeResult<Animation> {
    decode_frames(bytes, None)
}

/// Decode only the first frame of a GIF.
pub fn decode_first_frame(bytes: &[u8]) -> MemeResult<Animation> {
    decode_frames(bytes, Some(1))
}

fn decode_frames(bytes: &[u8], limit: Option<usize>) -> MemeResult<Animation> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options
        .read_info(Cursor::new(bytes))
        .map_err(|e| MemeError::decode(format!("read gif header: {e}")))?;

    let width = decoder.width();
    let height = decoder.height();
    if u32::from(width) * u32::from(height) > MAX_SCREEN_PIXELS {
        return Err(MemeError::decode(format!(
            "gif logical screen {width}x{height} exceeds {MAX_SCREEN_PIXELS} pixels"
        )));
    }
    let global_palette = decoder.global_palette().map(<[u8]>::to_vec);
    let background = decoder.bg_color().and_then(|i| u8::try_from(i).ok());
    let mut frames = Vec::new();
    while limit.is_none_or(|n| frames.len() < n) {
        let next = decoder
            .read_next_frame()
            .map_err(|e| MemeError::decode(format!("read frame {}: {e}", frames.len())))?;
        let Some(frame) = next else {
            break;
        };
        frames.push(AnimationFrame::from_gif(frame)?);
    }

    if frames.is_empty() {
        return Err(MemeError::decode("gif contains no frames"));
    }
    // the loop extension is only seen once frame data has been reached
    let loop_count = match decoder.repeat() {
        gif::Repeat::Infinite => LoopCount::Infinite,
        gif::Repeat::Finite(n) => LoopCount::Finite(n),
    };
    if width == 0 || height == 0 {
        return Err(MemeError::decode("gif logical screen is empty"));
    }

    Ok(Animation {
        width,
        height,
        global_palette,
        background,
        loop_count,
        frames,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/engine/animation.rs"]
mod tests;
