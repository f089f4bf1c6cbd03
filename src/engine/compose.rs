use std::sync::Arc;

use rayon::prelude::*;

use crate::{
    engine::{
        animation::{Animation, AnimationFrame, decode_animation},
        overlay::{CaptionOverlay, Ink},
        palette::resolve_ink,
        text::{CaptionRenderer, CaptionStyle, Captions},
    },
    foundation::error::{MemeError, MemeResult},
};

/// RGB colors written for each kind of caption ink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InkColors {
    /// Color of [`Ink::Fill`] cells.
    pub fill: [u8; 3],
    /// Color of [`Ink::Outline`] cells.
    pub outline: [u8; 3],
}

impl InkColors {
    /// Colors taken from a caption style.
    pub fn from_style(style: &CaptionStyle) -> Self {
        Self {
            fill: style.fill_rgb,
            outline: style.outline_rgb,
        }
    }

    /// Color for `ink`.
    pub fn color(&self, ink: Ink) -> [u8; 3] {
        match ink {
            Ink::Fill => self.fill,
            Ink::Outline => self.outline,
        }
    }
}

/// Counters for one compositing run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComposeStats {
    /// Frames in the animation.
    pub frames_total: u64,
    /// Frames that received ink.
    pub frames_captioned: u64,
    /// Frames outside every caption row, copied as-is.
    pub frames_untouched: u64,
    /// Captioned frames whose palette grew.
    pub palettes_extended: u64,
}

/// Captions every frame of an animation on a private worker pool.
pub struct Compositor {
    renderer: Arc<dyn CaptionRenderer>,
    inks: InkColors,
    pool: Arc<rayon::ThreadPool>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("inks", &self.inks)
            .field("threads", &self.pool.current_num_threads())
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// Compositor drawing overlays from `renderer` in `inks`, on `threads` workers
    /// (rayon's default when `None`).
    pub fn new(
        renderer: Arc<dyn CaptionRenderer>,
        inks: InkColors,
        threads: Option<usize>,
    ) -> MemeResult<Self> {
        Ok(Self {
            renderer,
            inks,
            pool: Arc::new(build_thread_pool(threads)?),
        })
    }

    /// Caption renderer shared with the preview path.
    pub fn renderer(&self) -> &Arc<dyn CaptionRenderer> {
        &self.renderer
    }

    /// Ink colors.
    pub fn inks(&self) -> InkColors {
        self.inks
    }

    /// Decode `source`, caption every frame, and return the new animation.
    #[tracing::instrument(skip(self, source, captions), fields(source_bytes = source.len()))]
    pub fn generate_meme(&self, source: &[u8], captions: &Captions) -> MemeResult<Animation> {
        let animation = decode_animation(source)?;
        let (out, stats) = self.caption_animation(animation, captions)?;
        tracing::debug!(
            frames = stats.frames_total,
            captioned = stats.frames_captioned,
            untouched = stats.frames_untouched,
            palettes_extended = stats.palettes_extended,
            "frames composited"
        );
        Ok(out)
    }

    /// Caption an already decoded animation. Frames keep their order, timing and geometry.
    pub fn caption_animation(
        &self,
        animation: Animation,
        captions: &Captions,
    ) -> MemeResult<(Animation, ComposeStats)> {
        let overlay = self
            .renderer
            .render(captions, animation.width, animation.height)?;
        let global = animation.global_palette.as_deref();
        let inks = self.inks;

        let results = self.pool.install(|| {
            animation
                .frames
                .par_iter()
                .map(|frame| caption_frame(frame, global, &overlay, inks))
                .collect::<Vec<_>>()
        });

        let mut stats = ComposeStats {
            frames_total: results.len() as u64,
            ..ComposeStats::default()
        };
        let mut frames = Vec::with_capacity(results.len());
        for result in results {
            let (frame, outcome) = result?;
            match outcome {
                FrameOutcome::Untouched => stats.frames_untouched += 1,
                FrameOutcome::Captioned { palette_extended } => {
                    stats.frames_captioned += 1;
                    if palette_extended {
                        stats.palettes_extended += 1;
                    }
                }
            }
            frames.push(frame);
        }

        Ok((Animation { frames, ..animation }, stats))
    }
}

/// What happened to one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No ink fell inside the frame rectangle.
    Untouched,
    /// Ink was written.
    Captioned {
        /// Ink colors had to be appended to the palette.
        palette_extended: bool,
    },
}

/// Burn `overlay` into one frame.
///
/// Ink colors are resolved against the frame's effective palette. The frame only gets a
/// local palette of its own when that palette had to grow.
pub fn caption_frame(
    frame: &AnimationFrame,
    global: Option<&[u8]>,
    overlay: &CaptionOverlay,
    inks: InkColors,
) -> MemeResult<(AnimationFrame, FrameOutcome)> {
    if !overlay.touches(frame.left, frame.top, frame.width, frame.height) {
        return Ok((frame.clone(), FrameOutcome::Untouched));
    }

    let palette = frame
        .effective_palette(global)
        .ok_or_else(|| MemeError::decode("frame has neither a local nor a global color table"))?;
    let mut extended = palette.to_vec();
    let fill = resolve_ink(&mut extended, frame.transparent, inks.fill);
    let outline = resolve_ink(&mut extended, frame.transparent, inks.outline);
    let palette_extended = extended.len() > palette.len();

    let mut out = frame.clone();
    if palette_extended {
        out.palette = Some(extended);
    }

    let Some((ink_lo, ink_hi)) = overlay.ink_rows() else {
        return Ok((out, FrameOutcome::Untouched));
    };
    let w = usize::from(frame.width);
    let row_lo = ink_lo.saturating_sub(frame.top);
    let row_hi = (ink_hi - frame.top.min(ink_hi)).min(frame.height.saturating_sub(1));
    for row in row_lo..=row_hi {
        let y = frame.top.saturating_add(row);
        for col in 0..frame.width {
            let x = frame.left.saturating_add(col);
            let Some(ink) = overlay.get(x, y) else {
                continue;
            };
            let idx = usize::from(row) * w + usize::from(col);
            if let Some(slot) = out.indices.get_mut(idx) {
                *slot = match ink {
                    Ink::Fill => fill,
                    Ink::Outline => outline,
                };
            }
        }
    }

    Ok((out, FrameOutcome::Captioned { palette_extended }))
}

fn build_thread_pool(threads: Option<usize>) -> MemeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(MemeError::config(
            "compositing 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| MemeError::config(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/engine/compose.rs"]
mod tests;
