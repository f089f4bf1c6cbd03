use serde::{Deserialize, Serialize};

use crate::{
    engine::{font::FontAsset, overlay::CaptionOverlay},
    foundation::error::{MemeError, MemeResult},
};

/// Caption sizing and colors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionStyle {
    /// Starting font size; captions shrink from here to fit the frame width.
    pub max_font_px: f32,
    /// Smallest font size before captions wrap onto more lines.
    pub min_font_px: f32,
    /// Distance kept from the frame edges.
    pub margin_px: f32,
    /// Outline thickness as a fraction of the font size.
    pub outline_ratio: f32,
    /// Glyph body color.
    pub fill_rgb: [u8; 3],
    /// Glyph outline color.
    pub outline_rgb: [u8; 3],
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            max_font_px: 52.0,
            min_font_px: 8.0,
            margin_px: 8.0,
            outline_ratio: 0.08,
            fill_rgb: [255, 255, 255],
            outline_rgb: [0, 0, 0],
        }
    }
}

impl CaptionStyle {
    /// Reject sizes that cannot produce a layout.
    pub fn validate(&self) -> MemeResult<()> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.max_font_px) || !positive(self.min_font_px) {
            return Err(MemeError::config("caption font sizes must be finite and > 0"));
        }
        if self.min_font_px > self.max_font_px {
            return Err(MemeError::config(
                "caption min_font_px must not exceed max_font_px",
            ));
        }
        if !self.margin_px.is_finite() || self.margin_px < 0.0 {
            return Err(MemeError::config("caption margin_px must be finite and >= 0"));
        }
        if !self.outline_ratio.is_finite() || self.outline_ratio < 0.0 {
            return Err(MemeError::config(
                "caption outline_ratio must be finite and >= 0",
            ));
        }
        Ok(())
    }

    fn outline_px(&self, size_px: f32) -> f32 {
        (size_px * self.outline_ratio).max(1.0)
    }
}

/// Caption texts of one request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Captions {
    /// Text anchored at the top margin.
    pub top: Option<String>,
    /// Text anchored at the bottom margin.
    pub bottom: Option<String>,
}

impl Captions {
    /// Build from optional texts; empty strings count as absent.
    pub fn new(top: Option<&str>, bottom: Option<&str>) -> Self {
        let keep = |t: Option<&str>| t.filter(|s| !s.is_empty()).map(str::to_string);
        Self {
            top: keep(top),
            bottom: keep(bottom),
        }
    }

    /// Whether neither caption has text.
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.bottom.is_none()
    }
}

/// Turns caption text into an ink overlay for a given screen size.
///
/// Called once per request; the overlay is then shared by every frame.
pub trait CaptionRenderer: Send + Sync {
    /// Lay out and rasterize `captions` on a `width x height` screen.
    fn render(&self, captions: &Captions, width: u16, height: u16) -> MemeResult<CaptionOverlay>;
}

/// Caption renderer shaping text with Parley and rasterizing glyphs with `vello_cpu`.
#[derive(Clone, Debug)]
pub struct GlyphCaptionRenderer {
    font: FontAsset,
    style: CaptionStyle,
}

impl GlyphCaptionRenderer {
    /// Renderer drawing with `font` in `style`.
    pub fn new(font: FontAsset, style: CaptionStyle) -> MemeResult<Self> {
        style.validate()?;
        Ok(Self { font, style })
    }

    /// Font in use.
    pub fn font(&self) -> &FontAsset {
        &self.font
    }

    fn fit(
        &self,
        typesetter: &mut Typesetter,
        text: &str,
        avail_w: f32,
    ) -> (parley::Layout<CaptionBrush>, f32) {
        let mut size = self.style.max_font_px;
        let mut layout = typesetter.layout(text, size, None);
        let natural = layout.width();
        if natural > avail_w && natural > 0.0 {
            size = (size * avail_w / natural).floor().max(self.style.min_font_px);
            layout = typesetter.layout(text, size, None);
        }
        if layout.width() > avail_w {
            layout = typesetter.layout(text, size, Some(avail_w));
        }
        (layout, size)
    }

    // passes record coverage only; ink colors are resolved per frame palette
    fn rasterize(
        &self,
        font: &vello_cpu::peniko::FontData,
        blocks: &[PlacedCaption],
        pass: Pass,
        width: u16,
        height: u16,
    ) -> vello_cpu::Pixmap {
        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        for block in blocks {
            if pass == Pass::Outline {
                // stroke is centered on the glyph edge
                let w = 2.0 * self.style.outline_px(block.size);
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(f64::from(w)));
            }
            draw_block(&mut ctx, font, block, f32::from(width), pass);
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);
        pixmap
    }
}

impl CaptionRenderer for GlyphCaptionRenderer {
    fn render(&self, captions: &Captions, width: u16, height: u16) -> MemeResult<CaptionOverlay> {
        if captions.is_empty() || width == 0 || height == 0 {
            return Ok(CaptionOverlay::empty(width, height));
        }

        let mut typesetter = Typesetter::new(&self.font)?;
        let margin = self.style.margin_px;
        let avail_w = (f32::from(width) - 2.0 * margin).max(1.0);

        let mut blocks = Vec::with_capacity(2);
        if let Some(text) = captions.top.as_deref() {
            let (layout, size) = self.fit(&mut typesetter, text, avail_w);
            blocks.push(PlacedCaption {
                layout,
                size,
                y: margin,
            });
        }
        if let Some(text) = captions.bottom.as_deref() {
            let (layout, size) = self.fit(&mut typesetter, text, avail_w);
            let y = (f32::from(height) - margin - layout.height()).max(0.0);
            blocks.push(PlacedCaption { layout, size, y });
        }

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(self.font.bytes().to_vec()),
            self.font.index(),
        );

        let outline = self.rasterize(&font, &blocks, Pass::Outline, width, height);
        let fill = self.rasterize(&font, &blocks, Pass::Fill, width, height);
        Ok(CaptionOverlay::from_pass_coverage(
            width,
            height,
            fill.data_as_u8_slice(),
            outline.data_as_u8_slice(),
        ))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct CaptionBrush;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pass {
    Outline,
    Fill,
}

struct PlacedCaption {
    layout: parley::Layout<CaptionBrush>,
    size: f32,
    y: f32,
}

fn draw_block(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    block: &PlacedCaption,
    screen_w: f32,
    pass: Pass,
) {
    for line in block.layout.lines() {
        let extent = line
            .items()
            .filter_map(|item| match item {
                parley::layout::PositionedLayoutItem::GlyphRun(run) => {
                    Some(run.offset() + run.advance())
                }
                _ => None,
            })
            .fold(0.0f32, f32::max);
        let dx = ((screen_w - extent) / 2.0).max(0.0);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            f64::from(dx),
            f64::from(block.y),
        )));

        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            let builder = ctx.glyph_run(font).font_size(run.run().font_size());
            match pass {
                Pass::Outline => builder.stroke_glyphs(glyphs),
                Pass::Fill => builder.fill_glyphs(glyphs),
            }
        }
    }
}

/// Parley contexts with the caption font registered once.
struct Typesetter {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<CaptionBrush>,
    family: String,
}

impl Typesetter {
    fn new(font: &FontAsset) -> MemeResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes().to_vec()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| MemeError::font("no font families registered from font bytes"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| MemeError::font("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
        })
    }

    fn layout(
        &mut self,
        text: &str,
        size_px: f32,
        max_width_px: Option<f32>,
    ) -> parley::Layout<CaptionBrush> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<CaptionBrush> = builder.build(text);
        if let Some(w) = max_width_px {
            layout.break_all_lines(Some(w));
            layout.align(
                Some(w),
                parley::Alignment::Start,
                parley::AlignmentOptions::default(),
            );
        } else {
            layout.break_all_lines(None);
        }
        layout
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/text.rs"]
mod tests;
