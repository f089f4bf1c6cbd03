//! GIF compositing: decode, caption layout, per-frame palette-aware ink, preview export.

pub mod animation;
pub mod compose;
pub mod font;
pub mod overlay;
pub mod palette;
pub mod preview;
pub mod text;
