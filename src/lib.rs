//! Ringlet composes circular profile avatars: a portrait behind a
//! decorative ribbon or badge with curved caption text, rendered onto a
//! square raster surface and exportable at arbitrary sizes.
//!
//! # Pipeline overview
//!
//! 1. **Configure**: a flat [`AvatarConfig`] is the single source of truth,
//!    mutated only by replacement.
//! 2. **Derive**: [`build_layers`] turns the configuration into an ordered,
//!    typed layer list (background, portrait, ribbon, caption).
//! 3. **Render**: the [`Compositor`] paints the layers in z order onto its
//!    surface — circular clipping, gradient fades, drop shadows and
//!    glyph-by-glyph curved text.
//! 4. **Export**: [`export_data_uri`] re-runs the same pipeline into an
//!    independent offscreen surface at a caller-chosen size and serializes
//!    to PNG or JPEG.
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: the same configuration, size and view always
//!   produce byte-identical pixels.
//! - **Degrade, don't throw**: missing portraits, empty captions,
//!   unresolvable fonts and malformed colors skip their paint instead of
//!   failing; the only fatal error is an unobtainable raster surface.
#![forbid(unsafe_code)]

mod assets;
mod config;
mod export;
mod foundation;
mod interaction;
mod layer;
mod render;
mod text;

/// Stateless layout math (arc bands, cover fitting, glyph placement).
pub mod geometry;

pub use assets::{ImageHandle, PreparedImage, decode_image};
pub use config::preset::{Preset, builtin_presets};
pub use config::{
    AvatarConfig, BackgroundConfig, BackgroundKind, RibbonConfig, RibbonStyle, TextCase,
    TextConfig,
};
pub use export::{ExportFormat, encode_frame, export_data_uri, render_at};
pub use foundation::core::{
    CanvasSize, Rgba8, ViewTransform, format_hex_rgb, parse_hex_rgb,
};
pub use foundation::error::{RingletError, RingletResult};
pub use interaction::{InteractionController, PointerContext, PointerUpdate, Tool};
pub use layer::{
    BackgroundLayer, BadgeText, ImageLayer, Layer, LayerData, RibbonLayer, TextLayer,
    build_layers,
};
pub use render::FrameRGBA;
pub use render::compositor::Compositor;
pub use text::{ShapedRun, ShapedText, TextLayoutEngine};
