//! The typed, ordered layer list derived from a configuration.
//!
//! Layers are pure derived state: [`build_layers`] rebuilds the whole list
//! from scratch on every configuration change, so the same configuration
//! always produces the same layers. Visibility and lock flags start at
//! their defaults and may be toggled afterwards as transient UI state
//! without touching the configuration.

use crate::assets::ImageHandle;
use crate::config::{AvatarConfig, BackgroundKind, RibbonStyle, TextCase};
use crate::foundation::core::CanvasSize;
use crate::geometry::ribbon_centerline_radius;

/// One visually independent, typed, z-ordered paintable element.
#[derive(Clone, Debug)]
pub struct Layer {
    pub id: &'static str,
    pub name: &'static str,
    pub visible: bool,
    pub locked: bool,
    /// Paint opacity in 0..=1, applied for the duration of this layer only.
    pub opacity: f64,
    /// Paint order, ascending. Fixed per kind: background 0, portrait 1,
    /// ribbon 2, caption 10.
    pub z_index: i32,
    pub data: LayerData,
}

/// Kind-specific geometry and styling, dispatched by tag in the compositor.
#[derive(Clone, Debug)]
pub enum LayerData {
    Background(BackgroundLayer),
    Image(ImageLayer),
    Ribbon(RibbonLayer),
    Text(TextLayer),
}

#[derive(Clone, Debug)]
pub struct BackgroundLayer {
    pub kind: BackgroundKind,
    pub color: String,
    pub gradient_start: String,
    pub gradient_end: String,
}

#[derive(Clone, Debug)]
pub struct ImageLayer {
    pub handle: ImageHandle,
    pub scale: f64,
    pub x: f64,
    pub y: f64,
}

/// Snapshot of the caption styling the badge pill is sized from.
///
/// Captured at build time so badge sizing never reaches back into the text
/// layer; an empty caption measures zero and still produces the minimum
/// padded pill.
#[derive(Clone, Debug)]
pub struct BadgeText {
    /// Case-transformed caption content.
    pub content: String,
    pub font_family: String,
    pub font_size: f64,
    pub letter_spacing: f64,
}

#[derive(Clone, Debug)]
pub struct RibbonLayer {
    pub style: RibbonStyle,
    pub color: String,
    pub border_color: String,
    pub border_width: f64,
    pub shadow_blur: f64,
    pub shadow_opacity: f64,
    pub thickness: f64,
    pub start_angle: f64,
    pub arc_width: f64,
    pub use_gradient: bool,
    pub gradient_fade_percent: f64,
    pub badge_rotation: f64,
    pub badge_offset_y: f64,
    pub badge_text: BadgeText,
}

#[derive(Clone, Debug)]
pub struct TextLayer {
    pub content: String,
    pub text_case: TextCase,
    pub font_family: String,
    pub font_size: f64,
    pub letter_spacing: f64,
    pub start_angle: f64,
    pub arc_width: f64,
    pub radial_offset: f64,
    pub color: String,
    pub stroke_color: String,
    pub stroke_width: f64,
    /// Arc centerline radius, derived from the ribbon so the caption
    /// renderer never recomputes ribbon geometry.
    pub ribbon_radius: f64,
    /// Paired ribbon rendering mode: curved placement for arcs, straight
    /// baseline at the badge position otherwise.
    pub ribbon_style: RibbonStyle,
    pub badge_rotation: f64,
    pub badge_offset_y: f64,
}

/// Derive the ordered layer list from a configuration.
///
/// Exactly one background layer always exists; the portrait, ribbon and
/// caption layers exist only when their preconditions hold (image present,
/// ribbon visible, ribbon visible and caption non-empty, respectively).
pub fn build_layers(config: &AvatarConfig, size: CanvasSize) -> Vec<Layer> {
    let mut layers = Vec::with_capacity(4);

    layers.push(Layer {
        id: "background",
        name: "Background",
        visible: true,
        locked: false,
        opacity: 1.0,
        z_index: 0,
        data: LayerData::Background(BackgroundLayer {
            kind: config.background.kind,
            color: config.background.color.clone(),
            gradient_start: config.background.gradient_start.clone(),
            gradient_end: config.background.gradient_end.clone(),
        }),
    });

    if let Some(handle) = &config.image {
        layers.push(Layer {
            id: "image",
            name: "Portrait",
            visible: true,
            locked: false,
            opacity: 1.0,
            z_index: 1,
            data: LayerData::Image(ImageLayer {
                handle: handle.clone(),
                scale: config.image_scale,
                x: config.image_x,
                y: config.image_y,
            }),
        });
    }

    if config.ribbon.visible {
        let r = &config.ribbon;
        layers.push(Layer {
            id: "ribbon",
            name: "Ribbon",
            visible: true,
            locked: false,
            opacity: 1.0,
            z_index: 2,
            data: LayerData::Ribbon(RibbonLayer {
                style: r.style,
                color: r.color.clone(),
                border_color: r.border_color.clone(),
                border_width: r.border_width,
                shadow_blur: r.shadow_blur,
                shadow_opacity: r.shadow_opacity,
                thickness: r.thickness,
                start_angle: r.start_angle,
                arc_width: r.arc_width,
                use_gradient: r.use_gradient,
                gradient_fade_percent: r.gradient_fade_percent,
                badge_rotation: r.badge_rotation,
                badge_offset_y: r.badge_offset_y,
                badge_text: BadgeText {
                    content: config.text.text_case.apply(&config.text.content),
                    font_family: config.text.font_family.clone(),
                    font_size: config.text.font_size,
                    letter_spacing: config.text.letter_spacing,
                },
            }),
        });

        if !config.text.content.is_empty() {
            let t = &config.text;
            layers.push(Layer {
                id: "text",
                name: "Caption",
                visible: true,
                locked: false,
                opacity: 1.0,
                z_index: 10,
                data: LayerData::Text(TextLayer {
                    content: t.content.clone(),
                    text_case: t.text_case,
                    font_family: t.font_family.clone(),
                    font_size: t.font_size,
                    letter_spacing: t.letter_spacing,
                    start_angle: t.start_angle,
                    arc_width: t.arc_width,
                    radial_offset: t.radial_offset,
                    color: t.color.clone(),
                    stroke_color: t.stroke_color.clone(),
                    stroke_width: t.stroke_width,
                    ribbon_radius: ribbon_centerline_radius(size.side(), r.thickness),
                    ribbon_style: r.style,
                    badge_rotation: r.badge_rotation,
                    badge_offset_y: r.badge_offset_y,
                }),
            });
        }
    }

    layers
}

#[cfg(test)]
#[path = "../tests/unit/layer.rs"]
mod tests;
