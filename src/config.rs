pub mod preset;

use crate::assets::ImageHandle;
use crate::foundation::error::{RingletError, RingletResult};

/// The two ribbon rendering modes: a curved stroke around the avatar, or a
/// rotated straight pill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RibbonStyle {
    Arc,
    Badge,
}

/// Case transform applied to the caption before measuring or painting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextCase {
    Upper,
    Title,
    Lower,
}

impl TextCase {
    /// Apply the transform. Title case capitalizes on whitespace boundaries.
    pub fn apply(self, text: &str) -> String {
        match self {
            TextCase::Upper => text.to_uppercase(),
            TextCase::Lower => text.to_lowercase(),
            TextCase::Title => text
                .split(' ')
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => {
                            first.to_uppercase().collect::<String>()
                                + &chars.as_str().to_lowercase()
                        }
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Background fill of the inscribed circle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    Transparent,
    Solid,
    Gradient,
}

/// Ribbon appearance: shared styling plus arc- and badge-specific geometry.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RibbonConfig {
    pub visible: bool,
    pub style: RibbonStyle,
    pub color: String,
    pub border_color: String,
    pub border_width: f64,
    pub shadow_blur: f64,
    pub shadow_opacity: f64,
    /// Arc band thickness as a percentage of the canvas radius (0-40).
    pub thickness: f64,
    /// Degrees, canvas convention: 0 = +x axis, clockwise.
    pub start_angle: f64,
    /// Angular width of the arc in degrees (0-360).
    pub arc_width: f64,
    pub use_gradient: bool,
    /// Percentage of the arc (or pill width) faded out at each end (0-50).
    pub gradient_fade_percent: f64,
    /// Badge rotation about its own center, degrees.
    pub badge_rotation: f64,
    /// Badge vertical offset from the canvas center, pixels.
    pub badge_offset_y: f64,
}

/// Caption styling and placement.
///
/// The caption owns its own angular span; it is initialized to the ribbon's
/// span and adjusted independently afterwards. Only the circle radius stays
/// derived from the ribbon (the caption sits on the arc's centerline).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextConfig {
    pub content: String,
    pub text_case: TextCase,
    pub font_family: String,
    pub font_size: f64,
    pub letter_spacing: f64,
    pub start_angle: f64,
    pub arc_width: f64,
    /// Signed radial offset from the arc centerline, pixels.
    pub radial_offset: f64,
    pub color: String,
    pub stroke_color: String,
    pub stroke_width: f64,
}

/// Background fill configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BackgroundConfig {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    pub color: String,
    pub gradient_start: String,
    pub gradient_end: String,
}

/// The flat, complete record of all user-adjustable avatar properties.
///
/// Mutated only by replacement: every update helper returns a new complete
/// record, so an unchanged configuration always rebuilds into identical
/// layers.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct AvatarConfig {
    /// Portrait handle; decoding happens in the file-selection collaborator,
    /// so the handle is not part of the serialized form.
    #[serde(skip)]
    pub image: Option<ImageHandle>,
    /// Unit-less portrait scale multiplier (practical range 0.5-2.0).
    pub image_scale: f64,
    /// Portrait offset from center, canvas-space pixels.
    pub image_x: f64,
    pub image_y: f64,
    pub ribbon: RibbonConfig,
    pub text: TextConfig,
    pub background: BackgroundConfig,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            image: None,
            image_scale: 1.0,
            image_x: 0.0,
            image_y: 0.0,
            ribbon: RibbonConfig {
                visible: true,
                style: RibbonStyle::Arc,
                color: "#57C785".to_string(),
                border_color: "#ffffff".to_string(),
                border_width: 0.0,
                shadow_blur: 6.0,
                shadow_opacity: 0.2,
                thickness: 20.0,
                start_angle: 215.0,
                arc_width: 150.0,
                use_gradient: true,
                gradient_fade_percent: 13.0,
                badge_rotation: 0.0,
                badge_offset_y: 365.0,
            },
            text: TextConfig {
                content: "#OPENTOWORK".to_string(),
                text_case: TextCase::Upper,
                font_family: "Arial".to_string(),
                font_size: 16.0,
                letter_spacing: 1.0,
                start_angle: 215.0,
                arc_width: 150.0,
                radial_offset: 0.0,
                color: "#ffffff".to_string(),
                stroke_color: "#000000".to_string(),
                stroke_width: 0.0,
            },
            background: BackgroundConfig {
                kind: BackgroundKind::Transparent,
                color: "#ffffff".to_string(),
                gradient_start: "#f0f0f0".to_string(),
                gradient_end: "#e0e0e0".to_string(),
            },
        }
    }
}

impl AvatarConfig {
    /// New record with the portrait handle replaced.
    pub fn with_image(&self, image: Option<ImageHandle>) -> Self {
        Self {
            image,
            ..self.clone()
        }
    }

    /// New record with the portrait transform replaced.
    pub fn with_image_transform(&self, scale: f64, x: f64, y: f64) -> Self {
        Self {
            image_scale: scale,
            image_x: x,
            image_y: y,
            ..self.clone()
        }
    }

    /// New record with the ribbon sub-object replaced.
    pub fn with_ribbon(&self, ribbon: RibbonConfig) -> Self {
        Self {
            ribbon,
            ..self.clone()
        }
    }

    /// New record with the text sub-object replaced.
    pub fn with_text(&self, text: TextConfig) -> Self {
        Self {
            text,
            ..self.clone()
        }
    }

    /// New record with the background sub-object replaced.
    pub fn with_background(&self, background: BackgroundConfig) -> Self {
        Self {
            background,
            ..self.clone()
        }
    }

    /// Reject values that would poison rendering determinism.
    ///
    /// Out-of-range sliders and malformed colors are deliberately not
    /// rejected here; they degrade to visually wrong but stable output.
    pub fn validate(&self) -> RingletResult<()> {
        let numerics = [
            ("image_scale", self.image_scale),
            ("image_x", self.image_x),
            ("image_y", self.image_y),
            ("ribbon.thickness", self.ribbon.thickness),
            ("ribbon.start_angle", self.ribbon.start_angle),
            ("ribbon.arc_width", self.ribbon.arc_width),
            ("ribbon.border_width", self.ribbon.border_width),
            ("ribbon.shadow_blur", self.ribbon.shadow_blur),
            ("ribbon.shadow_opacity", self.ribbon.shadow_opacity),
            ("ribbon.gradient_fade_percent", self.ribbon.gradient_fade_percent),
            ("ribbon.badge_rotation", self.ribbon.badge_rotation),
            ("ribbon.badge_offset_y", self.ribbon.badge_offset_y),
            ("text.font_size", self.text.font_size),
            ("text.letter_spacing", self.text.letter_spacing),
            ("text.start_angle", self.text.start_angle),
            ("text.arc_width", self.text.arc_width),
            ("text.radial_offset", self.text.radial_offset),
            ("text.stroke_width", self.text.stroke_width),
        ];
        for (name, v) in numerics {
            if !v.is_finite() {
                return Err(RingletError::validation(format!(
                    "{name} must be a finite number"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
