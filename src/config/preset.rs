use crate::config::{AvatarConfig, RibbonConfig, RibbonStyle, TextCase, TextConfig};

/// A named ribbon/text combination.
///
/// Presets replace only the ribbon and text sub-objects; the portrait and
/// background are untouched when one is applied.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Preset {
    pub name: String,
    pub ribbon: RibbonConfig,
    pub text: TextConfig,
}

impl AvatarConfig {
    /// New record with the preset's ribbon/text merged in.
    pub fn apply_preset(&self, preset: &Preset) -> Self {
        Self {
            ribbon: preset.ribbon.clone(),
            text: preset.text.clone(),
            ..self.clone()
        }
    }
}

fn stock_ribbon(color: &str) -> RibbonConfig {
    RibbonConfig {
        visible: true,
        style: RibbonStyle::Arc,
        color: color.to_string(),
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
    }
}

fn stock_text(content: &str) -> TextConfig {
    TextConfig {
        content: content.to_string(),
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
    }
}

impl Preset {
    /// Green "open to work" ribbon.
    pub fn open_to_work() -> Self {
        Self {
            name: "OpenToWork".to_string(),
            ribbon: stock_ribbon("#57C785"),
            text: stock_text("#OPENTOWORK"),
        }
    }

    /// Blue recruiter ribbon.
    pub fn hiring() -> Self {
        Self {
            name: "Hiring".to_string(),
            ribbon: stock_ribbon("#1D4ED8"),
            text: stock_text("#HIRING"),
        }
    }

    /// Purple availability ribbon.
    pub fn freelance() -> Self {
        Self {
            name: "Freelance".to_string(),
            ribbon: stock_ribbon("#6D28D9"),
            text: stock_text("#AVAILABLE"),
        }
    }
}

/// The built-in preset catalog, in display order.
pub fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset::open_to_work(),
        Preset::hiring(),
        Preset::freelance(),
    ]
}
