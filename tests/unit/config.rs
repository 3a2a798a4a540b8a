use super::*;
use crate::config::preset::Preset;

#[test]
fn default_config_is_complete_and_valid() {
    let config = AvatarConfig::default();
    assert!(config.validate().is_ok());
    assert!(config.image.is_none());
    assert_eq!(config.ribbon.color, "#57C785");
    assert_eq!(config.text.content, "#OPENTOWORK");
    assert_eq!(config.background.kind, BackgroundKind::Transparent);
}

#[test]
fn text_owns_its_angular_span_defaulting_to_the_ribbons() {
    let config = AvatarConfig::default();
    assert_eq!(config.text.start_angle, config.ribbon.start_angle);
    assert_eq!(config.text.arc_width, config.ribbon.arc_width);
}

#[test]
fn case_transforms() {
    assert_eq!(TextCase::Upper.apply("Open to Work"), "OPEN TO WORK");
    assert_eq!(TextCase::Lower.apply("Open TO Work"), "open to work");
    assert_eq!(TextCase::Title.apply("open TO work"), "Open To Work");
    assert_eq!(TextCase::Title.apply(""), "");
}

#[test]
fn preset_touches_only_ribbon_and_text() {
    let base = AvatarConfig::default().with_image_transform(1.5, 12.0, -7.0);
    let updated = base.apply_preset(&Preset::hiring());

    assert_eq!(updated.ribbon.color, "#1D4ED8");
    assert_eq!(updated.text.content, "#HIRING");

    assert_eq!(updated.image_scale, 1.5);
    assert_eq!(updated.image_x, 12.0);
    assert_eq!(updated.image_y, -7.0);
    assert_eq!(updated.background, base.background);
}

#[test]
fn updates_replace_rather_than_mutate() {
    let base = AvatarConfig::default();
    let moved = base.with_image_transform(2.0, 50.0, 60.0);
    assert_eq!(base.image_scale, 1.0);
    assert_eq!(moved.image_scale, 2.0);
    assert_eq!(moved.ribbon, base.ribbon);
}

#[test]
fn json_roundtrip() {
    let config = AvatarConfig::default();
    let s = serde_json::to_string_pretty(&config).unwrap();
    let de: AvatarConfig = serde_json::from_str(&s).unwrap();
    assert_eq!(de.ribbon, config.ribbon);
    assert_eq!(de.text, config.text);
    assert_eq!(de.background, config.background);
    assert!(s.contains("\"type\": \"transparent\""));
}

#[test]
fn validate_rejects_non_finite_numbers() {
    let mut config = AvatarConfig::default();
    config.ribbon.arc_width = f64::NAN;
    assert!(config.validate().is_err());

    let mut config = AvatarConfig::default();
    config.image_scale = f64::INFINITY;
    assert!(config.validate().is_err());
}

#[test]
fn builtin_presets_catalog() {
    let presets = crate::config::preset::builtin_presets();
    let names: Vec<&str> = presets.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["OpenToWork", "Hiring", "Freelance"]);
    assert_eq!(presets[2].ribbon.color, "#6D28D9");
    assert_eq!(presets[2].text.content, "#AVAILABLE");
}
