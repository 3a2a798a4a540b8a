use super::*;
use crate::assets::PreparedImage;
use crate::config::RibbonStyle;
use std::sync::Arc;

fn tiny_image() -> ImageHandle {
    ImageHandle::ready(PreparedImage {
        width: 2,
        height: 2,
        rgba8_premul: Arc::new(vec![0; 16]),
    })
}

fn kinds(layers: &[Layer]) -> Vec<(&'static str, i32)> {
    layers.iter().map(|l| (l.id, l.z_index)).collect()
}

#[test]
fn default_config_without_image_builds_background_ribbon_text() {
    let config = AvatarConfig::default();
    let layers = build_layers(&config, CanvasSize(800));
    assert_eq!(
        kinds(&layers),
        [("background", 0), ("ribbon", 2), ("text", 10)]
    );
}

#[test]
fn image_layer_copies_the_portrait_transform() {
    let config = AvatarConfig::default()
        .with_image(Some(tiny_image()))
        .with_image_transform(1.4, 25.0, -13.0);
    let layers = build_layers(&config, CanvasSize(800));
    assert_eq!(
        kinds(&layers),
        [("background", 0), ("image", 1), ("ribbon", 2), ("text", 10)]
    );

    let LayerData::Image(img) = &layers[1].data else {
        panic!("expected image layer");
    };
    assert_eq!((img.scale, img.x, img.y), (1.4, 25.0, -13.0));
}

#[test]
fn hidden_ribbon_suppresses_ribbon_and_text() {
    let mut config = AvatarConfig::default();
    config.ribbon.visible = false;
    let layers = build_layers(&config, CanvasSize(800));
    assert_eq!(kinds(&layers), [("background", 0)]);
}

#[test]
fn empty_caption_suppresses_the_text_layer_but_not_the_badge() {
    let mut config = AvatarConfig::default();
    config.ribbon.style = RibbonStyle::Badge;
    config.text.content = String::new();
    let layers = build_layers(&config, CanvasSize(800));
    assert_eq!(kinds(&layers), [("background", 0), ("ribbon", 2)]);

    let LayerData::Ribbon(r) = &layers[1].data else {
        panic!("expected ribbon layer");
    };
    assert_eq!(r.style, RibbonStyle::Badge);
    assert!(r.badge_text.content.is_empty());
}

#[test]
fn text_layer_carries_the_derived_centerline_radius() {
    let config = AvatarConfig::default();
    let layers = build_layers(&config, CanvasSize(800));
    let LayerData::Text(t) = &layers[2].data else {
        panic!("expected text layer");
    };
    // r - r*t/100 + (r*t/100)/2 with r=400, t=20
    assert_eq!(t.ribbon_radius, 360.0);
    assert_eq!(t.ribbon_style, RibbonStyle::Arc);
}

#[test]
fn badge_text_snapshot_is_case_transformed() {
    let mut config = AvatarConfig::default();
    config.text.content = "open to work".to_string();
    let layers = build_layers(&config, CanvasSize(800));
    let LayerData::Ribbon(r) = &layers[1].data else {
        panic!("expected ribbon layer");
    };
    assert_eq!(r.badge_text.content, "OPEN TO WORK");
}

#[test]
fn percentage_fields_scale_with_size_while_absolute_fields_do_not() {
    let mut config = AvatarConfig::default();
    config.text.radial_offset = 9.0;
    config.ribbon.badge_offset_y = 123.0;

    let at = |side: u32| {
        let layers = build_layers(&config, CanvasSize(side));
        let LayerData::Text(t) = &layers[2].data else {
            panic!("expected text layer");
        };
        (t.ribbon_radius, t.radial_offset, t.font_size, t.badge_offset_y)
    };

    let (r400, off400, fs400, badge400) = at(400);
    let (r1200, off1200, fs1200, badge1200) = at(1200);

    assert!((r1200 / r400 - 3.0).abs() < 1e-12);
    // absolute pixel quantities are reused verbatim at every size
    assert_eq!(off400, off1200);
    assert_eq!(fs400, fs1200);
    assert_eq!(badge400, badge1200);
}

#[test]
fn rebuild_is_deterministic() {
    let config = AvatarConfig::default().with_image(Some(tiny_image()));
    let a = build_layers(&config, CanvasSize(800));
    let b = build_layers(&config, CanvasSize(800));
    assert_eq!(kinds(&a), kinds(&b));
    assert!(a.iter().zip(&b).all(|(x, y)| {
        x.visible == y.visible && x.locked == y.locked && x.opacity == y.opacity
    }));
}
