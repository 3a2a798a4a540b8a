use super::*;
use crate::assets::{ImageHandle, PreparedImage};
use crate::config::AvatarConfig;
use crate::layer::build_layers;
use std::sync::Arc;

fn solid_background(color: &str, side: u32) -> Compositor {
    let mut config = AvatarConfig::default();
    config.background.kind = BackgroundKind::Solid;
    config.background.color = color.to_string();
    config.ribbon.visible = false;

    let size = CanvasSize(side);
    let mut comp = Compositor::new(size).unwrap();
    comp.set_layers(build_layers(&config, size)).unwrap();
    comp
}

#[test]
fn new_rejects_unobtainable_surfaces() {
    assert!(matches!(
        Compositor::new(CanvasSize(0)),
        Err(RingletError::Initialization(_))
    ));
    assert!(matches!(
        Compositor::new(CanvasSize(u32::from(u16::MAX) + 10)),
        Err(RingletError::Initialization(_))
    ));
}

#[test]
fn empty_layer_list_renders_fully_transparent() {
    let mut comp = Compositor::new(CanvasSize(16)).unwrap();
    comp.set_layers(Vec::new()).unwrap();
    assert!(comp.frame().data.iter().all(|&b| b == 0));
}

#[test]
fn transparent_background_without_image_or_ribbon_paints_nothing() {
    let mut config = AvatarConfig::default();
    config.ribbon.visible = false;

    let size = CanvasSize(32);
    let mut comp = Compositor::new(size).unwrap();
    comp.set_layers(build_layers(&config, size)).unwrap();
    assert!(comp.frame().data.iter().all(|&b| b == 0));
}

#[test]
fn solid_background_is_clipped_to_the_inscribed_circle() {
    let comp = solid_background("#ff0000", 16);

    assert_eq!(comp.pixel_at(8, 8), Some([255, 0, 0, 255]));
    // the corner lies outside the circle
    assert_eq!(comp.pixel_at(0, 0), Some([0, 0, 0, 0]));
}

#[test]
fn malformed_background_color_degrades_to_no_paint() {
    let comp = solid_background("#notahex", 16);
    assert!(comp.frame().data.iter().all(|&b| b == 0));
}

#[test]
fn layer_opacity_scales_the_painted_alpha() {
    let mut config = AvatarConfig::default();
    config.background.kind = BackgroundKind::Solid;
    config.background.color = "#ffffff".to_string();
    config.ribbon.visible = false;

    let size = CanvasSize(16);
    let mut layers = build_layers(&config, size);
    layers[0].opacity = 0.5;

    let mut comp = Compositor::new(size).unwrap();
    comp.set_layers(layers).unwrap();

    let px = comp.pixel_at(8, 8).unwrap();
    assert!((i16::from(px[3]) - 128).abs() <= 2, "alpha was {}", px[3]);
}

#[test]
fn invisible_layers_are_skipped_entirely() {
    let mut config = AvatarConfig::default();
    config.background.kind = BackgroundKind::Solid;
    config.background.color = "#ff0000".to_string();
    config.ribbon.visible = false;

    let size = CanvasSize(16);
    let mut comp = Compositor::new(size).unwrap();
    comp.set_layers(build_layers(&config, size)).unwrap();
    comp.set_layer_visible("background", false).unwrap();
    assert!(comp.frame().data.iter().all(|&b| b == 0));

    comp.set_layer_visible("background", true).unwrap();
    assert_eq!(comp.pixel_at(8, 8), Some([255, 0, 0, 255]));
}

#[test]
fn full_arc_ribbon_paints_the_band_and_nothing_inside() {
    let mut config = AvatarConfig::default();
    config.text.content = String::new();
    config.ribbon.use_gradient = false;
    config.ribbon.shadow_blur = 0.0;
    config.ribbon.start_angle = 0.0;
    config.ribbon.arc_width = 360.0;
    config.ribbon.color = "#00ff00".to_string();

    let size = CanvasSize(200);
    let mut comp = Compositor::new(size).unwrap();
    comp.set_layers(build_layers(&config, size)).unwrap();

    // centerline radius 90: (100, 190) sits mid-band, away from the seam
    let on_band = comp.pixel_at(100, 190).unwrap();
    assert_eq!(on_band, [0, 255, 0, 255]);
    // well inside the inner radius (80) nothing is painted
    assert_eq!(comp.pixel_at(100, 100), Some([0, 0, 0, 0]));
}

#[test]
fn gradient_faded_arc_is_transparent_at_the_ends_and_solid_mid_span() {
    let mut config = AvatarConfig::default();
    config.text.content = String::new();
    config.ribbon.shadow_blur = 0.0;
    config.ribbon.use_gradient = true;
    config.ribbon.gradient_fade_percent = 25.0;
    config.ribbon.start_angle = 0.0;
    config.ribbon.arc_width = 180.0;
    config.ribbon.color = "#0000ff".to_string();

    let size = CanvasSize(200);
    let mut comp = Compositor::new(size).unwrap();
    comp.set_layers(build_layers(&config, size)).unwrap();

    // mid-span (90 degrees) on the centerline: (100, 190). The probe sits
    // on a segment boundary, so allow a sliver of anti-aliasing slack.
    let mid = comp.pixel_at(100, 190).unwrap();
    assert!(mid[3] >= 250, "alpha was {}", mid[3]);

    // just past the span start the fade has barely begun
    let near_start = comp.pixel_at(190, 102).unwrap();
    assert!(near_start[3] < 64, "alpha was {}", near_start[3]);
}

#[test]
fn pending_portrait_defers_and_repaints_on_completion() {
    let handle = ImageHandle::pending();
    let mut config = AvatarConfig::default().with_image(Some(handle.clone()));
    config.ribbon.visible = false;

    let size = CanvasSize(16);
    let mut comp = Compositor::new(size).unwrap();
    comp.set_layers(build_layers(&config, size)).unwrap();

    assert!(comp.awaiting_image());
    assert_eq!(comp.pixel_at(8, 8), Some([0, 0, 0, 0]));

    let blue = PreparedImage {
        width: 2,
        height: 2,
        rgba8_premul: Arc::new([0u8, 0, 255, 255].repeat(4)),
    };
    assert!(handle.fulfill(blue));
    assert!(comp.image_ready().unwrap());
    assert!(!comp.awaiting_image());
    assert_eq!(comp.pixel_at(8, 8), Some([0, 0, 255, 255]));

    // spurious completions are harmless
    assert!(!comp.image_ready().unwrap());
}

#[test]
fn view_transform_applies_to_every_layer_uniformly() {
    let mut comp = solid_background("#ff0000", 16);
    comp.set_zoom(0.5).unwrap();

    // circle shrinks around the origin: new center (4, 4)
    assert_eq!(comp.pixel_at(4, 4), Some([255, 0, 0, 255]));
    assert_eq!(comp.pixel_at(12, 12), Some([0, 0, 0, 0]));

    comp.set_pan(8.0, 0.0).unwrap();
    assert_eq!(comp.pixel_at(12, 4), Some([255, 0, 0, 255]));
}

#[test]
fn rerender_with_unchanged_state_is_pixel_identical() {
    let size = CanvasSize(64);
    let mut comp = Compositor::new(size).unwrap();
    let config = AvatarConfig::default();

    comp.set_layers(build_layers(&config, size)).unwrap();
    let first = comp.frame().data;
    comp.render().unwrap();
    let second = comp.frame().data;
    assert_eq!(first, second);
}

#[test]
fn sample_hex_unpremultiplies() {
    let comp = solid_background("#3366cc", 16);
    assert_eq!(comp.sample_hex(8.0, 8.0).as_deref(), Some("#3366cc"));
    assert!(comp.sample_hex(-1.0, 8.0).is_none());
    assert!(comp.sample_hex(99.0, 8.0).is_none());
}
