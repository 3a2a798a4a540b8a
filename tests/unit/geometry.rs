use super::*;

#[test]
fn arc_band_matches_the_centerline_formula() {
    let band = arc_band(800.0, 20.0);
    assert_eq!(band.thickness, 80.0);
    assert_eq!(band.inner, 320.0);
    assert_eq!(band.outer, 400.0);
    assert_eq!(band.centerline, 360.0);
    assert_eq!(ribbon_centerline_radius(800.0, 20.0), 360.0);
}

#[test]
fn percentage_radii_scale_linearly_with_canvas_size() {
    let small = ribbon_centerline_radius(400.0, 20.0);
    let large = ribbon_centerline_radius(1200.0, 20.0);
    assert!((large / small - 3.0).abs() < 1e-12);
}

#[test]
fn faded_segments_tile_the_span_exactly() {
    let segs = faded_arc_segments(215.0, 150.0, 13.0, ARC_FADE_SEGMENTS);
    assert_eq!(segs.len(), ARC_FADE_SEGMENTS);

    assert!((segs[0].start - deg_to_rad(215.0)).abs() < 1e-12);
    let sweep_sum: f64 = segs.iter().map(|s| s.sweep).sum();
    assert!((sweep_sum - deg_to_rad(150.0)).abs() < 1e-9);
}

#[test]
fn fade_zero_means_fully_opaque() {
    let segs = faded_arc_segments(0.0, 360.0, 0.0, 10);
    assert!(segs.iter().all(|s| s.alpha == 1.0));
}

#[test]
fn fade_ramps_at_both_ends() {
    let segs = faded_arc_segments(0.0, 100.0, 25.0, 100);
    assert!(segs.first().unwrap().alpha < 0.1);
    assert!(segs.last().unwrap().alpha < 0.1);
    assert_eq!(segs[50].alpha, 1.0);
    // monotone ramp into the plateau
    assert!(segs[5].alpha < segs[20].alpha);
}

#[test]
fn zero_span_produces_no_segments() {
    assert!(faded_arc_segments(90.0, 0.0, 13.0, 100).is_empty());
    assert!(faded_arc_segments(90.0, 150.0, 13.0, 0).is_empty());
}

#[test]
fn cover_fit_fills_width_for_portrait_sources() {
    // aspect <= 1 at scale 1 must cover the full canvas width
    let rect = cover_fit_rect(800.0, 500, 1000, 1.0, 0.0, 0.0);
    assert_eq!(rect.width(), 800.0);
    assert_eq!(rect.height(), 1600.0);
    assert_eq!(rect.x0, 0.0);
    assert_eq!(rect.y0, -400.0);
}

#[test]
fn cover_fit_fills_height_for_landscape_sources() {
    let rect = cover_fit_rect(800.0, 1600, 800, 1.0, 0.0, 0.0);
    assert_eq!(rect.height(), 800.0);
    assert_eq!(rect.width(), 1600.0);
}

#[test]
fn cover_fit_applies_scale_and_offset() {
    let rect = cover_fit_rect(800.0, 100, 100, 1.5, 30.0, -20.0);
    assert_eq!(rect.width(), 1200.0);
    let center = rect.center();
    assert_eq!(center.x, 430.0);
    assert_eq!(center.y, 380.0);
}

#[test]
fn badge_box_minimum_pill_is_bare_padding() {
    let (w, h, corner) = badge_box(0.0, 16.0);
    assert_eq!(w, 40.0);
    assert_eq!(h, 32.0);
    assert_eq!(corner, 16.0);
}

#[test]
fn badge_box_grows_with_text() {
    let (w, _, _) = badge_box(120.0, 16.0);
    assert_eq!(w, 160.0);
}

#[test]
fn single_glyph_sits_on_the_span_midpoint() {
    let slots = arc_glyph_slots(&[10.0], 100.0, 215.0, 150.0);
    assert_eq!(slots.len(), 1);
    let mid = deg_to_rad(215.0 + 75.0);
    assert!((slots[0].angle - mid).abs() < 1e-12);
    assert!((slots[0].rotation - (mid + std::f64::consts::FRAC_PI_2)).abs() < 1e-12);
}

#[test]
fn glyph_run_is_balanced_around_the_midpoint() {
    let widths = vec![10.0, 10.0, 10.0, 10.0];
    let slots = arc_glyph_slots(&widths, 100.0, 0.0, 180.0);
    let mid = deg_to_rad(90.0);
    let first = slots.first().unwrap().angle - mid;
    let last = slots.last().unwrap().angle - mid;
    assert!((first + last).abs() < 1e-12);

    // consecutive glyph centers advance by exactly one angular footprint
    let step = 10.0 / 100.0;
    assert!((slots[1].angle - slots[0].angle - step).abs() < 1e-12);
}

#[test]
fn degenerate_radius_yields_no_slots() {
    assert!(arc_glyph_slots(&[10.0], 0.0, 0.0, 90.0).is_empty());
    assert!(arc_glyph_slots(&[10.0], -5.0, 0.0, 90.0).is_empty());
}

#[test]
fn straight_centers_are_symmetric() {
    let centers = straight_glyph_centers(&[10.0, 20.0, 10.0], 2.0);
    assert_eq!(centers.len(), 3);
    assert!((centers[0] + centers[2]).abs() < 1e-12);
    assert_eq!(centers[1], 0.0);
    assert!(straight_glyph_centers(&[], 2.0).is_empty());
}
