//! Stateless layout math for the circular composition.
//!
//! Everything here is a pure function of its arguments: arc band radii,
//! aspect-correct portrait fitting, badge pill sizing, and per-glyph
//! placement along a circular path. Angles in the public API are degrees in
//! the canvas convention (0 = +x axis, clockwise with y pointing down);
//! results are radians where they feed transforms directly.

use kurbo::Rect;

pub(crate) use crate::foundation::math::deg_to_rad;

/// Horizontal padding of the badge pill, pixels per side.
pub const BADGE_PAD_X: f64 = 20.0;
/// Vertical padding of the badge pill, pixels per side.
pub const BADGE_PAD_Y: f64 = 8.0;
/// Angular subdivision used when stroking a gradient-faded arc.
pub const ARC_FADE_SEGMENTS: usize = 100;

/// Radii of the ribbon's arc band, all derived from the canvas radius and
/// the band thickness percentage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcBand {
    /// Inner edge radius.
    pub inner: f64,
    /// Outer edge radius (touches the canvas circle).
    pub outer: f64,
    /// Stroke centerline radius, halfway through the band.
    pub centerline: f64,
    /// Band thickness in pixels.
    pub thickness: f64,
}

/// Compute the arc band for a canvas of side `size` and a thickness given
/// as a percentage of the canvas radius.
pub fn arc_band(size: f64, thickness_pct: f64) -> ArcBand {
    let radius = size / 2.0;
    let thickness = radius * thickness_pct / 100.0;
    let inner = radius - thickness;
    ArcBand {
        inner,
        outer: inner + thickness,
        centerline: inner + thickness / 2.0,
        thickness,
    }
}

/// Centerline radius of the ribbon band; the caption circle is derived from
/// this so the text renderer never recomputes ribbon geometry.
pub fn ribbon_centerline_radius(size: f64, thickness_pct: f64) -> f64 {
    arc_band(size, thickness_pct).centerline
}

/// Cover-fit rectangle for the portrait: portrait/square sources fill the
/// canvas width and crop height, landscape sources fill the height and crop
/// width. The rectangle is centered on the canvas and then offset.
pub fn cover_fit_rect(
    size: f64,
    img_width: u32,
    img_height: u32,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
) -> Rect {
    let aspect = if img_height == 0 {
        1.0
    } else {
        f64::from(img_width) / f64::from(img_height)
    };

    let (draw_w, draw_h) = if aspect <= 1.0 {
        let w = size * scale;
        (w, w / aspect.max(f64::EPSILON))
    } else {
        let h = size * scale;
        (h * aspect, h)
    };

    let center = size / 2.0;
    let x0 = center - draw_w / 2.0 + offset_x;
    let y0 = center - draw_h / 2.0 + offset_y;
    Rect::new(x0, y0, x0 + draw_w, y0 + draw_h)
}

/// One angular slice of a gradient-faded arc stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcSegment {
    /// Segment start angle, radians.
    pub start: f64,
    /// Segment sweep, radians (always positive).
    pub sweep: f64,
    /// Stroke alpha in 0..=1, ramping linearly through the fade zones.
    pub alpha: f64,
}

/// Subdivide an arc into `segments` slices with per-slice alpha fading in
/// over `fade_pct` percent of the arc length at each end.
///
/// The slices tile the span exactly: the first starts at `start_deg` and the
/// sweeps sum to `arc_deg`.
pub fn faded_arc_segments(
    start_deg: f64,
    arc_deg: f64,
    fade_pct: f64,
    segments: usize,
) -> Vec<ArcSegment> {
    if segments == 0 || arc_deg <= 0.0 {
        return Vec::new();
    }

    let fade_deg = arc_deg * (fade_pct / 100.0).clamp(0.0, 0.5);
    let step_deg = arc_deg / segments as f64;

    (0..segments)
        .map(|i| {
            let seg_start_deg = start_deg + step_deg * i as f64;
            let from_start = step_deg * i as f64;
            let from_end = arc_deg - from_start;

            let alpha = if fade_deg > 0.0 && from_start < fade_deg {
                from_start / fade_deg
            } else if fade_deg > 0.0 && from_end < fade_deg {
                from_end / fade_deg
            } else {
                1.0
            };

            ArcSegment {
                start: deg_to_rad(seg_start_deg),
                sweep: deg_to_rad(step_deg),
                alpha: alpha.clamp(0.0, 1.0),
            }
        })
        .collect()
}

/// Badge pill dimensions for a measured caption width: `(width, height,
/// corner_radius)`. An empty caption measures zero and yields the minimum
/// pill of bare padding.
pub fn badge_box(text_width: f64, font_size: f64) -> (f64, f64, f64) {
    let width = text_width + BADGE_PAD_X * 2.0;
    let height = font_size + BADGE_PAD_Y * 2.0;
    (width, height, height / 2.0)
}

/// Placement of one glyph on the caption circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphSlot {
    /// Canvas angle of the glyph center, radians.
    pub angle: f64,
    /// Glyph rotation keeping it normal to the circle (tops pointing
    /// outward, the inside-edge reading orientation), radians.
    pub rotation: f64,
}

/// Lay glyph advance widths along a circle of `radius`, centered on the
/// midpoint of the `start_deg`/`arc_deg` span so the caption is balanced.
///
/// Each width already includes letter spacing; the angular footprint of a
/// glyph is its width divided by the radius.
pub fn arc_glyph_slots(widths: &[f64], radius: f64, start_deg: f64, arc_deg: f64) -> Vec<GlyphSlot> {
    if radius <= 0.0 {
        return Vec::new();
    }

    let total: f64 = widths.iter().sum::<f64>() / radius;
    let mid = deg_to_rad(start_deg + arc_deg / 2.0);
    let mut cursor = mid - total / 2.0;

    widths
        .iter()
        .map(|w| {
            let footprint = w / radius;
            let angle = cursor + footprint / 2.0;
            cursor += footprint;
            GlyphSlot {
                angle,
                rotation: angle + std::f64::consts::FRAC_PI_2,
            }
        })
        .collect()
}

/// Centered x positions for glyphs on a straight baseline: each entry is
/// the center of one glyph, with the whole run centered on zero.
pub fn straight_glyph_centers(widths: &[f64], letter_spacing: f64) -> Vec<f64> {
    if widths.is_empty() {
        return Vec::new();
    }
    let total: f64 =
        widths.iter().sum::<f64>() + letter_spacing * (widths.len() as f64 - 1.0);
    let mut cursor = -total / 2.0;
    widths
        .iter()
        .map(|w| {
            let center = cursor + w / 2.0;
            cursor += w + letter_spacing;
            center
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/unit/geometry.rs"]
mod tests;
