//! Pixel-level compositing and paint construction shared by the compositor.
//!
//! All intermediate buffers are premultiplied RGBA8; gradients are built as
//! pixel-ramp image paints so their contents are bit-stable across renders.

use std::sync::Arc;

use kurbo::Shape;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{RingletError, RingletResult};
use crate::foundation::math::mul_div255_u8;

pub(crate) fn affine_to_cpu(a: kurbo::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Full-canvas inscribed circle used for background and portrait clipping.
pub(crate) fn circle_path(center: kurbo::Point, radius: f64) -> vello_cpu::kurbo::BezPath {
    bezpath_to_cpu(&kurbo::Circle::new(center, radius).to_path(0.1))
}

/// Arc of `sweep` radians starting at `start` (canvas convention) at the
/// given radius.
pub(crate) fn arc_path(
    center: kurbo::Point,
    radius: f64,
    start: f64,
    sweep: f64,
) -> vello_cpu::kurbo::BezPath {
    let arc = kurbo::Arc::new(center, kurbo::Vec2::new(radius, radius), start, sweep, 0.0);
    bezpath_to_cpu(&arc.to_path(0.1))
}

/// Pill path with its top-left at the origin.
pub(crate) fn pill_path(width: f64, height: f64, corner: f64) -> vello_cpu::kurbo::BezPath {
    bezpath_to_cpu(&kurbo::RoundedRect::new(0.0, 0.0, width, height, corner).to_path(0.1))
}

pub(crate) fn solid_paint(color: Rgba8, alpha_mul: f64) -> vello_cpu::peniko::Color {
    let scaled = color.with_alpha_scaled(alpha_mul);
    vello_cpu::peniko::Color::from_rgba8(scaled.r, scaled.g, scaled.b, scaled.a)
}

pub(crate) fn clear_pixmap_to_transparent(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> RingletResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| RingletError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| RingletError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(RingletError::render("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

pub(crate) fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> RingletResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Vertical linear gradient: `start` at the top row, `end` at the bottom.
pub(crate) fn vertical_gradient_image(
    start: Rgba8,
    end: Rgba8,
    w: u32,
    h: u32,
) -> RingletResult<vello_cpu::Image> {
    let s = start.to_premul_bytes();
    let e = end.to_premul_bytes();
    let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
    let h1 = (h.max(1) - 1) as f32;
    for y in 0..h {
        let t = if h1 <= 0.0 { 0.0 } else { (y as f32) / h1 };
        let lerp = |a: u8, b: u8| -> u8 {
            let af = a as f32;
            let bf = b as f32;
            (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
        };
        let c = [lerp(s[0], e[0]), lerp(s[1], e[1]), lerp(s[2], e[2]), lerp(s[3], e[3])];
        for x in 0..w {
            let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
            bytes[idx..idx + 4].copy_from_slice(&c);
        }
    }
    rgba_premul_to_image(&bytes, w, h)
}

/// Horizontal fade: fully transparent at both ends, opaque `color` through
/// the middle, with `fade_frac` of the width ramping at each end.
pub(crate) fn horizontal_fade_image(
    color: Rgba8,
    fade_frac: f64,
    w: u32,
    h: u32,
) -> RingletResult<vello_cpu::Image> {
    let fade = fade_frac.clamp(0.0, 0.5);
    let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
    let w1 = (w.max(1) - 1) as f64;
    for x in 0..w {
        let t = if w1 <= 0.0 { 0.0 } else { f64::from(x) / w1 };
        let alpha = if fade <= 0.0 {
            1.0
        } else if t < fade {
            t / fade
        } else if t > 1.0 - fade {
            (1.0 - t) / fade
        } else {
            1.0
        };
        let c = color.with_alpha_scaled(alpha).to_premul_bytes();
        for y in 0..h {
            let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
            bytes[idx..idx + 4].copy_from_slice(&c);
        }
    }
    rgba_premul_to_image(&bytes, w, h)
}

/// Source-over of premultiplied `src` onto `dst`, in place.
pub(crate) fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> RingletResult<()> {
    premul_over_in_place_opacity(dst, src, 1.0)
}

/// Source-over with a uniform extra opacity applied to `src`.
pub(crate) fn premul_over_in_place_opacity(
    dst: &mut [u8],
    src: &[u8],
    opacity: f64,
) -> RingletResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(RingletError::render(
            "premul_over_in_place expects equal-length rgba8 buffers",
        ));
    }
    let op = ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16;
    if op == 0 {
        return Ok(());
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = mul_div255_u8(u16::from(s[3]), op);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - u16::from(sa);

        d[3] = mul_div255_u8(u16::from(d[3]), inv).saturating_add(sa);
        for c in 0..3 {
            let sc = mul_div255_u8(u16::from(s[c]), op);
            let dc = mul_div255_u8(u16::from(d[c]), inv);
            d[c] = sc.saturating_add(dc);
        }
    }
    Ok(())
}

/// Convert premultiplied bytes back to straight alpha, in place.
pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in 0..3 {
            let v = (u16::from(px[c]) * 255 + a / 2) / a;
            px[c] = v.min(255) as u8;
        }
    }
}
