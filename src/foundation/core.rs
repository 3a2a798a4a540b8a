use crate::foundation::error::{RingletError, RingletResult};

pub use kurbo::{Affine, Circle, Point, Rect, Vec2};

/// Side length of the square raster surface, in logical pixels.
///
/// All geometry is computed in this fixed canvas space (origin top-left,
/// y down), independent of on-screen display scaling.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CanvasSize(pub u32);

impl CanvasSize {
    /// Validate and construct a canvas size usable as a raster surface.
    pub fn new(side: u32) -> RingletResult<Self> {
        if side == 0 {
            return Err(RingletError::initialization("canvas size must be > 0"));
        }
        if side > u32::from(u16::MAX) {
            return Err(RingletError::initialization(format!(
                "canvas size {side} exceeds the raster backend limit of {}",
                u16::MAX
            )));
        }
        Ok(Self(side))
    }

    pub fn side(self) -> f64 {
        f64::from(self.0)
    }

    /// Center of the canvas, which is also the center of the inscribed circle.
    pub fn center(self) -> Point {
        Point::new(self.side() / 2.0, self.side() / 2.0)
    }

    /// Radius of the inscribed circle (half the side).
    pub fn radius(self) -> f64 {
        self.side() / 2.0
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Same color with alpha scaled by `f` (clamped to 0..1).
    pub fn with_alpha_scaled(self, f: f64) -> Self {
        let a = (f64::from(self.a) * f.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Premultiplied byte form `[r*a, g*a, b*a, a]`.
    pub fn to_premul_bytes(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| -> u8 { (((u16::from(c) * a) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

/// Parse a `#rrggbb` hex string into an opaque color.
///
/// Returns `None` for anything malformed; the renderer treats that as a
/// cosmetic no-op (the shape is simply not filled), never an error.
pub fn parse_hex_rgb(s: &str) -> Option<Rgba8> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgba8::new(r, g, b, 255))
}

/// Format an opaque color as `#rrggbb`.
pub fn format_hex_rgb(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Zoom and pan applied uniformly to every layer of the interactive view.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewTransform {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl ViewTransform {
    /// Canonical order: translate(pan) then scale(zoom), enclosing all layers.
    pub fn to_affine(self) -> Affine {
        Affine::translate((self.pan_x, self.pan_y)) * Affine::scale(self.zoom)
    }
}
