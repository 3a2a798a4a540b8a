//! Export pipeline: re-render the configuration at a caller-chosen square
//! size into an independent offscreen compositor, then serialize.
//!
//! Percentage-based quantities (band thickness, portrait scale, gradient
//! fade) scale with the output size because they are defined relative to
//! it; absolute pixel quantities (portrait offsets, badge offset, font
//! size) are reused verbatim at every size.

use std::io::Cursor;

use anyhow::Context;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::config::AvatarConfig;
use crate::foundation::core::CanvasSize;
use crate::foundation::error::{RingletError, RingletResult};
use crate::layer::build_layers;
use crate::render::FrameRGBA;
use crate::render::compositor::Compositor;
use crate::render::paint::unpremultiply_rgba8_in_place;

/// Encoded-image container offered to the download collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }
}

/// Render `config` into a fresh offscreen compositor at `size`.
///
/// The offscreen compositor is independent of any interactive one, so a
/// pending interactive render can never corrupt an in-flight export.
#[tracing::instrument(skip(config))]
pub fn render_at(config: &AvatarConfig, size: CanvasSize) -> RingletResult<FrameRGBA> {
    let mut compositor = Compositor::new(size)?;
    compositor.set_layers(build_layers(config, size))?;
    Ok(compositor.frame())
}

/// Serialize a rendered frame. JPEG has no alpha channel; transparent
/// regions flatten to black, exactly as a 2D canvas does.
pub fn encode_frame(frame: &FrameRGBA, format: ExportFormat) -> RingletResult<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        ExportFormat::Png => {
            let mut data = frame.data.clone();
            if frame.premultiplied {
                unpremultiply_rgba8_in_place(&mut data);
            }
            let img = image::RgbaImage::from_raw(frame.width, frame.height, data)
                .ok_or_else(|| RingletError::export("frame buffer does not match dimensions"))?;
            image::DynamicImage::ImageRgba8(img)
                .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
                .context("encode png")
                .map_err(|e| RingletError::export(e.to_string()))?;
        }
        ExportFormat::Jpeg => {
            // Premultiplied RGB over a black backdrop is already the
            // flattened result, so the RGB channels are used as-is.
            let mut rgb = Vec::with_capacity((frame.width * frame.height * 3) as usize);
            if frame.premultiplied {
                for px in frame.data.chunks_exact(4) {
                    rgb.extend_from_slice(&px[0..3]);
                }
            } else {
                for px in frame.data.chunks_exact(4) {
                    let a = u16::from(px[3]);
                    for c in 0..3 {
                        rgb.push(((u16::from(px[c]) * a + 127) / 255) as u8);
                    }
                }
            }
            let mut cursor = Cursor::new(&mut bytes);
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, 95);
            encoder
                .encode(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)
                .context("encode jpeg")
                .map_err(|e| RingletError::export(e.to_string()))?;
        }
    }
    Ok(bytes)
}

/// Render and serialize to a `data:` URI at the requested square size.
/// Single best-effort attempt; failures surface as [`RingletError::Export`]
/// (or an initialization error for unobtainable sizes) with no retry.
#[tracing::instrument(skip(config))]
pub fn export_data_uri(
    config: &AvatarConfig,
    size: CanvasSize,
    format: ExportFormat,
) -> RingletResult<String> {
    let frame = render_at(config, size)?;
    let bytes = encode_frame(&frame, format)?;
    Ok(format!(
        "data:{};base64,{}",
        format.mime(),
        BASE64.encode(&bytes)
    ))
}
