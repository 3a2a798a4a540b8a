use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::RingletResult;

/// Decoded portrait bitmap in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Source aspect ratio (width over height); 1.0 when the height is zero.
    pub fn aspect(&self) -> f64 {
        if self.height == 0 {
            1.0
        } else {
            f64::from(self.width) / f64::from(self.height)
        }
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
///
/// MIME/size validation happens in the file-selection collaborator before
/// bytes reach this function; anything `image` can decode is accepted here.
pub fn decode_image(bytes: &[u8]) -> RingletResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Handle to a portrait image that may still be decoding.
///
/// Decoding happens outside the engine. A pending handle is fulfilled
/// exactly once when the decode completes; a render that encounters an
/// unfulfilled handle skips the image layer and records that a repaint is
/// owed ([`crate::Compositor::awaiting_image`]), and the embedding re-runs
/// the idempotent render via [`crate::Compositor::image_ready`].
#[derive(Clone, Debug)]
pub struct ImageHandle(Arc<std::sync::OnceLock<PreparedImage>>);

impl ImageHandle {
    /// Handle for an image whose decode has been requested but not finished.
    pub fn pending() -> Self {
        Self(Arc::new(std::sync::OnceLock::new()))
    }

    /// Handle wrapping a fully decoded bitmap.
    pub fn ready(image: PreparedImage) -> Self {
        let handle = Self::pending();
        let _ = handle.0.set(image);
        handle
    }

    /// Complete the decode. Returns `false` if the handle was already
    /// fulfilled (duplicate completions are harmless and ignored).
    pub fn fulfill(&self, image: PreparedImage) -> bool {
        self.0.set(image).is_ok()
    }

    /// The decoded bitmap, or `None` while the decode is still in flight.
    pub fn get(&self) -> Option<&PreparedImage> {
        self.0.get()
    }

    pub fn is_ready(&self) -> bool {
        self.get().is_some()
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
