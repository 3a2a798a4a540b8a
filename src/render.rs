pub mod compositor;
pub(crate) mod paint;
pub(crate) mod shadow;

/// One rendered frame as RGBA8 bytes.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    /// Whether `data` carries premultiplied alpha. The compositor reads
    /// back premultiplied pixels; export unpremultiplies before encoding.
    pub premultiplied: bool,
}
