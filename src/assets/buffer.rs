use std::sync::Arc;

use crate::foundation::{
    core::Rect,
    error::{StackError, StackResult},
};

/// Supported pixel layouts for decoded images.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// Row-major, tightly packed, premultiplied RGBA8.
    Rgba8Premul,
}

/// A decoded raster image with a single owner.
///
/// `PixelBuffer` is deliberately not `Clone`: ownership moves from the loader to a slot and
/// is released by whoever holds it last. Once [`recycle`](Self::recycle)d the buffer can no
/// longer be viewed or drawn.
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Option<Arc<Vec<u8>>>,
}

impl PixelBuffer {
    /// Wrap premultiplied RGBA8 pixels.
    pub fn from_rgba8_premul(width: u32, height: u32, data: Vec<u8>) -> StackResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| StackError::validation("pixel buffer size overflow"))?;
        if width == 0 || height == 0 {
            return Err(StackError::validation("pixel buffer must be at least 1x1"));
        }
        if data.len() != expected {
            return Err(StackError::validation(format!(
                "pixel buffer expects {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            format: PixelFormat::Rgba8Premul,
            pixels: Some(Arc::new(data)),
        })
    }

    /// A `width`x`height` buffer filled with one premultiplied pixel.
    pub fn filled(width: u32, height: u32, premul: [u8; 4]) -> StackResult<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| StackError::validation("pixel buffer size overflow"))?;
        Self::from_rgba8_premul(width, height, premul.repeat(len))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Full image bounds, `[0, 0, width, height]`.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    pub fn is_recycled(&self) -> bool {
        self.pixels.is_none()
    }

    /// Pixel bytes, or `None` once recycled.
    pub fn pixels(&self) -> Option<&[u8]> {
        self.pixels.as_deref().map(Vec::as_slice)
    }

    /// Release the pixel storage. Idempotent.
    ///
    /// Views taken before recycling keep their own reference and stay readable until dropped.
    pub fn recycle(&mut self) {
        if self.pixels.take().is_some() {
            tracing::trace!(width = self.width, height = self.height, "pixel buffer recycled");
        }
    }

    /// Read-only handle for a draw snapshot. `None` once recycled.
    pub fn view(&self) -> Option<ImageView> {
        self.pixels.as_ref().map(|pixels| ImageView {
            width: self.width,
            height: self.height,
            pixels: Arc::clone(pixels),
        })
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("recycled", &self.is_recycled())
            .finish()
    }
}

/// Immutable view of live pixels, cheap to clone into draw snapshots.
#[derive(Clone)]
pub struct ImageView {
    width: u32,
    height: u32,
    pixels: Arc<Vec<u8>>,
}

impl ImageView {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Premultiplied RGBA8 bytes.
    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_slice()
    }

    /// Premultiplied pixel at `(x, y)`; coordinates are clamped to the image.
    pub fn pixel_clamped(&self, x: i64, y: i64) -> [u8; 4] {
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        let idx = (y * self.width as usize + x) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// True when both views read the same pixel storage.
    pub fn same_pixels(&self, other: &ImageView) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl std::fmt::Debug for ImageView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageView")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixels_ptr", &Arc::as_ptr(&self.pixels))
            .finish()
    }
}

/// An externally owned constant image (placeholder, empty-stack border).
///
/// Slots only reference shared images; they never release them.
#[derive(Clone, Debug)]
pub struct SharedImage {
    view: ImageView,
}

impl SharedImage {
    /// Freeze a decoded buffer into a shared constant.
    pub fn new(buffer: PixelBuffer) -> StackResult<Self> {
        let view = buffer.view().ok_or_else(|| {
            StackError::validation("shared image cannot be built from a recycled buffer")
        })?;
        Ok(Self { view })
    }

    pub fn view(&self) -> &ImageView {
        &self.view
    }

    pub fn ptr_eq(&self, other: &SharedImage) -> bool {
        self.view.same_pixels(&other.view)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/buffer.rs"]
mod tests;
