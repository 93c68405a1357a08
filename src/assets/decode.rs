use anyhow::Context;

use crate::{
    assets::buffer::PixelBuffer,
    foundation::{
        error::{StackError, StackResult},
        math::premultiply_rgba8_in_place,
    },
};

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> StackResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    PixelBuffer::from_rgba8_premul(width, height, rgba8_premul)
}

/// Rasterize SVG bytes into a premultiplied RGBA8 bitmap.
///
/// With `size == None` the document's intrinsic size is used. A degenerate size yields a
/// single transparent pixel.
pub fn rasterize_svg(bytes: &[u8], size: Option<(u32, u32)>) -> StackResult<PixelBuffer> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    let intrinsic = tree.size();

    let (width, height) = size.unwrap_or((
        intrinsic.width().ceil() as u32,
        intrinsic.height().ceil() as u32,
    ));
    if width == 0 || height == 0 {
        return PixelBuffer::filled(1, 1, [0, 0, 0, 0]);
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| StackError::decode(format!("cannot allocate {width}x{height} pixmap")))?;
    let transform = resvg::tiny_skia::Transform::from_scale(
        width as f32 / intrinsic.width(),
        height as f32 / intrinsic.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    PixelBuffer::from_rgba8_premul(width, height, pixmap.take())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
