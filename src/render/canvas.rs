use crate::{
    assets::buffer::ImageView,
    compose::plan::DrawOp,
    foundation::{core::Rect, error::StackResult},
    layout::geometry::ShadowSpec,
};

/// Host drawing surface the widget renders into.
pub trait StackCanvas {
    /// Clear every pixel to transparent.
    fn clear(&mut self) -> StackResult<()>;

    /// Fill `rect` with `shadow.fill`, casting the blurred shadow described by `shadow`.
    fn fill_shadow_rect(&mut self, rect: Rect, shadow: &ShadowSpec) -> StackResult<()>;

    /// Draw the `src` region of `image` scaled into `dst`.
    fn draw_image(&mut self, image: &ImageView, src: Rect, dst: Rect) -> StackResult<()>;
}

/// Run `ops` against `canvas` in order.
pub fn execute_ops<C: StackCanvas + ?Sized>(canvas: &mut C, ops: &[DrawOp]) -> StackResult<()> {
    for op in ops {
        match op {
            DrawOp::ShadowRect { rect, shadow, .. } => canvas.fill_shadow_rect(*rect, shadow)?,
            DrawOp::Image {
                image, src, dst, ..
            } => canvas.draw_image(image, *src, *dst)?,
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
