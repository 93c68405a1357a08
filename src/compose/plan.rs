use crate::{
    assets::buffer::ImageView,
    cache::slot::SlotView,
    foundation::core::Rect,
    layout::geometry::{ShadowSpec, StackGeometry},
};

/// Draw operation emitted by [`composite`].
#[derive(Clone, Debug)]
pub enum DrawOp {
    /// Shadow-casting rectangle under a slot.
    ShadowRect {
        slot: usize,
        rect: Rect,
        shadow: ShadowSpec,
    },
    /// Blit `src` of `image` scaled into `dst`.
    Image {
        slot: usize,
        image: ImageView,
        src: Rect,
        dst: Rect,
    },
}

impl DrawOp {
    pub fn slot(&self) -> usize {
        match self {
            Self::ShadowRect { slot, .. } | Self::Image { slot, .. } => *slot,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image { .. })
    }
}

/// Turn a slot snapshot into an ordered draw list.
///
/// Slots are visited back to front (`len-1` down to `0`) so slot 0 ends up on top. Every
/// slot gets a shadow rectangle; slots with live pixels also get an image blit covering
/// the same rectangle.
pub fn composite(slots: &[SlotView], geometry: &StackGeometry) -> Vec<DrawOp> {
    let mut ops = Vec::with_capacity(slots.len() * 2);
    for (index, slot) in slots.iter().enumerate().rev() {
        let rect = geometry.rect(index);
        ops.push(DrawOp::ShadowRect {
            slot: index,
            rect,
            shadow: geometry.shadow,
        });
        if let Some(image) = &slot.image {
            ops.push(DrawOp::Image {
                slot: index,
                src: image.bounds(),
                image: image.clone(),
                dst: rect,
            });
        }
    }
    ops
}

#[cfg(test)]
#[path = "../../tests/unit/compose/plan.rs"]
mod tests;
