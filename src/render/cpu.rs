use crate::{
    assets::buffer::ImageView,
    foundation::{
        core::{Rect, Vec2},
        error::{StackError, StackResult},
        math::unpremultiply_rgba8_in_place,
    },
    layout::geometry::ShadowSpec,
    render::{
        blend::{PremulRgba8, over},
        blur::{blur_rgba8_premul, radius_to_sigma},
        canvas::StackCanvas,
    },
};

/// Software canvas over a premultiplied RGBA8 surface.
#[derive(Clone, Debug)]
pub struct RasterCanvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Integer pixel span `[x0, x1) x [y0, y1)`, already clipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Span {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32) -> StackResult<Self> {
        if width == 0 || height == 0 {
            return Err(StackError::validation("canvas must be at least 1x1"));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| StackError::validation("canvas size overflow"))?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8 pixels, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    /// Straight-alpha RGBA8 copy, suitable for PNG encoding.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }

    fn clip(&self, rect: Rect) -> Option<Span> {
        let r = rect.round();
        let span = Span {
            x0: (r.x0 as i64).max(0),
            y0: (r.y0 as i64).max(0),
            x1: (r.x1 as i64).min(i64::from(self.width)),
            y1: (r.y1 as i64).min(i64::from(self.height)),
        };
        (span.x0 < span.x1 && span.y0 < span.y1).then_some(span)
    }

    fn blend_at(&mut self, x: i64, y: i64, src: PremulRgba8) {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let dst = [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ];
        self.data[idx..idx + 4].copy_from_slice(&over(dst, src));
    }

    fn fill_rect(&mut self, rect: Rect, premul: PremulRgba8) {
        if premul[3] == 0 {
            return;
        }
        let Some(span) = self.clip(rect) else {
            return;
        };
        for y in span.y0..span.y1 {
            for x in span.x0..span.x1 {
                self.blend_at(x, y, premul);
            }
        }
    }

    fn cast_shadow(&mut self, rect: Rect, shadow: &ShadowSpec) -> StackResult<()> {
        let shifted = rect + Vec2::new(f64::from(shadow.dx), f64::from(shadow.dy));
        let color = shadow.color.to_premul();
        let sigma = radius_to_sigma(shadow.radius);
        let kr = shadow.blur_extent();
        if kr == 0 {
            self.fill_rect(shifted, color);
            return Ok(());
        }

        // Silhouette on a transparent layer with room for the blur to spread.
        let margin = f64::from(kr);
        let layer = shifted.inflate(margin, margin).round();
        let (lw, lh) = (layer.width() as u32, layer.height() as u32);
        if lw == 0 || lh == 0 {
            return Ok(());
        }
        let mut pixels = vec![0u8; lw as usize * lh as usize * 4];
        let inner = (shifted - layer.origin().to_vec2()).round();
        let (ix0, iy0) = (inner.x0.max(0.0) as usize, inner.y0.max(0.0) as usize);
        let ix1 = (inner.x1.max(0.0) as usize).min(lw as usize);
        let iy1 = (inner.y1.max(0.0) as usize).min(lh as usize);
        for y in iy0..iy1 {
            for x in ix0..ix1 {
                let idx = (y * lw as usize + x) * 4;
                pixels[idx..idx + 4].copy_from_slice(&color);
            }
        }
        let blurred = blur_rgba8_premul(&pixels, lw, lh, kr, sigma)?;

        let Some(span) = self.clip(layer) else {
            return Ok(());
        };
        let (ox, oy) = (layer.x0 as i64, layer.y0 as i64);
        for y in span.y0..span.y1 {
            for x in span.x0..span.x1 {
                let idx = (((y - oy) * i64::from(lw) + (x - ox)) as usize) * 4;
                let src = [
                    blurred[idx],
                    blurred[idx + 1],
                    blurred[idx + 2],
                    blurred[idx + 3],
                ];
                self.blend_at(x, y, src);
            }
        }
        Ok(())
    }
}

impl StackCanvas for RasterCanvas {
    fn clear(&mut self) -> StackResult<()> {
        self.data.fill(0);
        Ok(())
    }

    fn fill_shadow_rect(&mut self, rect: Rect, shadow: &ShadowSpec) -> StackResult<()> {
        if shadow.casts_shadow() {
            self.cast_shadow(rect, shadow)?;
        }
        self.fill_rect(rect, shadow.fill.to_premul());
        Ok(())
    }

    fn draw_image(&mut self, image: &ImageView, src: Rect, dst: Rect) -> StackResult<()> {
        if src.width() <= 0.0 || src.height() <= 0.0 || dst.width() <= 0.0 || dst.height() <= 0.0
        {
            return Ok(());
        }
        let Some(span) = self.clip(dst) else {
            return Ok(());
        };

        // Nearest-neighbour sampling at pixel centers.
        let sx_scale = src.width() / dst.width();
        let sy_scale = src.height() / dst.height();
        for y in span.y0..span.y1 {
            let sy = (src.y0 + ((y as f64 + 0.5) - dst.y0) * sy_scale).floor() as i64;
            for x in span.x0..span.x1 {
                let sx = (src.x0 + ((x as f64 + 0.5) - dst.x0) * sx_scale).floor() as i64;
                self.blend_at(x, y, image.pixel_clamped(sx, sy));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
