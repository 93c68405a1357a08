use serde::{Deserialize, Serialize};

use crate::{
    foundation::{
        core::{Rect, Rgba8},
        error::{StackError, StackResult},
    },
    layout::config::{BASELINE_DENSITY_DPI, StackConfig},
    render::blur::{kernel_radius, radius_to_sigma},
};

/// Paint used for the rectangle drawn under each slot.
///
/// `fill` is the rectangle's own color; `radius`, `dx`, `dy` and `color` describe the
/// blurred drop shadow it casts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSpec {
    pub fill: Rgba8,
    pub radius: f32,
    pub dx: f32,
    pub dy: f32,
    pub color: Rgba8,
}

impl Default for ShadowSpec {
    fn default() -> Self {
        Self {
            fill: Rgba8::new(0xfa, 0xfa, 0xfa, 0xff),
            radius: 8.0,
            dx: 0.0,
            dy: 6.0,
            color: Rgba8::BLACK,
        }
    }
}

impl ShadowSpec {
    pub fn validate(&self) -> StackResult<()> {
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(StackError::config("shadow radius must be finite and >= 0"));
        }
        if !self.dx.is_finite() || !self.dy.is_finite() {
            return Err(StackError::config("shadow offset must be finite"));
        }
        Ok(())
    }

    /// Pixels the blurred shadow spreads past its offset rectangle on every side.
    pub fn blur_extent(&self) -> u32 {
        kernel_radius(radius_to_sigma(self.radius))
    }

    /// True when the blurred shadow layer contributes any pixels.
    pub fn casts_shadow(&self) -> bool {
        !self.color.is_transparent()
    }
}

/// Convert density-independent units to whole pixels (truncating).
pub fn dp_to_px(dp: f32, density_dpi: u32) -> i32 {
    (dp * (density_dpi as f32 / BASELINE_DENSITY_DPI as f32)) as i32
}

/// Convert pixels back to density-independent units.
pub fn px_to_dp(px: f32, density_dpi: u32) -> f32 {
    px / (density_dpi as f32 / BASELINE_DENSITY_DPI as f32)
}

/// Pixel geometry of the stack, derived once from [`StackConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackGeometry {
    pub side: u32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub shadow: ShadowSpec,
}

impl StackGeometry {
    pub fn new(side: u32, offset_x: i32, offset_y: i32, shadow: ShadowSpec) -> Self {
        Self {
            side,
            offset_x,
            offset_y,
            shadow,
        }
    }

    pub fn from_config(cfg: &StackConfig) -> StackResult<Self> {
        cfg.validate()?;
        Ok(Self::new(
            cfg.image_side_px,
            dp_to_px(cfg.offset_x_dp, cfg.density_dpi),
            dp_to_px(cfg.offset_y_dp, cfg.density_dpi),
            cfg.shadow,
        ))
    }

    /// Destination rectangle of slot `index`:
    /// `[offset_x*i, offset_y*i, side + offset_x*i, side + offset_y*i]`.
    pub fn rect(&self, index: usize) -> Rect {
        let i = index as f64;
        let x = f64::from(self.offset_x) * i;
        let y = f64::from(self.offset_y) * i;
        let side = f64::from(self.side);
        Rect::new(x, y, side + x, side + y)
    }

    /// Union of the first `slots` rectangles (shadow excluded).
    pub fn bounds(&self, slots: usize) -> Rect {
        (1..slots).fold(self.rect(0), |acc, i| acc.union(self.rect(i)))
    }

    /// Pixel size of a surface holding `slots` slots plus the shadow spill on the
    /// bottom/right edges: the shadow offset plus the blur kernel's reach.
    pub fn surface_size(&self, slots: usize) -> (u32, u32) {
        let b = self.bounds(slots);
        let (spill_x, spill_y) = if self.shadow.casts_shadow() {
            let extent = f64::from(self.shadow.blur_extent());
            (
                (f64::from(self.shadow.dx) + extent).max(0.0),
                (f64::from(self.shadow.dy) + extent).max(0.0),
            )
        } else {
            (0.0, 0.0)
        };
        let w = (b.x1.max(0.0) + spill_x).ceil().max(1.0);
        let h = (b.y1.max(0.0) + spill_y).ceil().max(1.0);
        (w as u32, h as u32)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
