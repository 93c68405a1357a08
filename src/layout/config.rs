//! Construction-time configuration of an image stack.
//!
//! Configuration is fixed for the lifetime of a widget. Values are expressed the way a
//! host toolkit would hand them over: the image side in pixels, stagger offsets in
//! density-independent units, plus the shadow paint and the two shared constant images.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    assets::{
        buffer::{PixelBuffer, SharedImage},
        decode::{decode_image, rasterize_svg},
    },
    foundation::{
        core::Rgba8,
        error::{StackError, StackResult},
    },
    layout::geometry::ShadowSpec,
};

/// Baseline density: one dp equals one pixel at 160 dpi.
pub const BASELINE_DENSITY_DPI: u32 = 160;

const DEFAULT_BORDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="96" height="96">
  <rect x="2" y="2" width="92" height="92" rx="4" fill="none" stroke="#9e9e9e" stroke-width="3" stroke-dasharray="8 6"/>
</svg>"##;

/// Root configuration, deserializable from JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Side length of every (square) slot rectangle, in pixels.
    pub image_side_px: u32,
    /// Horizontal stagger per slot index, in dp.
    pub offset_x_dp: f32,
    /// Vertical stagger per slot index, in dp.
    pub offset_y_dp: f32,
    /// Display density used for dp to pixel conversion.
    pub density_dpi: u32,
    /// Shadow paint drawn under every slot.
    pub shadow: ShadowSpec,
    /// Image shown while a slot is waiting for (or failed) its load.
    pub placeholder: ImageSource,
    /// Image shown in every slot when no URLs are supplied at all.
    pub empty_stack_border: ImageSource,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            image_side_px: 96,
            offset_x_dp: 7.0,
            offset_y_dp: 4.0,
            density_dpi: BASELINE_DENSITY_DPI,
            shadow: ShadowSpec::default(),
            placeholder: ImageSource::Solid {
                color: Rgba8::new(0xe0, 0xe0, 0xe0, 0xff),
            },
            empty_stack_border: ImageSource::SvgInline {
                svg: DEFAULT_BORDER_SVG.to_string(),
            },
        }
    }
}

impl StackConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> StackResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| StackError::config(format!("invalid stack config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: &Path) -> StackResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read stack config '{}'", path.display()))?;
        Self::from_json(&json)
    }

    pub fn to_json_pretty(&self) -> StackResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StackError::config(format!("serialize stack config: {e}")))
    }

    pub fn validate(&self) -> StackResult<()> {
        if self.image_side_px == 0 {
            return Err(StackError::config("image_side_px must be > 0"));
        }
        if self.density_dpi == 0 {
            return Err(StackError::config("density_dpi must be > 0"));
        }
        if !self.offset_x_dp.is_finite() || !self.offset_y_dp.is_finite() {
            return Err(StackError::config("offsets must be finite"));
        }
        self.shadow.validate()
    }

    /// Load both shared constant images. Relative paths resolve against `root`.
    pub fn load_images(&self, root: &Path) -> StackResult<StackImages> {
        let side = self.image_side_px;
        Ok(StackImages {
            placeholder: self.placeholder.load(root, side)?,
            empty_stack_border: self.empty_stack_border.load(root, side)?,
        })
    }
}

/// The two shared constants every slot may reference.
#[derive(Clone, Debug)]
pub struct StackImages {
    pub placeholder: SharedImage,
    pub empty_stack_border: SharedImage,
}

/// Where a constant image comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSource {
    /// A square of one color.
    Solid { color: Rgba8 },
    /// A raster file, or an SVG file when the extension is `.svg`.
    File { path: PathBuf },
    /// SVG markup embedded in the configuration.
    SvgInline { svg: String },
}

impl ImageSource {
    /// Materialize the source at `side`x`side` (raster files keep their own size).
    pub fn load(&self, root: &Path, side: u32) -> StackResult<SharedImage> {
        let buffer = match self {
            Self::Solid { color } => PixelBuffer::filled(side, side, color.to_premul())?,
            Self::File { path } => {
                let full = root.join(path);
                let bytes = std::fs::read(&full)
                    .with_context(|| format!("read image '{}'", full.display()))?;
                let is_svg = full
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
                if is_svg {
                    rasterize_svg(&bytes, Some((side, side)))?
                } else {
                    decode_image(&bytes)?
                }
            }
            Self::SvgInline { svg } => rasterize_svg(svg.as_bytes(), Some((side, side)))?,
        };
        SharedImage::new(buffer)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/config.rs"]
mod tests;
