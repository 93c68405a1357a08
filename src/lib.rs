//! imgstack renders a small, staggered stack of remotely loaded images.
//!
//! The crate is the core of an image-stack widget: up to [`SLOT_COUNT`] images are drawn
//! back to front, each offset from the one in front of it and each sitting on a filled,
//! shadowed rectangle.
//!
//! # Pieces
//!
//! 1. **Slot cache** ([`SlotCache`]): per-slot content plus the [`LoadToken`] of the load
//!    that may still fill it. Outcomes carrying any other token are stale and discarded.
//! 2. **Loaders** ([`ImageLoader`]): asynchronous fetch and decode. Outcomes travel back to
//!    the owner thread over a [`Completions`] channel; [`PooledLoader`] runs jobs on a
//!    rayon pool.
//! 3. **Compositor** ([`composite`]): a pure function from slot snapshots and
//!    [`StackGeometry`] to an ordered list of [`DrawOp`]s.
//! 4. **Canvas** ([`StackCanvas`]): the host drawing surface. [`RasterCanvas`] is a CPU
//!    implementation working in premultiplied RGBA8.
//! 5. **Widget** ([`ImageStack`]): ties the above together and asks its host to redraw
//!    through [`Invalidate`].
//!
//! Loaded images are owned [`PixelBuffer`]s. A slot releases the buffer it replaces exactly
//! once; the shared placeholder and border images are never released.
#![forbid(unsafe_code)]

mod assets;
mod cache;
mod compose;
mod foundation;
mod layout;
mod loader;
mod render;
mod widget;

pub use assets::buffer::{ImageView, PixelBuffer, PixelFormat, SharedImage};
pub use assets::decode::{decode_image, rasterize_svg};
pub use cache::slot::{LoadToken, SLOT_COUNT, Slot, SlotContent, SlotKind, SlotView};
pub use cache::slot_cache::{Delivery, ResetReport, SlotCache};
pub use compose::plan::{DrawOp, composite};
pub use foundation::core::{Point, Rect, Rgba8, Size, Vec2};
pub use foundation::error::{StackError, StackResult};
pub use layout::config::{BASELINE_DENSITY_DPI, ImageSource, StackConfig, StackImages};
pub use layout::geometry::{ShadowSpec, StackGeometry, dp_to_px, px_to_dp};
#[cfg(feature = "http")]
pub use loader::fetch::HttpFetcher;
pub use loader::fetch::{FileFetcher, Fetcher, SchemeFetcher, url_scheme};
pub use loader::iface::{
    Completions, EventLoopWaker, ImageLoader, LoadFailure, LoadOutcome, LoadRequest,
    is_malformed_url,
};
pub use loader::pooled::PooledLoader;
pub use render::canvas::{StackCanvas, execute_ops};
pub use render::cpu::RasterCanvas;
pub use widget::stack::{ImageStack, Invalidate};
