//! The image-stack widget.
//!
//! [`ImageStack`] is driven from a single owner thread: construction, [`set_images`],
//! geometry changes, draw passes and [`pump`] all take `&mut self` or `&self` there.
//! Loaders run elsewhere and only ever talk back through the completion channel, so slot
//! state is never mutated concurrently.
//!
//! [`set_images`]: ImageStack::set_images
//! [`pump`]: ImageStack::pump

use std::{
    path::Path,
    sync::{Arc, mpsc},
    time::{Duration, Instant},
};

use tracing::{debug, info, warn};

use crate::{
    cache::{
        slot::SlotView,
        slot_cache::{Delivery, SlotCache},
    },
    compose::plan::composite,
    foundation::error::StackResult,
    layout::{
        config::{StackConfig, StackImages},
        geometry::StackGeometry,
    },
    loader::iface::{
        Completions, EventLoopWaker, ImageLoader, LoadFailure, LoadOutcome, is_malformed_url,
    },
    render::canvas::{StackCanvas, execute_ops},
};

/// Redraw requests from the widget to its host.
pub trait Invalidate {
    fn invalidate(&mut self);
}

/// A stack of up to [`SLOT_COUNT`](crate::SLOT_COUNT) remotely loaded images.
pub struct ImageStack<L: ImageLoader, H: Invalidate> {
    config: StackConfig,
    geometry: StackGeometry,
    cache: SlotCache,
    loader: L,
    host: H,
    completions: Completions,
    inbox: mpsc::Receiver<LoadOutcome>,
}

impl<L: ImageLoader, H: Invalidate> ImageStack<L, H> {
    /// Build a widget from an already-loaded set of shared images. All slots start `Empty`.
    pub fn new(config: StackConfig, images: StackImages, loader: L, host: H) -> StackResult<Self> {
        let geometry = StackGeometry::from_config(&config)?;
        let (completions, inbox) = Completions::channel();
        Ok(Self {
            config,
            geometry,
            cache: SlotCache::new(images.placeholder, images.empty_stack_border),
            loader,
            host,
            completions,
            inbox,
        })
    }

    /// Build a widget, loading the placeholder and border images relative to `assets_root`.
    pub fn from_config(
        config: StackConfig,
        assets_root: &Path,
        loader: L,
        host: H,
    ) -> StackResult<Self> {
        let images = config.load_images(assets_root)?;
        Self::new(config, images, loader, host)
    }

    /// Wake the host event loop whenever a load completes.
    pub fn with_waker(mut self, waker: Arc<dyn EventLoopWaker>) -> Self {
        self.completions = self.completions.with_waker(waker);
        self
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    pub fn geometry(&self) -> &StackGeometry {
        &self.geometry
    }

    pub fn cache(&self) -> &SlotCache {
        &self.cache
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Slots still waiting for a load outcome.
    pub fn pending_loads(&self) -> usize {
        self.cache.pending_count()
    }

    /// Replace the stack's images.
    ///
    /// Every slot drops back to the placeholder and in-flight loads are cancelled, then one
    /// load per URL (up to the slot count) is issued. Zero URLs show the empty-stack border.
    /// A redraw is requested before any load can land.
    #[tracing::instrument(skip(self, urls), fields(count = urls.len()))]
    pub fn set_images<S: AsRef<str>>(&mut self, urls: &[S]) {
        let report = self.cache.reset();
        for token in &report.cancelled {
            self.loader.cancel(*token);
        }

        let requests = self.cache.populate(urls);
        self.host.invalidate();

        for request in requests {
            if is_malformed_url(&request.url) {
                let failure = LoadFailure::InvalidUrl(request.url.clone());
                if self.cache.on_load_failed(request.token, &failure).is_applied() {
                    self.host.invalidate();
                }
                continue;
            }
            debug!(token = %request.token, url = %request.url, "issuing load");
            self.loader.load(request, &self.completions);
        }
    }

    /// Apply one load outcome. Applied outcomes request exactly one redraw.
    pub fn deliver(&mut self, outcome: LoadOutcome) -> Delivery {
        let LoadOutcome { token, result } = outcome;
        let delivery = match result {
            Ok(buffer) => self.cache.on_load_succeeded(token, buffer),
            Err(failure) => self.cache.on_load_failed(token, &failure),
        };
        if delivery.is_applied() {
            self.host.invalidate();
        }
        delivery
    }

    /// Drain every completion already received, without blocking. Returns how many were
    /// applied (stale ones are discarded).
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.inbox.try_recv() {
            if self.deliver(outcome).is_applied() {
                applied += 1;
            }
        }
        applied
    }

    /// Block until no slot is pending or `timeout` elapses. Returns `true` when settled.
    ///
    /// Intended for headless hosts; interactive hosts call [`pump`](Self::pump) from their
    /// event loop instead.
    pub fn wait_for_loads(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut applied = self.pump();
        while self.cache.pending_count() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!(
                    pending = self.cache.pending_count(),
                    applied, "timed out waiting for loads"
                );
                return false;
            }
            match self.inbox.recv_timeout(remaining) {
                Ok(outcome) => {
                    if self.deliver(outcome).is_applied() {
                        applied += 1;
                    }
                }
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => return false,
            }
        }
        debug!(applied, "all loads settled");
        true
    }

    /// Recompute geometry from a new configuration. Slot content is untouched; the shared
    /// images keep the ones built at construction.
    pub fn on_geometry_change(&mut self, config: StackConfig) -> StackResult<()> {
        self.geometry = StackGeometry::from_config(&config)?;
        self.config = config;
        info!(side = self.geometry.side, "stack geometry updated");
        self.host.invalidate();
        Ok(())
    }

    pub fn snapshot(&self) -> Vec<SlotView> {
        self.cache.snapshot()
    }

    /// Draw pass: clear, composite a snapshot, execute the ops.
    #[tracing::instrument(skip_all)]
    pub fn draw<C: StackCanvas + ?Sized>(&self, canvas: &mut C) -> StackResult<()> {
        canvas.clear()?;
        let ops = composite(&self.snapshot(), &self.geometry);
        debug!(ops = ops.len(), "drawing stack");
        execute_ops(canvas, &ops)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/stack.rs"]
mod tests;
