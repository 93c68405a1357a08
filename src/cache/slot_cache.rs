use tracing::{debug, trace, warn};

use crate::{
    assets::buffer::{PixelBuffer, SharedImage},
    cache::slot::{LoadToken, SLOT_COUNT, Slot, SlotContent, SlotKind, SlotView},
    loader::iface::{LoadFailure, LoadRequest},
};

/// Result of handing a load outcome to the cache.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The outcome matched the slot's pending token and was applied; redraw.
    Applied,
    /// The token was superseded or already settled; nothing changed.
    Stale,
}

impl Delivery {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

/// Side effects of [`SlotCache::reset`] the caller must act on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResetReport {
    /// Tokens that were in flight; forward them to the loader's `cancel`.
    pub cancelled: Vec<LoadToken>,
    /// Number of loaded buffers released.
    pub released: usize,
}

/// Fixed set of [`SLOT_COUNT`] slots, each independently populated by async loads.
///
/// The cache owns every loaded buffer it holds and releases it when superseded. Shared
/// constants (placeholder, empty-stack border) are referenced, never released. Each
/// slot's content and pending token are only ever replaced together through `&mut self`.
#[derive(Debug)]
pub struct SlotCache {
    slots: [Slot; SLOT_COUNT],
    placeholder: SharedImage,
    empty_stack_border: SharedImage,
    next_serial: u64,
}

impl SlotCache {
    pub fn new(placeholder: SharedImage, empty_stack_border: SharedImage) -> Self {
        Self {
            slots: Default::default(),
            placeholder,
            empty_stack_border,
            next_serial: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn kind(&self, index: usize) -> Option<SlotKind> {
        self.slots.get(index).map(Slot::kind)
    }

    pub fn pending_token(&self, index: usize) -> Option<LoadToken> {
        self.slots.get(index).and_then(Slot::pending)
    }

    /// Number of slots still waiting for a load outcome.
    pub fn pending_count(&self) -> usize {
        self.slots.iter().filter(|s| s.pending.is_some()).count()
    }

    pub fn placeholder(&self) -> &SharedImage {
        &self.placeholder
    }

    pub fn empty_stack_border(&self) -> &SharedImage {
        &self.empty_stack_border
    }

    /// Invalidate every pending token, release every loaded buffer and show placeholders.
    pub fn reset(&mut self) -> ResetReport {
        let mut report = ResetReport::default();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if let Some(token) = slot.pending.take() {
                report.cancelled.push(token);
            }
            let prev = std::mem::replace(
                &mut slot.content,
                SlotContent::Placeholder(self.placeholder.clone()),
            );
            if let SlotContent::Loaded(mut buffer) = prev {
                buffer.recycle();
                report.released += 1;
                debug!(slot = index, "released loaded image on reset");
            }
        }
        debug!(
            cancelled = report.cancelled.len(),
            released = report.released,
            "slot cache reset"
        );
        report
    }

    /// Issue load requests for the first [`SLOT_COUNT`] URLs.
    ///
    /// With no URLs at all every slot shows the empty-stack border and nothing is issued.
    /// Slots beyond the URL count keep their current (placeholder) content. Callers reset
    /// first so no in-flight load from an earlier call can land in these slots.
    ///
    /// Pending tokens are only handed back by [`reset`](Self::reset), so populating over
    /// them is a caller bug: debug builds panic on it.
    pub fn populate<S: AsRef<str>>(&mut self, urls: &[S]) -> Vec<LoadRequest> {
        debug_assert_eq!(
            self.pending_count(),
            0,
            "populate called with loads still pending; reset first"
        );
        if urls.is_empty() {
            for slot in &mut self.slots {
                slot.pending = None;
                let prev = std::mem::replace(
                    &mut slot.content,
                    SlotContent::EmptyStackBorder(self.empty_stack_border.clone()),
                );
                if let SlotContent::Loaded(mut buffer) = prev {
                    buffer.recycle();
                }
            }
            debug!("no urls; showing empty stack border");
            return Vec::new();
        }

        if urls.len() > SLOT_COUNT {
            debug!(
                supplied = urls.len(),
                used = SLOT_COUNT,
                "ignoring urls beyond slot count"
            );
        }

        let mut requests = Vec::with_capacity(urls.len().min(SLOT_COUNT));
        for (index, url) in urls.iter().take(SLOT_COUNT).enumerate() {
            let token = LoadToken::new(index, self.next_serial);
            self.next_serial += 1;
            let slot = &mut self.slots[index];
            if let Some(prev) = slot.pending.replace(token) {
                debug!(%prev, %token, "pending token superseded without reset");
            }
            requests.push(LoadRequest {
                token,
                url: url.as_ref().to_string(),
            });
        }
        requests
    }

    /// Hand a decoded image to the slot named by `token`.
    ///
    /// Stale tokens leave the slot untouched and the unused buffer is released.
    pub fn on_load_succeeded(&mut self, token: LoadToken, mut buffer: PixelBuffer) -> Delivery {
        let Some(slot) = self.current_slot(token) else {
            trace!(%token, "stale load success discarded");
            buffer.recycle();
            return Delivery::Stale;
        };

        let prev = std::mem::replace(&mut slot.content, SlotContent::Loaded(buffer));
        slot.pending = None;
        if let SlotContent::Loaded(mut old) = prev {
            old.recycle();
        }
        debug!(%token, "slot loaded");
        Delivery::Applied
    }

    /// Settle the slot named by `token` as failed; it keeps its placeholder.
    pub fn on_load_failed(&mut self, token: LoadToken, failure: &LoadFailure) -> Delivery {
        let Some(slot) = self.current_slot(token) else {
            trace!(%token, %failure, "stale load failure discarded");
            return Delivery::Stale;
        };

        slot.pending = None;
        warn!(%token, %failure, "image load failed; keeping placeholder");
        Delivery::Applied
    }

    /// Per-slot views in slot order.
    pub fn snapshot(&self) -> Vec<SlotView> {
        self.slots.iter().map(Slot::view).collect()
    }

    fn current_slot(&mut self, token: LoadToken) -> Option<&mut Slot> {
        self.slots
            .get_mut(token.slot())
            .filter(|slot| slot.pending == Some(token))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/slot_cache.rs"]
mod tests;
