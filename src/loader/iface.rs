use std::sync::{Arc, mpsc};

use crate::{assets::buffer::PixelBuffer, cache::slot::LoadToken};

/// One image to fetch for one slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    pub token: LoadToken,
    pub url: String,
}

/// Why a load did not produce an image.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadFailure {
    #[error("malformed url '{0}'")]
    InvalidUrl(String),
    #[error("load cancelled")]
    Cancelled,
    #[error("unsupported url scheme in '{0}'")]
    Unsupported(String),
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("decode failed: {0}")]
    Decode(String),
}

/// Terminal result of a [`LoadRequest`]. Exactly one is produced per token.
#[derive(Debug)]
pub struct LoadOutcome {
    pub token: LoadToken,
    pub result: Result<PixelBuffer, LoadFailure>,
}

/// Wakes the owner thread's event loop so it drains completions promptly.
pub trait EventLoopWaker: Send + Sync {
    fn wake(&self);
}

/// Cloneable sending half of the completion channel handed to loaders.
///
/// Outcomes are applied on the owner thread when it drains the receiving half, which
/// serializes them against `reset`/`populate`.
#[derive(Clone)]
pub struct Completions {
    tx: mpsc::Sender<LoadOutcome>,
    waker: Option<Arc<dyn EventLoopWaker>>,
}

impl Completions {
    pub fn channel() -> (Self, mpsc::Receiver<LoadOutcome>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx, waker: None }, rx)
    }

    pub fn with_waker(mut self, waker: Arc<dyn EventLoopWaker>) -> Self {
        self.waker = Some(waker);
        self
    }

    /// Send an outcome to the owner thread. Returns `false` once the owner is gone.
    pub fn deliver(&self, outcome: LoadOutcome) -> bool {
        if self.tx.send(outcome).is_err() {
            return false;
        }
        if let Some(waker) = &self.waker {
            waker.wake();
        }
        true
    }
}

impl std::fmt::Debug for Completions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completions")
            .field("has_waker", &self.waker.is_some())
            .finish()
    }
}

/// Asynchronous image source.
///
/// `load` must not block; the outcome is delivered later through `completions`.
/// `cancel` is advisory: a cancelled load may still deliver, and the slot cache discards
/// it by token.
pub trait ImageLoader {
    fn load(&self, request: LoadRequest, completions: &Completions);

    fn cancel(&self, token: LoadToken);
}

impl<L: ImageLoader + ?Sized> ImageLoader for Box<L> {
    fn load(&self, request: LoadRequest, completions: &Completions) {
        (**self).load(request, completions)
    }

    fn cancel(&self, token: LoadToken) {
        (**self).cancel(token)
    }
}

/// URLs that fail immediately without reaching a loader.
pub fn is_malformed_url(url: &str) -> bool {
    url.trim().is_empty()
}

#[cfg(test)]
#[path = "../../tests/unit/loader/iface.rs"]
mod tests;
