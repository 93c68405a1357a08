use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::Context;
use tracing::{debug, trace};

use crate::{
    assets::{
        buffer::PixelBuffer,
        decode::{decode_image, rasterize_svg},
    },
    cache::slot::LoadToken,
    foundation::error::StackResult,
    loader::{
        fetch::Fetcher,
        iface::{Completions, ImageLoader, LoadFailure, LoadOutcome, LoadRequest},
    },
};

#[derive(Debug, Default)]
struct Registry {
    in_flight: HashSet<LoadToken>,
    cancelled: HashSet<LoadToken>,
}

/// Fetches and decodes images on a dedicated `rayon` pool.
///
/// Cancellation is cooperative: a cancelled token is checked before fetching and again
/// before delivery, and is reported as [`LoadFailure::Cancelled`].
pub struct PooledLoader<F: Fetcher + 'static> {
    pool: rayon::ThreadPool,
    fetcher: Arc<F>,
    registry: Arc<Mutex<Registry>>,
}

impl<F: Fetcher + 'static> PooledLoader<F> {
    pub fn new(fetcher: F, threads: usize) -> StackResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("imgstack-load-{i}"))
            .build()
            .context("build image loader thread pool")?;
        Ok(Self {
            pool,
            fetcher: Arc::new(fetcher),
            registry: Arc::new(Mutex::new(Registry::default())),
        })
    }

    /// Number of requests issued but not yet delivered.
    pub fn in_flight(&self) -> usize {
        lock(&self.registry).in_flight.len()
    }
}

impl<F: Fetcher + 'static> ImageLoader for PooledLoader<F> {
    fn load(&self, request: LoadRequest, completions: &Completions) {
        lock(&self.registry).in_flight.insert(request.token);

        let fetcher = Arc::clone(&self.fetcher);
        let registry = Arc::clone(&self.registry);
        let completions = completions.clone();
        self.pool.spawn(move || {
            let LoadRequest { token, url } = request;
            let result = if is_cancelled(&registry, token) {
                Err(LoadFailure::Cancelled)
            } else {
                fetch_and_decode(fetcher.as_ref(), &url)
            };

            let cancelled = {
                let mut reg = lock(&registry);
                reg.in_flight.remove(&token);
                reg.cancelled.remove(&token)
            };
            let result = match result {
                Ok(mut buffer) if cancelled => {
                    buffer.recycle();
                    Err(LoadFailure::Cancelled)
                }
                other => other,
            };

            trace!(%token, ok = result.is_ok(), "load finished");
            if !completions.deliver(LoadOutcome { token, result }) {
                debug!(%token, "owner dropped before load completed");
            }
        });
    }

    fn cancel(&self, token: LoadToken) {
        let mut reg = lock(&self.registry);
        if reg.in_flight.contains(&token) {
            reg.cancelled.insert(token);
            trace!(%token, "load cancel requested");
        }
    }
}

fn fetch_and_decode(fetcher: &dyn Fetcher, url: &str) -> Result<PixelBuffer, LoadFailure> {
    let bytes = fetcher.fetch(url)?;
    let decoded = if is_svg_url(url) {
        rasterize_svg(&bytes, None)
    } else {
        decode_image(&bytes)
    };
    decoded.map_err(|e| LoadFailure::Decode(format!("{url}: {e}")))
}

fn is_svg_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.to_ascii_lowercase().ends_with(".svg")
}

fn is_cancelled(registry: &Mutex<Registry>, token: LoadToken) -> bool {
    lock(registry).cancelled.contains(&token)
}

fn lock(registry: &Mutex<Registry>) -> std::sync::MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "../../tests/unit/loader/pooled.rs"]
mod tests;
