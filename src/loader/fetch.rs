use std::path::{Path, PathBuf};

use crate::loader::iface::LoadFailure;

/// Blocking byte source for one URL; runs on loader worker threads.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadFailure>;
}

/// Split `scheme://rest`; plain paths have no scheme.
pub fn url_scheme(url: &str) -> Option<&str> {
    url.split_once("://").map(|(scheme, _)| scheme)
}

/// Reads `file://` URLs and plain paths, relative ones against `root`.
#[derive(Clone, Debug)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, url: &str) -> Result<PathBuf, LoadFailure> {
        let path = match url.split_once("://") {
            None => url,
            Some(("file", rest)) => rest,
            Some(_) => return Err(LoadFailure::Unsupported(url.to_string())),
        };
        if path.is_empty() {
            return Err(LoadFailure::InvalidUrl(url.to_string()));
        }
        Ok(self.root.join(path))
    }
}

impl Fetcher for FileFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadFailure> {
        let path = self.resolve(url)?;
        std::fs::read(&path).map_err(|e| LoadFailure::Fetch(format!("{}: {e}", path.display())))
    }
}

/// Fetches `http://` and `https://` URLs with a blocking client.
#[cfg(feature = "http")]
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    pub fn new() -> Result<Self, LoadFailure> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("imgstack/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LoadFailure::Fetch(format!("build http client: {e}")))?;
        Ok(Self { client })
    }
}

#[cfg(feature = "http")]
impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadFailure> {
        let resp = self
            .client
            .get(url)
            .header("Accept", "image/png,image/jpeg,image/gif,image/webp")
            .send()
            .map_err(|e| LoadFailure::Fetch(format!("request error for {url}: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LoadFailure::Fetch(format!(
                "http status {} for {url}",
                status.as_u16()
            )));
        }
        let bytes = resp
            .bytes()
            .map_err(|e| LoadFailure::Fetch(format!("body read error for {url}: {e}")))?;
        tracing::debug!(url, size = bytes.len(), "fetched image bytes");
        Ok(bytes.to_vec())
    }
}

/// Dispatches by URL scheme: files always, HTTP(S) when built with the `http` feature.
#[derive(Clone, Debug)]
pub struct SchemeFetcher {
    file: FileFetcher,
    #[cfg(feature = "http")]
    http: HttpFetcher,
}

impl SchemeFetcher {
    #[cfg(not(feature = "http"))]
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, LoadFailure> {
        Ok(Self {
            file: FileFetcher::new(root),
        })
    }

    #[cfg(feature = "http")]
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, LoadFailure> {
        Ok(Self {
            file: FileFetcher::new(root),
            http: HttpFetcher::new()?,
        })
    }
}

impl Fetcher for SchemeFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadFailure> {
        match url_scheme(url) {
            None | Some("file") => self.file.fetch(url),
            #[cfg(feature = "http")]
            Some("http" | "https") => self.http.fetch(url),
            Some(_) => Err(LoadFailure::Unsupported(url.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/loader/fetch.rs"]
mod tests;
