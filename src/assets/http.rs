use std::path::Path;
use std::time::Duration;

use crate::assets::chain::Unavailable;
use crate::config::HttpConfig;
use crate::foundation::error::{ReelError, ReelResult};

/// A GET request returning JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JsonRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl JsonRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.push((key.to_string(), value.into()));
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Network seam used by every provider. Calls are blocking and individually time-bounded.
pub trait HttpFetch: Send + Sync {
    fn get_json(&self, req: &JsonRequest) -> Result<serde_json::Value, Unavailable>;

    /// Stream `url` into `dest`, returning the byte count.
    fn download(&self, url: &str, dest: &Path) -> Result<u64, Unavailable>;
}

/// `reqwest::blocking` implementation of [`HttpFetch`].
pub struct BlockingHttp {
    client: reqwest::blocking::Client,
    search_timeout: Duration,
    download_timeout: Duration,
}

impl BlockingHttp {
    pub fn new(cfg: &HttpConfig) -> ReelResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("nightreel/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReelError::config(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            search_timeout: cfg.search_timeout(),
            download_timeout: cfg.download_timeout(),
        })
    }
}

impl HttpFetch for BlockingHttp {
    fn get_json(&self, req: &JsonRequest) -> Result<serde_json::Value, Unavailable> {
        let mut builder = self
            .client
            .get(&req.url)
            .query(&req.query)
            .timeout(self.search_timeout);
        for (k, v) in &req.headers {
            builder = builder.header(k.as_str(), v.as_str());
        }
        let res = builder
            .send()
            .map_err(|e| Unavailable::Http(format!("request to {} failed: {e}", req.url)))?;
        let status = res.status();
        if !status.is_success() {
            return Err(Unavailable::Http(format!("{} returned {status}", req.url)));
        }
        res.json::<serde_json::Value>()
            .map_err(|e| Unavailable::Http(format!("invalid json from {}: {e}", req.url)))
    }

    fn download(&self, url: &str, dest: &Path) -> Result<u64, Unavailable> {
        let mut res = self
            .client
            .get(url)
            .timeout(self.download_timeout)
            .send()
            .map_err(|e| Unavailable::Http(format!("download {url} failed: {e}")))?;
        let status = res.status();
        if !status.is_success() {
            return Err(Unavailable::Http(format!("download {url} returned {status}")));
        }

        write_atomically(dest, |file| {
            res.copy_to(file)
                .map_err(|e| Unavailable::Http(format!("download {url} interrupted: {e}")))
        })
    }
}

/// Filename prefix of the staging files a download of `dest` goes through.
///
/// Each writer gets its own uniquely suffixed sibling, `.<name>.<random>.part`.
pub fn partial_prefix(dest: &Path) -> String {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(".{name}.")
}

/// Write through a private staging file and publish it without replacing an existing entry.
///
/// Readers never observe a truncated cache entry. When another writer published `dest` first,
/// its file wins and this write is discarded.
pub fn write_atomically<F>(dest: &Path, write: F) -> Result<u64, Unavailable>
where
    F: FnOnce(&mut std::fs::File) -> Result<u64, Unavailable>,
{
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;
    let mut staged = tempfile::Builder::new()
        .prefix(&partial_prefix(dest))
        .suffix(".part")
        .tempfile_in(parent)?;
    let written = write(staged.as_file_mut())?;
    staged.as_file_mut().sync_all()?;

    match staged.persist_noclobber(dest) {
        Ok(_) => Ok(written),
        Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
            tracing::debug!(path = %dest.display(), "cache entry published by another writer");
            Ok(written)
        }
        Err(e) => Err(e.error.into()),
    }
}

/// Outcome of [`fetch_into_cache`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheFetch {
    Downloaded(u64),
    AlreadyCached,
}

/// Download `url` to `dest` unless a file with that name already exists.
pub fn fetch_into_cache(
    http: &dyn HttpFetch,
    url: &str,
    dest: &Path,
) -> Result<CacheFetch, Unavailable> {
    if dest.is_file() {
        tracing::debug!(path = %dest.display(), "cache hit, skipping download");
        return Ok(CacheFetch::AlreadyCached);
    }
    let n = http.download(url, dest)?;
    tracing::info!(path = %dest.display(), bytes = n, "downloaded asset");
    Ok(CacheFetch::Downloaded(n))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/http.rs"]
mod tests;
