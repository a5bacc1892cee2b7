//! Background image search (Pexels).

use std::path::PathBuf;
use std::sync::Arc;

use crate::assets::chain::{FallbackChain, Provider, Unavailable};
use crate::assets::http::{HttpFetch, JsonRequest, fetch_into_cache};
use crate::config::Config;

pub const PEXELS_SEARCH_URL: &str = "https://api.pexels.com/v1/search";
/// Mood bias prepended to the topic for every image search.
pub const IMAGE_QUERY_PREFIX: &str = "dark horror creepy scary abandoned";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRequest {
    pub topic: String,
    pub count: usize,
}

pub fn image_query(topic: &str) -> String {
    let topic = topic.trim();
    if topic.is_empty() {
        IMAGE_QUERY_PREFIX.to_string()
    } else {
        format!("{IMAGE_QUERY_PREFIX} {topic}")
    }
}

#[derive(serde::Deserialize)]
struct PexelsPage {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(serde::Deserialize)]
struct PexelsPhoto {
    id: u64,
    src: PexelsSrc,
}

#[derive(serde::Deserialize)]
struct PexelsSrc {
    large2x: Option<String>,
}

pub struct PexelsImages {
    api_key: Option<String>,
    http: Arc<dyn HttpFetch>,
    cache_dir: PathBuf,
}

impl PexelsImages {
    pub fn new(api_key: Option<String>, http: Arc<dyn HttpFetch>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_key,
            http,
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_path(&self, photo_id: u64) -> PathBuf {
        self.cache_dir.join(format!("pexels_{photo_id}.jpg"))
    }
}

impl Provider<ImageRequest, Vec<PathBuf>> for PexelsImages {
    fn name(&self) -> &str {
        "pexels"
    }

    fn provide(&self, req: &ImageRequest) -> Result<Vec<PathBuf>, Unavailable> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(Unavailable::MissingCredential("PEXELS_API_KEY"))?;
        if req.count == 0 {
            return Err(Unavailable::NoResults("zero images requested".to_string()));
        }

        let search = JsonRequest::new(PEXELS_SEARCH_URL)
            .param("query", image_query(&req.topic))
            .param("per_page", req.count)
            .param("orientation", "landscape")
            .header("Authorization", key);
        let body = self.http.get_json(&search)?;
        let page: PexelsPage = serde_json::from_value(body)
            .map_err(|e| Unavailable::Http(format!("unexpected pexels response: {e}")))?;

        let mut paths = Vec::new();
        for photo in page.photos.into_iter().take(req.count) {
            let Some(url) = photo.src.large2x.filter(|u| !u.is_empty()) else {
                continue;
            };
            let dest = self.cache_path(photo.id);
            match fetch_into_cache(self.http.as_ref(), &url, &dest) {
                Ok(_) => paths.push(dest),
                Err(reason) => {
                    tracing::warn!(photo = photo.id, %reason, "skipping image download");
                }
            }
        }

        if paths.is_empty() {
            return Err(Unavailable::NoResults(format!(
                "no images for '{}'",
                req.topic
            )));
        }
        Ok(paths)
    }
}

/// Image half of the AssetResolver. Never fails: an exhausted chain is an empty list.
pub struct ImageResolver {
    chain: FallbackChain<ImageRequest, Vec<PathBuf>>,
}

impl ImageResolver {
    pub fn new(chain: FallbackChain<ImageRequest, Vec<PathBuf>>) -> Self {
        Self { chain }
    }

    pub fn from_config(cfg: &Config, http: Arc<dyn HttpFetch>) -> Self {
        Self::new(FallbackChain::new().with(PexelsImages::new(
            cfg.credentials.pexels.clone(),
            http,
            cfg.assets.image_cache_dir.clone(),
        )))
    }

    /// Up to `count` local image paths in provider-ranked order.
    #[tracing::instrument(skip(self))]
    pub fn resolve(&self, topic: &str, count: usize) -> Vec<PathBuf> {
        let req = ImageRequest {
            topic: topic.to_string(),
            count,
        };
        match self.chain.resolve(&req) {
            Some(resolved) => {
                let mut paths = resolved.value;
                paths.truncate(count);
                tracing::info!(images = paths.len(), requested = count, "resolved background images");
                paths
            }
            None => {
                tracing::info!(requested = count, "no background images, using procedural backgrounds");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/images.rs"]
mod tests;
