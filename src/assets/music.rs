//! Background music tiers: Pixabay, then Freesound, then the local cache.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom as _;

use crate::assets::chain::{FallbackChain, Provider, Unavailable};
use crate::assets::http::{HttpFetch, JsonRequest, fetch_into_cache};
use crate::config::Config;

pub const PIXABAY_SEARCH_URL: &str = "https://pixabay.com/api/";
pub const FREESOUND_SEARCH_URL: &str = "https://freesound.org/apiv2/search/text/";

/// Moods that map onto the dark query pool instead of being searched verbatim.
pub const DARK_MOODS: [&str; 4] = ["horror", "scary", "dark", "creepy"];

pub const DARK_MOOD_QUERIES: [&str; 10] = [
    "dark ambient",
    "horror cinematic",
    "suspense thriller",
    "creepy atmosphere",
    "scary background",
    "dark cinematic",
    "tension horror",
    "eerie ambient",
    "mysterious dark",
    "haunting melody",
];

/// Extensions recognised when scanning the music cache.
pub const MUSIC_EXTENSIONS: [&str; 4] = ["mp3", "wav", "ogg", "m4a"];

/// Upper bound of the Freesound duration filter, in seconds.
pub const FREESOUND_MAX_DURATION_SECS: u32 = 300;

pub fn mood_query<R: Rng + ?Sized>(mood: &str, rng: &mut R) -> String {
    let mood = mood.trim();
    if DARK_MOODS.iter().any(|m| m.eq_ignore_ascii_case(mood)) {
        if let Some(q) = DARK_MOOD_QUERIES.choose(rng) {
            return (*q).to_string();
        }
    }
    mood.to_string()
}

/// Replace everything but ASCII alphanumerics with `_`, for use in cache filenames.
pub fn sanitize_query(query: &str) -> String {
    query
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct MusicRequest {
    pub query: String,
    pub min_duration_secs: f64,
}

#[derive(serde::Deserialize)]
struct PixabayPage {
    #[serde(default)]
    hits: Vec<PixabayHit>,
}

#[derive(serde::Deserialize)]
struct PixabayHit {
    id: Option<u64>,
    audio: Option<String>,
    music: Option<String>,
}

impl PixabayHit {
    fn playable_url(&self) -> Option<&str> {
        [self.audio.as_deref(), self.music.as_deref()]
            .into_iter()
            .flatten()
            .find(|u| !u.is_empty())
    }
}

pub struct PixabayMusic {
    api_key: Option<String>,
    http: Arc<dyn HttpFetch>,
    cache_dir: PathBuf,
}

impl PixabayMusic {
    pub fn new(api_key: Option<String>, http: Arc<dyn HttpFetch>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_key,
            http,
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_path(&self, query: &str, track_id: u64) -> PathBuf {
        self.cache_dir
            .join(format!("pixabay_{}_{track_id}.mp3", sanitize_query(query)))
    }
}

impl Provider<MusicRequest, PathBuf> for PixabayMusic {
    fn name(&self) -> &str {
        "pixabay"
    }

    fn provide(&self, req: &MusicRequest) -> Result<PathBuf, Unavailable> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(Unavailable::MissingCredential("PIXABAY_API_KEY"))?;

        let search = JsonRequest::new(PIXABAY_SEARCH_URL)
            .param("key", key)
            .param("q", &req.query)
            .param("media_type", "music")
            .param("per_page", 10)
            .param("safesearch", "true")
            .param("order", "popular");
        let body = self.http.get_json(&search)?;
        let page: PixabayPage = serde_json::from_value(body)
            .map_err(|e| Unavailable::Http(format!("unexpected pixabay response: {e}")))?;

        let playable: Vec<&PixabayHit> = page
            .hits
            .iter()
            .filter(|h| h.playable_url().is_some())
            .collect();
        let mut rng = rand::thread_rng();
        let hit = playable
            .choose(&mut rng)
            .ok_or_else(|| Unavailable::NoResults(format!("no playable tracks for '{}'", req.query)))?;
        let url = hit
            .playable_url()
            .ok_or_else(|| Unavailable::NoResults("track without url".to_string()))?;
        let id = hit.id.unwrap_or_else(|| rng.gen_range(1000..10_000));

        let dest = self.cache_path(&req.query, id);
        fetch_into_cache(self.http.as_ref(), url, &dest)?;
        Ok(dest)
    }
}

#[derive(serde::Deserialize)]
struct FreesoundPage {
    #[serde(default)]
    results: Vec<FreesoundSound>,
}

#[derive(serde::Deserialize)]
struct FreesoundSound {
    id: u64,
    #[serde(default)]
    previews: std::collections::HashMap<String, String>,
}

pub struct FreesoundMusic {
    api_key: Option<String>,
    http: Arc<dyn HttpFetch>,
    cache_dir: PathBuf,
}

impl FreesoundMusic {
    pub fn new(api_key: Option<String>, http: Arc<dyn HttpFetch>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_key,
            http,
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_path(&self, sound_id: u64) -> PathBuf {
        self.cache_dir.join(format!("freesound_{sound_id}.mp3"))
    }
}

impl Provider<MusicRequest, PathBuf> for FreesoundMusic {
    fn name(&self) -> &str {
        "freesound"
    }

    fn provide(&self, req: &MusicRequest) -> Result<PathBuf, Unavailable> {
        let token = self
            .api_key
            .as_deref()
            .ok_or(Unavailable::MissingCredential("FREESOUND_API_KEY"))?;

        let min_secs = req.min_duration_secs.max(0.0);
        let search = JsonRequest::new(FREESOUND_SEARCH_URL)
            .param("query", format!("{} ambient loop", req.query))
            .param(
                "filter",
                format!("duration:[{min_secs} TO {FREESOUND_MAX_DURATION_SECS}]"),
            )
            .param("fields", "id,name,previews,duration")
            .param("page_size", 5)
            .param("token", token);
        let body = self.http.get_json(&search)?;
        let page: FreesoundPage = serde_json::from_value(body)
            .map_err(|e| Unavailable::Http(format!("unexpected freesound response: {e}")))?;

        let playable: Vec<(u64, &str)> = page
            .results
            .iter()
            .filter_map(|s| {
                s.previews
                    .get("preview-hq-mp3")
                    .filter(|u| !u.is_empty())
                    .map(|u| (s.id, u.as_str()))
            })
            .collect();
        let (id, url) = playable
            .choose(&mut rand::thread_rng())
            .copied()
            .ok_or_else(|| Unavailable::NoResults(format!("no previews for '{}'", req.query)))?;

        let dest = self.cache_path(id);
        fetch_into_cache(self.http.as_ref(), url, &dest)?;
        Ok(dest)
    }
}

/// Last tier: any previously downloaded track.
pub struct CachedMusic {
    cache_dir: PathBuf,
}

impl CachedMusic {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }
}

pub fn list_cached_tracks(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut tracks = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let known = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| MUSIC_EXTENSIONS.iter().any(|m| m.eq_ignore_ascii_case(e)));
        if known {
            tracks.push(path);
        }
    }
    tracks.sort();
    Ok(tracks)
}

impl Provider<MusicRequest, PathBuf> for CachedMusic {
    fn name(&self) -> &str {
        "cache"
    }

    fn provide(&self, _req: &MusicRequest) -> Result<PathBuf, Unavailable> {
        if !self.cache_dir.is_dir() {
            return Err(Unavailable::NoResults(format!(
                "music cache '{}' does not exist",
                self.cache_dir.display()
            )));
        }
        let tracks = list_cached_tracks(&self.cache_dir)?;
        tracks
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| Unavailable::NoResults("music cache is empty".to_string()))
    }
}

/// Music half of the AssetResolver.
pub struct MusicResolver {
    chain: FallbackChain<MusicRequest, PathBuf>,
    enabled: bool,
}

impl MusicResolver {
    pub fn new(chain: FallbackChain<MusicRequest, PathBuf>, enabled: bool) -> Self {
        Self { chain, enabled }
    }

    pub fn from_config(cfg: &Config, http: Arc<dyn HttpFetch>) -> Self {
        let dir = cfg.assets.music_cache_dir.clone();
        let chain = FallbackChain::new()
            .with(PixabayMusic::new(
                cfg.credentials.pixabay.clone(),
                http.clone(),
                dir.clone(),
            ))
            .with(FreesoundMusic::new(
                cfg.credentials.freesound.clone(),
                http,
                dir.clone(),
            ))
            .with(CachedMusic::new(dir));
        Self::new(chain, cfg.assets.background_music)
    }

    /// A local music track for `mood`, or `None` when music is disabled or every tier failed.
    #[tracing::instrument(skip(self))]
    pub fn resolve(&self, mood: &str, min_duration_secs: f64) -> Option<PathBuf> {
        if !self.enabled {
            tracing::info!(reason = %Unavailable::Disabled, "background music skipped");
            return None;
        }
        let req = MusicRequest {
            query: mood_query(mood, &mut rand::thread_rng()),
            min_duration_secs,
        };
        let resolved = self.chain.resolve(&req);
        if resolved.is_none() {
            tracing::info!(query = %req.query, "no background music available");
        }
        resolved.map(|r| r.value)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/music.rs"]
mod tests;
