use std::path::{Path, PathBuf};

use crate::assets::media::probe_duration_secs;
use crate::foundation::error::{ReelError, ReelResult};

/// Output of the content-generation collaborator.
///
/// `description` and `tags` are carried for the upload step and not read by the core.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScriptBundle {
    pub title: String,
    pub script: String,
    pub topic: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ScriptBundle {
    pub fn from_json_file(path: &Path) -> ReelResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            ReelError::validation(format!("failed to read script '{}': {e}", path.display()))
        })?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ReelError::validation(format!("invalid script bundle json: {e}")))
    }
}

/// Narration audio produced by the speech-synthesis collaborator.
#[derive(Clone, Debug, PartialEq)]
pub struct NarrationTrack {
    pub path: PathBuf,
    pub duration_secs: f64,
}

impl NarrationTrack {
    pub fn new(path: impl Into<PathBuf>, duration_secs: f64) -> ReelResult<Self> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(ReelError::validation(
                "narration duration must be finite and > 0",
            ));
        }
        Ok(Self {
            path: path.into(),
            duration_secs,
        })
    }

    /// Build a track whose duration is read from the file with `ffprobe`.
    pub fn probe(path: impl Into<PathBuf>) -> ReelResult<Self> {
        let path = path.into();
        let duration_secs = probe_duration_secs(&path)?;
        Self::new(path, duration_secs)
    }
}
