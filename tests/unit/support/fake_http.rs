use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use crate::assets::chain::Unavailable;
use crate::assets::http::{HttpFetch, JsonRequest, write_atomically};

/// Canned responses keyed by URL; records every request it sees.
#[derive(Default)]
pub(crate) struct FakeHttp {
    json: HashMap<String, serde_json::Value>,
    files: HashMap<String, Vec<u8>>,
    pub(crate) searches: Mutex<Vec<JsonRequest>>,
    pub(crate) downloads: Mutex<Vec<String>>,
}

impl FakeHttp {
    pub(crate) fn with_json(mut self, url: &str, body: serde_json::Value) -> Self {
        self.json.insert(url.to_string(), body);
        self
    }

    pub(crate) fn with_file(mut self, url: &str, bytes: &[u8]) -> Self {
        self.files.insert(url.to_string(), bytes.to_vec());
        self
    }

    pub(crate) fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }

    pub(crate) fn download_count(&self) -> usize {
        self.downloads.lock().unwrap().len()
    }
}

impl HttpFetch for FakeHttp {
    fn get_json(&self, req: &JsonRequest) -> Result<serde_json::Value, Unavailable> {
        self.searches.lock().unwrap().push(req.clone());
        self.json
            .get(&req.url)
            .cloned()
            .ok_or_else(|| Unavailable::Http(format!("{} returned 404", req.url)))
    }

    fn download(&self, url: &str, dest: &Path) -> Result<u64, Unavailable> {
        self.downloads.lock().unwrap().push(url.to_string());
        let bytes = self
            .files
            .get(url)
            .ok_or_else(|| Unavailable::Http(format!("download {url} returned 404")))?;
        write_atomically(dest, |file| {
            use std::io::Write as _;
            file.write_all(bytes)?;
            Ok(bytes.len() as u64)
        })
    }
}
