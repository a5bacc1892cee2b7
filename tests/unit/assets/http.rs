use std::io::Write as _;

use super::*;
use crate::assets::fake_http::FakeHttp;

#[test]
fn json_request_builder_collects_params() {
    let req = JsonRequest::new("https://example.test/search")
        .param("q", "dark ambient")
        .param("per_page", 10)
        .header("Authorization", "k");
    assert_eq!(req.query_value("per_page"), Some("10"));
    assert_eq!(req.query_value("missing"), None);
    assert_eq!(req.headers, vec![("Authorization".to_string(), "k".to_string())]);
}

fn staging_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".part"))
        .collect()
}

#[test]
fn staging_prefix_is_hidden_and_named_after_dest() {
    assert_eq!(partial_prefix(Path::new("/cache/music/track.mp3")), ".track.mp3.");
}

#[test]
fn failed_write_leaves_no_trace() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested");
    let dest = nested.join("a.bin");
    let err = write_atomically(&dest, |file| {
        file.write_all(b"half").unwrap();
        Err(Unavailable::Http("connection reset".to_string()))
    });
    assert!(err.is_err());
    assert!(!dest.exists());
    assert!(staging_files(&nested).is_empty());
}

#[test]
fn successful_write_renames_into_place() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("a.bin");
    let n = write_atomically(&dest, |file| {
        file.write_all(b"abc").unwrap();
        Ok(3)
    })
    .unwrap();
    assert_eq!(n, 3);
    assert_eq!(std::fs::read(&dest).unwrap(), b"abc");
    assert!(staging_files(dir.path()).is_empty());
}

#[test]
fn overlapping_writers_never_mix_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("pexels_1.jpg");

    let outer = write_atomically(&dest, |file| {
        file.write_all(b"AAAAAAAA").unwrap();
        let inner = write_atomically(&dest, |inner_file| {
            inner_file.write_all(b"BB").unwrap();
            Ok(2)
        });
        assert_eq!(inner.unwrap(), 2);
        file.write_all(b"CCCC").unwrap();
        Ok(12)
    });

    assert_eq!(outer.unwrap(), 12);
    assert_eq!(std::fs::read(&dest).unwrap(), b"BB");
    assert!(staging_files(dir.path()).is_empty());
}

#[test]
fn cache_fetch_downloads_once() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("x.mp3");
    let http = FakeHttp::default().with_file("https://cdn.test/x.mp3", b"ID3");

    let first = fetch_into_cache(&http, "https://cdn.test/x.mp3", &dest).unwrap();
    let second = fetch_into_cache(&http, "https://cdn.test/x.mp3", &dest).unwrap();
    assert_eq!(first, CacheFetch::Downloaded(3));
    assert_eq!(second, CacheFetch::AlreadyCached);
    assert_eq!(http.download_count(), 1);
}
