use rand::SeedableRng as _;

use super::*;
use crate::assets::fake_http::FakeHttp;

const TRACK_URL: &str = "https://cdn.test/track-77.mp3";

fn pixabay_body() -> serde_json::Value {
    serde_json::json!({
        "hits": [
            { "id": 77, "audio": TRACK_URL },
            { "id": 78 }
        ]
    })
}

fn resolver(http: Arc<FakeHttp>, dir: &Path, pixabay: bool, freesound: bool) -> MusicResolver {
    let chain = FallbackChain::new()
        .with(PixabayMusic::new(
            pixabay.then(|| "pk".to_string()),
            http.clone(),
            dir,
        ))
        .with(FreesoundMusic::new(
            freesound.then(|| "fk".to_string()),
            http,
            dir,
        ))
        .with(CachedMusic::new(dir));
    MusicResolver::new(chain, true)
}

#[test]
fn dark_moods_pick_from_the_query_pool() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    for mood in ["horror", "Scary", " dark ", "creepy"] {
        let q = mood_query(mood, &mut rng);
        assert!(DARK_MOOD_QUERIES.contains(&q.as_str()), "{q}");
    }
    assert_eq!(mood_query("mystery", &mut rng), "mystery");
}

#[test]
fn sanitized_queries_are_filename_safe() {
    assert_eq!(sanitize_query("dark ambient"), "dark_ambient");
    assert_eq!(sanitize_query("a/b:c"), "a_b_c");
}

#[test]
fn pixabay_tier_downloads_into_named_cache_file() {
    let dir = tempfile::tempdir().unwrap();
    let http = Arc::new(
        FakeHttp::default()
            .with_json(PIXABAY_SEARCH_URL, pixabay_body())
            .with_file(TRACK_URL, b"mp3"),
    );
    let music = resolver(http.clone(), dir.path(), true, false);

    let path = music.resolve("mystery", 30.0).unwrap();
    assert_eq!(path, dir.path().join("pixabay_mystery_77.mp3"));
    assert_eq!(std::fs::read(&path).unwrap(), b"mp3");

    let searches = http.searches.lock().unwrap();
    assert_eq!(searches[0].query_value("media_type"), Some("music"));
    assert_eq!(searches[0].query_value("per_page"), Some("10"));
    assert_eq!(searches[0].query_value("order"), Some("popular"));
}

#[test]
fn freesound_tier_runs_when_pixabay_is_unconfigured() {
    let dir = tempfile::tempdir().unwrap();
    let http = Arc::new(
        FakeHttp::default()
            .with_json(
                FREESOUND_SEARCH_URL,
                serde_json::json!({
                    "results": [
                        { "id": 5, "name": "no preview", "previews": {} },
                        { "id": 9, "name": "loop", "previews": { "preview-hq-mp3": "https://fs.test/9.mp3" } }
                    ]
                }),
            )
            .with_file("https://fs.test/9.mp3", b"fs"),
    );
    let music = resolver(http.clone(), dir.path(), false, true);

    let path = music.resolve("mystery", 42.7).unwrap();
    assert_eq!(path, dir.path().join("freesound_9.mp3"));

    let searches = http.searches.lock().unwrap();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].query_value("query"), Some("mystery ambient loop"));
    assert_eq!(searches[0].query_value("filter"), Some("duration:[42.7 TO 300]"));
    assert_eq!(searches[0].query_value("token"), Some("fk"));
}

#[test]
fn cache_tier_reuses_previous_downloads() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("old.ogg"), b"x").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
    std::fs::write(dir.path().join("partial.mp3.part"), b"x").unwrap();

    let music = resolver(Arc::new(FakeHttp::default()), dir.path(), true, true);
    assert_eq!(music.resolve("horror", 10.0), Some(dir.path().join("old.ogg")));
}

#[test]
fn exhausted_tiers_mean_no_music() {
    let dir = tempfile::tempdir().unwrap();
    let music = resolver(Arc::new(FakeHttp::default()), dir.path(), true, true);
    assert_eq!(music.resolve("horror", 10.0), None);

    let missing = dir.path().join("never-created");
    let music = resolver(Arc::new(FakeHttp::default()), &missing, false, false);
    assert_eq!(music.resolve("horror", 10.0), None);
}

#[test]
fn disabled_music_skips_every_tier() {
    let dir = tempfile::tempdir().unwrap();
    let http = Arc::new(FakeHttp::default().with_json(PIXABAY_SEARCH_URL, pixabay_body()));
    let chain = FallbackChain::new().with(PixabayMusic::new(
        Some("pk".to_string()),
        http.clone(),
        dir.path(),
    ));
    let music = MusicResolver::new(chain, false);
    assert_eq!(music.resolve("mystery", 10.0), None);
    assert_eq!(http.search_count(), 0);
}

#[test]
fn repeated_query_downloads_once() {
    let dir = tempfile::tempdir().unwrap();
    let http = Arc::new(
        FakeHttp::default()
            .with_json(PIXABAY_SEARCH_URL, pixabay_body())
            .with_file(TRACK_URL, b"mp3"),
    );
    let music = resolver(http.clone(), dir.path(), true, false);

    let first = music.resolve("mystery", 30.0).unwrap();
    let second = music.resolve("mystery", 30.0).unwrap();
    assert_eq!(first, second);
    assert_eq!(http.download_count(), 1);
}
