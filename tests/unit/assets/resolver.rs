use super::*;
use crate::assets::fake_http::FakeHttp;

fn config(dir: &std::path::Path, music: bool) -> Config {
    let mut cfg = Config::from_yaml_str("{}").unwrap();
    cfg.assets.image_cache_dir = dir.join("images");
    cfg.assets.music_cache_dir = dir.join("music");
    cfg.assets.background_music = music;
    cfg
}

#[test]
fn no_credentials_and_empty_cache_resolve_to_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let http = Arc::new(FakeHttp::default());
    let resolver = AssetResolver::from_config(&config(dir.path(), true), http.clone());

    let set = resolver.resolve("abandoned asylum", "horror", 4, 30.0);
    assert_eq!(set, AssetSet::default());
    assert_eq!(set.procedural_count(4), 4);
    assert_eq!(http.search_count(), 0);
    assert_eq!(http.download_count(), 0);
}

#[test]
fn cached_music_is_found_without_network() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), true);
    std::fs::create_dir_all(&cfg.assets.music_cache_dir).unwrap();
    let track = cfg.assets.music_cache_dir.join("old_track.mp3");
    std::fs::write(&track, b"mp3").unwrap();

    let resolver = AssetResolver::from_config(&cfg, Arc::new(FakeHttp::default()));
    let set = resolver.resolve("forest", "horror", 3, 12.0);
    assert!(set.images.is_empty());
    assert_eq!(set.music_track, Some(track));
}

#[test]
fn disabled_music_skips_even_a_populated_cache() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), false);
    std::fs::create_dir_all(&cfg.assets.music_cache_dir).unwrap();
    std::fs::write(cfg.assets.music_cache_dir.join("t.mp3"), b"mp3").unwrap();

    let resolver = AssetResolver::from_config(&cfg, Arc::new(FakeHttp::default()));
    assert_eq!(resolver.resolve("forest", "horror", 3, 12.0).music_track, None);
}

#[test]
fn procedural_count_saturates() {
    let set = AssetSet {
        images: vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")],
        music_track: None,
    };
    assert_eq!(set.procedural_count(5), 3);
    assert_eq!(set.procedural_count(1), 0);
}
