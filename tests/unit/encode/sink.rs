use super::*;

fn cfg(audio: Option<AudioInputConfig>) -> SinkConfig {
    SinkConfig {
        resolution: Resolution::new(4, 2),
        fps: Fps::whole(24).unwrap(),
        audio,
    }
}

#[test]
fn captures_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(None)).unwrap();
    let frame = FrameRGBA::solid(Resolution::new(4, 2), [1, 2, 3]);
    sink.push_frame(FrameIndex(0), &frame).unwrap();
    sink.push_frame(FrameIndex(1), &frame).unwrap();
    assert!(sink.push_frame(FrameIndex(1), &frame).is_err());
    sink.end().unwrap();

    assert!(sink.is_ended());
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.config().unwrap().resolution, Resolution::new(4, 2));
    assert_eq!(sink.audio_bytes(), None);
}

#[test]
fn push_before_begin_fails() {
    let mut sink = InMemorySink::new();
    let frame = FrameRGBA::solid(Resolution::new(4, 2), [0, 0, 0]);
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
}

#[test]
fn records_soundtrack_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mix.f32le");
    std::fs::write(&path, [0u8; 32]).unwrap();

    let mut sink = InMemorySink::new();
    sink.begin(cfg(Some(AudioInputConfig {
        path,
        sample_rate: 48_000,
        channels: 2,
    })))
    .unwrap();
    assert_eq!(sink.audio_bytes(), Some(32));
}

#[test]
fn missing_soundtrack_is_an_encode_error() {
    let mut sink = InMemorySink::new();
    let err = sink
        .begin(cfg(Some(AudioInputConfig {
            path: PathBuf::from("/nonexistent/nightreel/mix.f32le"),
            sample_rate: 48_000,
            channels: 2,
        })))
        .unwrap_err();
    assert!(matches!(err, ReelError::Encode(_)));
}
