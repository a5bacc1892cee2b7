use super::*;

#[test]
fn pcm_frame_math() {
    let pcm = AudioPcm::silence(MIX_SAMPLE_RATE, 2, 24_000);
    assert_eq!(pcm.interleaved_f32.len(), 48_000);
    assert_eq!(pcm.frames(), 24_000);
    assert!((pcm.duration_secs() - 0.5).abs() < 1e-12);
    assert!(!pcm.is_empty());
}

#[test]
fn f32le_bytes_decode_and_reject_misaligned() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0.5f32.to_le_bytes());
    bytes.extend_from_slice(&(-1.0f32).to_le_bytes());
    assert_eq!(f32le_to_samples(&bytes).unwrap(), vec![0.5, -1.0]);

    bytes.push(0);
    assert!(f32le_to_samples(&bytes).is_err());
}

#[test]
fn probing_a_missing_file_is_a_decode_error() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let err = probe_duration_secs(Path::new("/definitely/not/here.mp3")).unwrap_err();
    assert!(matches!(err, ReelError::Decode(_)));
}
