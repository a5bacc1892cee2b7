use super::*;

fn constant(sample_rate: u32, frames: usize, value: f32) -> AudioPcm {
    AudioPcm {
        sample_rate,
        channels: 2,
        interleaved_f32: vec![value; frames * 2],
    }
}

#[test]
fn short_tracks_loop_and_trim_to_exact_length() {
    let music = AudioPcm {
        sample_rate: 100,
        channels: 2,
        interleaved_f32: (0..300).map(|i| (i / 2) as f32 / 1000.0).collect(),
    };
    let bed = fit_music_bed(&music, 12.34, 1.0).unwrap();
    assert_eq!(bed.frames(), 1234);
    assert_eq!(bed.sample_rate, 100);

    // mid-bed, after the fade-in: the loop restarts at frame 150 (source frame 0).
    let at = |f: usize| bed.interleaved_f32[f * 2];
    assert!((at(300) - 0.0).abs() < 1e-6);
    assert!((at(310) - 0.010).abs() < 1e-6);
}

#[test]
fn long_tracks_are_cut() {
    let bed = fit_music_bed(&constant(1000, 60_000, 0.5), 10.0, 1.0).unwrap();
    assert_eq!(bed.frames(), 10_000);
}

#[test]
fn volume_and_fades_shape_the_bed() {
    let bed = fit_music_bed(&constant(100, 1000, 1.0), 10.0, 0.15).unwrap();
    let at = |f: usize| bed.interleaved_f32[f * 2];
    assert_eq!(at(0), 0.0);
    assert!((at(100) - 0.075).abs() < 1e-6);
    assert!((at(500) - 0.15).abs() < 1e-6);
    assert!((at(850) - 0.075).abs() < 1e-6);
    assert!(at(999) < 0.01);
}

#[test]
fn empty_or_invalid_inputs_fail() {
    assert!(fit_music_bed(&constant(100, 0, 0.0), 1.0, 1.0).is_err());
    assert!(fit_music_bed(&constant(100, 10, 0.1), 0.0, 1.0).is_err());
    assert!(fit_music_bed(&constant(0, 10, 0.1), 1.0, 1.0).is_err());
}
