use super::*;
use crate::foundation::core::Resolution;

#[test]
fn over_opaque_source_replaces() {
    assert_eq!(over([1, 2, 3, 255], [9, 8, 7, 255], 1.0), [9, 8, 7, 255]);
}

#[test]
fn over_respects_opacity_and_transparency() {
    assert_eq!(over([10, 20, 30, 255], [0, 0, 0, 0], 1.0), [10, 20, 30, 255]);
    assert_eq!(over([10, 20, 30, 255], [255, 255, 255, 255], 0.0), [10, 20, 30, 255]);
    let half = over([0, 0, 0, 255], [255, 255, 255, 255], 0.5);
    assert_eq!(half, [128, 128, 128, 255]);
}

#[test]
fn black_overlay_darkens_uniformly() {
    let mut buf = [200u8, 100, 50, 255].repeat(4);
    fill_over_in_place(&mut buf, [0, 0, 0, 255], 0.7).unwrap();
    for px in buf.chunks_exact(4) {
        assert_eq!(px, &[60, 30, 15, 255]);
    }
    assert!(fill_over_in_place(&mut [0u8; 3], [0, 0, 0, 255], 0.5).is_err());
}

#[test]
fn blit_clips_to_frame() {
    let mut frame = FrameRGBA::solid(Resolution::new(4, 4), [0, 0, 0]);
    let layer = [255u8, 0, 0, 255].repeat(4);
    blit_over(&mut frame, &layer, 3, 3, 2, 2).unwrap();
    assert_eq!(frame.pixel(3, 3), [255, 0, 0, 255]);
    assert_eq!(frame.pixel(2, 3), [0, 0, 0, 255]);

    blit_over(&mut frame, &layer, -1, -1, 2, 2).unwrap();
    assert_eq!(frame.pixel(0, 0), [255, 0, 0, 255]);
    assert_eq!(frame.pixel(1, 1), [0, 0, 0, 255]);

    blit_over(&mut frame, &layer, 10, 10, 2, 2).unwrap();
    assert!(blit_over(&mut frame, &layer, 0, 0, 3, 3).is_err());
}
