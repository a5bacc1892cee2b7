use super::*;

fn procedural_clip(caption: Option<CaptionLayer>) -> ComposedClip {
    let res = Resolution::new(8, 4);
    ComposedClip {
        background: BackgroundLayer::Procedural(Arc::new(FrameRGBA::solid(res, [200, 100, 0]))),
        overlay: OverlayLayer::black(0.5),
        caption: caption.map(Arc::new),
        resolution: res,
        duration: 2.0,
    }
}

#[test]
fn overlay_darkens_every_pixel() {
    let clip = procedural_clip(None);
    assert!(clip.is_static());
    let frame = clip.render_frame(0.3).unwrap();
    assert!(frame.data.chunks_exact(4).all(|p| p == [100, 50, 0, 255]));
}

#[test]
fn caption_is_drawn_above_overlay() {
    let caption = CaptionLayer {
        x: 2,
        y: 1,
        width: 2,
        height: 1,
        data: [255u8, 245, 245, 255].repeat(2),
    };
    let frame = procedural_clip(Some(caption)).render_frame(0.0).unwrap();
    assert_eq!(frame.pixel(2, 1), [255, 245, 245, 255]);
    assert_eq!(frame.pixel(3, 1), [255, 245, 245, 255]);
    assert_eq!(frame.pixel(4, 1), [100, 50, 0, 255]);
}

#[test]
fn ken_burns_clip_changes_over_time() {
    let img = image::RgbaImage::from_fn(16, 8, |x, _| image::Rgba([(x * 15) as u8, 0, 0, 255]));
    let clip = ComposedClip {
        background: BackgroundLayer::KenBurns(Arc::new(img)),
        overlay: OverlayLayer::black(0.0),
        caption: None,
        resolution: Resolution::new(16, 8),
        duration: 1.0,
    };
    assert!(!clip.is_static());
    let start = clip.render_frame(0.0).unwrap();
    let end = clip.render_frame(1.0).unwrap();
    assert_ne!(start.data, end.data);
    assert_eq!(start.pixel(0, 0)[0], 0);
}

#[test]
fn mismatched_background_is_rejected() {
    let mut clip = procedural_clip(None);
    clip.resolution = Resolution::new(16, 4);
    assert!(clip.render_frame(0.0).is_err());
}
