use super::*;
use crate::caption::painter::BoxGlyphPainter;

const EPS: f32 = 1e-3;

fn assert_within_margins(layout: &CaptionLayout, res: Resolution, margin: f32) {
    for line in &layout.lines {
        assert!(line.x >= margin - EPS, "{line:?}");
        assert!(line.right() <= res.width as f32 - margin + EPS, "{line:?}");
    }
}

#[test]
fn single_line_is_centred() {
    let res = Resolution::new(1920, 1080);
    let layout = layout_caption(
        &mut BoxGlyphPainter::new(),
        "short text",
        None,
        res,
        &CaptionStyle::default(),
    )
    .unwrap();
    assert_eq!(layout.lines.len(), 1);
    let line = &layout.lines[0];
    assert!((line.width - 325.0).abs() < EPS);
    assert!((line.x - 797.5).abs() < EPS);
    assert!((line.top - (1080.0 - 65.0 * 1.25) / 2.0).abs() < EPS);
    assert_eq!(layout.scale, 1.0);
}

#[test]
fn title_sits_above_body_with_a_gap() {
    let res = Resolution::new(1920, 1080);
    let style = CaptionStyle::default();
    let layout = layout_caption(
        &mut BoxGlyphPainter::new(),
        "the body of the first segment",
        Some("The Title"),
        res,
        &style,
    )
    .unwrap();
    assert_eq!(layout.lines.len(), 2);
    let (title, body) = (&layout.lines[0], &layout.lines[1]);
    assert!(title.is_title && !body.is_title);
    assert_eq!(title.size_px, 90.0);
    assert_eq!(body.size_px, 65.0);
    let expected_gap = 90.0 * 1.25 + 65.0 * 1.25;
    assert!((body.top - title.top - expected_gap).abs() < EPS);

    let block = 90.0 * 1.25 + 65.0 * 1.25 * 2.0;
    assert!((layout.block_height - block).abs() < EPS);
    assert!((title.top - (1080.0 - block) / 2.0).abs() < EPS);
}

#[test]
fn wide_lines_shrink_to_respect_margins() {
    let res = Resolution::new(400, 800);
    let layout = layout_caption(
        &mut BoxGlyphPainter::new(),
        "abcdefghijklmnopqrstuvwxyz abcd efgh ijkl mnop",
        Some("A rather long title here"),
        res,
        &CaptionStyle::default(),
    )
    .unwrap();
    assert!(layout.scale < 1.0);
    assert!(layout.lines.len() >= 3);
    assert_within_margins(&layout, res, 150.0);
}

#[test]
fn margins_hold_across_frames_and_texts() {
    let texts = [
        "one",
        "It was late when the knocking started, and nobody in the house dared to open the door.",
        "Supercalifragilisticexpialidociousness overwhelmed everyone",
    ];
    for res in [
        Resolution::new(1920, 1080),
        Resolution::new(1080, 1920),
        Resolution::new(640, 360),
    ] {
        for text in texts {
            let layout = layout_caption(
                &mut BoxGlyphPainter::new(),
                text,
                Some("Title"),
                res,
                &CaptionStyle::default(),
            )
            .unwrap();
            assert_within_margins(&layout, res, 150.0);
            assert!(layout.block_height <= res.height as f32 + EPS);
        }
    }
}

#[test]
fn empty_caption_has_no_lines() {
    let layout = layout_caption(
        &mut BoxGlyphPainter::new(),
        "   ",
        None,
        Resolution::new(1920, 1080),
        &CaptionStyle::default(),
    )
    .unwrap();
    assert!(layout.is_empty());
}

#[test]
fn frame_narrower_than_margins_is_rejected() {
    let err = layout_caption(
        &mut BoxGlyphPainter::new(),
        "text",
        None,
        Resolution::new(300, 300),
        &CaptionStyle::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
}
