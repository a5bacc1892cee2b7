use super::*;
use crate::caption::layout::layout_caption;
use crate::caption::painter::BoxGlyphPainter;

#[test]
fn layer_is_tight_around_the_outlined_block() {
    let res = Resolution::new(1920, 1080);
    let style = CaptionStyle::default();
    let mut painter = BoxGlyphPainter::new();
    let layout = layout_caption(&mut painter, "ab", None, res, &style).unwrap();
    let layer = render_caption(&mut painter, &layout, &style, res)
        .unwrap()
        .unwrap();

    let line = &layout.lines[0];
    assert_eq!(layer.x, (line.x - 5.0).floor() as i32);
    assert_eq!(layer.y, (line.top - 5.0).floor() as i32);
    assert_eq!(
        layer.width,
        ((line.right() + 5.0).ceil() as i32 - layer.x) as u32
    );
    assert_eq!(layer.data.len(), layer.width as usize * layer.height as usize * 4);

    let at = |x: u32, y: u32| {
        let i = (y as usize * layer.width as usize + x as usize) * 4;
        [layer.data[i], layer.data[i + 1], layer.data[i + 2], layer.data[i + 3]]
    };
    assert_eq!(at(1, 30), [0, 0, 0, 255]);
    assert_eq!(at(20, 30), [255, 245, 245, 255]);
}

#[test]
fn empty_layout_renders_nothing() {
    let res = Resolution::new(640, 360);
    let style = CaptionStyle::default();
    let mut painter = BoxGlyphPainter::new();
    let layout = layout_caption(&mut painter, "", None, res, &style).unwrap();
    assert!(render_caption(&mut painter, &layout, &style, res)
        .unwrap()
        .is_none());
}
