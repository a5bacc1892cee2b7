use super::*;

#[test]
fn box_painter_metrics_are_deterministic() {
    let mut p = BoxGlyphPainter::new();
    assert_eq!(p.measure("abcd", 20.0).unwrap(), 40.0);
    assert_eq!(p.measure("", 20.0).unwrap(), 0.0);
}

#[test]
fn box_painter_fills_glyph_cells_and_skips_spaces() {
    let mut p = BoxGlyphPainter::new();
    p.begin(20, 10).unwrap();
    p.fill_line("a b", 10.0, 0.0, 0.0, [255, 0, 0, 255]).unwrap();
    let data = p.finish().unwrap();
    let px = |x: usize, y: usize| &data[(y * 20 + x) * 4..(y * 20 + x) * 4 + 4];
    assert_eq!(px(2, 5), &[255, 0, 0, 255]);
    assert_eq!(px(7, 5), &[0, 0, 0, 0]);
    assert_eq!(px(12, 5), &[255, 0, 0, 255]);
    assert_eq!(px(17, 5), &[0, 0, 0, 0]);
}

#[test]
fn outline_surrounds_fill() {
    let mut p = BoxGlyphPainter::new();
    p.begin(20, 20).unwrap();
    p.fill_outlined_line("a", 10.0, 5.0, 5.0, 2, [0, 0, 0, 255], [255, 245, 245, 255])
        .unwrap();
    let data = p.finish().unwrap();
    let px = |x: usize, y: usize| &data[(y * 20 + x) * 4..(y * 20 + x) * 4 + 4];
    assert_eq!(px(7, 10), &[255, 245, 245, 255]);
    assert_eq!(px(3, 10), &[0, 0, 0, 255]);
    assert_eq!(px(0, 10), &[0, 0, 0, 0]);
}

#[test]
fn missing_configured_font_is_a_composition_error() {
    let err = discover_font(Some(Path::new("/nope/font.ttf"))).unwrap_err();
    assert!(matches!(err, ReelError::Composition(_)));
}

#[test]
fn vello_painter_renders_when_a_system_font_exists() {
    let Ok(path) = discover_font(None) else {
        return;
    };
    let mut p = VelloGlyphPainter::from_font_file(&path).unwrap();
    let w = p.measure("Night", 40.0).unwrap();
    assert!(w > 0.0);
    assert!(p.measure("Night falls", 40.0).unwrap() > w);

    p.begin(200, 60).unwrap();
    p.fill_line("Night", 40.0, 4.0, 4.0, [255, 255, 255, 255]).unwrap();
    let data = p.finish().unwrap();
    assert_eq!(data.len(), 200 * 60 * 4);
    assert!(data.chunks_exact(4).any(|px| px[3] > 0));
}

fn ink_bounds(data: &[u8], width: usize) -> Option<(usize, usize, usize, usize)> {
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    for (i, px) in data.chunks_exact(4).enumerate() {
        if px[3] == 0 {
            continue;
        }
        let (x, y) = (i % width, i / width);
        bounds = Some(match bounds {
            None => (x, x, y, y),
            Some((x0, x1, y0, y1)) => (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
        });
    }
    bounds
}

#[test]
fn vello_glyphs_advance_along_the_line_inside_its_box() {
    let Ok(path) = discover_font(None) else {
        return;
    };
    let mut p = VelloGlyphPainter::from_font_file(&path).unwrap();
    let size = 40.0;
    let (x, y) = (10.0f32, 10.0f32);
    let measured = p.measure("Night falls", size).unwrap();

    p.begin(400, 80).unwrap();
    p.fill_line("Night falls", size, x, y, [255, 255, 255, 255]).unwrap();
    let data = p.finish().unwrap();
    let (x0, x1, y0, y1) = ink_bounds(&data, 400).unwrap();

    let ink_width = (x1 - x0 + 1) as f32;
    assert!(
        (ink_width - measured).abs() < 0.15 * measured,
        "ink {ink_width}px vs measured {measured}px"
    );
    assert!(x0 as f32 >= x - 2.0);
    assert!(x1 as f32 <= x + measured + 2.0);
    assert!(y0 as f32 >= y, "ink starts at {y0}, above the line box");
    assert!((y1 as f32) < y + size * 1.5, "ink ends at {y1}, below the line box");
}
