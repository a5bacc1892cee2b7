use super::*;
use rand::SeedableRng as _;

#[test]
fn tones_come_from_the_palette() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(3);
    for _ in 0..20 {
        assert!(PALETTE.contains(&pick_tone(&mut rng)));
    }
}

#[test]
fn vignette_darkens_toward_edges() {
    let res = Resolution::new(200, 100);
    let centre = vignette_alpha(res, 100, 50);
    let mid = vignette_alpha(res, 150, 50);
    let edge = vignette_alpha(res, 199, 50);
    let corner = vignette_alpha(res, 0, 0);
    assert!(centre <= 2);
    assert!(centre < mid && mid < edge);
    assert!(edge >= 145);
    assert_eq!(corner, 150);
}

#[test]
fn gradient_grows_downward() {
    let res = Resolution::new(4, 100);
    assert_eq!(gradient_alpha(res, 0), 0);
    assert_eq!(gradient_alpha(res, 50), 40);
    assert_eq!(gradient_alpha(res, 99), 79);
}

#[test]
fn background_is_opaque_and_darker_at_edges() {
    let res = Resolution::new(64, 36);
    let frame = procedural_background(res, [20, 0, 0]);
    assert_eq!(frame.data.len(), res.rgba8_len());
    assert!(frame.data.chunks_exact(4).all(|p| p[3] == 255));
    assert!(frame.pixel(32, 18)[0] > frame.pixel(0, 18)[0]);
    assert!(frame.pixel(32, 2)[0] >= frame.pixel(32, 33)[0]);
}
