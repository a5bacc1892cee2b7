use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ReelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ReelError::decode("x").to_string().contains("decode error:"));
    assert!(
        ReelError::composition("x")
            .to_string()
            .contains("composition error:")
    );
    assert!(ReelError::encode("x").to_string().contains("encode error:"));
    assert!(ReelError::config("x").to_string().contains("config error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
