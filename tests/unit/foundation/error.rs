use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RingletError::initialization("x")
            .to_string()
            .contains("initialization error:")
    );
    assert!(
        RingletError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        RingletError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        RingletError::export("x")
            .to_string()
            .contains("export error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RingletError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
