use super::*;

#[test]
fn meme_request_needs_source_and_a_caption() {
    assert!(matches!(
        MemeRequest::from_query("top=hi"),
        Err(MemeError::InvalidRequest(_))
    ));
    assert!(matches!(
        MemeRequest::from_query("from=&top=hi"),
        Err(MemeError::InvalidRequest(_))
    ));
    assert!(matches!(
        MemeRequest::from_query("from=earth.gif&top=&bottom="),
        Err(MemeError::InvalidRequest(_))
    ));

    let one = MemeRequest::from_query("from=earth.gif&top=&bottom=low").unwrap();
    assert_eq!(one.source(), "earth.gif");
    assert_eq!(one.captions().top, None);
    assert_eq!(one.captions().bottom.as_deref(), Some("low"));
}

#[test]
fn meme_request_keeps_unrelated_params() {
    let req = MemeRequest::from_query("from=earth.gif&top=hi&utm=x").unwrap();
    assert_eq!(req.params().get("utm"), Some("x"));
    assert_eq!(req.params().canonical(), "from=earth.gif&top=hi&utm=x");
}

#[test]
fn new_matches_equivalent_query() {
    let built = MemeRequest::new("earth.gif", Some("hi"), Some("there")).unwrap();
    let parsed = MemeRequest::from_query("bottom=there&top=hi&from=earth.gif").unwrap();
    assert_eq!(built.params().canonical(), parsed.params().canonical());
}

#[test]
fn preview_request_parses_integer_dimensions() {
    let req = PreviewRequest::from_query("from=earth.gif&width=320&height=240&top=hi").unwrap();
    assert_eq!((req.width(), req.height()), (320, 240));
    assert_eq!(req.captions().top.as_deref(), Some("hi"));

    for bad in [
        "from=earth.gif&width=abc&height=2",
        "from=earth.gif&width=-1&height=2",
        "from=earth.gif&height=2",
        "width=2&height=2",
    ] {
        assert!(
            matches!(PreviewRequest::from_query(bad), Err(MemeError::InvalidRequest(_))),
            "{bad}"
        );
    }
}

#[test]
fn preview_request_allows_zero_until_sized() {
    // zero is rejected when the service builds the preview size
    let req = PreviewRequest::from_query("from=earth.gif&width=0&height=2").unwrap();
    assert_eq!(req.width(), 0);
}
