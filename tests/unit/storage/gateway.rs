use super::*;

#[test]
fn source_names_reject_traversal() {
    assert!(validate_source_name("earth.gif").is_ok());
    assert!(validate_source_name("").is_err());
    assert!(validate_source_name("..").is_err());
    assert!(validate_source_name("../secret.gif").is_err());
    assert!(validate_source_name("dir\\x.gif").is_err());
}

#[test]
fn gif_extension_ignores_case() {
    assert!(has_gif_extension("a.gif"));
    assert!(has_gif_extension("a.GIF"));
    assert!(has_gif_extension("a.Gif"));
    assert!(!has_gif_extension("a.png"));
    assert!(!has_gif_extension("gif"));
}

#[test]
fn lookup_exposes_location_either_way() {
    let loc = Location::new("/tmp/x.gif");
    assert!(Lookup::Found(loc.clone()).is_found());
    assert!(!Lookup::Missing(loc.clone()).is_found());
    assert_eq!(Lookup::Missing(loc.clone()).location(), &loc);
}
