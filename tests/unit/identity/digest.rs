use super::*;

#[test]
fn derive_is_fixed_length_lowercase_hex() {
    let id = Identity::new().derive("from=earth.gif&top=hello");
    assert_eq!(id.as_str().len(), ARTIFACT_ID_LEN);
    assert!(
        id.as_str()
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    );
    assert_eq!(id.file_name(), format!("{id}.gif"));
}

#[test]
fn derive_matches_known_sha256() {
    let id = Identity::new().derive("");
    assert_eq!(
        id.as_str(),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn sha256_hex_matches_known_vector() {
    assert_eq!(
        sha256_hex(b"abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn same_params_in_any_order_give_same_id() {
    let identity = Identity::new();
    let a = identity.for_params(&QueryParams::parse("from=earth.gif&top=hello&bottom=world"));
    let b = identity.for_params(&QueryParams::parse("bottom=world&top=hello&from=earth.gif"));
    assert_eq!(a, b);
}

#[test]
fn case_changes_give_different_ids() {
    let identity = Identity::new();
    let base = identity.for_params(&QueryParams::parse("first=a&second=b"));
    let key_case = identity.for_params(&QueryParams::parse("First=a&second=b"));
    let value_case = identity.for_params(&QueryParams::parse("first=A&second=b"));
    assert_ne!(base, key_case);
    assert_ne!(base, value_case);
}

#[test]
fn parse_accepts_derived_ids_and_rejects_others() {
    let id = Identity::new().derive("x=1");
    assert_eq!(ArtifactId::parse(id.as_str()).unwrap(), id);

    assert!(ArtifactId::parse("abc").is_err());
    assert!(ArtifactId::parse(&id.as_str().to_uppercase()).is_err());
    assert!(ArtifactId::parse(&format!("../{}", &id.as_str()[3..])).is_err());
}
