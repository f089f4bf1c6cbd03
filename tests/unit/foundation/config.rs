use std::collections::HashMap;

use super::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_validate() {
    let cfg = MemeConfig::default();
    assert_eq!(cfg.source_dir, PathBuf::from("./fixtures"));
    assert_eq!(cfg.artifact_dir, PathBuf::from("./memes"));
    assert_eq!(cfg.url_prefix, "meme");
    assert!(!cfg.single_flight);
    cfg.validate().unwrap();
}

#[test]
fn json_fields_are_optional() {
    let cfg = MemeConfig::from_json_str(r#"{"font": "DejaVu Sans", "threads": 2}"#).unwrap();
    assert_eq!(cfg.font, "DejaVu Sans");
    assert_eq!(cfg.threads, Some(2));
    assert_eq!(cfg.url_prefix, "meme");
}

#[test]
fn json_rejects_unknown_fields() {
    let err = MemeConfig::from_json_str(r#"{"fnot": "x"}"#).unwrap_err();
    assert!(matches!(err, MemeError::Config(_)));
}

#[test]
fn env_overrides_apply() {
    let mut cfg = MemeConfig::default();
    cfg.apply_env_from(env(&[
        (ENV_SOURCE_DIR, "/srv/gifs"),
        (ENV_THREADS, "3"),
        (ENV_SINGLE_FLIGHT, "yes"),
    ]))
    .unwrap();
    assert_eq!(cfg.source_dir, PathBuf::from("/srv/gifs"));
    assert_eq!(cfg.threads, Some(3));
    assert!(cfg.single_flight);
}

#[test]
fn env_rejects_garbage() {
    let mut cfg = MemeConfig::default();
    assert!(cfg.apply_env_from(env(&[(ENV_THREADS, "many")])).is_err());
    assert!(
        cfg.apply_env_from(env(&[(ENV_SINGLE_FLIGHT, "maybe")]))
            .is_err()
    );
}

#[test]
fn validate_rejects_zero_threads_and_empty_prefix() {
    let cfg = MemeConfig {
        threads: Some(0),
        ..MemeConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = MemeConfig {
        url_prefix: "/".to_string(),
        ..MemeConfig::default()
    };
    assert!(cfg.validate().is_err());
}
