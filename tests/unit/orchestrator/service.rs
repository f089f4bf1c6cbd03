use super::*;
use crate::{
    engine::{overlay::CaptionOverlay, text::Captions},
    storage::memory::MemoryGateway,
};

struct NoInk;

impl CaptionRenderer for NoInk {
    fn render(&self, _captions: &Captions, width: u16, height: u16) -> MemeResult<CaptionOverlay> {
        Ok(CaptionOverlay::empty(width, height))
    }
}

fn service(config: &MemeConfig) -> MemeService {
    MemeService::with_parts(config, Arc::new(MemoryGateway::new()), Arc::new(NoInk)).unwrap()
}

#[test]
fn artifact_url_uses_trimmed_prefix() {
    let config = MemeConfig {
        url_prefix: "/memes/".to_string(),
        ..MemeConfig::default()
    };
    let svc = service(&config);
    let id = Identity::new().derive("from=earth.gif&top=hi");
    assert_eq!(svc.artifact_url(&id), format!("/memes/{id}.gif"));
}

#[test]
fn decode_errors_keep_their_kind() {
    assert!(matches!(
        generation_error(MemeError::decode("bad")),
        MemeError::Decode(_)
    ));
    let wrapped = generation_error(MemeError::encode("boom"));
    assert!(matches!(wrapped, MemeError::GenerationFailed(_)));
    assert_eq!(wrapped.status_code(), 500);
    assert!(matches!(
        generation_error(wrapped),
        MemeError::GenerationFailed(inner) if matches!(*inner, MemeError::Encode(_))
    ));
}

#[test]
fn single_flight_follows_config() {
    let plain = service(&MemeConfig::default());
    assert!(plain.locks.is_none());
    let locked = service(&MemeConfig {
        single_flight: true,
        ..MemeConfig::default()
    });
    assert!(locked.locks.is_some());
}

#[test]
fn invalid_config_is_rejected() {
    let config = MemeConfig {
        threads: Some(0),
        ..MemeConfig::default()
    };
    assert!(matches!(
        MemeService::with_parts(&config, Arc::new(MemoryGateway::new()), Arc::new(NoInk)),
        Err(MemeError::Config(_))
    ));
}
