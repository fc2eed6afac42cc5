//! Catálogo de funnels y tabla de rutas.
//!
//! Cada `FunnelKind` sabe construir su `StepRegistry` (steps, sub-flows,
//! duración de carga y acción final). La configuración aporta el destino de
//! la redirección y el plan que limita los perfiles a monitorear.

use std::fmt;
use std::str::FromStr;

use funnel_core::constants::{HEALTH_LOADING, HEALTH_NAMESPACE, ONBOARD_LOADING, ONBOARD_NAMESPACE,
                             VOICE_TONE_LOADING, VOICE_TONE_NAMESPACE};
use funnel_core::{CompletionAction, FunnelError, RegistryBuilder, StepRegistry};

use crate::config::AdapterConfig;
use crate::steps::{health, onboarding, voice_tone};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunnelKind {
    Onboarding,
    VoiceTone,
    Health,
}

impl FunnelKind {
    pub const ALL: [FunnelKind; 3] = [FunnelKind::Onboarding, FunnelKind::VoiceTone, FunnelKind::Health];

    /// Resuelve una ruta. Cualquier ruta desconocida (incluida `/`) cae en
    /// el onboarding.
    pub fn from_route(route: &str) -> Self {
        let path = route.trim().split(['?', '#']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "/voice-tone" | "voice-tone" => Self::VoiceTone,
            "/health" | "health" => Self::Health,
            _ => Self::Onboarding,
        }
    }

    pub fn route(&self) -> &'static str {
        match self {
            Self::Onboarding => "/onboard",
            Self::VoiceTone => "/voice-tone",
            Self::Health => "/health",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Onboarding => "onboard",
            Self::VoiceTone => "voice-tone",
            Self::Health => "health",
        }
    }

    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Onboarding => ONBOARD_NAMESPACE,
            Self::VoiceTone => VOICE_TONE_NAMESPACE,
            Self::Health => HEALTH_NAMESPACE,
        }
    }
}

impl fmt::Display for FunnelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FunnelKind {
    type Err = FunnelError;

    /// Nombre estricto (`onboard`, `voice-tone`, `health`), a diferencia de
    /// `from_route`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter()
                 .find(|k| k.name() == s.trim())
                 .ok_or_else(|| FunnelError::InvalidRegistry(format!("unknown funnel: {s}")))
    }
}

/// Registro del funnel indicado.
pub fn build_registry(kind: FunnelKind, config: &AdapterConfig) -> Result<StepRegistry, FunnelError> {
    match kind {
        FunnelKind::Onboarding => onboarding_registry(config),
        FunnelKind::VoiceTone => voice_tone_registry(config),
        FunnelKind::Health => health_registry(),
    }
}

pub fn onboarding_registry(config: &AdapterConfig) -> Result<StepRegistry, FunnelError> {
    use onboarding::*;
    RegistryBuilder::new(FunnelKind::Onboarding.name(), ONBOARD_NAMESPACE).step(AccountName)
                                                                          .step(Password)
                                                                          .step(SocialNetworkType)
                                                                          .step(InstagramHandle)
                                                                          .step(InstagramConfirmation)
                                                                          .step(HasWebsite)
                                                                          .step(WebsiteLink)
                                                                          .step(Niches)
                                                                          .step(MainObjective)
                                                                          .step(ProfileMonitoring)
                                                                          .step(Targets::for_plan(config.plan
                                                                                                        .as_deref()))
                                                                          .loading(ONBOARD_LOADING)
                                                                          .completion(CompletionAction::Redirect(config.redirect_url
                                                                                                                       .clone()))
                                                                          .build()
}

pub fn voice_tone_registry(config: &AdapterConfig) -> Result<StepRegistry, FunnelError> {
    use voice_tone::*;
    RegistryBuilder::new(FunnelKind::VoiceTone.name(), VOICE_TONE_NAMESPACE).step(mission_selection())
                                                                            .step(core_values())
                                                                            .step(competitive_differentials())
                                                                            .step(MarketSegment)
                                                                            .step(competitive_context())
                                                                            .step(target_audience())
                                                                            .step(public_perception())
                                                                            .step(emotional_benefits())
                                                                            .step(reasons_to_believe())
                                                                            .step(personality_attributes())
                                                                            .step(brand_consistency())
                                                                            .loading(VOICE_TONE_LOADING)
                                                                            .completion(CompletionAction::Redirect(config.redirect_url
                                                                                                                         .clone()))
                                                                            .build()
}

pub fn health_registry() -> Result<StepRegistry, FunnelError> {
    use health::*;
    RegistryBuilder::new(FunnelKind::Health.name(), HEALTH_NAMESPACE).step(Age)
                                                                     .step(Sex)
                                                                     .step(HormoneTherapy)
                                                                     .step(Ht1)
                                                                     .step(Pregnancy)
                                                                     .step(Walking)
                                                                     .step(Sleep)
                                                                     .step(SleepSchedule)
                                                                     .step(Snoring)
                                                                     .step(Stairs)
                                                                     .step(Stress)
                                                                     .step(Alcohol)
                                                                     .step(Eating)
                                                                     .step(FamilyHistory)
                                                                     .step(Loneliness)
                                                                     .subflow(medication_subflow())
                                                                     .loading(HEALTH_LOADING)
                                                                     .completion(CompletionAction::ShowResults)
                                                                     .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes() {
        assert_eq!(FunnelKind::from_route("/onboard"), FunnelKind::Onboarding);
        assert_eq!(FunnelKind::from_route("/voice-tone"), FunnelKind::VoiceTone);
        assert_eq!(FunnelKind::from_route("/voice-tone/?utm=x"), FunnelKind::VoiceTone);
        assert_eq!(FunnelKind::from_route("/"), FunnelKind::Onboarding);
        assert_eq!(FunnelKind::from_route("/qualquer"), FunnelKind::Onboarding);
        assert_eq!(FunnelKind::from_route("/health"), FunnelKind::Health);
        assert_eq!("voice-tone".parse::<FunnelKind>(), Ok(FunnelKind::VoiceTone));
        assert!("/".parse::<FunnelKind>().is_err());
    }

    #[test]
    fn every_registry_validates() {
        let cfg = AdapterConfig::offline();
        for kind in FunnelKind::ALL {
            let registry = build_registry(kind, &cfg).expect("registro válido");
            assert_eq!(registry.namespace(), kind.namespace());
        }
        assert_eq!(onboarding_registry(&cfg).unwrap().len(), 11);
        assert_eq!(voice_tone_registry(&cfg).unwrap().len(), 11);
        assert_eq!(health_registry().unwrap().first_id(), health::AGE);
    }
}
