//! Configuración de los adaptadores desde variables de entorno.
//!
//! - `FUNNEL_PROFILE_LOOKUP_URL`, `FUNNEL_NICHE_SUGGESTIONS_URL`: endpoints
//!   opcionales; sin ellos el colaborador falla y el funnel sigue con la
//!   entrada cruda.
//! - `FUNNEL_TARGET_SUGGESTIONS_URL`: endpoint de perfiles sugeridos.
//! - `FUNNEL_HTTP_TIMEOUT_MS`, `FUNNEL_REDIRECT_URL`, `FUNNEL_PLAN`.

use std::env;
use std::time::Duration;

use once_cell::sync::Lazy;

static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenvy::dotenv();
});

/// Endpoint de perfiles sugeridos para monitorear.
pub const DEFAULT_TARGET_SUGGESTIONS_URL: &str = "https://webhook.workez.online/webhook/trendspy/lander/findTargets";
/// Destino al completar el onboarding.
pub const DEFAULT_REDIRECT_URL: &str = "https://carrossel-de-cria-bolt.vercel.app";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    pub profile_lookup_url: Option<String>,
    pub niche_suggestions_url: Option<String>,
    pub target_suggestions_url: Option<String>,
    pub http_timeout: Duration,
    pub redirect_url: String,
    /// Plan contratado (`1a`, `1b`, `1c`); limita los perfiles a monitorear.
    pub plan: Option<String>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self { profile_lookup_url: None,
               niche_suggestions_url: None,
               target_suggestions_url: Some(DEFAULT_TARGET_SUGGESTIONS_URL.to_string()),
               http_timeout: DEFAULT_HTTP_TIMEOUT,
               redirect_url: DEFAULT_REDIRECT_URL.to_string(),
               plan: None }
    }
}

impl AdapterConfig {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let defaults = Self::default();
        let http_timeout = env::var("FUNNEL_HTTP_TIMEOUT_MS").ok()
                                                             .and_then(|v| v.trim().parse::<u64>().ok())
                                                             .map(Duration::from_millis)
                                                             .unwrap_or(defaults.http_timeout);
        Self { profile_lookup_url: non_empty_var("FUNNEL_PROFILE_LOOKUP_URL"),
               niche_suggestions_url: non_empty_var("FUNNEL_NICHE_SUGGESTIONS_URL"),
               target_suggestions_url: non_empty_var("FUNNEL_TARGET_SUGGESTIONS_URL").or(defaults.target_suggestions_url),
               http_timeout,
               redirect_url: non_empty_var("FUNNEL_REDIRECT_URL").unwrap_or(defaults.redirect_url),
               plan: non_empty_var("FUNNEL_PLAN") }
    }

    /// Sin endpoints: todo colaborador degrada. Útil en tests y demos offline.
    pub fn offline() -> Self {
        Self { target_suggestions_url: None,
               ..Self::default() }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok()
                 .map(|v| v.trim().to_string())
                 .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_to_known_endpoints() {
        let cfg = AdapterConfig::default();
        assert_eq!(cfg.target_suggestions_url.as_deref(), Some(DEFAULT_TARGET_SUGGESTIONS_URL));
        assert!(cfg.profile_lookup_url.is_none());
        assert_eq!(cfg.redirect_url, DEFAULT_REDIRECT_URL);
        assert!(AdapterConfig::offline().target_suggestions_url.is_none());
    }
}
