//! Colaboradores externos del onboarding.
//!
//! - `ProfileLookupService`: métricas públicas de un perfil de Instagram.
//! - `SuggestionService`: nichos a partir del sitio web y perfiles a
//!   monitorear.
//!
//! Ningún fallo de un colaborador es fatal: los helpers de `enrich` siempre
//! devuelven un delta con la entrada cruda del usuario.

pub mod enrich;
pub mod parse;
pub mod webhook;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use funnel_core::AnswerMap;

pub use webhook::WebhookClient;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("collaborator endpoint not configured: {0}")]
    NotConfigured(&'static str),
    #[error("collaborator timed out")]
    Timeout,
    #[error("collaborator returned HTTP {0}")]
    Status(u16),
    #[error("collaborator transport error: {0}")]
    Transport(String),
    #[error("collaborator response not understood: {0}")]
    InvalidResponse(String),
    /// Respuesta válida sin el indicador de éxito.
    #[error("collaborator reported no result")]
    Unsuccessful,
}

impl From<reqwest::Error> for CollaboratorError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if let Some(status) = e.status() {
            Self::Status(status.as_u16())
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

#[async_trait]
pub trait ProfileLookupService: Send + Sync {
    /// Métricas del perfil (`userProfileMetrics`). `answers` ya incluye el
    /// handle recién ingresado.
    async fn lookup_profile(&self, answers: &AnswerMap, handle: &str) -> Result<Value, CollaboratorError>;
}

#[async_trait]
pub trait SuggestionService: Send + Sync {
    /// Nichos sugeridos a partir del sitio web.
    async fn suggest_niches(&self, answers: &AnswerMap, website: &str) -> Result<Vec<String>, CollaboratorError>;

    /// Perfiles sugeridos como `{text, type: aiRecommend}`.
    async fn suggest_targets(&self, answers: &AnswerMap) -> Result<Vec<Value>, CollaboratorError>;
}
