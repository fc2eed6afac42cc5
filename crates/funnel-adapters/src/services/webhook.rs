//! Cliente HTTP de los webhooks (reqwest, POST JSON con timeout).
//!
//! El cuerpo es el `AnswerMap` completo, que ya incluye el campo que disparó
//! la llamada. Cualquier status no-2xx o error de transporte se devuelve como
//! `CollaboratorError`; la degradación la decide `enrich`.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;

use funnel_core::AnswerMap;

use super::{parse, CollaboratorError, ProfileLookupService, SuggestionService};
use crate::config::AdapterConfig;

#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: Client,
    profile_lookup_url: Option<String>,
    niche_suggestions_url: Option<String>,
    target_suggestions_url: Option<String>,
}

impl WebhookClient {
    pub fn from_config(config: &AdapterConfig) -> Result<Self, CollaboratorError> {
        let http = Client::builder().timeout(config.http_timeout)
                                    .build()
                                    .map_err(|e| CollaboratorError::Transport(e.to_string()))?;
        Ok(Self::with_client(http, config))
    }

    /// Usa un `reqwest::Client` ya construido (proxies, TLS o timeouts
    /// propios).
    pub fn with_client(http: Client, config: &AdapterConfig) -> Self {
        Self { http,
               profile_lookup_url: config.profile_lookup_url.clone(),
               niche_suggestions_url: config.niche_suggestions_url.clone(),
               target_suggestions_url: config.target_suggestions_url.clone() }
    }

    async fn post_json(&self, url: Option<&str>, what: &'static str, body: &AnswerMap) -> Result<Value, CollaboratorError> {
        let url = url.ok_or(CollaboratorError::NotConfigured(what))?;
        debug!("webhook:post what={what} url={url} fields={}", body.len());
        let res = self.http.post(url).json(body).send().await?;
        let status = res.status();
        if !status.is_success() {
            warn!("webhook:status what={what} status={status}");
            return Err(CollaboratorError::Status(status.as_u16()));
        }
        let json: Value = res.json().await?;
        Ok(json)
    }
}

#[async_trait]
impl ProfileLookupService for WebhookClient {
    async fn lookup_profile(&self, answers: &AnswerMap, _handle: &str) -> Result<Value, CollaboratorError> {
        let body = self.post_json(self.profile_lookup_url.as_deref(), "profile_lookup", answers).await?;
        parse::profile_metrics(body)
    }
}

#[async_trait]
impl SuggestionService for WebhookClient {
    async fn suggest_niches(&self, answers: &AnswerMap, _website: &str) -> Result<Vec<String>, CollaboratorError> {
        let body = self.post_json(self.niche_suggestions_url.as_deref(), "niche_suggestions", answers).await?;
        parse::niche_suggestions(body)
    }

    async fn suggest_targets(&self, answers: &AnswerMap) -> Result<Vec<Value>, CollaboratorError> {
        let body = self.post_json(self.target_suggestions_url.as_deref(), "target_suggestions", answers).await?;
        parse::target_suggestions(body)
    }
}
