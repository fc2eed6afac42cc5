//! Degradación elegante de los colaboradores.
//!
//! Cada helper recibe el delta crudo del step y devuelve el delta a pasar a
//! `continue_with`: el delta crudo más lo que el colaborador haya aportado.
//! Un fallo se registra y nunca impide avanzar.

use log::{info, warn};
use serde_json::Value;

use funnel_core::{AnswerMap, Enrichment};

use super::{parse, ProfileLookupService, SuggestionService};
use crate::steps::onboarding::{AI_SUGGESTED_PROFILES, PROFILE_METRICS};

/// Respuestas actuales con el delta encima: lo que se envía al webhook.
fn request_body(answers: &AnswerMap, delta: &AnswerMap) -> AnswerMap {
    let mut body = answers.clone();
    body.merge(delta.clone(), &[]);
    body
}

/// `userProfileMetrics` = métricas si el perfil existe, `{success: false}`
/// en cualquier otro caso.
pub async fn enrich_with_profile(service: &dyn ProfileLookupService,
                                 answers: &AnswerMap,
                                 mut delta: AnswerMap)
                                 -> AnswerMap {
    let handle = delta.get_str("instagramHandle").unwrap_or_default().to_string();
    let metrics = match service.lookup_profile(&request_body(answers, &delta), &handle).await {
        Ok(metrics) => {
            info!("enrich:profile found handle={handle}");
            metrics
        }
        Err(e) => {
            warn!("enrich:profile degraded handle={handle} err={e}");
            parse::not_found_metrics()
        }
    };
    delta.insert(PROFILE_METRICS, metrics);
    delta
}

/// `niches` sugeridos a partir del sitio; sin sugerencias el delta queda
/// intacto y la lista previa del usuario se conserva.
pub async fn enrich_with_niches(service: &dyn SuggestionService, answers: &AnswerMap, mut delta: AnswerMap) -> AnswerMap {
    let website = delta.get_str("websiteLink").unwrap_or_default().to_string();
    match service.suggest_niches(&request_body(answers, &delta), &website).await {
        Ok(niches) if !niches.is_empty() => {
            info!("enrich:niches suggested={} website={website}", niches.len());
            delta.insert("niches", niches);
        }
        Ok(_) => info!("enrich:niches none for website={website}"),
        Err(e) => warn!("enrich:niches degraded website={website} err={e}"),
    }
    delta
}

/// `aiSuggestedProfiles`; ante un fallo la lista de sugerencias queda vacía.
pub async fn enrich_with_targets(service: &dyn SuggestionService, answers: &AnswerMap, mut delta: AnswerMap) -> AnswerMap {
    let suggestions = match service.suggest_targets(&request_body(answers, &delta)).await {
        Ok(list) => {
            info!("enrich:targets suggested={}", list.len());
            list
        }
        Err(e) => {
            warn!("enrich:targets degraded err={e}");
            Vec::new()
        }
    };
    delta.insert(AI_SUGGESTED_PROFILES, Value::Array(suggestions));
    delta
}

/// Despacha según la `Enrichment` declarada por el step.
pub async fn enrich(enrichment: Enrichment,
                    profiles: &dyn ProfileLookupService,
                    suggestions: &dyn SuggestionService,
                    answers: &AnswerMap,
                    delta: AnswerMap)
                    -> AnswerMap {
    match enrichment {
        Enrichment::ProfileLookup => enrich_with_profile(profiles, answers, delta).await,
        Enrichment::NicheSuggestions => enrich_with_niches(suggestions, answers, delta).await,
        Enrichment::TargetSuggestions => enrich_with_targets(suggestions, answers, delta).await,
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::services::CollaboratorError;

    struct Down;

    #[async_trait]
    impl ProfileLookupService for Down {
        async fn lookup_profile(&self, _answers: &AnswerMap, _handle: &str) -> Result<Value, CollaboratorError> {
            Err(CollaboratorError::Status(500))
        }
    }

    #[async_trait]
    impl SuggestionService for Down {
        async fn suggest_niches(&self, _answers: &AnswerMap, _website: &str) -> Result<Vec<String>, CollaboratorError> {
            Err(CollaboratorError::Timeout)
        }

        async fn suggest_targets(&self, _answers: &AnswerMap) -> Result<Vec<Value>, CollaboratorError> {
            Err(CollaboratorError::Status(500))
        }
    }

    /// Devuelve lo que recibió para inspeccionar el cuerpo enviado.
    struct Echo;

    #[async_trait]
    impl ProfileLookupService for Echo {
        async fn lookup_profile(&self, answers: &AnswerMap, handle: &str) -> Result<Value, CollaboratorError> {
            Ok(json!({"success": true, "username": handle, "seen": answers.len()}))
        }
    }

    #[async_trait]
    impl SuggestionService for Echo {
        async fn suggest_niches(&self, _answers: &AnswerMap, _website: &str) -> Result<Vec<String>, CollaboratorError> {
            Ok(vec!["moda".into()])
        }

        async fn suggest_targets(&self, answers: &AnswerMap) -> Result<Vec<Value>, CollaboratorError> {
            let field = answers.get_str("profileMonitoring").unwrap_or_default();
            Ok(vec![json!({"text": field, "type": "aiRecommend"})])
        }
    }

    #[test]
    fn failures_keep_the_raw_input() {
        let answers = AnswerMap::single("accountName", "x");

        let d = tokio_test::block_on(enrich_with_profile(&Down, &answers, AnswerMap::single("instagramHandle", "ana")));
        assert_eq!(d.get_str("instagramHandle"), Some("ana"));
        assert_eq!(d.get(PROFILE_METRICS), Some(&json!({"success": false})));

        let d = tokio_test::block_on(enrich_with_niches(&Down, &answers, AnswerMap::single("websiteLink", "https://a.com")));
        assert_eq!(d.get_str("websiteLink"), Some("https://a.com"));
        assert!(!d.contains("niches"));

        let d = tokio_test::block_on(enrich_with_targets(&Down, &answers, AnswerMap::single("profileMonitoring", "Não")));
        assert_eq!(d.get_str("profileMonitoring"), Some("Não"));
        assert_eq!(d.get(AI_SUGGESTED_PROFILES), Some(&json!([])));
    }

    #[test]
    fn success_merges_the_sub_field() {
        let answers = AnswerMap::single("accountName", "x");
        let d = tokio_test::block_on(enrich(Enrichment::ProfileLookup,
                                            &Echo,
                                            &Echo,
                                            &answers,
                                            AnswerMap::single("instagramHandle", "ana")));
        // el cuerpo enviado lleva las respuestas previas más el campo nuevo
        assert_eq!(d.get(PROFILE_METRICS), Some(&json!({"success": true, "username": "ana", "seen": 2})));

        let d = tokio_test::block_on(enrich(Enrichment::TargetSuggestions,
                                            &Echo,
                                            &Echo,
                                            &answers,
                                            AnswerMap::single("profileMonitoring", "Não")));
        assert_eq!(d.get(AI_SUGGESTED_PROFILES), Some(&json!([{"text": "Não", "type": "aiRecommend"}])));

        let d = tokio_test::block_on(enrich(Enrichment::NicheSuggestions,
                                            &Echo,
                                            &Echo,
                                            &answers,
                                            AnswerMap::single("websiteLink", "https://a.com")));
        assert_eq!(d.get_list("niches"), vec!["moda"]);
    }
}
