//! Steps del funnel de onboarding (`/onboard`).
//!
//! account_name → password → social_network_type → instagram_handle →
//! instagram_confirmation → has_website → [website_link] → niches →
//! main_objective → profile_monitoring → targets → carga de la fase 1.

use serde_json::Value;

use funnel_core::{question_step, AnswerMap, Enrichment, InputKind, NextStep, StepDefinition, StepView};

use super::{clean_handle, is_valid_handle, item_texts, list_within, looks_like_url, normalize_url, plan_limit,
            tag_items, MAX_NICHES};

pub const ACCOUNT_NAME: &str = "account_name";
pub const PASSWORD: &str = "password";
pub const SOCIAL_NETWORK_TYPE: &str = "social_network_type";
pub const INSTAGRAM_HANDLE: &str = "instagram_handle";
pub const INSTAGRAM_CONFIRMATION: &str = "instagram_confirmation";
pub const HAS_WEBSITE: &str = "has_website";
pub const WEBSITE_LINK: &str = "website_link";
pub const NICHES: &str = "niches";
pub const MAIN_OBJECTIVE: &str = "main_objective";
pub const PROFILE_MONITORING: &str = "profile_monitoring";
pub const TARGETS: &str = "targets";

/// Campo que el step de confirmación usa para volver a pedir el handle.
pub const GO_BACK_TO_HANDLE: &str = "goBackToInstagramHandle";
pub const PROFILE_METRICS: &str = "userProfileMetrics";
pub const AI_SUGGESTED_PROFILES: &str = "aiSuggestedProfiles";

pub const MAIN_OBJECTIVES: [&str; 4] =
    ["Aumentar audiência", "Crescer perfil do zero", "Monetizar audiência", "Aumentar engajamento"];

question_step! {
    AccountName {
        id: ACCOUNT_NAME,
        title: "Nome da conta",
        prompt: "Como se chama a sua conta?",
        input: InputKind::text("accountName"),
        next: NextStep::to(PASSWORD),
    }
}

fn valid_password(delta: &AnswerMap) -> bool {
    delta.get_str("password")
         .map(|p| (6..=50).contains(&p.trim().chars().count()))
         .unwrap_or(false)
}

/// Contraseña de 6 a 50 caracteres, guardada sin espacios en los extremos.
#[derive(Clone, Copy, Debug, Default)]
pub struct Password;

impl StepDefinition for Password {
    fn id(&self) -> &str {
        PASSWORD
    }

    fn title(&self) -> &str {
        "Senha"
    }

    fn render(&self, answers: &AnswerMap, context: Option<&str>) -> StepView {
        StepView::new(PASSWORD, "Senha", "Crie uma senha de acesso", InputKind::text("password")).prefilled_from(answers)
                                                                                               .with_context(context)
    }

    fn next_step(&self, _answers: &AnswerMap) -> NextStep {
        NextStep::to(SOCIAL_NETWORK_TYPE)
    }

    fn targets(&self) -> Vec<NextStep> {
        vec![NextStep::to(SOCIAL_NETWORK_TYPE)]
    }

    fn accepts(&self, delta: &AnswerMap) -> bool {
        valid_password(delta)
    }

    fn normalize(&self, mut delta: AnswerMap) -> AnswerMap {
        if let Some(p) = delta.get_str("password").map(|p| p.trim().to_string()) {
            delta.insert("password", p);
        }
        delta
    }
}

question_step! {
    SocialNetworkType {
        id: SOCIAL_NETWORK_TYPE,
        title: "Rede social",
        prompt: "A sua rede social é:",
        input: InputKind::single("socialNetworkType", &["Marca Pessoal", "Empresa"]),
        next: NextStep::to(INSTAGRAM_HANDLE),
    }
}

/// Handle de Instagram; dispara el lookup del perfil antes de avanzar.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstagramHandle;

impl StepDefinition for InstagramHandle {
    fn id(&self) -> &str {
        INSTAGRAM_HANDLE
    }

    fn title(&self) -> &str {
        "Instagram"
    }

    fn render(&self, answers: &AnswerMap, context: Option<&str>) -> StepView {
        StepView::new(INSTAGRAM_HANDLE,
                      "Instagram",
                      "Qual é o @ do seu perfil no Instagram?",
                      InputKind::text("instagramHandle")).prefilled_from(answers)
                                                         .with_context(context)
    }

    fn next_step(&self, _answers: &AnswerMap) -> NextStep {
        NextStep::to(INSTAGRAM_CONFIRMATION)
    }

    fn targets(&self) -> Vec<NextStep> {
        vec![NextStep::to(INSTAGRAM_CONFIRMATION)]
    }

    fn accepts(&self, delta: &AnswerMap) -> bool {
        delta.get_str("instagramHandle").is_some_and(is_valid_handle)
    }

    fn normalize(&self, mut delta: AnswerMap) -> AnswerMap {
        if let Some(h) = delta.get_str("instagramHandle").map(clean_handle) {
            delta.insert("instagramHandle", h);
        }
        delta
    }

    fn enrichment(&self, _delta: &AnswerMap) -> Option<Enrichment> {
        Some(Enrichment::ProfileLookup)
    }
}

/// `true` si el lookup encontró el perfil.
pub fn profile_found(answers: &AnswerMap) -> bool {
    answers.get(PROFILE_METRICS)
           .and_then(|m| m.get("success"))
           .and_then(Value::as_bool)
           .unwrap_or(false)
}

/// Confirmación del perfil encontrado, o vuelta al handle.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstagramConfirmation;

impl StepDefinition for InstagramConfirmation {
    fn id(&self) -> &str {
        INSTAGRAM_CONFIRMATION
    }

    fn title(&self) -> &str {
        "Confirmação"
    }

    fn render(&self, answers: &AnswerMap, context: Option<&str>) -> StepView {
        let handle = answers.get_str("instagramHandle").unwrap_or_default();
        let view = StepView::new(INSTAGRAM_CONFIRMATION,
                                 "Confirmação",
                                 &format!("Este é o seu perfil? @{handle}"),
                                 InputKind::confirm("profileConfirmed")).prefilled_from(answers)
                                                                        .with_context(context);
        if profile_found(answers) {
            view
        } else {
            view.with_notice("Perfil não encontrado")
        }
    }

    fn next_step(&self, answers: &AnswerMap) -> NextStep {
        if answers.get(GO_BACK_TO_HANDLE).and_then(Value::as_bool).unwrap_or(false) {
            NextStep::to(INSTAGRAM_HANDLE)
        } else {
            NextStep::to(HAS_WEBSITE)
        }
    }

    fn targets(&self) -> Vec<NextStep> {
        vec![NextStep::to(INSTAGRAM_HANDLE), NextStep::to(HAS_WEBSITE)]
    }

    fn accepts(&self, delta: &AnswerMap) -> bool {
        delta.get("profileConfirmed").and_then(Value::as_bool).unwrap_or(false)
        || delta.get(GO_BACK_TO_HANDLE).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Confirmar apaga una vuelta previa al handle (el mapa nunca pierde
    /// campos, así que el flag se sobreescribe).
    fn normalize(&self, mut delta: AnswerMap) -> AnswerMap {
        if delta.get("profileConfirmed").and_then(Value::as_bool).unwrap_or(false) {
            delta.insert(GO_BACK_TO_HANDLE, false);
        }
        delta
    }
}

/// ¿Tiene sitio web? `Sim` pide el link.
#[derive(Clone, Copy, Debug, Default)]
pub struct HasWebsite;

impl StepDefinition for HasWebsite {
    fn id(&self) -> &str {
        HAS_WEBSITE
    }

    fn title(&self) -> &str {
        "Site"
    }

    fn render(&self, answers: &AnswerMap, context: Option<&str>) -> StepView {
        StepView::new(HAS_WEBSITE,
                      "Site",
                      "Você tem um site?",
                      InputKind::single("hasWebsite", &["Sim", "Não"])).prefilled_from(answers)
                                                                       .with_context(context)
    }

    fn next_step(&self, answers: &AnswerMap) -> NextStep {
        if answers.is("hasWebsite", "Sim") {
            NextStep::to(WEBSITE_LINK)
        } else {
            NextStep::to(NICHES)
        }
    }

    fn targets(&self) -> Vec<NextStep> {
        vec![NextStep::to(WEBSITE_LINK), NextStep::to(NICHES)]
    }

    fn accepts(&self, delta: &AnswerMap) -> bool {
        InputKind::single("hasWebsite", &["Sim", "Não"]).admits(delta)
    }
}

/// Link del sitio; se normaliza a `https://` y dispara el análisis de nichos.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebsiteLink;

impl StepDefinition for WebsiteLink {
    fn id(&self) -> &str {
        WEBSITE_LINK
    }

    fn title(&self) -> &str {
        "Link do site"
    }

    fn render(&self, answers: &AnswerMap, context: Option<&str>) -> StepView {
        StepView::new(WEBSITE_LINK, "Link do site", "Qual é o link do seu site?", InputKind::text("websiteLink"))
            .prefilled_from(answers)
            .with_context(context)
    }

    fn next_step(&self, _answers: &AnswerMap) -> NextStep {
        NextStep::to(NICHES)
    }

    fn targets(&self) -> Vec<NextStep> {
        vec![NextStep::to(NICHES)]
    }

    fn accepts(&self, delta: &AnswerMap) -> bool {
        delta.get_str("websiteLink").is_some_and(looks_like_url)
    }

    fn normalize(&self, mut delta: AnswerMap) -> AnswerMap {
        if let Some(link) = delta.get_str("websiteLink").map(normalize_url) {
            delta.insert("websiteLink", link);
        }
        delta
    }

    fn enrichment(&self, _delta: &AnswerMap) -> Option<Enrichment> {
        Some(Enrichment::NicheSuggestions)
    }
}

/// Lista de nichos (1 a 6, sin repetidos). Llega prellenada con las
/// sugerencias del análisis del sitio cuando existen.
#[derive(Clone, Copy, Debug, Default)]
pub struct Niches;

impl StepDefinition for Niches {
    fn id(&self) -> &str {
        NICHES
    }

    fn title(&self) -> &str {
        "Nichos"
    }

    fn render(&self, answers: &AnswerMap, context: Option<&str>) -> StepView {
        StepView::new(NICHES,
                      "Nichos",
                      "Quais são os nichos do seu perfil?",
                      InputKind::text_list("niches", Some(MAX_NICHES))).prefilled_from(answers)
                                                                       .with_context(context)
    }

    fn next_step(&self, _answers: &AnswerMap) -> NextStep {
        NextStep::to(MAIN_OBJECTIVE)
    }

    fn targets(&self) -> Vec<NextStep> {
        vec![NextStep::to(MAIN_OBJECTIVE)]
    }

    fn accepts(&self, delta: &AnswerMap) -> bool {
        list_within(delta, "niches", Some(MAX_NICHES))
    }

    fn normalize(&self, mut delta: AnswerMap) -> AnswerMap {
        let mut niches: Vec<String> = Vec::new();
        for text in item_texts(&delta, "niches") {
            let text = text.trim().to_string();
            if !text.is_empty() && !niches.contains(&text) {
                niches.push(text);
            }
        }
        if delta.contains("niches") {
            delta.insert("niches", niches);
        }
        delta
    }
}

question_step! {
    MainObjective {
        id: MAIN_OBJECTIVE,
        title: "Objetivo",
        prompt: "Qual é o seu principal objetivo?",
        input: InputKind::single("mainObjective", &MAIN_OBJECTIVES),
        next: NextStep::to(PROFILE_MONITORING),
    }
}

/// ¿Ya sabe qué perfiles monitorear? `Não` pide sugerencias al colaborador.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProfileMonitoring;

impl StepDefinition for ProfileMonitoring {
    fn id(&self) -> &str {
        PROFILE_MONITORING
    }

    fn title(&self) -> &str {
        "Monitoramento"
    }

    fn render(&self, answers: &AnswerMap, context: Option<&str>) -> StepView {
        StepView::new(PROFILE_MONITORING,
                      "Monitoramento",
                      "Você já sabe quais perfis quer monitorar?",
                      InputKind::single("profileMonitoring", &["Sim", "Não"])).prefilled_from(answers)
                                                                              .with_context(context)
    }

    fn next_step(&self, _answers: &AnswerMap) -> NextStep {
        NextStep::to(TARGETS)
    }

    fn targets(&self) -> Vec<NextStep> {
        vec![NextStep::to(TARGETS)]
    }

    fn accepts(&self, delta: &AnswerMap) -> bool {
        InputKind::single("profileMonitoring", &["Sim", "Não"]).admits(delta)
    }

    fn enrichment(&self, delta: &AnswerMap) -> Option<Enrichment> {
        delta.is("profileMonitoring", "Não").then_some(Enrichment::TargetSuggestions)
    }
}

/// Perfiles a monitorear. Las sugerencias viven aparte
/// (`aiSuggestedProfiles`) y sólo entran a la lista si el usuario las elige.
#[derive(Clone, Debug, Default)]
pub struct Targets {
    max: Option<usize>,
}

impl Targets {
    pub fn for_plan(plan: Option<&str>) -> Self {
        Self { max: plan_limit(plan) }
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }
}

impl StepDefinition for Targets {
    fn id(&self) -> &str {
        TARGETS
    }

    fn title(&self) -> &str {
        "Perfis"
    }

    fn render(&self, answers: &AnswerMap, context: Option<&str>) -> StepView {
        let suggestions = item_texts(answers, AI_SUGGESTED_PROFILES);
        StepView::new(TARGETS,
                      "Perfis",
                      "Quais perfis você quer monitorar?",
                      InputKind::profile_list("profilesToMonitor", suggestions, self.max)).prefilled_from(answers)
                                                                                         .with_context(context)
    }

    fn next_step(&self, _answers: &AnswerMap) -> NextStep {
        NextStep::Complete
    }

    fn targets(&self) -> Vec<NextStep> {
        vec![NextStep::Complete]
    }

    fn accepts(&self, delta: &AnswerMap) -> bool {
        list_within(delta, "profilesToMonitor", self.max)
    }

    fn normalize(&self, mut delta: AnswerMap) -> AnswerMap {
        if let Some(Value::Array(items)) = delta.get("profilesToMonitor") {
            let tagged = tag_items(items, true);
            delta.insert("profilesToMonitor", tagged);
        }
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn yes_no_steps_only_take_sim_or_nao() {
        assert!(HasWebsite.accepts(&AnswerMap::single("hasWebsite", "Não")));
        assert!(!HasWebsite.accepts(&AnswerMap::single("hasWebsite", "Talvez")));
        assert!(ProfileMonitoring.accepts(&AnswerMap::single("profileMonitoring", "Sim")));
        assert!(!ProfileMonitoring.accepts(&AnswerMap::single("profileMonitoring", "yes")));
    }

    #[test]
    fn confirmation_routes_back_to_handle_on_request() {
        let step = InstagramConfirmation;
        let back = AnswerMap::single(GO_BACK_TO_HANDLE, true);
        assert!(step.accepts(&back));
        assert_eq!(step.next_step(&back), NextStep::to(INSTAGRAM_HANDLE));

        let confirm = step.normalize(AnswerMap::single("profileConfirmed", true));
        assert_eq!(confirm.get(GO_BACK_TO_HANDLE), Some(&json!(false)));
        let mut answers = back.clone();
        answers.merge(confirm, &[]);
        assert_eq!(step.next_step(&answers), NextStep::to(HAS_WEBSITE));
    }

    #[test]
    fn confirmation_shows_not_found_notice() {
        let mut answers = AnswerMap::single("instagramHandle", "ana");
        answers.insert(PROFILE_METRICS, json!({"success": false}));
        let view = InstagramConfirmation.render(&answers, None);
        assert_eq!(view.notice.as_deref(), Some("Perfil não encontrado"));

        answers.insert(PROFILE_METRICS, json!({"success": true, "username": "ana"}));
        assert!(InstagramConfirmation.render(&answers, None).notice.is_none());
    }

    #[test]
    fn website_branch() {
        assert_eq!(HasWebsite.next_step(&AnswerMap::single("hasWebsite", "Sim")), NextStep::to(WEBSITE_LINK));
        assert_eq!(HasWebsite.next_step(&AnswerMap::single("hasWebsite", "Não")), NextStep::to(NICHES));
        let d = WebsiteLink.normalize(AnswerMap::single("websiteLink", " loja.com.br "));
        assert_eq!(d.get_str("websiteLink"), Some("https://loja.com.br"));
        assert!(WebsiteLink.accepts(&d));
    }

    #[test]
    fn password_is_trimmed_and_bounded() {
        let d = Password.normalize(AnswerMap::single("password", "  abc123  "));
        assert_eq!(d.get_str("password"), Some("abc123"));
        assert!(Password.accepts(&d));
        assert!(!Password.accepts(&AnswerMap::single("password", "abc")));
    }

    #[test]
    fn niches_are_capped_at_six() {
        let seven = AnswerMap::from_value(json!({"niches": ["a", "b", "c", "d", "e", "f", "g"]}));
        assert!(!Niches.accepts(&Niches.normalize(seven)));
        let dup = Niches.normalize(AnswerMap::from_value(json!({"niches": ["moda", " moda ", "beleza"]})));
        assert_eq!(dup.get_list("niches"), vec!["moda", "beleza"]);
        assert!(Niches.accepts(&dup));
    }

    #[test]
    fn suggestions_only_on_negative_answer() {
        let no = AnswerMap::single("profileMonitoring", "Não");
        assert_eq!(ProfileMonitoring.enrichment(&no), Some(Enrichment::TargetSuggestions));
        assert_eq!(ProfileMonitoring.enrichment(&AnswerMap::single("profileMonitoring", "Sim")), None);
    }

    #[test]
    fn targets_respect_plan_limit() {
        let basic = Targets::for_plan(None);
        let four = basic.normalize(AnswerMap::from_value(json!({"profilesToMonitor": ["@a", "b", "c", "d"]})));
        assert!(!basic.accepts(&four));
        assert!(Targets::for_plan(Some("1b")).accepts(&four));
        assert!(Targets::for_plan(Some("1c")).accepts(&four));
        assert_eq!(four.get("profilesToMonitor").and_then(|v| v.get(0)),
                   Some(&json!({"text": "a", "type": "manualAdded"})));
    }
}
