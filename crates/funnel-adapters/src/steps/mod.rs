//! Steps concretos de cada funnel y validadores compartidos.
//!
//! Los steps de rama fija se declaran con `question_step!`; los que ramifican
//! o normalizan la entrada implementan `StepDefinition` a mano.

pub mod health;
pub mod onboarding;
pub mod voice_tone;

use serde_json::{json, Value};

use funnel_core::AnswerMap;

/// Origen de un ítem de lista (nicho o perfil).
pub const AI_RECOMMEND: &str = "aiRecommend";
pub const MANUAL_ADDED: &str = "manualAdded";

/// Máximo de nichos por cuenta.
pub const MAX_NICHES: usize = 6;

/// Handle de Instagram: 1 a 30 caracteres entre letras, dígitos, `.` y `_`.
pub fn is_valid_handle(handle: &str) -> bool {
    let len = handle.chars().count();
    (1..=30).contains(&len) && handle.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
}

/// Quita espacios y el `@` inicial.
pub fn clean_handle(raw: &str) -> String {
    raw.trim().trim_start_matches('@').trim().to_string()
}

/// Antepone `https://` cuando el link no trae esquema.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Validación básica de dominio: host con punto y sin espacios.
pub fn looks_like_url(link: &str) -> bool {
    let rest = link.trim_start_matches("https://").trim_start_matches("http://");
    let host = rest.split('/').next().unwrap_or_default();
    !link.chars().any(char::is_whitespace)
    && host.contains('.')
    && !host.starts_with('.')
    && !host.ends_with('.')
}

/// Límite de perfiles a monitorear según el plan. `None` = ilimitado.
pub fn plan_limit(plan: Option<&str>) -> Option<usize> {
    match plan.map(str::trim) {
        Some("1b") => Some(5),
        Some("1c") => None,
        _ => Some(3),
    }
}

/// Texto de un ítem de lista, sea string plano u objeto `{text, type}`.
pub fn item_text(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get("text").and_then(Value::as_str),
        _ => None,
    }
}

/// Textos de una lista de ítems del mapa.
pub fn item_texts(answers: &AnswerMap, field: &str) -> Vec<String> {
    match answers.get(field) {
        Some(Value::Array(items)) => items.iter().filter_map(item_text).map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

/// Convierte strings sueltos en `{text, type: manualAdded}`; los objetos se
/// conservan. Vacíos y repetidos se descartan.
pub fn tag_items(items: &[Value], strip_at: bool) -> Vec<Value> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let Some(text) = item_text(item) else { continue };
        let text = if strip_at { clean_handle(text) } else { text.trim().to_string() };
        if text.is_empty() || seen.contains(&text) {
            continue;
        }
        let kind = item.get("type").and_then(Value::as_str).unwrap_or(MANUAL_ADDED);
        out.push(json!({"text": text, "type": kind}));
        seen.push(text);
    }
    out
}

/// Lista del delta con entre 1 y `max` ítems válidos.
pub fn list_within(delta: &AnswerMap, field: &str, max: Option<usize>) -> bool {
    let n = match delta.get(field) {
        Some(Value::Array(items)) => items.iter().filter(|v| item_text(v).is_some_and(|t| !t.trim().is_empty())).count(),
        _ => 0,
    };
    n >= 1 && max.map_or(true, |m| n <= m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles() {
        assert!(is_valid_handle("trends.de_ana"));
        assert!(!is_valid_handle(""));
        assert!(!is_valid_handle("com espaço"));
        assert!(!is_valid_handle(&"a".repeat(31)));
        assert_eq!(clean_handle(" @ana.trends "), "ana.trends");
    }

    #[test]
    fn urls() {
        assert_eq!(normalize_url("meusite.com.br"), "https://meusite.com.br");
        assert_eq!(normalize_url("http://x.com"), "http://x.com");
        assert!(looks_like_url("https://meusite.com.br/loja"));
        assert!(!looks_like_url("https://meusite"));
        assert!(!looks_like_url("https://meu site.com"));
    }

    #[test]
    fn plans() {
        assert_eq!(plan_limit(Some("1a")), Some(3));
        assert_eq!(plan_limit(Some("1b")), Some(5));
        assert_eq!(plan_limit(Some("1c")), None);
        assert_eq!(plan_limit(None), Some(3));
        assert_eq!(plan_limit(Some("gold")), Some(3));
    }

    #[test]
    fn tagging_dedupes_and_keeps_origin() {
        let items = vec![json!("@ana"),
                         json!({"text": "bia", "type": AI_RECOMMEND}),
                         json!("ana"),
                         json!("  ")];
        let tagged = tag_items(&items, true);
        assert_eq!(tagged,
                   vec![json!({"text": "ana", "type": MANUAL_ADDED}),
                        json!({"text": "bia", "type": AI_RECOMMEND})]);
    }
}
