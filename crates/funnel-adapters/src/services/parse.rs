//! Interpretación de las respuestas de los webhooks.

use serde_json::{json, Value};

use super::CollaboratorError;
use crate::steps::{clean_handle, item_text, AI_RECOMMEND};

/// Los webhooks suelen envolver el resultado en una lista de un elemento.
fn unwrap_single(body: Value) -> Value {
    match body {
        Value::Array(mut items) if items.len() == 1 && items[0].is_object() => items.remove(0),
        other => other,
    }
}

/// Métricas del perfil: objeto con `success == true`.
pub fn profile_metrics(body: Value) -> Result<Value, CollaboratorError> {
    let body = unwrap_single(body);
    let Value::Object(map) = body else {
        return Err(CollaboratorError::InvalidResponse("profile metrics is not an object".into()));
    };
    if map.get("success").and_then(Value::as_bool) == Some(true) {
        Ok(Value::Object(map))
    } else {
        Err(CollaboratorError::Unsuccessful)
    }
}

/// Lista de textos bajo `arr` (formato `[{"arr": [...]}]`) o bajo `key`,
/// o la lista misma.
fn text_list(body: Value, key: &str) -> Result<Vec<String>, CollaboratorError> {
    let body = unwrap_single(body);
    let list = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("arr").or_else(|| map.remove(key)) {
            Some(Value::Array(items)) => items,
            _ => return Err(CollaboratorError::InvalidResponse(format!("missing `arr`/`{key}` list"))),
        },
        _ => return Err(CollaboratorError::InvalidResponse("unexpected response shape".into())),
    };
    Ok(list.iter()
           .filter_map(item_text)
           .map(|t| t.trim().to_string())
           .filter(|t| !t.is_empty())
           .collect())
}

/// Perfiles sugeridos, sin `@` y marcados como recomendación.
pub fn target_suggestions(body: Value) -> Result<Vec<Value>, CollaboratorError> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for text in text_list(body, "profiles")? {
        let handle = clean_handle(&text);
        if handle.is_empty() || seen.contains(&handle) {
            continue;
        }
        out.push(json!({"text": handle, "type": AI_RECOMMEND}));
        seen.push(handle);
    }
    Ok(out)
}

/// Nichos sugeridos a partir del sitio.
pub fn niche_suggestions(body: Value) -> Result<Vec<String>, CollaboratorError> {
    let mut niches: Vec<String> = Vec::new();
    for n in text_list(body, "niches")? {
        if !niches.contains(&n) {
            niches.push(n);
        }
    }
    Ok(niches)
}

/// Métricas mínimas para el camino "perfil no encontrado".
pub fn not_found_metrics() -> Value {
    json!({"success": false})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_strip_at_and_tag() {
        let body = json!([{"arr": ["@ana", "bia", "@ana", ""]}]);
        assert_eq!(target_suggestions(body).unwrap(),
                   vec![json!({"text": "ana", "type": "aiRecommend"}),
                        json!({"text": "bia", "type": "aiRecommend"})]);
    }

    #[test]
    fn malformed_targets_are_invalid() {
        assert!(matches!(target_suggestions(json!({"foo": 1})), Err(CollaboratorError::InvalidResponse(_))));
        assert!(matches!(target_suggestions(json!("x")), Err(CollaboratorError::InvalidResponse(_))));
    }

    #[test]
    fn profile_requires_success_flag() {
        let ok = json!({"success": true, "username": "ana", "followers": 120});
        assert_eq!(profile_metrics(json!([ok.clone()])).unwrap(), ok);
        assert_eq!(profile_metrics(json!({"success": false})), Err(CollaboratorError::Unsuccessful));
        assert_eq!(profile_metrics(json!({"username": "ana"})), Err(CollaboratorError::Unsuccessful));
    }

    #[test]
    fn niches_accept_several_shapes() {
        assert_eq!(niche_suggestions(json!({"niches": ["moda", "beleza", "moda"]})).unwrap(),
                   vec!["moda", "beleza"]);
        assert_eq!(niche_suggestions(json!([{"arr": ["pets"]}])).unwrap(), vec!["pets"]);
        assert_eq!(niche_suggestions(json!(["a", "b"])).unwrap(), vec!["a", "b"]);
        assert_eq!(niche_suggestions(json!(["solo"])).unwrap(), vec!["solo"]);
    }
}
