//! Utilidades para fusionar respuestas JSON de forma determinista.
//!
//! Dos semánticas conviven:
//! - merge "shallow": las claves de `b` reemplazan a las de `a`.
//! - merge por ítem: para campos con namespace (`medicationAnswers`) cada
//!   clave de ítem se fusiona a su vez de forma shallow, de modo que una
//!   respuesta nueva para el ítem X no borra respuestas previas de X ni de
//!   otros ítems.

use serde_json::{Map, Value};

/// Merge shallow: keys from `b` override keys from `a` when both are objects.
/// Cuando alguno de los dos valores no es objeto, `b` tiene precedencia.
pub fn merge_json(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Object(ma), Value::Object(mb)) => {
            let mut out = ma.clone();
            for (k, v) in mb.iter() {
                out.insert(k.clone(), v.clone());
            }
            Value::Object(out)
        }
        // Non-objects: override
        (_, other) => other.clone(),
    }
}

/// Merge de un campo con namespace: `{item: {k: v}}`.
///
/// Para cada ítem presente en `incoming` se hace un merge shallow contra el
/// objeto existente del mismo ítem. Los ítems ausentes en `incoming` quedan
/// intactos.
pub fn merge_namespaced(existing: &Value, incoming: &Value) -> Value {
    let (Value::Object(current), Value::Object(updates)) = (existing, incoming) else {
        return incoming.clone();
    };
    let mut out: Map<String, Value> = current.clone();
    for (item, answers) in updates.iter() {
        let merged = match out.get(item) {
            Some(previous) => merge_json(previous, answers),
            None => answers.clone(),
        };
        out.insert(item.clone(), merged);
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn namespaced_merge_keeps_previous_item_answers() {
        let existing = json!({"Testosterone": {"method": "Patch"}, "Puberty blocker": {"method": "Injection (shot)"}});
        let incoming = json!({"Testosterone": {"duration": "3–12 months"}});

        let out = merge_namespaced(&existing, &incoming);

        assert_eq!(out["Testosterone"], json!({"method": "Patch", "duration": "3–12 months"}));
        assert_eq!(out["Puberty blocker"], json!({"method": "Injection (shot)"}));
    }

    #[test]
    fn namespaced_merge_over_non_object_takes_incoming() {
        let out = merge_namespaced(&json!("legacy"), &json!({"A": {"x": 1}}));
        assert_eq!(out, json!({"A": {"x": 1}}));
    }
}
