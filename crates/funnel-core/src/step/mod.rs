//! Definiciones relacionadas a Steps.
//!
//! Un Step es una pantalla de una sola pregunta más su función de rama. Este
//! módulo define:
//! - `StepDefinition`: interfaz neutral usada por el engine.
//! - `NextStep`: resultado tipado de la función de rama.
//! - `StepView` / `InputKind`: descripción renderizable del step.
//! - `question_step!`: macro para steps de rama incondicional.

pub mod definition;
pub mod macros;
pub mod view;

pub use definition::{Enrichment, NextStep, StepDefinition};
pub use view::{InputKind, StepView};

use serde_json::Value;

use crate::answers::AnswerMap;

/// `true` si el delta trae un valor no vacío para `field` (string con texto,
/// lista con elementos, número, booleano u objeto no vacío).
pub fn has_answer(delta: &AnswerMap, field: &str) -> bool {
    match delta.get(field) {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    }
}
