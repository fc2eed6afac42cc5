//! `StepView`: lo que un step entrega para ser renderizado.
//!
//! Es neutral respecto a la UI (terminal, web, tests): describe el campo que
//! el step completa, el tipo de entrada y el valor previo si existe.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::has_answer;
use crate::answers::AnswerMap;
use crate::choice::is_consistent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputKind {
    Text { field: String },
    Number { field: String, min: i64, max: i64 },
    SingleChoice { field: String, options: Vec<String> },
    /// `exclusive`: opción "ninguna de las anteriores" que excluye al resto.
    MultiChoice { field: String, options: Vec<String>, exclusive: Option<String> },
    /// Lista libre de textos (p.ej. nichos) con límite opcional.
    TextList { field: String, max: Option<usize> },
    /// Lista libre de perfiles con sugerencias separadas y límite opcional.
    ProfileList { field: String, suggestions: Vec<String>, max: Option<usize> },
    Confirm { field: String },
}

impl InputKind {
    pub fn text(field: &str) -> Self {
        Self::Text { field: field.to_string() }
    }

    pub fn number(field: &str, min: i64, max: i64) -> Self {
        Self::Number { field: field.to_string(), min, max }
    }

    pub fn single(field: &str, options: &[&str]) -> Self {
        Self::SingleChoice { field: field.to_string(),
                             options: options.iter().map(|o| o.to_string()).collect() }
    }

    pub fn multi(field: &str, options: &[&str]) -> Self {
        Self::MultiChoice { field: field.to_string(),
                            options: options.iter().map(|o| o.to_string()).collect(),
                            exclusive: None }
    }

    pub fn multi_exclusive(field: &str, options: &[&str], exclusive: &str) -> Self {
        Self::MultiChoice { field: field.to_string(),
                            options: options.iter().map(|o| o.to_string()).collect(),
                            exclusive: Some(exclusive.to_string()) }
    }

    pub fn text_list(field: &str, max: Option<usize>) -> Self {
        Self::TextList { field: field.to_string(), max }
    }

    pub fn profile_list(field: &str, suggestions: Vec<String>, max: Option<usize>) -> Self {
        Self::ProfileList { field: field.to_string(), suggestions, max }
    }

    pub fn confirm(field: &str) -> Self {
        Self::Confirm { field: field.to_string() }
    }

    /// Campo del `AnswerMap` que completa esta entrada.
    pub fn field(&self) -> &str {
        match self {
            Self::Text { field }
            | Self::Number { field, .. }
            | Self::SingleChoice { field, .. }
            | Self::MultiChoice { field, .. }
            | Self::TextList { field, .. }
            | Self::ProfileList { field, .. }
            | Self::Confirm { field } => field,
        }
    }

    /// `true` si el delta trae un valor válido para esta entrada.
    ///
    /// Las opciones cerradas se validan contra la lista: una selección única
    /// debe ser una de las opciones y una múltiple no puede repetir, inventar
    /// ni mezclar la opción exclusiva con otras. El resto sólo exige valor.
    pub fn admits(&self, delta: &AnswerMap) -> bool {
        match self {
            Self::SingleChoice { field, options } => delta.get_str(field).is_some_and(|v| options.iter().any(|o| o == v)),
            Self::MultiChoice { field,
                                options,
                                exclusive, } => {
                let Some(Value::Array(items)) = delta.get(field) else { return false };
                let selected: Vec<String> = items.iter().filter_map(Value::as_str).map(str::to_string).collect();
                if selected.is_empty() || selected.len() != items.len() {
                    return false;
                }
                let known = selected.iter().all(|s| options.contains(s));
                let unique = selected.iter().enumerate().all(|(i, s)| !selected[..i].contains(s));
                known && unique && is_consistent(&selected, exclusive.as_deref())
            }
            _ => has_answer(delta, self.field()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepView {
    pub step_id: String,
    pub title: String,
    pub prompt: String,
    pub input: InputKind,
    /// Ítem actual cuando el step se renderiza dentro de un sub-flow.
    pub context: Option<String>,
    /// Valor previamente respondido (navegación hacia atrás).
    pub prefill: Option<Value>,
    /// Texto auxiliar (p.ej. error de un colaborador).
    pub notice: Option<String>,
}

impl StepView {
    pub fn new(step_id: &str, title: &str, prompt: &str, input: InputKind) -> Self {
        Self { step_id: step_id.to_string(),
               title: title.to_string(),
               prompt: prompt.to_string(),
               input,
               context: None,
               prefill: None,
               notice: None }
    }

    /// Toma el valor previo del campo a nivel superior del mapa.
    pub fn prefilled_from(mut self, answers: &AnswerMap) -> Self {
        self.prefill = answers.get(self.input.field()).cloned();
        self
    }

    pub fn with_context(mut self, context: Option<&str>) -> Self {
        self.context = context.map(str::to_string);
        self
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }
}
