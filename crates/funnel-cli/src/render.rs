//! Presentación de un `StepView` en texto plano.

use std::fmt::Write;

use serde_json::Value;

use funnel_adapters::steps::item_text;
use funnel_core::choice::visible_options;
use funnel_core::{InputKind, StepView};

/// Valores seleccionados previamente (lista de strings u objetos `{text}`).
fn selected(prefill: Option<&Value>) -> Vec<String> {
    match prefill {
        Some(Value::Array(items)) => items.iter().filter_map(item_text).map(str::to_string).collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

pub fn render(view: &StepView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n== {} ==", view.title);
    if let Some(item) = &view.context {
        let _ = writeln!(out, "[{item}]");
    }
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "! {notice}");
    }
    let _ = writeln!(out, "{}", view.prompt);

    let chosen = selected(view.prefill.as_ref());
    match &view.input {
        InputKind::SingleChoice { options, .. } => numbered(&mut out, options, options, &chosen),
        InputKind::MultiChoice { options, exclusive, .. } => {
            let visible = visible_options(options, &chosen, exclusive.as_deref());
            let visible: Vec<String> = visible.into_iter().map(str::to_string).collect();
            numbered(&mut out, options, &visible, &chosen);
            let _ = writeln!(out, "(números separados por vírgula)");
        }
        InputKind::ProfileList { suggestions, max, .. } => {
            if !suggestions.is_empty() {
                let _ = writeln!(out, "Sugestões:");
                numbered(&mut out, suggestions, suggestions, &chosen);
            }
            let _ = writeln!(out, "(números de sugestões e/ou @perfis separados por vírgula{})", limit(*max));
        }
        InputKind::TextList { max, .. } => {
            let _ = writeln!(out, "(itens separados por vírgula{})", limit(*max));
        }
        InputKind::Number { min, max, .. } => {
            let _ = writeln!(out, "({min}..{max})");
        }
        InputKind::Confirm { .. } => {
            let _ = writeln!(out, "(s/n)");
        }
        InputKind::Text { .. } => {}
    }
    if let Some(prev) = &view.prefill {
        let _ = writeln!(out, "Enter mantém: {prev}");
    }
    out
}

/// Numera sobre la lista completa para que el índice no cambie cuando la
/// opción exclusiva se oculta.
fn numbered(out: &mut String, all: &[String], visible: &[String], chosen: &[String]) {
    for (i, option) in all.iter().enumerate() {
        if !visible.contains(option) {
            continue;
        }
        let mark = if chosen.contains(option) { "x" } else { " " };
        let _ = writeln!(out, "  [{mark}] {}. {option}", i + 1);
    }
}

fn limit(max: Option<usize>) -> String {
    max.map(|m| format!(", máx. {m}")).unwrap_or_default()
}
