//! Interpretación de una línea de la terminal según el input del step.
//!
//! Comandos globales: `:back`, `:reset`, `:quit`. Una línea que empieza con
//! `{` se envía tal cual como objeto JSON. Línea vacía reenvía el valor
//! previo del step, si existe.

use serde_json::{json, Value};

use funnel_adapters::steps::onboarding::GO_BACK_TO_HANDLE;
use funnel_adapters::steps::AI_RECOMMEND;
use funnel_core::choice::toggle_exclusive;
use funnel_core::{AnswerMap, InputKind, StepView};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Back,
    Reset,
    Quit,
    Answer(AnswerMap),
    /// Entrada que ni siquiera llega al motor.
    Invalid(String),
}

pub fn parse_line(view: &StepView, line: &str) -> Command {
    let line = line.trim();
    match line {
        ":back" | ":b" => return Command::Back,
        ":reset" => return Command::Reset,
        ":quit" | ":q" => return Command::Quit,
        _ => {}
    }
    if line.starts_with('{') {
        return match serde_json::from_str::<Value>(line) {
            Ok(value @ Value::Object(_)) => Command::Answer(AnswerMap::from_value(value)),
            Ok(_) => Command::Invalid("se esperaba un objeto JSON".into()),
            Err(e) => Command::Invalid(format!("JSON inválido: {e}")),
        };
    }
    if line.is_empty() {
        return match &view.prefill {
            Some(prev) => Command::Answer(AnswerMap::single(view.input.field(), prev.clone())),
            None => Command::Invalid("resposta vazia".into()),
        };
    }

    match &view.input {
        InputKind::Text { field } => Command::Answer(AnswerMap::single(field.as_str(), line)),
        InputKind::Number { field, .. } => match line.parse::<i64>() {
            Ok(n) => Command::Answer(AnswerMap::single(field.as_str(), n)),
            Err(_) => Command::Invalid(format!("número inválido: {line}")),
        },
        InputKind::SingleChoice { field, options } => match pick(options, line) {
            Ok(option) => Command::Answer(AnswerMap::single(field.as_str(), option)),
            Err(msg) => Command::Invalid(msg),
        },
        InputKind::MultiChoice { field,
                                 options,
                                 exclusive, } => {
            let mut selected: Vec<String> = Vec::new();
            for token in tokens(line) {
                match pick(options, token) {
                    Ok(option) => selected = toggle_exclusive(&selected, &option, exclusive.as_deref()),
                    Err(msg) => return Command::Invalid(msg),
                }
            }
            Command::Answer(AnswerMap::single(field.as_str(), selected))
        }
        InputKind::TextList { field, .. } => {
            let items: Vec<String> = tokens(line).map(str::to_string).collect();
            Command::Answer(AnswerMap::single(field.as_str(), items))
        }
        InputKind::ProfileList { field, suggestions, .. } => {
            let mut items: Vec<Value> = Vec::new();
            for token in tokens(line) {
                match index_in(suggestions, token) {
                    Some(text) => items.push(json!({"text": text, "type": AI_RECOMMEND})),
                    None if token.parse::<usize>().is_ok() => {
                        return Command::Invalid(format!("sugestão inexistente: {token}"))
                    }
                    None => items.push(Value::String(token.to_string())),
                }
            }
            Command::Answer(AnswerMap::single(field.as_str(), items))
        }
        InputKind::Confirm { field } => match line.to_lowercase().as_str() {
            "s" | "sim" | "y" | "yes" => Command::Answer(AnswerMap::single(field.as_str(), true)),
            "n" | "não" | "nao" | "no" => Command::Answer(AnswerMap::single(GO_BACK_TO_HANDLE, true)),
            _ => Command::Invalid("responda s/n".into()),
        },
    }
}

fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Opción por número (1-based) o por texto exacto, sin importar mayúsculas.
fn pick(options: &[String], token: &str) -> Result<String, String> {
    if let Some(option) = index_in(options, token) {
        return Ok(option.to_string());
    }
    if token.parse::<usize>().is_ok() {
        return Err(format!("opção inexistente: {token}"));
    }
    options.iter()
           .find(|o| o.eq_ignore_ascii_case(token))
           .cloned()
           .ok_or_else(|| format!("opção desconhecida: {token}"))
}

fn index_in<'a>(list: &'a [String], token: &str) -> Option<&'a str> {
    let n = token.parse::<usize>().ok()?;
    list.get(n.checked_sub(1)?).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(input: InputKind) -> StepView {
        StepView::new("s", "S", "?", input)
    }

    #[test]
    fn global_commands() {
        let v = view(InputKind::text("name"));
        assert_eq!(parse_line(&v, " :back "), Command::Back);
        assert_eq!(parse_line(&v, ":reset"), Command::Reset);
        assert_eq!(parse_line(&v, ":q"), Command::Quit);
    }

    #[test]
    fn empty_line_resubmits_prefill() {
        let mut v = view(InputKind::text("name"));
        assert!(matches!(parse_line(&v, ""), Command::Invalid(_)));
        v.prefill = Some(json!("Ana"));
        assert_eq!(parse_line(&v, ""), Command::Answer(AnswerMap::single("name", "Ana")));
    }

    #[test]
    fn choices_by_number_or_text() {
        let v = view(InputKind::single("sex", &["Male", "Female"]));
        assert_eq!(parse_line(&v, "2"), Command::Answer(AnswerMap::single("sex", "Female")));
        assert_eq!(parse_line(&v, "male"), Command::Answer(AnswerMap::single("sex", "Male")));
        assert!(matches!(parse_line(&v, "3"), Command::Invalid(_)));
    }

    #[test]
    fn exclusive_option_wins_when_last() {
        let v = view(InputKind::multi_exclusive("meds", &["A", "B", "Not sure"], "Not sure"));
        assert_eq!(parse_line(&v, "1, 2"), Command::Answer(AnswerMap::single("meds", vec!["A", "B"])));
        assert_eq!(parse_line(&v, "1,3"), Command::Answer(AnswerMap::single("meds", vec!["Not sure"])));
        assert_eq!(parse_line(&v, "3,2"), Command::Answer(AnswerMap::single("meds", vec!["B"])));
    }

    #[test]
    fn profile_list_mixes_suggestions_and_manual() {
        let v = view(InputKind::profile_list("profilesToMonitor", vec!["ana".into(), "bia".into()], Some(3)));
        let Command::Answer(delta) = parse_line(&v, "2, @caio") else { panic!("esperaba respuesta") };
        assert_eq!(delta.get("profilesToMonitor"),
                   Some(&json!([{"text": "bia", "type": "aiRecommend"}, "@caio"])));
        assert!(matches!(parse_line(&v, "7"), Command::Invalid(_)));
    }

    #[test]
    fn confirm_and_json() {
        let v = view(InputKind::confirm("profileConfirmed"));
        assert_eq!(parse_line(&v, "Sim"), Command::Answer(AnswerMap::single("profileConfirmed", true)));
        assert_eq!(parse_line(&v, "n"), Command::Answer(AnswerMap::single(GO_BACK_TO_HANDLE, true)));
        assert_eq!(parse_line(&v, r#"{"profileConfirmed": true}"#),
                   Command::Answer(AnswerMap::single("profileConfirmed", true)));
        assert!(matches!(parse_line(&v, "[1]"), Command::Invalid(_)));
        assert!(matches!(parse_line(&v, "{oops"), Command::Invalid(_)));
    }
}
