use funnel_core::{question_step, AnswerMap, CompletionState, EngineBuilderInit, EngineConfig, FunnelEngine,
                  FunnelError, InMemoryPersistence, InputKind, NextStep, RegistryBuilder, StepDefinition,
                  StepRegistry, StepView, SubflowDefinition, Transition};
use serde_json::json;

question_step! {
    AccountName {
        id: "account_name",
        title: "Conta",
        prompt: "Qual o nome da sua conta?",
        input: InputKind::text("accountName"),
        next: NextStep::to("password"),
    }
}

question_step! {
    Password {
        id: "password",
        title: "Senha",
        prompt: "Crie uma senha",
        input: InputKind::text("password"),
        next: NextStep::to("has_medications"),
    }
}

/// Rama binaria sobre el campo recién respondido.
struct HasMedications;
impl StepDefinition for HasMedications {
    fn id(&self) -> &str {
        "has_medications"
    }
    fn render(&self, answers: &AnswerMap, _context: Option<&str>) -> StepView {
        StepView::new("has_medications", "Medicação", "Usa medicação?", InputKind::single("hasMeds", &["Yes", "No"]))
            .prefilled_from(answers)
    }
    fn next_step(&self, answers: &AnswerMap) -> NextStep {
        if answers.is("hasMeds", "Yes") {
            NextStep::to("medications")
        } else {
            NextStep::to("walking")
        }
    }
    fn targets(&self) -> Vec<NextStep> {
        vec![NextStep::to("medications"), NextStep::to("walking")]
    }
}

question_step! {
    Medications {
        id: "medications",
        title: "Quais",
        prompt: "Quais medicamentos?",
        input: InputKind::multi("meds", &["A", "B", "C"]),
        next: NextStep::subflow("meds"),
    }
}

question_step! { Method { id: "method", title: "Método", prompt: "Como?", input: InputKind::text("method"), next: NextStep::Complete } }
question_step! { Duration { id: "duration", title: "Duração", prompt: "Há quanto tempo?", input: InputKind::text("duration"), next: NextStep::Complete } }
question_step! { Dose { id: "dose", title: "Dose", prompt: "Mudou a dose?", input: InputKind::text("dose"), next: NextStep::Complete } }

question_step! {
    Pregnancy {
        id: "pregnancy",
        title: "Gravidez",
        prompt: "Está grávida?",
        input: InputKind::text("pregnancy"),
        next: NextStep::to("walking"),
    }
}

question_step! {
    Walking {
        id: "walking",
        title: "Caminhada",
        prompt: "Quanto caminha?",
        input: InputKind::text("walking"),
        next: NextStep::Complete,
    }
}

/// Continuación que depende de un campo muy anterior (`sex`).
fn after_medications(answers: &AnswerMap) -> NextStep {
    if answers.is("sex", "Female") {
        NextStep::to("pregnancy")
    } else {
        NextStep::to("walking")
    }
}

fn registry() -> StepRegistry {
    let meds = SubflowDefinition::new("meds", "medicationAnswers", after_medications)
        .inner_step(Method)
        .inner_step(Duration)
        .inner_step(Dose)
        .with_targets(vec![NextStep::to("pregnancy"), NextStep::to("walking")]);
    RegistryBuilder::new("test", "test-ns").step(AccountName)
                                           .step(Password)
                                           .step(HasMedications)
                                           .step(Medications)
                                           .step(Pregnancy)
                                           .step(Walking)
                                           .subflow(meds)
                                           .build()
                                           .expect("registro válido")
}

fn engine() -> FunnelEngine<InMemoryPersistence> {
    EngineBuilderInit::new(registry()).persistence(InMemoryPersistence::new())
                                      .config(EngineConfig::strict())
                                      .build()
}

fn delta(v: serde_json::Value) -> AnswerMap {
    AnswerMap::from_value(v)
}

#[test]
fn account_name_password_back_scenario() {
    let mut e = engine();
    assert_eq!(e.current_step_id(), "account_name");
    e.continue_with(delta(json!({"accountName": "Trends de Ana"}))).unwrap();
    e.continue_with(delta(json!({"password": "abc123"}))).unwrap();
    assert!(e.back().unwrap());
    assert_eq!(e.current_step_id(), "password");
    assert!(e.can_go_back());
    assert!(e.back().unwrap());
    assert_eq!(e.current_step_id(), "account_name");
    assert!(!e.can_go_back());
    // back no revierte respuestas
    assert_eq!(e.answers().get_str("password"), Some("abc123"));
}

#[test]
fn medication_subflow_visits_cross_product_and_back_lands_on_last() {
    let mut e = engine();
    e.continue_with(delta(json!({"accountName": "x", "sex": "Female"}))).unwrap();
    e.continue_with(delta(json!({"password": "abc123"}))).unwrap();
    e.continue_with(delta(json!({"hasMeds": "Yes"}))).unwrap();
    let first = e.continue_with(delta(json!({"meds": ["A", "B", "C"]}))).unwrap();

    let mut positions = vec![first];
    let fields = ["method", "duration", "dose"];
    for _ in 0..9 {
        let (_, inner) = e.subflow_position().expect("sub-flow activo");
        positions.push(e.continue_with(AnswerMap::single(fields[inner], "v")).unwrap());
    }

    let expected_inner: Vec<(String, usize)> = ["A", "B", "C"].iter()
                                                              .flat_map(|i| (0..3).map(move |k| (i.to_string(), k)))
                                                              .collect();
    let seen: Vec<(String, usize)> = positions.iter()
                                              .filter_map(|t| match t {
                                                  Transition::Subflow { item, inner_index, .. } => {
                                                      Some((item.clone(), *inner_index))
                                                  }
                                                  _ => None,
                                              })
                                              .collect();
    assert_eq!(seen, expected_inner);
    // continuación ramificada por `sex`, respondido al principio
    assert_eq!(positions.last(), Some(&Transition::Step("pregnancy".into())));

    assert!(e.back().unwrap());
    assert_eq!(e.subflow_position(), Some(("C", 2)));
    assert_eq!(e.current_step_id(), "dose");

    // reavanzar desde (C,2) vuelve al mismo step externo
    assert_eq!(e.continue_with(AnswerMap::single("dose", "w")).unwrap(),
               Transition::Step("pregnancy".into()));
}

fn finish_after_meds(_answers: &AnswerMap) -> NextStep {
    NextStep::Complete
}

/// Funil cuyo sub-flow termina directamente el quiz.
fn subflow_last_engine() -> FunnelEngine<InMemoryPersistence> {
    let meds = SubflowDefinition::new("meds", "medicationAnswers", finish_after_meds).inner_step(Method)
                                                                                  .inner_step(Duration)
                                                                                  .with_targets(vec![NextStep::Complete]);
    let registry = RegistryBuilder::new("short", "short-ns").step(Medications)
                                                           .subflow(meds)
                                                           .build()
                                                           .expect("registro válido");
    EngineBuilderInit::new(registry).persistence(InMemoryPersistence::new())
                                    .config(EngineConfig::strict())
                                    .build()
}

#[test]
fn back_from_complete_reenters_subflow() {
    let mut e = subflow_last_engine();
    e.continue_with(delta(json!({"meds": ["A", "B"]}))).unwrap();
    for (field, value) in [("method", "a0"), ("duration", "a1"), ("method", "b0")] {
        assert!(matches!(e.continue_with(AnswerMap::single(field, value)).unwrap(), Transition::Subflow { .. }));
    }
    assert_eq!(e.continue_with(AnswerMap::single("duration", "b1")).unwrap(), Transition::Loading);
    e.finish_loading().unwrap();
    assert_eq!(e.completion_state(), CompletionState::Complete);

    assert!(e.back().unwrap());
    assert_eq!(e.completion_state(), CompletionState::InProgress);
    assert_eq!(e.subflow_position(), Some(("B", 1)));
    assert_eq!(e.current_step_id(), "duration");
    assert_eq!(e.current_view().unwrap().prefill, Some(json!("b1")));

    assert!(e.back().unwrap());
    assert_eq!(e.subflow_position(), Some(("B", 0)));
    assert_eq!(e.current_view().unwrap().prefill, Some(json!("b0")));

    // reavanzar hasta el final vuelve a cargar
    e.continue_with(AnswerMap::single("method", "b0")).unwrap();
    assert_eq!(e.continue_with(AnswerMap::single("duration", "b2")).unwrap(), Transition::Loading);
    assert_eq!(e.answers().get("medicationAnswers").unwrap()["B"], json!({"method": "b0", "duration": "b2"}));
}

#[test]
fn per_item_answers_accumulate_across_back_and_forward() {
    let mut e = engine();
    e.continue_with(delta(json!({"accountName": "x", "sex": "Male"}))).unwrap();
    e.continue_with(delta(json!({"password": "abc123"}))).unwrap();
    e.continue_with(delta(json!({"hasMeds": "Yes"}))).unwrap();
    e.continue_with(delta(json!({"meds": ["A", "B"]}))).unwrap();
    e.continue_with(AnswerMap::single("method", "Patch")).unwrap();
    e.continue_with(AnswerMap::single("duration", "3–12 months")).unwrap();
    e.back().unwrap();
    e.back().unwrap();
    e.continue_with(AnswerMap::single("method", "Gel")).unwrap();

    let a = e.answers().item_answers("medicationAnswers", "A").unwrap();
    assert_eq!(a.get("method"), Some(&json!("Gel")));
    assert_eq!(a.get("duration"), Some(&json!("3–12 months")));
}

#[test]
fn continue_then_back_restores_position_for_every_step() {
    let script = vec![delta(json!({"accountName": "x", "sex": "Male"})),
                      delta(json!({"password": "abc123"})),
                      delta(json!({"hasMeds": "Yes"})),
                      delta(json!({"meds": ["A"]})),
                      AnswerMap::single("method", "m"),
                      AnswerMap::single("duration", "d"),
                      AnswerMap::single("dose", "x")];
    let mut e = engine();
    for d in script {
        let before = (e.current_step_id().to_string(), e.subflow_position().map(|(i, k)| (i.to_string(), k)));
        e.continue_with(d.clone()).unwrap();
        e.back().unwrap();
        let after = (e.current_step_id().to_string(), e.subflow_position().map(|(i, k)| (i.to_string(), k)));
        assert_eq!(before, after);
        e.continue_with(d).unwrap();
    }
    assert_eq!(e.current_step_id(), "walking");
}

#[test]
fn answers_grow_monotonically() {
    let mut e = engine();
    let script = vec![delta(json!({"accountName": "x", "sex": "Male"})),
                      delta(json!({"password": "abc123"})),
                      delta(json!({"hasMeds": "No"})),
                      delta(json!({"walking": "30 min"}))];
    let mut seen: Vec<String> = Vec::new();
    for d in script {
        seen.extend(d.keys().cloned());
        e.continue_with(d).unwrap();
        for field in &seen {
            assert!(e.answers().contains(field), "falta {field}");
        }
    }
    assert_eq!(e.completion_state(), CompletionState::Loading);
}

#[test]
fn unrelated_branch_skips_subflow() {
    let mut e = engine();
    e.continue_with(delta(json!({"accountName": "x"}))).unwrap();
    e.continue_with(delta(json!({"password": "abc123"}))).unwrap();
    let t = e.continue_with(delta(json!({"hasMeds": "No"}))).unwrap();
    assert_eq!(t, Transition::Step("walking".into()));
}

#[test]
fn answers_survive_a_new_engine_instance() {
    let mut e = engine();
    e.continue_with(delta(json!({"accountName": "Trends de Ana"}))).unwrap();
    let backend = e.persistence().clone();

    let resumed = EngineBuilderInit::new(registry()).persistence(backend).build();
    assert_eq!(resumed.answers().get_str("accountName"), Some("Trends de Ana"));
    assert_eq!(resumed.current_step_id(), "account_name");
    assert_eq!(resumed.current_view().unwrap().prefill, Some(json!("Trends de Ana")));
}

#[test]
fn reset_clears_everything() {
    let mut e = engine();
    e.continue_with(delta(json!({"accountName": "x"}))).unwrap();
    e.reset();
    assert!(e.answers().is_empty());
    assert!(!e.can_go_back());
    assert!(e.persistence().inner.is_empty());
    assert!(matches!(e.finish_loading(), Err(FunnelError::NotLoading)));
}
