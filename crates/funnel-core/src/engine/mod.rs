//! Engine module for FunnelEngine implementation
//!
//! Provides the navigation controller, its builder, observable state types
//! and the ergonomic `FunnelCtx`.

pub mod builder;
pub mod core;
pub mod flow_ctx;
pub mod state;

pub use builder::{EngineBuilder, EngineBuilderInit};
pub use core::FunnelEngine;
pub use flow_ctx::FunnelCtx;
pub use state::{Completion, CompletionState, EngineConfig, Transition};

pub use crate::event::{EventStore, FunnelEvent, FunnelEventKind, InMemoryEventStore};
pub use crate::registry::{CompletionAction, RegistryBuilder, StepRegistry};

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::answers::AnswerMap;
    use crate::errors::FunnelError;
    use crate::step::{InputKind, NextStep, StepDefinition, StepView};
    use crate::store::InMemoryPersistence;
    use crate::subflow::SubflowDefinition;
    use serde_json::json;

    crate::question_step! {
        Intro {
            id: "intro",
            title: "Intro",
            prompt: "Nome?",
            input: InputKind::text("name"),
            next: NextStep::to("pick"),
        }
    }

    crate::question_step! {
        Pick {
            id: "pick",
            title: "Itens",
            prompt: "Escolha",
            input: InputKind::multi("items", &["A", "B", "C"]),
            next: NextStep::subflow("items"),
        }
    }

    crate::question_step! {
        Outro {
            id: "outro",
            title: "Fim",
            prompt: "Algo mais?",
            input: InputKind::text("extra"),
            next: NextStep::Complete,
        }
    }

    crate::question_step! { InnerOne { id: "inner_1", title: "1", prompt: "1", input: InputKind::text("one"), next: NextStep::Complete } }
    crate::question_step! { InnerTwo { id: "inner_2", title: "2", prompt: "2", input: InputKind::text("two"), next: NextStep::Complete } }

    fn after_items(_: &AnswerMap) -> NextStep {
        NextStep::to("outro")
    }

    fn registry() -> StepRegistry {
        let sf = SubflowDefinition::new("items", "itemAnswers", after_items).inner_step(InnerOne)
                                                                             .inner_step(InnerTwo)
                                                                             .with_targets(vec![NextStep::to("outro")]);
        RegistryBuilder::new("demo", "demo-ns").step(Intro)
                                               .step(Pick)
                                               .step(Outro)
                                               .subflow(sf)
                                               .loading(Duration::from_millis(500))
                                               .completion(CompletionAction::ShowResults)
                                               .build()
                                               .expect("registro válido")
    }

    fn engine(config: EngineConfig) -> FunnelEngine<InMemoryPersistence> {
        EngineBuilderInit::new(registry()).persistence(InMemoryPersistence::new())
                                          .config(config)
                                          .build()
    }

    #[test]
    fn subflow_round_trip_with_back() {
        let mut e = engine(EngineConfig::strict());
        e.continue_with(AnswerMap::single("name", "Ana")).unwrap();
        let t = e.continue_with(AnswerMap::from_value(json!({"items": ["A", "B"]}))).unwrap();
        assert_eq!(t,
                   Transition::Subflow { step_id: "inner_1".into(),
                                         item: "A".into(),
                                         inner_index: 0 });
        e.continue_with(AnswerMap::single("one", "a1")).unwrap();
        e.continue_with(AnswerMap::single("two", "a2")).unwrap();
        e.continue_with(AnswerMap::single("one", "b1")).unwrap();
        let t = e.continue_with(AnswerMap::single("two", "b2")).unwrap();
        assert_eq!(t, Transition::Step("outro".into()));

        assert!(e.back().unwrap());
        assert_eq!(e.subflow_position(), Some(("B", 1)));
        assert_eq!(e.current_view().unwrap().prefill, Some(json!("b2")));
        assert!(e.back().unwrap());
        assert_eq!(e.subflow_position(), Some(("B", 0)));
        assert!(e.back().unwrap());
        assert!(e.back().unwrap());
        assert_eq!(e.subflow_position(), Some(("A", 0)));
        // historial del sub-flow vacío: vuelve al step que disparó la entrada
        assert!(e.back().unwrap());
        assert_eq!(e.subflow_position(), None);
        assert_eq!(e.current_step_id(), "pick");
        assert!(e.back().unwrap());
        assert_eq!(e.current_step_id(), "intro");
        assert!(!e.can_go_back());
        assert!(!e.back().unwrap());
    }

    #[test]
    fn empty_subflow_strict_is_error() {
        let mut e = engine(EngineConfig::strict());
        e.continue_with(AnswerMap::single("name", "Ana")).unwrap();
        let err = e.continue_with(AnswerMap::from_value(json!({"items": []}))).unwrap_err();
        assert_eq!(err, FunnelError::EmptySubflow("items".into()));
        assert_eq!(e.current_step_id(), "pick");
    }

    #[test]
    fn empty_subflow_lenient_falls_through() {
        let mut e = engine(EngineConfig::lenient());
        e.continue_with(AnswerMap::single("name", "Ana")).unwrap();
        let t = e.continue_with(AnswerMap::from_value(json!({"items": []}))).unwrap();
        assert_eq!(t, Transition::Step("outro".into()));
        assert!(e.back().unwrap());
        assert_eq!(e.current_step_id(), "pick");
    }

    #[test]
    fn loading_locks_back_and_resolves_once() {
        let mut e = engine(EngineConfig::strict());
        let mut ctx = FunnelCtx::new(&mut e);
        let transitions = ctx.run_script(vec![AnswerMap::single("name", "Ana"),
                                              AnswerMap::from_value(json!({"items": ["A"]})),
                                              AnswerMap::single("one", "x"),
                                              AnswerMap::single("two", "y"),
                                              AnswerMap::single("extra", "z")])
                             .unwrap();
        assert_eq!(transitions.last(), Some(&Transition::Loading));
        assert_eq!(e.completion_state(), CompletionState::Loading);
        assert!(!e.can_go_back());
        assert_eq!(e.back(), Err(FunnelError::LoadingInProgress));
        assert_eq!(e.continue_with(AnswerMap::new()), Err(FunnelError::LoadingInProgress));

        assert_eq!(e.tick(Instant::now()).unwrap(), None);
        let done = e.tick(Instant::now() + Duration::from_secs(1)).unwrap().expect("completa");
        assert_eq!(done.action, CompletionAction::ShowResults);
        assert_eq!(done.answers.item_answers("itemAnswers", "A").unwrap().len(), 2);
        assert_eq!(e.finish_loading(), Err(FunnelError::FunnelCompleted));

        // back desde Complete vuelve al último step activo
        assert!(e.can_go_back());
        assert!(e.back().unwrap());
        assert_eq!(e.completion_state(), CompletionState::InProgress);
        assert_eq!(e.current_step_id(), "outro");
    }

    #[test]
    fn finish_loading_outside_loading_is_refused() {
        let mut e = engine(EngineConfig::strict());
        assert_eq!(e.finish_loading(), Err(FunnelError::NotLoading));
    }

    #[test]
    fn ctx_refuses_unaccepted_delta() {
        let mut e = engine(EngineConfig::strict());
        let mut ctx = FunnelCtx::new(&mut e);
        assert_eq!(ctx.answer_field("name", "  ").unwrap(), None);
        assert_eq!(e.current_step_id(), "intro");
        assert!(e.answers().is_empty());
    }

    #[test]
    fn journal_letters_follow_navigation() {
        let mut e = engine(EngineConfig::strict());
        e.continue_with(AnswerMap::single("name", "Ana")).unwrap();
        e.back().unwrap();
        e.reset();
        assert_eq!(e.event_variants(), vec!["I", "S", "B", "R"]);
    }

    struct Renders;
    impl StepDefinition for Renders {
        fn id(&self) -> &str {
            "r"
        }
        fn render(&self, _answers: &AnswerMap, context: Option<&str>) -> StepView {
            StepView::new("r", "r", "r", InputKind::text("r")).with_context(context)
        }
        fn next_step(&self, _answers: &AnswerMap) -> NextStep {
            NextStep::to("missing")
        }
    }

    #[test]
    fn broken_graph_allows_only_reset() {
        let registry = RegistryBuilder::new("broken", "ns").step(Renders).build().unwrap();
        let mut e = EngineBuilderInit::new(registry).persistence(InMemoryPersistence::new()).build();
        let err = e.continue_with(AnswerMap::single("r", "1")).unwrap_err();
        assert_eq!(err, FunnelError::StepNotFound("missing".into()));
        assert!(e.is_broken());
        assert_eq!(e.back(), Err(FunnelError::FunnelBroken("missing".into())));
        assert!(e.current_view().is_err());
        assert!(!e.can_go_back());

        e.reset();
        assert!(!e.is_broken());
        assert!(e.answers().is_empty());
        assert_eq!(e.current_step_id(), "r");
    }

}
