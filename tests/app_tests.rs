use funnel_core::constants::{HEALTH_NAMESPACE, MEDICATION_ANSWERS, ONBOARD_NAMESPACE};
use funnel_core::{CompletionAction, CompletionState, FunnelCtx};
use funnelflow::{demo, open_funnel, AppConfig, FunnelKind};
use serde_json::json;

#[test]
fn every_demo_script_completes() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::offline(dir.path());
    for kind in FunnelKind::ALL {
        let mut engine = open_funnel(kind.route(), &config).unwrap();
        let mut ctx = FunnelCtx::new(&mut engine);
        ctx.run_script(demo::script(kind)).unwrap();
        assert_eq!(engine.completion_state(), CompletionState::Loading, "{kind}");
        let done = engine.finish_loading().unwrap();
        assert_eq!(done.funnel, kind.name());
        assert_eq!(matches!(done.action, CompletionAction::ShowResults), kind == FunnelKind::Health);
    }
}

#[test]
fn progress_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::offline(dir.path());

    let mut engine = open_funnel("/onboard", &config).unwrap();
    let mut ctx = FunnelCtx::new(&mut engine);
    ctx.run_script(demo::script(FunnelKind::Onboarding).into_iter().take(3).collect())
       .unwrap();
    drop(engine);
    assert!(dir.path().join(format!("{ONBOARD_NAMESPACE}.json")).exists());

    // la posición no se persiste: se vuelve al primer step con el valor previo
    let engine = open_funnel("/onboard", &config).unwrap();
    assert_eq!(engine.answers().get_str("socialNetworkType"), Some("Marca Pessoal"));
    assert_eq!(engine.current_step_id(), "account_name");
    assert_eq!(engine.current_view().unwrap().prefill, Some(json!("Trends de Ana")));

    // otro funnel, otro namespace
    let health = open_funnel("/health", &config).unwrap();
    assert!(health.answers().is_empty());
}

#[test]
fn medication_answers_are_persisted_per_item() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::offline(dir.path());
    let mut engine = open_funnel("/health", &config).unwrap();
    let mut ctx = FunnelCtx::new(&mut engine);
    ctx.run_script(demo::script(FunnelKind::Health)).unwrap();

    let raw = std::fs::read_to_string(dir.path().join(format!("{HEALTH_NAMESPACE}.json"))).unwrap();
    let record: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(record[MEDICATION_ANSWERS]["Testosterone"]["method"], json!("Gel or cream"));
}

#[test]
fn reset_removes_the_record() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::offline(dir.path());
    let mut engine = open_funnel("/voice-tone", &config).unwrap();
    let mut ctx = FunnelCtx::new(&mut engine);
    ctx.run_script(demo::script(FunnelKind::VoiceTone).into_iter().take(2).collect())
       .unwrap();
    engine.reset();
    assert!(engine.answers().is_empty());
    let reopened = open_funnel("/voice-tone", &config).unwrap();
    assert!(reopened.answers().is_empty());
}
