//! Steps del quiz de salud (legacy, `/health`).
//!
//! age → sex → hormone_therapy → [ht1 → sub-flow por medicamento
//! (ht2 método, ht3 duración, ht4 cambio de dosis)] → pregnancy (sólo
//! Female) → walking → sleep → ... → loneliness → resultados.

use serde_json::Value;

use funnel_core::constants::{MEDICATION_ANSWERS, MEDICATION_ITEMS};
use funnel_core::{question_step, AnswerMap, InputKind, NextStep, StepDefinition, StepView, SubflowDefinition};

pub const AGE: &str = "age";
pub const SEX: &str = "sex";
pub const HORMONE_THERAPY: &str = "hormone_therapy";
pub const HT1: &str = "ht1";
pub const HT2: &str = "ht2";
pub const HT3: &str = "ht3";
pub const HT4: &str = "ht4";
pub const PREGNANCY: &str = "pregnancy";
pub const WALKING: &str = "walking";
pub const SLEEP: &str = "sleep";
pub const SLEEP_SCHEDULE: &str = "sleep_schedule";
pub const SNORING: &str = "snoring";
pub const STAIRS: &str = "stairs";
pub const STRESS: &str = "stress";
pub const ALCOHOL: &str = "alcohol";
pub const EATING: &str = "eating";
pub const FAMILY_HISTORY: &str = "family_history";
pub const LONELINESS: &str = "loneliness";

pub const NOT_SURE: &str = "Not sure";

pub const MEDICATIONS: [&str; 6] = ["Estrogen / estradiol",
                                    "Progestin / progesterone",
                                    "Testosterone",
                                    "Anti-androgen (testosterone blocker)",
                                    "Puberty blocker",
                                    NOT_SURE];

/// Vías de administración posibles para un medicamento.
pub fn methods_for(medication: Option<&str>) -> &'static [&'static str] {
    match medication {
        Some("Estrogen / estradiol") => {
            &["Pills (by mouth)", "Patch", "Gel or cream", "Injection (shot)", "Implant or pellet", NOT_SURE]
        }
        Some("Progestin / progesterone") => &["Pills", "Injection", "Implant or pellet", "Gel or cream", NOT_SURE],
        Some("Testosterone") => &["Gel or cream", "Injection (shot)", "Patch", "Implant or pellet", NOT_SURE],
        Some("Anti-androgen (testosterone blocker)") => &["Pills (by mouth)", NOT_SURE],
        Some("Puberty blocker") => &["Injection (shot)", "Implant or pellet", NOT_SURE],
        Some(NOT_SURE) => &[NOT_SURE],
        _ => &["Pills", "Patch", "Gel or cream", "Injection", "Implant or pellet", NOT_SURE],
    }
}

/// Rama posterior a la terapia hormonal (con o sin sub-flow).
pub fn after_hormone_therapy(answers: &AnswerMap) -> NextStep {
    if answers.is("sex", "Female") {
        NextStep::to(PREGNANCY)
    } else {
        NextStep::to(WALKING)
    }
}

fn after_hormone_therapy_targets() -> Vec<NextStep> {
    vec![NextStep::to(PREGNANCY), NextStep::to(WALKING)]
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Edad entre 1 y 150, guardada como texto.
#[derive(Clone, Copy, Debug, Default)]
pub struct Age;

impl StepDefinition for Age {
    fn id(&self) -> &str {
        AGE
    }

    fn title(&self) -> &str {
        "Age"
    }

    fn render(&self, answers: &AnswerMap, context: Option<&str>) -> StepView {
        StepView::new(AGE, "Age", "How old are you?", InputKind::number("age", 1, 150)).prefilled_from(answers)
                                                                                     .with_context(context)
    }

    fn next_step(&self, _answers: &AnswerMap) -> NextStep {
        NextStep::to(SEX)
    }

    fn targets(&self) -> Vec<NextStep> {
        vec![NextStep::to(SEX)]
    }

    fn accepts(&self, delta: &AnswerMap) -> bool {
        delta.get_str("age")
             .and_then(|a| a.parse::<u32>().ok())
             .is_some_and(|a| (1..=150).contains(&a))
    }

    fn normalize(&self, mut delta: AnswerMap) -> AnswerMap {
        if let Some(age) = delta.get("age").and_then(value_as_text) {
            delta.insert("age", age);
        }
        delta
    }
}

question_step! {
    Sex {
        id: SEX,
        title: "Sex",
        prompt: "What is your sex?",
        input: InputKind::single("sex", &["Female", "Male"]),
        next: NextStep::to(HORMONE_THERAPY),
    }
}

/// Terapia hormonal: `Yes` pregunta los medicamentos.
#[derive(Clone, Copy, Debug, Default)]
pub struct HormoneTherapy;

impl StepDefinition for HormoneTherapy {
    fn id(&self) -> &str {
        HORMONE_THERAPY
    }

    fn title(&self) -> &str {
        "Hormone therapy"
    }

    fn render(&self, answers: &AnswerMap, context: Option<&str>) -> StepView {
        StepView::new(HORMONE_THERAPY,
                      "Hormone therapy",
                      "Are you currently taking hormone therapy?",
                      InputKind::single("hormoneTherapy", &["Yes", "No"])).prefilled_from(answers)
                                                                          .with_context(context)
    }

    fn next_step(&self, answers: &AnswerMap) -> NextStep {
        if answers.is("hormoneTherapy", "Yes") {
            NextStep::to(HT1)
        } else {
            after_hormone_therapy(answers)
        }
    }

    fn targets(&self) -> Vec<NextStep> {
        let mut t = vec![NextStep::to(HT1)];
        t.extend(after_hormone_therapy_targets());
        t
    }

    fn accepts(&self, delta: &AnswerMap) -> bool {
        InputKind::single("hormoneTherapy", &["Yes", "No"]).admits(delta)
    }
}

question_step! {
    Ht1 {
        id: HT1,
        title: "Medications",
        prompt: "Which hormone medications are you taking?",
        input: InputKind::multi_exclusive(MEDICATION_ITEMS, &MEDICATIONS, NOT_SURE),
        next: NextStep::subflow(MEDICATION_ITEMS),
    }
}

/// Vía de administración; las opciones dependen del medicamento en curso.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ht2Method;

impl StepDefinition for Ht2Method {
    fn id(&self) -> &str {
        HT2
    }

    fn title(&self) -> &str {
        "Method"
    }

    fn render(&self, answers: &AnswerMap, context: Option<&str>) -> StepView {
        let prompt = match context {
            Some(med) => format!("How do you take {med}?"),
            None => "How do you take it?".to_string(),
        };
        let view = StepView::new(HT2, "Method", &prompt, InputKind::single("method", methods_for(context)))
            .prefilled_from(answers)
            .with_context(context);
        // un método previo que no aplica al medicamento actual no se precarga
        let keep = view.prefill
                       .as_ref()
                       .and_then(Value::as_str)
                       .is_some_and(|m| methods_for(context).iter().any(|o| *o == m));
        if keep {
            view
        } else {
            StepView { prefill: None, ..view }
        }
    }

    fn next_step(&self, _answers: &AnswerMap) -> NextStep {
        NextStep::Complete
    }

    /// Sin el ítem a mano, basta con que sea un método de algún medicamento.
    fn accepts(&self, delta: &AnswerMap) -> bool {
        let Some(method) = delta.get_str("method") else { return false };
        MEDICATIONS.iter()
                   .map(|m| Some(*m))
                   .chain([None])
                   .any(|med| methods_for(med).iter().any(|o| *o == method))
    }
}

question_step! {
    Ht3Duration {
        id: HT3,
        title: "Duration",
        prompt: "How long have you been taking it?",
        input: InputKind::single("duration", &["Less than 3 months", "3–12 months", "More than 12 months"]),
        next: NextStep::Complete,
    }
}

question_step! {
    Ht4DoseChange {
        id: HT4,
        title: "Dose change",
        prompt: "Has your dose changed recently?",
        input: InputKind::single("doseChange", &["In the past 3 months", "More than 3 months ago", "No / not sure"]),
        next: NextStep::Complete,
    }
}

/// Sub-flow por medicamento elegido en ht1.
pub fn medication_subflow() -> SubflowDefinition {
    SubflowDefinition::new(MEDICATION_ITEMS, MEDICATION_ANSWERS, after_hormone_therapy).inner_step(Ht2Method)
                                                                                     .inner_step(Ht3Duration)
                                                                                     .inner_step(Ht4DoseChange)
                                                                                     .with_targets(after_hormone_therapy_targets())
}

question_step! {
    Pregnancy {
        id: PREGNANCY,
        title: "Pregnancy",
        prompt: "Are you currently pregnant or postpartum?",
        input: InputKind::single("pregnancyStatus", &["No", "Pregnant", "Up to 12 months postpartum"]),
        next: NextStep::to(WALKING),
    }
}

question_step! {
    Walking {
        id: WALKING,
        title: "Walking",
        prompt: "How much do you walk per week?",
        input: InputKind::single("walkingActivity",
                                 &["300+ minutes (5+ hours) — I walk 45+ minutes every day",
                                   "150–299 minutes — I walk 20–45 minutes most days",
                                   "60–149 minutes — I walk a few short times per week",
                                   "Less than 60 minutes — I barely walk most days"]),
        next: NextStep::to(SLEEP),
    }
}

question_step! {
    Sleep {
        id: SLEEP,
        title: "Sleep",
        prompt: "How many hours do you usually sleep?",
        input: InputKind::single("sleepHours",
                                 &["7–8 hours — Consistent, solid sleep",
                                   "6–6.9 hours — Slightly short",
                                   "Less than 6 hours — I'm usually underslept",
                                   "More than 9 hours — I oversleep or still feel tired"]),
        next: NextStep::to(SLEEP_SCHEDULE),
    }
}

question_step! {
    SleepSchedule {
        id: SLEEP_SCHEDULE,
        title: "Sleep schedule",
        prompt: "How regular is your sleep schedule?",
        input: InputKind::single("sleepSchedule",
                                 &["I sleep and wake at about the same time every day (±30 min, even on weekends)",
                                   "I'm a little inconsistent, but not chaotic (±1–2 hours variation)",
                                   "My schedule shifts a lot day to day (late nights, irregular wake-ups)",
                                   "I work night shifts or have no set pattern at all"]),
        next: NextStep::to(SNORING),
    }
}

question_step! {
    Snoring {
        id: SNORING,
        title: "Snoring",
        prompt: "Do you snore?",
        input: InputKind::single("snoringStatus", &["No/rare", "Loud/witnessed", "Diagnosed apnea"]),
        next: NextStep::to(STAIRS),
    }
}

question_step! {
    Stairs {
        id: STAIRS,
        title: "Stairs",
        prompt: "How many floors can you climb without stopping?",
        input: InputKind::single("stairsCapacity", &["3 or more floors", "1–2 floors", "Less than 1 floor"]),
        next: NextStep::to(STRESS),
    }
}

/// Estrés de 0 a 10, guardado como texto.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stress;

impl StepDefinition for Stress {
    fn id(&self) -> &str {
        STRESS
    }

    fn title(&self) -> &str {
        "Stress"
    }

    fn render(&self, answers: &AnswerMap, context: Option<&str>) -> StepView {
        StepView::new(STRESS,
                      "Stress",
                      "How stressed do you feel on a typical day?",
                      InputKind::number("stressLevel", 0, 10)).prefilled_from(answers)
                                                              .with_context(context)
    }

    fn next_step(&self, _answers: &AnswerMap) -> NextStep {
        NextStep::to(ALCOHOL)
    }

    fn targets(&self) -> Vec<NextStep> {
        vec![NextStep::to(ALCOHOL)]
    }

    fn accepts(&self, delta: &AnswerMap) -> bool {
        delta.get_str("stressLevel")
             .and_then(|s| s.parse::<u8>().ok())
             .is_some_and(|s| s <= 10)
    }

    fn normalize(&self, mut delta: AnswerMap) -> AnswerMap {
        if let Some(level) = delta.get("stressLevel").and_then(value_as_text) {
            delta.insert("stressLevel", level);
        }
        delta
    }
}

question_step! {
    Alcohol {
        id: ALCOHOL,
        title: "Alcohol",
        prompt: "How much alcohol do you drink?",
        input: InputKind::single("alcoholConsumption",
                                 &["I don't drink at all",
                                   "I drink a little (0–7 drinks/week), never binge",
                                   "I drink more (8–14/week or binge sometimes)",
                                   "I drink a lot (>14/week or binge weekly)"]),
        next: NextStep::to(EATING),
    }
}

question_step! {
    Eating {
        id: EATING,
        title: "Eating",
        prompt: "How would you describe your diet?",
        input: InputKind::single("eatingHabits",
                                 &["Mostly real/whole foods",
                                   "A mix of healthy and junk",
                                   "Mostly fast food or packaged stuff"]),
        next: NextStep::to(FAMILY_HISTORY),
    }
}

question_step! {
    FamilyHistory {
        id: FAMILY_HISTORY,
        title: "Family history",
        prompt: "Does any of this apply to your family?",
        input: InputKind::multi_exclusive("familyHistory",
                                          &["Parent or sibling had heart attack or stroke early (Men <55, Women <65)",
                                            "Any parent lived to 90 or more",
                                            "None of these"],
                                          "None of these"),
        next: NextStep::to(LONELINESS),
    }
}

question_step! {
    Loneliness {
        id: LONELINESS,
        title: "Connection",
        prompt: "Which of these apply to you?",
        input: InputKind::multi_exclusive("lonelinessFactors",
                                          &["I spend most of my time alone",
                                            "I'm around people but feel emotionally disconnected",
                                            "I don't have close friends or deep conversations",
                                            "I often feel left out or unwanted",
                                            "I don't get physical or emotional affection",
                                            "I have no one I'd call if I needed help",
                                            "None of these apply to me"],
                                          "None of these apply to me"),
        next: NextStep::Complete,
    }
}
