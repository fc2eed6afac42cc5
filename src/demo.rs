//! Respuestas de ejemplo que recorren cada funnel de punta a punta sin
//! colaboradores externos.

use serde_json::{json, Value};

use funnel_adapters::FunnelKind;
use funnel_core::AnswerMap;

fn onboarding() -> Vec<Value> {
    vec![json!({"accountName": "Trends de Ana"}),
         json!({"password": "segredo1"}),
         json!({"socialNetworkType": "Marca Pessoal"}),
         json!({"instagramHandle": "@ana.trends"}),
         json!({"profileConfirmed": true}),
         json!({"hasWebsite": "Sim"}),
         json!({"websiteLink": "anatrends.com.br"}),
         json!({"niches": ["moda", "beleza"]}),
         json!({"mainObjective": "Aumentar audiência"}),
         json!({"profileMonitoring": "Sim"}),
         json!({"profilesToMonitor": ["@concorrente", "outra.marca"]})]
}

fn voice_tone() -> Vec<Value> {
    vec![json!({"brandMissions": ["Transformação do cliente"]}),
         json!({"coreValues": ["Disciplina"]}),
         json!({"competitiveDifferentials": ["Qualidade Superior"]}),
         json!({"marketSegment": "Outro (Nicho Específico)", "customMarketSegment": "Pet shops"}),
         json!({"competitiveContext": "\"Disruptiva\" – Quebrando o Status Quo"}),
         json!({"targetAudience": ["Famílias e Pais/Mães"]}),
         json!({"publicPerception": "Ceticismo"}),
         json!({"emotionalBenefit": "Pertencimento"}),
         json!({"reasonsToBelieves": ["Resultados Mensuráveis"]}),
         json!({"personalityAttributes": ["Formal / Polido", "Calmo / Paciente", "Objetivo / Frio"]}),
         json!({"brandConsistencyElements": ["Adequação Multicanal"]})]
}

fn health() -> Vec<Value> {
    vec![json!({"age": 42}),
         json!({"sex": "Female"}),
         json!({"hormoneTherapy": "Yes"}),
         json!({"ht1Medications": ["Testosterone"]}),
         json!({"method": "Gel or cream"}),
         json!({"duration": "3–12 months"}),
         json!({"doseChange": "No / not sure"}),
         json!({"pregnancyStatus": "No"}),
         json!({"walkingActivity": "150–299 minutes — I walk 20–45 minutes most days"}),
         json!({"sleepHours": "7–8 hours — Consistent, solid sleep"}),
         json!({"sleepSchedule": "I work night shifts or have no set pattern at all"}),
         json!({"snoringStatus": "No/rare"}),
         json!({"stairsCapacity": "1–2 floors"}),
         json!({"stressLevel": 4}),
         json!({"alcoholConsumption": "I don't drink at all"}),
         json!({"eatingHabits": "A mix of healthy and junk"}),
         json!({"familyHistory": ["None of these"]}),
         json!({"lonelinessFactors": ["I spend most of my time alone"]})]
}

/// Guion completo del funnel, un delta por step.
pub fn script(kind: FunnelKind) -> Vec<AnswerMap> {
    let raw = match kind {
        FunnelKind::Onboarding => onboarding(),
        FunnelKind::VoiceTone => voice_tone(),
        FunnelKind::Health => health(),
    };
    raw.into_iter().map(AnswerMap::from_value).collect()
}
