use serde::{Deserialize, Serialize};

use super::view::StepView;
use crate::answers::AnswerMap;

/// Resultado de la función de rama de un step.
///
/// Sustituye los strings mágicos: un id concreto, la señal de entrada al
/// sub-flow (con el campo que contiene la lista de ítems) o el fin del funnel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NextStep {
    Continue(String),
    EnterSubflow(String),
    Complete,
}

impl NextStep {
    pub fn to(id: impl Into<String>) -> Self {
        Self::Continue(id.into())
    }

    pub fn subflow(items_field: impl Into<String>) -> Self {
        Self::EnterSubflow(items_field.into())
    }
}

/// Llamada a un colaborador externo que enriquece el delta antes de
/// `continue`. El core sólo la declara; la ejecutan los adaptadores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Enrichment {
    /// Métricas del perfil de Instagram → `userProfileMetrics`.
    ProfileLookup,
    /// Análisis del sitio web → `niches`.
    NicheSuggestions,
    /// Perfiles sugeridos para monitorear → `aiSuggestedProfiles`.
    TargetSuggestions,
}

/// Trait que define un Step del funnel.
///
/// `next_step` debe ser una función pura del `AnswerMap` completo: nada de
/// estado mutable oculto en el step. Las ramas pueden depender de respuestas
/// dadas muchos pasos antes.
pub trait StepDefinition {
    /// Identificador estable y único dentro del funnel.
    fn id(&self) -> &str;

    /// Nombre opcional amigable.
    fn title(&self) -> &str {
        self.id()
    }

    /// Unidad renderizable. `context` es el ítem actual dentro de un sub-flow.
    fn render(&self, answers: &AnswerMap, context: Option<&str>) -> StepView;

    /// Política de rama.
    fn next_step(&self, answers: &AnswerMap) -> NextStep;

    /// Destinos posibles de `next_step`, usados para validar el grafo al
    /// construir el registro. Vacío = desconocido (no se valida).
    fn targets(&self) -> Vec<NextStep> {
        Vec::new()
    }

    /// Predicado de validación de la UI: el avance queda deshabilitado
    /// mientras el delta no lo cumpla. No es un error del motor.
    fn accepts(&self, _delta: &AnswerMap) -> bool {
        true
    }

    /// Normalización del valor crudo de la UI antes de `accepts`.
    fn normalize(&self, delta: AnswerMap) -> AnswerMap {
        delta
    }

    /// Colaborador a invocar antes de avanzar, según el delta emitido.
    fn enrichment(&self, _delta: &AnswerMap) -> Option<Enrichment> {
        None
    }
}

impl std::fmt::Debug for dyn StepDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepDefinition").field("id", &self.id()).finish()
    }
}
