//! Tipos del registro: `StepRegistry` (definición inmutable del funnel) y
//! `CompletionAction` (qué produce el funnel al completarse).
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::FunnelError;
use crate::step::StepDefinition;
use crate::subflow::SubflowDefinition;

/// Acción terminal tras la animación de carga.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionAction {
    /// Redirección a una aplicación externa.
    Redirect(String),
    /// Vista de resultados construida a partir de las respuestas.
    ShowResults,
}

/// Definición inmutable de un funnel.
///
/// Se construye sólo mediante [`RegistryBuilder`](super::RegistryBuilder),
/// que garantiza ids únicos y un grafo conexo desde el primer step.
#[derive(Debug)]
pub struct StepRegistry {
    pub(super) funnel: String,
    pub(super) namespace: String,
    pub(super) first: String,
    pub(super) steps: IndexMap<String, Box<dyn StepDefinition>>,
    pub(super) subflows: IndexMap<String, SubflowDefinition>,
    pub(super) namespaced_fields: Vec<String>,
    pub(super) loading: Duration,
    pub(super) completion: CompletionAction,
}

impl StepRegistry {
    /// Nombre del funnel (se usa en logs y en el journal).
    pub fn funnel(&self) -> &str {
        &self.funnel
    }

    /// Namespace de persistencia aislado de este funnel.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn lookup(&self, id: &str) -> Result<&dyn StepDefinition, FunnelError> {
        self.steps
            .get(id)
            .map(|s| s.as_ref())
            .ok_or_else(|| FunnelError::StepNotFound(id.to_string()))
    }

    pub fn first(&self) -> &dyn StepDefinition {
        // el builder garantiza que `first` existe
        self.steps[self.first.as_str()].as_ref()
    }

    pub fn first_id(&self) -> &str {
        &self.first
    }

    pub fn contains(&self, id: &str) -> bool {
        self.steps.contains_key(id)
    }

    pub fn subflow(&self, items_field: &str) -> Result<&SubflowDefinition, FunnelError> {
        self.subflows
            .get(items_field)
            .ok_or_else(|| FunnelError::SubflowNotFound(items_field.to_string()))
    }

    /// Campos con merge profundo por ítem (uno por sub-flow registrado).
    pub fn namespaced_fields(&self) -> &[String] {
        &self.namespaced_fields
    }

    pub fn loading_duration(&self) -> Duration {
        self.loading
    }

    pub fn completion_action(&self) -> &CompletionAction {
        &self.completion
    }

    /// Ids en orden de registro.
    pub fn step_ids(&self) -> impl Iterator<Item = &str> {
        self.steps.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
