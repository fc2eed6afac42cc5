//! Builder de `StepRegistry`.
//!
//! Acumula steps en orden (el primero añadido es el step inicial), los
//! sub-flows y la acción terminal; `build` valida el grafo declarado:
//! - ids únicos (incluyendo los steps internos de los sub-flows),
//! - destinos declarados existentes,
//! - cada `EnterSubflow` con su sub-flow registrado,
//! - todos los steps alcanzables desde el primero.
//!
//! Un step con `targets()` vacío tiene ramas desconocidas: en ese caso la
//! comprobación de alcanzabilidad se omite para todo el registro.

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use indexmap::IndexMap;
use log::debug;

use super::types::{CompletionAction, StepRegistry};
use crate::errors::FunnelError;
use crate::step::{NextStep, StepDefinition};
use crate::subflow::SubflowDefinition;

#[derive(Debug)]
pub struct RegistryBuilder {
    funnel: String,
    namespace: String,
    steps: Vec<Box<dyn StepDefinition>>,
    subflows: Vec<SubflowDefinition>,
    loading: Duration,
    completion: CompletionAction,
}

impl RegistryBuilder {
    pub fn new(funnel: &str, namespace: &str) -> Self {
        Self { funnel: funnel.to_string(),
               namespace: namespace.to_string(),
               steps: Vec::new(),
               subflows: Vec::new(),
               loading: Duration::ZERO,
               completion: CompletionAction::ShowResults }
    }

    /// Añade un step. El primero añadido es el step inicial.
    pub fn step<S: StepDefinition + 'static>(mut self, step: S) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn boxed_step(mut self, step: Box<dyn StepDefinition>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn subflow(mut self, subflow: SubflowDefinition) -> Self {
        self.subflows.push(subflow);
        self
    }

    pub fn loading(mut self, duration: Duration) -> Self {
        self.loading = duration;
        self
    }

    pub fn completion(mut self, action: CompletionAction) -> Self {
        self.completion = action;
        self
    }

    pub fn build(self) -> Result<StepRegistry, FunnelError> {
        let first = self.steps
                        .first()
                        .map(|s| s.id().to_string())
                        .ok_or_else(|| FunnelError::InvalidRegistry(format!("funnel {} has no steps", self.funnel)))?;

        let mut seen: HashSet<String> = HashSet::new();
        let mut steps: IndexMap<String, Box<dyn StepDefinition>> = IndexMap::new();
        for step in self.steps {
            let id = step.id().to_string();
            if !seen.insert(id.clone()) {
                return Err(FunnelError::DuplicateStep(id));
            }
            steps.insert(id, step);
        }

        let mut subflows: IndexMap<String, SubflowDefinition> = IndexMap::new();
        for subflow in self.subflows {
            if subflow.inner_len() == 0 {
                return Err(FunnelError::InvalidRegistry(format!("sub-flow {} has no inner steps",
                                                                subflow.items_field())));
            }
            for inner in subflow.inner_steps() {
                if !seen.insert(inner.id().to_string()) {
                    return Err(FunnelError::DuplicateStep(inner.id().to_string()));
                }
            }
            subflows.insert(subflow.items_field().to_string(), subflow);
        }

        for step in steps.values() {
            check_targets(step.id(), &step.targets(), &steps, &subflows)?;
        }
        for subflow in subflows.values() {
            let from = format!("subflow:{}", subflow.items_field());
            check_targets(&from, subflow.continuation_targets(), &steps, &subflows)?;
        }

        check_reachability(&first, &steps, &subflows)?;

        let namespaced_fields = subflows.values().map(|s| s.answers_field().to_string()).collect();
        debug!("registry:built funnel={} steps={} subflows={}", self.funnel, steps.len(), subflows.len());

        Ok(StepRegistry { funnel: self.funnel,
                          namespace: self.namespace,
                          first,
                          steps,
                          subflows,
                          namespaced_fields,
                          loading: self.loading,
                          completion: self.completion })
    }
}

fn check_targets(from: &str,
                 targets: &[NextStep],
                 steps: &IndexMap<String, Box<dyn StepDefinition>>,
                 subflows: &IndexMap<String, SubflowDefinition>)
                 -> Result<(), FunnelError> {
    for target in targets {
        match target {
            NextStep::Continue(id) if !steps.contains_key(id) => {
                return Err(FunnelError::UnknownTarget { from: from.to_string(),
                                                        target: id.clone() });
            }
            NextStep::EnterSubflow(field) if !subflows.contains_key(field) => {
                return Err(FunnelError::SubflowNotFound(field.clone()));
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_reachability(first: &str,
                      steps: &IndexMap<String, Box<dyn StepDefinition>>,
                      subflows: &IndexMap<String, SubflowDefinition>)
                      -> Result<(), FunnelError> {
    let undeclared = steps.values().any(|s| s.targets().is_empty())
                     || subflows.values().any(|s| s.continuation_targets().is_empty());
    if undeclared {
        debug!("registry:reachability skipped (undeclared targets)");
        return Ok(());
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::from([first]);
    while let Some(id) = queue.pop_front() {
        if !visited.insert(id) {
            continue;
        }
        let Some(step) = steps.get(id) else { continue };
        let mut targets = step.targets();
        for t in step.targets() {
            if let NextStep::EnterSubflow(field) = t {
                if let Some(sf) = subflows.get(&field) {
                    targets.extend(sf.continuation_targets().iter().cloned());
                }
            }
        }
        for t in targets {
            if let NextStep::Continue(next) = t {
                if let Some((key, _)) = steps.get_key_value(next.as_str()) {
                    queue.push_back(key.as_str());
                }
            }
        }
    }

    match steps.keys().find(|id| !visited.contains(id.as_str())) {
        Some(id) => Err(FunnelError::UnreachableStep(id.clone())),
        None => Ok(()),
    }
}
