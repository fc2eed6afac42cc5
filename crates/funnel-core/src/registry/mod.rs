//! Registro de steps de un funnel: definición inmutable + validación del
//! grafo al construirlo.

mod builder;
mod types;

pub use builder::RegistryBuilder;
pub use types::{CompletionAction, StepRegistry};
