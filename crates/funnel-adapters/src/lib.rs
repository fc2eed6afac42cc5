//! funnel-adapters: funnels concretos sobre el motor de `funnel-core`.
//!
//! Este crate provee:
//! - Los steps de los tres funnels (onboarding, voz y tono, quiz de salud)
//!   con sus ramas, validaciones y normalizaciones.
//! - El catálogo de funnels y la tabla de rutas (`funnels`).
//! - Los colaboradores externos (lookup de perfil, sugerencias) como traits
//!   async, su cliente HTTP y los helpers de degradación (`services`).
//! - Configuración desde el entorno (`config`).
//!
//! El core sólo conoce `StepDefinition` y `Enrichment`; aquí vive todo lo que
//! depende del contenido concreto de cada pantalla.

pub mod config;
pub mod funnels;
pub mod services;
pub mod steps;

pub use config::AdapterConfig;
pub use funnels::{build_registry, FunnelKind};
pub use services::enrich::enrich;
pub use services::{CollaboratorError, ProfileLookupService, SuggestionService, WebhookClient};
