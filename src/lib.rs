//! funnelflow
//!
//! Punto de entrada de la aplicación:
//! - `config`: `AppConfig` (almacenamiento, colaboradores, motor) desde .env.
//! - Tabla de rutas y `open_funnel`, que arma un motor persistido en disco
//!   para la ruta pedida.
//! - `demo`: guiones de respuestas para cada funnel.

pub mod config;
pub mod demo;

pub use config::AppConfig;
pub use funnel_adapters::FunnelKind;

use funnel_adapters::build_registry;
use funnel_core::{EngineBuilderInit, FunnelEngine, FunnelError, InMemoryEventStore};
use funnel_persistence::FileStore;

/// `(ruta, funnel, namespace)` de cada funnel registrado.
pub fn route_table() -> Vec<(&'static str, &'static str, &'static str)> {
    FunnelKind::ALL.iter()
                   .map(|k| (k.route(), k.name(), k.namespace()))
                   .collect()
}

/// Funnel que sirve una ruta; rutas desconocidas caen en el onboarding.
pub fn funnel_for_route(route: &str) -> FunnelKind {
    FunnelKind::from_route(route)
}

/// Motor de la ruta con respuestas rehidratadas desde `config.storage.dir`.
pub fn open_funnel(route: &str, config: &AppConfig) -> Result<FunnelEngine<FileStore, InMemoryEventStore>, FunnelError> {
    let kind = funnel_for_route(route);
    let registry = build_registry(kind, &config.adapters)?;
    log::debug!("app:open route={route} funnel={kind}");
    Ok(EngineBuilderInit::new(registry).persistence(FileStore::new(config.storage.dir.clone()))
                                       .config(config.engine)
                                       .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lists_every_funnel_once() {
        let table = route_table();
        assert_eq!(table.len(), 3);
        assert!(table.contains(&("/health", "health", "prevent-quiz-responses")));
        assert_eq!(funnel_for_route("/voice-tone?utm=x"), FunnelKind::VoiceTone);
        assert_eq!(funnel_for_route("/qualquer"), FunnelKind::Onboarding);
    }
}
