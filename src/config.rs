//! Configuración central de la aplicación.
//! Agrupa almacenamiento, colaboradores y motor; todo se lee del entorno
//! (.env incluido).
use std::path::PathBuf;

use funnel_adapters::AdapterConfig;
use funnel_core::EngineConfig;
use funnel_persistence::{engine_config_from_env, init_dotenv, StorageConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub adapters: AdapterConfig,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        init_dotenv();
        Self { storage: StorageConfig::from_env(),
               adapters: AdapterConfig::from_env(),
               engine: engine_config_from_env() }
    }

    /// Sin red ni entorno: colaboradores desconectados, almacenamiento en
    /// `dir` y sub-flow vacío tratado como error.
    pub fn offline(dir: impl Into<PathBuf>) -> Self {
        Self { storage: StorageConfig { dir: dir.into(),
                                        journal: false },
               adapters: AdapterConfig::offline(),
               engine: EngineConfig::strict() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_has_no_endpoints() {
        let cfg = AppConfig::offline("/tmp/funnels");
        assert_eq!(cfg.storage.dir, PathBuf::from("/tmp/funnels"));
        assert!(cfg.adapters.target_suggestions_url.is_none());
        assert!(cfg.engine.strict_subflow);
    }
}
