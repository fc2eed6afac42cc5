//! Carga de configuración desde variables de entorno.
//! Usa `FUNNEL_STORAGE_DIR`, el flag opcional `FUNNEL_JOURNAL` y
//! `FUNNEL_STRICT_SUBFLOW` para el motor.

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use funnel_core::EngineConfig;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

/// Directorio por defecto (relativo al cwd).
pub const DEFAULT_STORAGE_DIR: &str = ".funnelflow";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directorio donde vive un `<namespace>.json` por funnel.
    pub dir: PathBuf,
    /// Escribir también el journal de navegación (`journal/<session>.jsonl`).
    pub journal: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from(DEFAULT_STORAGE_DIR),
               journal: false }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        let dir = env::var("FUNNEL_STORAGE_DIR").map(PathBuf::from)
                                                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_DIR));
        let journal = env::var("FUNNEL_JOURNAL").ok()
                                                .map(|v| parse_flag(&v))
                                                .unwrap_or(false);
        Self { dir, journal }
    }

    pub fn journal_dir(&self) -> PathBuf {
        self.dir.join("journal")
    }
}

/// `1`, `true`, `yes`, `on` (sin importar mayúsculas) → `true`.
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Configuración del motor; sin `FUNNEL_STRICT_SUBFLOW` queda el default
/// del perfil de compilación.
pub fn engine_config_from_env() -> EngineConfig {
    Lazy::force(&DOTENV_LOADED);
    engine_config_from(env::var("FUNNEL_STRICT_SUBFLOW").ok().as_deref())
}

fn engine_config_from(strict_subflow: Option<&str>) -> EngineConfig {
    match strict_subflow {
        Some(v) if parse_flag(v) => EngineConfig::strict(),
        Some(_) => EngineConfig::lenient(),
        None => EngineConfig::default(),
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
