//! Implementaciones sobre el sistema de archivos de los traits del core.
//!
//! - `FileStore`: un archivo `<namespace>.json` por funnel con el `AnswerMap`
//!   completo. La escritura es atómica (archivo temporal + rename), de modo
//!   que un corte a mitad de escritura deja el registro anterior intacto.
//! - `JsonlEventStore`: journal append-only, una línea JSON por evento.
//! - Errores transitorios de IO se reintentan con backoff corto.

mod journal;

use std::fs;
use std::path::{Path, PathBuf};

use funnel_core::{PersistenceAdapter, StorageError};
use log::{debug, warn};

use crate::error::PersistenceError;

pub use journal::JsonlEventStore;

const MAX_RETRIES: u32 = 3;
const BACKOFF_STEP_MS: u64 = 15;

/// Sólo `Interrupted`/`WouldBlock`/`TimedOut` del sistema de archivos.
fn is_retryable(e: &PersistenceError) -> bool {
    matches!(e, PersistenceError::TransientIo(_))
}

/// Repite una operación sobre `path` mientras el IO falle de forma
/// transitoria, con espera lineal entre intentos. La escritura completa
/// (tmp + rename) se repite entera; nunca queda un registro a medias.
pub(crate) fn with_retry<F, T>(op: &str, path: &Path, mut f: F) -> Result<T, PersistenceError>
    where F: FnMut() -> Result<T, PersistenceError>
{
    let mut retries = 0;
    loop {
        match f() {
            Err(e) if is_retryable(&e) && retries < MAX_RETRIES => {
                retries += 1;
                let wait = std::time::Duration::from_millis(BACKOFF_STEP_MS * u64::from(retries));
                warn!("fs:{op} transient path={} retry={retries}/{MAX_RETRIES} wait={wait:?} err={e}",
                      path.display());
                std::thread::sleep(wait);
            }
            r => return r,
        }
    }
}

/// Valida que el namespace sea un nombre de archivo seguro.
pub(crate) fn checked_name(namespace: &str) -> Result<&str, PersistenceError> {
    let valid = !namespace.is_empty()
                && !namespace.starts_with('.')
                && namespace.chars()
                            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(namespace)
    } else {
        Err(PersistenceError::InvalidNamespace(namespace.to_string()))
    }
}

/// Almacenamiento local durable: un JSON por namespace bajo `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// No toca el disco hasta la primera escritura.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, namespace: &str) -> Result<PathBuf, PersistenceError> {
        Ok(self.dir.join(format!("{}.json", checked_name(namespace)?)))
    }

    fn read_record(&self, namespace: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.record_path(namespace)?;
        with_retry("read", &path, || match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        })
    }

    fn write_record(&self, namespace: &str, record: &str) -> Result<(), PersistenceError> {
        let path = self.record_path(namespace)?;
        let tmp = path.with_extension("json.tmp");
        with_retry("write", &path, || {
            fs::create_dir_all(&self.dir)?;
            fs::write(&tmp, record)?;
            fs::rename(&tmp, &path)?;
            Ok(())
        })?;
        debug!("write:done path={} bytes={}", path.display(), record.len());
        Ok(())
    }

    fn remove_record(&self, namespace: &str) -> Result<(), PersistenceError> {
        let path = self.record_path(namespace)?;
        with_retry("remove", &path, || match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        })
    }
}

impl PersistenceAdapter for FileStore {
    fn read(&self, namespace: &str) -> Result<Option<String>, StorageError> {
        self.read_record(namespace).map_err(StorageError::from)
    }

    fn write(&mut self, namespace: &str, record: &str) -> Result<(), StorageError> {
        self.write_record(namespace, record).map_err(StorageError::from)
    }

    fn remove(&mut self, namespace: &str) -> Result<(), StorageError> {
        self.remove_record(namespace).map_err(StorageError::from)
    }
}
