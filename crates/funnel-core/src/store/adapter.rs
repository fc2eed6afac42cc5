use std::collections::HashMap;

use log::warn;

use crate::answers::AnswerMap;
use crate::errors::StorageError;

/// Almacenamiento local durable de registros de respuestas.
///
/// Un registro por namespace (uno por funnel), con el `AnswerMap` serializado
/// como objeto JSON. Los backends sólo mueven texto; el parseo y la política
/// "registro corrupto = mapa vacío" viven en los métodos provistos.
pub trait PersistenceAdapter {
    /// Lee el registro crudo. `Ok(None)` si no existe.
    fn read(&self, namespace: &str) -> Result<Option<String>, StorageError>;
    /// Reemplaza el registro completo.
    fn write(&mut self, namespace: &str, record: &str) -> Result<(), StorageError>;
    /// Elimina el registro. Eliminar algo inexistente no es error.
    fn remove(&mut self, namespace: &str) -> Result<(), StorageError>;

    /// Carga el `AnswerMap` del namespace. Nunca falla: registro ausente,
    /// ilegible o corrupto produce un mapa vacío.
    fn load(&self, namespace: &str) -> AnswerMap {
        let raw = match self.read(namespace) {
            Ok(Some(raw)) => raw,
            Ok(None) => return AnswerMap::new(),
            Err(e) => {
                warn!("load:read failed namespace={namespace} err={e}");
                return AnswerMap::new();
            }
        };
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value @ serde_json::Value::Object(_)) => AnswerMap::from_value(value),
            Ok(_) => {
                warn!("load:record is not an object namespace={namespace}");
                AnswerMap::new()
            }
            Err(e) => {
                warn!("load:corrupt record namespace={namespace} err={e}");
                AnswerMap::new()
            }
        }
    }

    /// Serializa y guarda el mapa completo.
    fn save(&mut self, namespace: &str, answers: &AnswerMap) -> Result<(), StorageError> {
        let record = serde_json::to_string(answers)?;
        self.write(namespace, &record)
    }
}

/// Backend en memoria (tests y sesiones efímeras).
#[derive(Debug, Default, Clone)]
pub struct InMemoryPersistence {
    pub inner: HashMap<String, String>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistenceAdapter for InMemoryPersistence {
    fn read(&self, namespace: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.get(namespace).cloned())
    }

    fn write(&mut self, namespace: &str, record: &str) -> Result<(), StorageError> {
        self.inner.insert(namespace.to_string(), record.to_string());
        Ok(())
    }

    fn remove(&mut self, namespace: &str) -> Result<(), StorageError> {
        self.inner.remove(namespace);
        Ok(())
    }
}

impl<P: PersistenceAdapter + ?Sized> PersistenceAdapter for Box<P> {
    fn read(&self, namespace: &str) -> Result<Option<String>, StorageError> {
        (**self).read(namespace)
    }

    fn write(&mut self, namespace: &str, record: &str) -> Result<(), StorageError> {
        (**self).write(namespace, record)
    }

    fn remove(&mut self, namespace: &str) -> Result<(), StorageError> {
        (**self).remove(namespace)
    }
}
