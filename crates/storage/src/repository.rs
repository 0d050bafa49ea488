use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::keys::ProgressKey;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("entry {key} does not hold a {expected} value")]
    TypeMismatch { key: String, expected: &'static str },
}

/// A single persisted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
}

impl FlagValue {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FlagValue::Bool(_) => "bool",
            FlagValue::Int(_) => "int",
        }
    }
}

/// Ordered set of writes applied together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    entries: Vec<(String, FlagValue)>,
}

impl WriteBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn put_bool(mut self, key: ProgressKey, value: bool) -> Self {
        self.entries.push((key.as_key(), FlagValue::Bool(value)));
        self
    }

    #[must_use]
    pub fn put_int(mut self, key: ProgressKey, value: i64) -> Self {
        self.entries.push((key.as_key(), FlagValue::Int(value)));
        self
    }

    #[must_use]
    pub fn entries(&self) -> &[(String, FlagValue)] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn into_entries(self) -> Vec<(String, FlagValue)> {
        self.entries
    }
}

/// Key-value contract for learner progress.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Fetch the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<FlagValue>, StorageError>;

    /// Apply every write in `batch`; either all entries land or none do.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the batch cannot be persisted.
    async fn apply(&self, batch: WriteBatch) -> Result<(), StorageError>;

    /// Read a boolean, falling back to `default` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::TypeMismatch` if the key holds an integer.
    async fn get_bool(&self, key: ProgressKey, default: bool) -> Result<bool, StorageError> {
        let key = key.as_key();
        match self.get(&key).await? {
            None => Ok(default),
            Some(FlagValue::Bool(value)) => Ok(value),
            Some(FlagValue::Int(_)) => Err(StorageError::TypeMismatch {
                key,
                expected: "bool",
            }),
        }
    }

    /// Read an integer, falling back to `default` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::TypeMismatch` if the key holds a boolean.
    async fn get_int(&self, key: ProgressKey, default: i64) -> Result<i64, StorageError> {
        let key = key.as_key();
        match self.get(&key).await? {
            None => Ok(default),
            Some(FlagValue::Int(value)) => Ok(value),
            Some(FlagValue::Bool(_)) => Err(StorageError::TypeMismatch {
                key,
                expected: "int",
            }),
        }
    }
}

/// Simple in-memory store for tests and ephemeral sessions.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, FlagValue>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ProgressStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<FlagValue>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).copied())
    }

    async fn apply(&self, batch: WriteBatch) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.extend(batch.into_entries());
        Ok(())
    }
}

/// Aggregate storage handle passed to services.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressStore> = Arc::new(InMemoryStore::new());
        Self { progress }
    }
}
