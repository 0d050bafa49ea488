use async_trait::async_trait;

use crate::repository::{FlagValue, ProgressStore, StorageError, WriteBatch};

use super::SqliteRepository;
use super::mapping::{flag_to_columns, map_flag_row};

#[async_trait]
impl ProgressStore for SqliteRepository {
    async fn get(&self, key: &str) -> Result<Option<FlagValue>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT kind, value
            FROM progress_entries
            WHERE key = ?1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        row.as_ref().map(map_flag_row).transpose()
    }

    async fn apply(&self, batch: WriteBatch) -> Result<(), StorageError> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        for (key, value) in batch.entries() {
            let (kind, raw) = flag_to_columns(*value);
            sqlx::query(
                r"
                INSERT INTO progress_entries (key, kind, value)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    kind = excluded.kind,
                    value = excluded.value
                ",
            )
            .bind(key.as_str())
            .bind(kind)
            .bind(raw)
            .execute(&mut *tx)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
            log::debug!("stored {key} = {value:?}");
        }

        tx.commit()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
