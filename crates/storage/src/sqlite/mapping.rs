use sqlx::Row;

use crate::repository::{FlagValue, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Column pair (`kind`, `value`) for a flag.
pub(crate) fn flag_to_columns(value: FlagValue) -> (&'static str, i64) {
    match value {
        FlagValue::Bool(flag) => ("bool", i64::from(flag)),
        FlagValue::Int(number) => ("int", number),
    }
}

pub(crate) fn parse_flag(kind: &str, value: i64) -> Result<FlagValue, StorageError> {
    match kind {
        "bool" => match value {
            0 => Ok(FlagValue::Bool(false)),
            1 => Ok(FlagValue::Bool(true)),
            other => Err(StorageError::Serialization(format!(
                "invalid bool value: {other}"
            ))),
        },
        "int" => Ok(FlagValue::Int(value)),
        _ => Err(StorageError::Serialization(format!("invalid kind: {kind}"))),
    }
}

pub(crate) fn map_flag_row(row: &sqlx::sqlite::SqliteRow) -> Result<FlagValue, StorageError> {
    let kind: String = row.try_get("kind").map_err(ser)?;
    let value: i64 = row.try_get("value").map_err(ser)?;
    parse_flag(&kind, value)
}
