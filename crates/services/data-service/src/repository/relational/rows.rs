//! Column readers shared by the relational repositories.
//!
//! Timestamps are stored as `DATETIME2` in UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use tiberius::{FromSql, Row};

use common::{AppError, AppResult};

pub(crate) fn required<'a, T>(row: &'a Row, column: &str) -> AppResult<T>
where
    T: FromSql<'a>,
{
    row.try_get::<T, _>(column)?
        .ok_or_else(|| AppError::internal(format!("column {} is NULL", column)))
}

pub(crate) fn optional<'a, T>(row: &'a Row, column: &str) -> AppResult<Option<T>>
where
    T: FromSql<'a>,
{
    Ok(row.try_get::<T, _>(column)?)
}

pub(crate) fn text(row: &Row, column: &str) -> AppResult<String> {
    required::<&str>(row, column).map(str::to_owned)
}

pub(crate) fn opt_text(row: &Row, column: &str) -> AppResult<Option<String>> {
    Ok(optional::<&str>(row, column)?.map(str::to_owned))
}

pub(crate) fn timestamp(row: &Row, column: &str) -> AppResult<DateTime<Utc>> {
    required::<NaiveDateTime>(row, column).map(|t| t.and_utc())
}

pub(crate) fn opt_timestamp(row: &Row, column: &str) -> AppResult<Option<DateTime<Utc>>> {
    Ok(optional::<NaiveDateTime>(row, column)?.map(|t| t.and_utc()))
}

/// `INSERTED.`-qualified form of a comma separated column list, for `OUTPUT` clauses.
pub(crate) fn inserted(columns: &str) -> String {
    columns
        .split(", ")
        .map(|column| format!("INSERTED.{}", column))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inserted_prefixes_every_column() {
        assert_eq!(
            inserted("Id, Name, CreatedAt"),
            "INSERTED.Id, INSERTED.Name, INSERTED.CreatedAt"
        );
    }
}
