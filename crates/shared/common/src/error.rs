//! Unified error handling for the persistence layer.
//!
//! Provides a single error type for both stores plus the helpers that
//! implement the degradation policy:
//! - reads log and fall back to an empty value (`or_default_logged`)
//! - creates log and re-raise (`log_failure`)

use domain::DomainError;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    /// Caller input that cannot be stored
    #[error("{0}")]
    Validation(String),

    // Store errors
    #[cfg(feature = "mongo")]
    #[error("Document store error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[cfg(feature = "sqlserver")]
    #[error("Relational store error: {0}")]
    SqlServer(#[from] tiberius::error::Error),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// =============================================================================
// Conversions
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        // Unparseable stored value
        match err {
            DomainError::UnknownVariant { .. } => AppError::Internal(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

#[cfg(feature = "mongo")]
impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

#[cfg(feature = "mongo")]
impl From<mongodb::bson::de::Error> for AppError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Logging helpers applied at the repository boundary.
///
/// Every store failure is logged with the name of the operation that hit it.
pub trait ResultExt<T> {
    /// Log the failure and fall back to `T::default()`
    fn or_default_logged(self, operation: &'static str) -> T
    where
        T: Default;

    /// Log the failure and hand it back to the caller
    fn log_failure(self, operation: &'static str) -> AppResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn or_default_logged(self, operation: &'static str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(e) => {
                let e: AppError = e.into();
                tracing::error!(operation, error = %e, detail = ?e, "Store operation failed");
                T::default()
            }
        }
    }

    fn log_failure(self, operation: &'static str) -> AppResult<T> {
        self.map_err(|e| {
            let e: AppError = e.into();
            tracing::error!(operation, error = %e, detail = ?e, "Store operation failed");
            e
        })
    }
}

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn pool(msg: impl Into<String>) -> Self {
        AppError::Pool(msg.into())
    }
}
