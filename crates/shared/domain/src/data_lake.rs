//! Data lake file references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_STORAGE_PROVIDER;

/// Reference to a blob stored in the data lake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataLakeFile {
    pub file_id: Uuid,
    pub user_id: Uuid,
    pub filename: String,
    pub file_type: String,
    pub file_size: i64,
    pub mime_type: Option<String>,
    pub storage_path: String,
    pub bucket_name: String,
    pub storage_provider: String,
    pub uploaded_at: DateTime<Utc>,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub access_count: i32,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub metadata: Option<serde_json::Value>,
}

/// File reference creation data
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewDataLakeFile {
    pub user_id: Uuid,
    pub filename: String,
    pub file_type: String,
    pub file_size: i64,
    pub mime_type: Option<String>,
    pub storage_path: String,
    pub bucket_name: String,
    #[serde(default = "default_storage_provider")]
    pub storage_provider: String,
    pub metadata: Option<serde_json::Value>,
}

fn default_storage_provider() -> String {
    DEFAULT_STORAGE_PROVIDER.to_string()
}
