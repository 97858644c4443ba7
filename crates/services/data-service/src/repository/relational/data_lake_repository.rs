use async_trait::async_trait;
use tiberius::Row;
use uuid::Uuid;

use common::{AppError, AppResult, ResultExt};
use domain::{DataLakeFile, NewDataLakeFile};

use super::rows::{inserted, opt_text, opt_timestamp, required, text, timestamp};
use crate::infra::SqlServer;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const FILE_COLUMNS: &str = "FileId, UserId, FileName, FileType, FileSize, MimeType, \
     StoragePath, BucketName, StorageProvider, UploadedAt, LastAccessedAt, AccessCount, \
     IsDeleted, DeletedAt, Metadata";

/// References to uploaded blobs; the bytes live in object storage.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DataLakeRepository: Send + Sync {
    async fn create_file_reference(&self, file: NewDataLakeFile) -> AppResult<DataLakeFile>;

    async fn get_file_reference(&self, file_id: Uuid) -> Option<DataLakeFile>;

    /// Bump the access counter through `sp_RecordDataLakeAccess`
    async fn record_file_access(&self, file_id: Uuid) -> bool;
}

pub struct DataLakeStore {
    db: SqlServer,
}

impl DataLakeStore {
    pub fn new(db: SqlServer) -> Self {
        Self { db }
    }

    async fn insert(&self, file: NewDataLakeFile) -> AppResult<DataLakeFile> {
        let metadata = file
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let sql = format!(
            "INSERT INTO DataLakeFiles (UserId, FileName, FileType, FileSize, MimeType, \
             StoragePath, BucketName, StorageProvider, Metadata) \
             OUTPUT {} \
             VALUES (@P1, @P2, @P3, @P4, @P5, @P6, @P7, @P8, @P9)",
            inserted(FILE_COLUMNS)
        );

        let mut conn = self.db.connection().await?;
        let row = conn
            .query(
                sql,
                &[
                    &file.user_id,
                    &file.filename,
                    &file.file_type,
                    &file.file_size,
                    &file.mime_type,
                    &file.storage_path,
                    &file.bucket_name,
                    &file.storage_provider,
                    &metadata,
                ],
            )
            .await?
            .into_row()
            .await?
            .ok_or_else(|| AppError::internal("file reference insert returned no row"))?;

        file_from_row(&row)
    }

    async fn find(&self, file_id: Uuid) -> AppResult<Option<DataLakeFile>> {
        let sql = format!("SELECT {} FROM DataLakeFiles WHERE FileId = @P1", FILE_COLUMNS);

        let mut conn = self.db.connection().await?;
        let row = conn.query(sql, &[&file_id]).await?.into_row().await?;

        row.as_ref().map(file_from_row).transpose()
    }

    async fn touch(&self, file_id: Uuid) -> AppResult<bool> {
        let mut conn = self.db.connection().await?;
        let result = conn
            .execute("EXEC sp_RecordDataLakeAccess @FileId = @P1", &[&file_id])
            .await?;

        Ok(result.total() > 0)
    }
}

fn file_from_row(row: &Row) -> AppResult<DataLakeFile> {
    let metadata = opt_text(row, "Metadata")?
        .map(|raw| serde_json::from_str(&raw))
        .transpose()?;

    Ok(DataLakeFile {
        file_id: required(row, "FileId")?,
        user_id: required(row, "UserId")?,
        filename: text(row, "FileName")?,
        file_type: text(row, "FileType")?,
        file_size: required(row, "FileSize")?,
        mime_type: opt_text(row, "MimeType")?,
        storage_path: text(row, "StoragePath")?,
        bucket_name: text(row, "BucketName")?,
        storage_provider: text(row, "StorageProvider")?,
        uploaded_at: timestamp(row, "UploadedAt")?,
        last_accessed_at: opt_timestamp(row, "LastAccessedAt")?,
        access_count: required(row, "AccessCount")?,
        is_deleted: required(row, "IsDeleted")?,
        deleted_at: opt_timestamp(row, "DeletedAt")?,
        metadata,
    })
}

#[async_trait]
impl DataLakeRepository for DataLakeStore {
    async fn create_file_reference(&self, file: NewDataLakeFile) -> AppResult<DataLakeFile> {
        self.insert(file).await.log_failure("create_file_reference")
    }

    async fn get_file_reference(&self, file_id: Uuid) -> Option<DataLakeFile> {
        self.find(file_id)
            .await
            .or_default_logged("get_file_reference")
    }

    async fn record_file_access(&self, file_id: Uuid) -> bool {
        self.touch(file_id)
            .await
            .or_default_logged("record_file_access")
    }
}
