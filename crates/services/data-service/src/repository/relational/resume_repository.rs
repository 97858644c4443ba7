use async_trait::async_trait;
use tiberius::Row;
use uuid::Uuid;

use common::{AppError, AppResult, ResultExt};
use domain::{NewResume, Resume, ResumeStatus};

use super::rows::{inserted, opt_text, opt_timestamp, optional, required, text, timestamp};
use crate::infra::SqlServer;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const RESUME_COLUMNS: &str = "ResumeId, UserId, Title, Version, Status, DataLakeFileId, \
     OriginalFileName, FileSize, FileType, CreatedAt, UpdatedAt, LastAnalyzedAt, \
     AnalysisCount, AverageMatchScore";

/// Running mean applied in one statement so the row is read and written under
/// the same lock.
const APPLY_SCORE_SQL: &str = "UPDATE Resumes SET \
     AverageMatchScore = (AverageMatchScore * AnalysisCount + @P2) / (AnalysisCount + 1), \
     AnalysisCount = AnalysisCount + 1, \
     LastAnalyzedAt = SYSUTCDATETIME(), \
     UpdatedAt = SYSUTCDATETIME() \
     WHERE ResumeId = @P1";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ResumeRepository: Send + Sync {
    async fn create_resume(&self, resume: NewResume) -> AppResult<Resume>;

    async fn get_resume_by_id(&self, resume_id: Uuid) -> Option<Resume>;

    /// Most recently updated first
    async fn get_user_resumes(&self, user_id: Uuid, status: Option<ResumeStatus>) -> Vec<Resume>;

    /// Fold `score` into the resume's running average and bump its analysis count
    async fn update_resume_analysis_stats(&self, resume_id: Uuid, score: f64) -> bool;
}

pub struct ResumeStore {
    db: SqlServer,
}

impl ResumeStore {
    pub fn new(db: SqlServer) -> Self {
        Self { db }
    }

    async fn insert(&self, resume: NewResume) -> AppResult<Resume> {
        let sql = format!(
            "INSERT INTO Resumes (UserId, Title, Version, Status, DataLakeFileId, \
             OriginalFileName, FileSize, FileType) \
             OUTPUT {} \
             VALUES (@P1, @P2, @P3, @P4, @P5, @P6, @P7, @P8)",
            inserted(RESUME_COLUMNS)
        );

        let mut conn = self.db.connection().await?;
        let row = conn
            .query(
                sql,
                &[
                    &resume.user_id,
                    &resume.title,
                    &resume.version,
                    &resume.status.as_str(),
                    &resume.data_lake_file_id,
                    &resume.original_filename,
                    &resume.file_size,
                    &resume.file_type,
                ],
            )
            .await?
            .into_row()
            .await?
            .ok_or_else(|| AppError::internal("resume insert returned no row"))?;

        resume_from_row(&row)
    }

    async fn find_by_id(&self, resume_id: Uuid) -> AppResult<Option<Resume>> {
        let sql = format!("SELECT {} FROM Resumes WHERE ResumeId = @P1", RESUME_COLUMNS);

        let mut conn = self.db.connection().await?;
        let row = conn.query(sql, &[&resume_id]).await?.into_row().await?;

        row.as_ref().map(resume_from_row).transpose()
    }

    async fn find_for_user(
        &self,
        user_id: Uuid,
        status: Option<ResumeStatus>,
    ) -> AppResult<Vec<Resume>> {
        let mut conn = self.db.connection().await?;

        let rows = match status {
            Some(status) => {
                let sql = format!(
                    "SELECT {} FROM Resumes WHERE UserId = @P1 AND Status = @P2 \
                     ORDER BY UpdatedAt DESC",
                    RESUME_COLUMNS
                );
                conn.query(sql, &[&user_id, &status.as_str()])
                    .await?
                    .into_first_result()
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM Resumes WHERE UserId = @P1 ORDER BY UpdatedAt DESC",
                    RESUME_COLUMNS
                );
                conn.query(sql, &[&user_id]).await?.into_first_result().await?
            }
        };

        rows.iter().map(resume_from_row).collect()
    }

    async fn apply_score(&self, resume_id: Uuid, score: f64) -> AppResult<bool> {
        let mut conn = self.db.connection().await?;
        let result = conn.execute(APPLY_SCORE_SQL, &[&resume_id, &score]).await?;

        Ok(result.total() > 0)
    }
}

fn resume_from_row(row: &Row) -> AppResult<Resume> {
    Ok(Resume {
        resume_id: required(row, "ResumeId")?,
        user_id: required(row, "UserId")?,
        title: text(row, "Title")?,
        version: text(row, "Version")?,
        status: text(row, "Status")?.parse()?,
        data_lake_file_id: optional(row, "DataLakeFileId")?,
        original_filename: opt_text(row, "OriginalFileName")?,
        file_size: optional(row, "FileSize")?,
        file_type: opt_text(row, "FileType")?,
        created_at: timestamp(row, "CreatedAt")?,
        updated_at: timestamp(row, "UpdatedAt")?,
        last_analyzed_at: opt_timestamp(row, "LastAnalyzedAt")?,
        analysis_count: required(row, "AnalysisCount")?,
        average_match_score: required(row, "AverageMatchScore")?,
    })
}

#[async_trait]
impl ResumeRepository for ResumeStore {
    async fn create_resume(&self, resume: NewResume) -> AppResult<Resume> {
        self.insert(resume).await.log_failure("create_resume")
    }

    async fn get_resume_by_id(&self, resume_id: Uuid) -> Option<Resume> {
        self.find_by_id(resume_id)
            .await
            .or_default_logged("get_resume_by_id")
    }

    async fn get_user_resumes(&self, user_id: Uuid, status: Option<ResumeStatus>) -> Vec<Resume> {
        self.find_for_user(user_id, status)
            .await
            .or_default_logged("get_user_resumes")
    }

    async fn update_resume_analysis_stats(&self, resume_id: Uuid, score: f64) -> bool {
        self.apply_score(resume_id, score)
            .await
            .or_default_logged("update_resume_analysis_stats")
    }
}
