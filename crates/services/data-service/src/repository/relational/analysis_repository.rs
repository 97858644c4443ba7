//! Compatibility analyses and the job lookups that go with them.

use async_trait::async_trait;
use tiberius::Row;
use uuid::Uuid;

use common::{AppError, AppResult, ResultExt};
use domain::{
    AnalysisStatus, AnalysisSummary, CompatibilityAnalysis, JobSummary, NewAnalysis,
    ANALYSIS_STATUS_COMPLETED, ANALYSIS_STATUS_FAILED, ANALYSIS_STATUS_PENDING,
};

use super::rows::{inserted, opt_text, opt_timestamp, optional, required, text, timestamp};
use crate::infra::SqlServer;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const ANALYSIS_COLUMNS: &str = "AnalysisId, UserId, ResumeId, JobId, MatchScore, Status, \
     AnalysisType, ProcessingTimeMs, CreatedAt, CompletedAt, MongoAnalysisId";

/// Completes a row at most once: an already completed row is left untouched.
const COMPLETE_SQL: &str = "UPDATE CompatibilityAnalyses SET \
     Status = @P2, MatchScore = @P3, ProcessingTimeMs = @P4, \
     MongoAnalysisId = @P5, CompletedAt = SYSUTCDATETIME() \
     WHERE AnalysisId = @P1 AND Status <> @P2";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    async fn create_analysis(&self, analysis: NewAnalysis) -> AppResult<CompatibilityAnalysis>;

    async fn get_analysis_by_id(&self, analysis_id: Uuid) -> Option<CompatibilityAnalysis>;

    /// Only returns the analysis when it belongs to `user_id`
    async fn get_analysis_for_user(
        &self,
        analysis_id: Uuid,
        user_id: Uuid,
    ) -> Option<CompatibilityAnalysis>;

    /// Newest first, at most `limit`
    async fn get_user_analyses(&self, user_id: Uuid, limit: i64) -> Vec<CompatibilityAnalysis>;

    /// `CompletedAt` is stamped only for `completed`; a missing processing time keeps the stored one
    async fn update_analysis_status(
        &self,
        analysis_id: Uuid,
        status: AnalysisStatus,
        processing_time_ms: Option<i32>,
    ) -> bool;

    /// Returns `false` when the analysis was already completed
    async fn complete_analysis(
        &self,
        analysis_id: Uuid,
        match_score: f64,
        processing_time_ms: i32,
        mongo_analysis_id: String,
    ) -> bool;

    async fn get_analysis_summary(&self, user_id: Uuid) -> AnalysisSummary;

    async fn get_job_summary(&self, job_id: Uuid) -> Option<JobSummary>;
}

pub struct AnalysisStore {
    db: SqlServer,
}

impl AnalysisStore {
    pub fn new(db: SqlServer) -> Self {
        Self { db }
    }

    async fn insert(&self, analysis: NewAnalysis) -> AppResult<CompatibilityAnalysis> {
        let sql = format!(
            "INSERT INTO CompatibilityAnalyses \
             (UserId, ResumeId, JobId, MatchScore, Status, AnalysisType, MongoAnalysisId) \
             OUTPUT {} \
             VALUES (@P1, @P2, @P3, @P4, @P5, @P6, @P7)",
            inserted(ANALYSIS_COLUMNS)
        );

        let mut conn = self.db.connection().await?;
        let row = conn
            .query(
                sql,
                &[
                    &analysis.user_id,
                    &analysis.resume_id,
                    &analysis.job_id,
                    &analysis.match_score,
                    &analysis.status.as_str(),
                    &analysis.analysis_type,
                    &analysis.mongo_analysis_id,
                ],
            )
            .await?
            .into_row()
            .await?
            .ok_or_else(|| AppError::internal("analysis insert returned no row"))?;

        analysis_from_row(&row)
    }

    async fn find_one(
        &self,
        analysis_id: Uuid,
        user_id: Option<Uuid>,
    ) -> AppResult<Option<CompatibilityAnalysis>> {
        let mut conn = self.db.connection().await?;

        let row = match user_id {
            Some(user_id) => {
                let sql = format!(
                    "SELECT {} FROM CompatibilityAnalyses WHERE AnalysisId = @P1 AND UserId = @P2",
                    ANALYSIS_COLUMNS
                );
                conn.query(sql, &[&analysis_id, &user_id])
                    .await?
                    .into_row()
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM CompatibilityAnalyses WHERE AnalysisId = @P1",
                    ANALYSIS_COLUMNS
                );
                conn.query(sql, &[&analysis_id]).await?.into_row().await?
            }
        };

        row.as_ref().map(analysis_from_row).transpose()
    }

    async fn find_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<CompatibilityAnalysis>> {
        let sql = format!(
            "SELECT TOP (@P2) {} FROM CompatibilityAnalyses WHERE UserId = @P1 \
             ORDER BY CreatedAt DESC",
            ANALYSIS_COLUMNS
        );

        let mut conn = self.db.connection().await?;
        let rows = conn
            .query(sql, &[&user_id, &limit])
            .await?
            .into_first_result()
            .await?;

        rows.iter().map(analysis_from_row).collect()
    }

    async fn set_status(
        &self,
        analysis_id: Uuid,
        status: AnalysisStatus,
        processing_time_ms: Option<i32>,
    ) -> AppResult<bool> {
        let mut conn = self.db.connection().await?;
        let result = conn
            .execute(
                "UPDATE CompatibilityAnalyses SET \
                 Status = @P2, \
                 ProcessingTimeMs = COALESCE(@P3, ProcessingTimeMs), \
                 CompletedAt = CASE WHEN @P2 = @P4 THEN SYSUTCDATETIME() ELSE CompletedAt END \
                 WHERE AnalysisId = @P1",
                &[
                    &analysis_id,
                    &status.as_str(),
                    &processing_time_ms,
                    &ANALYSIS_STATUS_COMPLETED,
                ],
            )
            .await?;

        Ok(result.total() > 0)
    }

    async fn complete(
        &self,
        analysis_id: Uuid,
        match_score: f64,
        processing_time_ms: i32,
        mongo_analysis_id: &str,
    ) -> AppResult<bool> {
        let mut conn = self.db.connection().await?;
        let result = conn
            .execute(
                COMPLETE_SQL,
                &[
                    &analysis_id,
                    &ANALYSIS_STATUS_COMPLETED,
                    &match_score,
                    &processing_time_ms,
                    &mongo_analysis_id,
                ],
            )
            .await?;

        Ok(result.total() > 0)
    }

    async fn summary(&self, user_id: Uuid) -> AppResult<AnalysisSummary> {
        let mut conn = self.db.connection().await?;
        let row = conn
            .query(
                "SELECT \
                 COUNT(*) AS TotalAnalyses, \
                 SUM(CASE WHEN Status = @P2 THEN 1 ELSE 0 END) AS CompletedAnalyses, \
                 SUM(CASE WHEN Status = @P3 THEN 1 ELSE 0 END) AS PendingAnalyses, \
                 SUM(CASE WHEN Status = @P4 THEN 1 ELSE 0 END) AS FailedAnalyses, \
                 AVG(CASE WHEN Status = @P2 THEN MatchScore END) AS AverageScore, \
                 MAX(CASE WHEN Status = @P2 THEN MatchScore END) AS BestScore, \
                 AVG(ProcessingTimeMs) AS AvgProcessingTimeMs \
                 FROM CompatibilityAnalyses WHERE UserId = @P1",
                &[
                    &user_id,
                    &ANALYSIS_STATUS_COMPLETED,
                    &ANALYSIS_STATUS_PENDING,
                    &ANALYSIS_STATUS_FAILED,
                ],
            )
            .await?
            .into_row()
            .await?;

        let Some(row) = row else {
            return Ok(AnalysisSummary::default());
        };

        Ok(AnalysisSummary {
            total_analyses: optional(&row, "TotalAnalyses")?.unwrap_or(0),
            completed_analyses: optional(&row, "CompletedAnalyses")?.unwrap_or(0),
            pending_analyses: optional(&row, "PendingAnalyses")?.unwrap_or(0),
            failed_analyses: optional(&row, "FailedAnalyses")?.unwrap_or(0),
            average_score: optional(&row, "AverageScore")?,
            best_score: optional(&row, "BestScore")?,
            avg_processing_time_ms: optional(&row, "AvgProcessingTimeMs")?,
        })
    }

    async fn job(&self, job_id: Uuid) -> AppResult<Option<JobSummary>> {
        let mut conn = self.db.connection().await?;
        let row = conn
            .query(
                "SELECT j.JobId, j.Title, j.Description, j.Requirements, j.Benefits, \
                 c.Name AS CompanyName, c.Industry \
                 FROM JobDescriptions j \
                 LEFT JOIN Companies c ON j.CompanyId = c.CompanyId \
                 WHERE j.JobId = @P1",
                &[&job_id],
            )
            .await?
            .into_row()
            .await?;

        row.as_ref()
            .map(|row| {
                Ok(JobSummary {
                    job_id: required(row, "JobId")?,
                    title: text(row, "Title")?,
                    description: opt_text(row, "Description")?,
                    requirements: opt_text(row, "Requirements")?,
                    benefits: opt_text(row, "Benefits")?,
                    company_name: opt_text(row, "CompanyName")?,
                    industry: opt_text(row, "Industry")?,
                })
            })
            .transpose()
    }
}

fn analysis_from_row(row: &Row) -> AppResult<CompatibilityAnalysis> {
    Ok(CompatibilityAnalysis {
        analysis_id: required(row, "AnalysisId")?,
        user_id: required(row, "UserId")?,
        resume_id: required(row, "ResumeId")?,
        job_id: optional(row, "JobId")?,
        match_score: required(row, "MatchScore")?,
        status: text(row, "Status")?.parse()?,
        analysis_type: text(row, "AnalysisType")?,
        processing_time_ms: optional(row, "ProcessingTimeMs")?,
        created_at: timestamp(row, "CreatedAt")?,
        completed_at: opt_timestamp(row, "CompletedAt")?,
        mongo_analysis_id: opt_text(row, "MongoAnalysisId")?,
    })
}

#[async_trait]
impl AnalysisRepository for AnalysisStore {
    async fn create_analysis(&self, analysis: NewAnalysis) -> AppResult<CompatibilityAnalysis> {
        self.insert(analysis).await.log_failure("create_analysis")
    }

    async fn get_analysis_by_id(&self, analysis_id: Uuid) -> Option<CompatibilityAnalysis> {
        self.find_one(analysis_id, None)
            .await
            .or_default_logged("get_analysis_by_id")
    }

    async fn get_analysis_for_user(
        &self,
        analysis_id: Uuid,
        user_id: Uuid,
    ) -> Option<CompatibilityAnalysis> {
        self.find_one(analysis_id, Some(user_id))
            .await
            .or_default_logged("get_analysis_for_user")
    }

    async fn get_user_analyses(&self, user_id: Uuid, limit: i64) -> Vec<CompatibilityAnalysis> {
        self.find_for_user(user_id, limit)
            .await
            .or_default_logged("get_user_analyses")
    }

    async fn update_analysis_status(
        &self,
        analysis_id: Uuid,
        status: AnalysisStatus,
        processing_time_ms: Option<i32>,
    ) -> bool {
        self.set_status(analysis_id, status, processing_time_ms)
            .await
            .or_default_logged("update_analysis_status")
    }

    async fn complete_analysis(
        &self,
        analysis_id: Uuid,
        match_score: f64,
        processing_time_ms: i32,
        mongo_analysis_id: String,
    ) -> bool {
        self.complete(analysis_id, match_score, processing_time_ms, &mongo_analysis_id)
            .await
            .or_default_logged("complete_analysis")
    }

    async fn get_analysis_summary(&self, user_id: Uuid) -> AnalysisSummary {
        self.summary(user_id)
            .await
            .or_default_logged("get_analysis_summary")
    }

    async fn get_job_summary(&self, job_id: Uuid) -> Option<JobSummary> {
        self.job(job_id).await.or_default_logged("get_job_summary")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_skips_completed_rows() {
        assert!(COMPLETE_SQL.ends_with("WHERE AnalysisId = @P1 AND Status <> @P2"));
        assert!(COMPLETE_SQL.contains("CompletedAt = SYSUTCDATETIME()"));
    }
}
