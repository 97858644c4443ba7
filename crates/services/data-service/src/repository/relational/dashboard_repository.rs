//! Read-only dashboard reports.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tiberius::{ColumnData, FromSql, Row};
use uuid::Uuid;

use common::{AppResult, ResultExt};
use domain::ANALYSIS_STATUS_COMPLETED;

use super::rows::{opt_text, optional, required, timestamp};
use crate::infra::SqlServer;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A completed analysis with the resume and job it was run against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentAnalysis {
    pub analysis_id: Uuid,
    pub match_score: f64,
    pub created_at: DateTime<Utc>,
    pub resume_title: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserTotals {
    pub total_resumes: i32,
    pub total_analyses: i32,
    pub total_cover_letters: i32,
    pub average_score: Option<f64>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// First row of `sp_GetDashboardStats`, keyed by column name
    async fn get_dashboard_stats(&self, user_id: Uuid) -> Map<String, Value>;

    async fn get_recent_analyses(&self, user_id: Uuid, limit: i64) -> Vec<RecentAnalysis>;

    async fn get_user_totals(&self, user_id: Uuid) -> UserTotals;
}

pub struct DashboardStore {
    db: SqlServer,
}

impl DashboardStore {
    pub fn new(db: SqlServer) -> Self {
        Self { db }
    }

    async fn stats(&self, user_id: Uuid) -> AppResult<Map<String, Value>> {
        let mut conn = self.db.connection().await?;
        let row = conn
            .query("EXEC sp_GetDashboardStats @UserId = @P1", &[&user_id])
            .await?
            .into_row()
            .await?;

        Ok(row.as_ref().map(row_to_map).unwrap_or_default())
    }

    async fn recent(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<RecentAnalysis>> {
        let mut conn = self.db.connection().await?;
        let rows = conn
            .query(
                "SELECT TOP (@P2) ca.AnalysisId, ca.MatchScore, ca.CreatedAt, \
                 r.Title AS ResumeTitle, j.Title AS JobTitle, c.Name AS CompanyName \
                 FROM CompatibilityAnalyses ca \
                 LEFT JOIN Resumes r ON ca.ResumeId = r.ResumeId \
                 LEFT JOIN JobDescriptions j ON ca.JobId = j.JobId \
                 LEFT JOIN Companies c ON j.CompanyId = c.CompanyId \
                 WHERE ca.UserId = @P1 AND ca.Status = @P3 \
                 ORDER BY ca.CreatedAt DESC",
                &[&user_id, &limit, &ANALYSIS_STATUS_COMPLETED],
            )
            .await?
            .into_first_result()
            .await?;

        rows.iter()
            .map(|row| {
                Ok(RecentAnalysis {
                    analysis_id: required(row, "AnalysisId")?,
                    match_score: required(row, "MatchScore")?,
                    created_at: timestamp(row, "CreatedAt")?,
                    resume_title: opt_text(row, "ResumeTitle")?,
                    job_title: opt_text(row, "JobTitle")?,
                    company_name: opt_text(row, "CompanyName")?,
                })
            })
            .collect()
    }

    async fn totals(&self, user_id: Uuid) -> AppResult<UserTotals> {
        let mut conn = self.db.connection().await?;
        let row = conn
            .query(
                "SELECT \
                 (SELECT COUNT(*) FROM Resumes WHERE UserId = @P1) AS TotalResumes, \
                 (SELECT COUNT(*) FROM CompatibilityAnalyses WHERE UserId = @P1) AS TotalAnalyses, \
                 (SELECT COUNT(*) FROM CoverLetters WHERE UserId = @P1) AS TotalCoverLetters, \
                 (SELECT AVG(MatchScore) FROM CompatibilityAnalyses \
                  WHERE UserId = @P1 AND Status = @P2) AS AverageScore",
                &[&user_id, &ANALYSIS_STATUS_COMPLETED],
            )
            .await?
            .into_row()
            .await?;

        let Some(row) = row else {
            return Ok(UserTotals::default());
        };

        Ok(UserTotals {
            total_resumes: optional(&row, "TotalResumes")?.unwrap_or(0),
            total_analyses: optional(&row, "TotalAnalyses")?.unwrap_or(0),
            total_cover_letters: optional(&row, "TotalCoverLetters")?.unwrap_or(0),
            average_score: optional(&row, "AverageScore")?,
        })
    }
}

fn row_to_map(row: &Row) -> Map<String, Value> {
    row.cells()
        .map(|(column, data)| (column.name().to_string(), column_value(data)))
        .collect()
}

fn column_value(data: &ColumnData<'static>) -> Value {
    match data {
        ColumnData::U8(v) => v.map(Value::from).unwrap_or(Value::Null),
        ColumnData::I16(v) => v.map(Value::from).unwrap_or(Value::Null),
        ColumnData::I32(v) => v.map(Value::from).unwrap_or(Value::Null),
        ColumnData::I64(v) => v.map(Value::from).unwrap_or(Value::Null),
        ColumnData::F32(v) => v.map(Value::from).unwrap_or(Value::Null),
        ColumnData::F64(v) => v.map(Value::from).unwrap_or(Value::Null),
        ColumnData::Bit(v) => v.map(Value::from).unwrap_or(Value::Null),
        ColumnData::String(v) => v
            .as_ref()
            .map(|s| Value::from(s.as_ref()))
            .unwrap_or(Value::Null),
        ColumnData::Guid(v) => v
            .map(|id| Value::from(id.to_string()))
            .unwrap_or(Value::Null),
        ColumnData::Numeric(v) => v.map(|n| Value::from(f64::from(n))).unwrap_or(Value::Null),
        ColumnData::DateTime(_)
        | ColumnData::SmallDateTime(_)
        | ColumnData::DateTime2(_)
        | ColumnData::Date(_) => NaiveDateTime::from_sql(data)
            .ok()
            .flatten()
            .map(|t| Value::from(t.and_utc().to_rfc3339()))
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

#[async_trait]
impl DashboardRepository for DashboardStore {
    async fn get_dashboard_stats(&self, user_id: Uuid) -> Map<String, Value> {
        self.stats(user_id)
            .await
            .or_default_logged("get_dashboard_stats")
    }

    async fn get_recent_analyses(&self, user_id: Uuid, limit: i64) -> Vec<RecentAnalysis> {
        self.recent(user_id, limit)
            .await
            .or_default_logged("get_recent_analyses")
    }

    async fn get_user_totals(&self, user_id: Uuid) -> UserTotals {
        self.totals(user_id)
            .await
            .or_default_logged("get_user_totals")
    }
}
