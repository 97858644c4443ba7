//! Compatibility analysis entity (relational side).

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    ANALYSIS_STATUS_COMPLETED, ANALYSIS_STATUS_FAILED, ANALYSIS_STATUS_PENDING,
    ANALYSIS_STATUS_PROCESSING, DEFAULT_ANALYSIS_TYPE,
};
use crate::error::DomainError;

/// Processing status of an analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Pending => ANALYSIS_STATUS_PENDING,
            AnalysisStatus::Processing => ANALYSIS_STATUS_PROCESSING,
            AnalysisStatus::Completed => ANALYSIS_STATUS_COMPLETED,
            AnalysisStatus::Failed => ANALYSIS_STATUS_FAILED,
        }
    }

    /// Completed is the only status that stamps `completed_at`
    pub fn is_completed(&self) -> bool {
        matches!(self, AnalysisStatus::Completed)
    }
}

impl FromStr for AnalysisStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ANALYSIS_STATUS_PENDING => Ok(AnalysisStatus::Pending),
            ANALYSIS_STATUS_PROCESSING => Ok(AnalysisStatus::Processing),
            ANALYSIS_STATUS_COMPLETED => Ok(AnalysisStatus::Completed),
            ANALYSIS_STATUS_FAILED => Ok(AnalysisStatus::Failed),
            other => Err(DomainError::unknown("analysis status", other)),
        }
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compatibility analysis between a resume and an (optional) job.
///
/// The detailed AI output lives in the document store and is referenced
/// through `mongo_analysis_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityAnalysis {
    pub analysis_id: Uuid,
    pub user_id: Uuid,
    pub resume_id: Uuid,
    pub job_id: Option<Uuid>,
    pub match_score: f64,
    pub status: AnalysisStatus,
    pub analysis_type: String,
    pub processing_time_ms: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub mongo_analysis_id: Option<String>,
}

/// Analysis creation data
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewAnalysis {
    pub user_id: Uuid,
    pub resume_id: Uuid,
    pub job_id: Option<Uuid>,
    pub match_score: f64,
    pub status: AnalysisStatus,
    pub analysis_type: String,
    pub mongo_analysis_id: Option<String>,
}

impl NewAnalysis {
    /// Pending job-match analysis with a zero score
    pub fn pending(user_id: Uuid, resume_id: Uuid, job_id: Option<Uuid>) -> Self {
        Self {
            user_id,
            resume_id,
            job_id,
            match_score: 0.0,
            status: AnalysisStatus::Pending,
            analysis_type: DEFAULT_ANALYSIS_TYPE.to_string(),
            mongo_analysis_id: None,
        }
    }
}

/// Per-user aggregate over the relational analysis rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_analyses: i32,
    pub completed_analyses: i32,
    pub pending_analyses: i32,
    pub failed_analyses: i32,
    pub average_score: Option<f64>,
    pub best_score: Option<f64>,
    pub avg_processing_time_ms: Option<i32>,
}

/// Job description fields needed to run an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        for status in [
            AnalysisStatus::Pending,
            AnalysisStatus::Processing,
            AnalysisStatus::Completed,
            AnalysisStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<AnalysisStatus>().unwrap(), status);
        }
        assert!("cancelled".parse::<AnalysisStatus>().is_err());
    }

    #[test]
    fn test_only_completed_is_terminal_success() {
        assert!(AnalysisStatus::Completed.is_completed());
        assert!(!AnalysisStatus::Failed.is_completed());
    }

    #[test]
    fn test_pending_defaults() {
        let analysis = NewAnalysis::pending(Uuid::new_v4(), Uuid::new_v4(), None);
        assert_eq!(analysis.analysis_type, "job_match");
        assert_eq!(analysis.status, AnalysisStatus::Pending);
        assert_eq!(analysis.match_score, 0.0);
    }
}
