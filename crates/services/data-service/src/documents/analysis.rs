use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use domain::{AnalysisDetail, CompatibilityAnalysis, CompatibilityReport, JobAnalysis, ResumeAnalysis};

/// Full AI output of an analysis, stored in `compatibility_analyses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAnalysisDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub analysis_id: String,
    pub user_id: String,
    pub resume_id: String,
    pub job_id: Option<String>,
    pub match_score: f64,
    pub job_analysis: Option<JobAnalysis>,
    pub resume_analysis: Option<ResumeAnalysis>,
    pub compatibility_report: Option<CompatibilityReport>,
    /// Milliseconds spent producing the analysis
    pub processing_time: Option<i64>,
    pub ai_model: Option<String>,
    pub version: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl DetailedAnalysisDocument {
    /// Document for a relational analysis row and its AI output
    pub fn for_analysis(
        analysis: &CompatibilityAnalysis,
        detail: AnalysisDetail,
        processing_time_ms: Option<i64>,
    ) -> Self {
        let now = DateTime::now();
        let match_score = detail.overall_score().unwrap_or(analysis.match_score);

        Self {
            id: None,
            analysis_id: analysis.analysis_id.to_string(),
            user_id: analysis.user_id.to_string(),
            resume_id: analysis.resume_id.to_string(),
            job_id: analysis.job_id.map(|id| id.to_string()),
            match_score,
            job_analysis: detail.job_analysis,
            resume_analysis: detail.resume_analysis,
            compatibility_report: detail.compatibility_report,
            processing_time: processing_time_ms,
            ai_model: detail.ai_model,
            version: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// AI output without storage metadata
    pub fn detail(&self) -> AnalysisDetail {
        AnalysisDetail {
            job_analysis: self.job_analysis.clone(),
            resume_analysis: self.resume_analysis.clone(),
            compatibility_report: self.compatibility_report.clone(),
            ai_model: self.ai_model.clone(),
        }
    }
}

/// Partial update; only the fields that are set reach `$set`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDocumentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_analysis: Option<JobAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_analysis: Option<ResumeAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatibility_report: Option<CompatibilityReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// One point of the score distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePoint {
    pub score: Option<f64>,
    pub date: Option<DateTime>,
}

/// Per-user aggregate over the detailed analyses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisStatistics {
    pub total_analyses: i64,
    pub average_score: Option<f64>,
    pub max_score: Option<f64>,
    pub min_score: Option<f64>,
    pub score_distribution: Vec<ScorePoint>,
}
