//! Compatibility analysis response shapes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SearchResult;
use crate::analysis::{AnalysisStatus, CompatibilityAnalysis};
use crate::analysis_detail::{
    AnalysisDetail, EducationItem, ExperienceItem, ImprovementArea, JobAnalysis, SkillExtraction,
};
use crate::constants::{AD_HOC_JOB_TITLE, DEFAULT_AI_MODEL};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResponse {
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
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompatibilityScores {
    pub overall: f64,
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub cultural: f64,
}

/// Relational row merged with the stored AI output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedAnalysisResponse {
    pub analysis_id: Uuid,
    pub match_score: f64,
    pub status: AnalysisStatus,
    pub job_analysis: JobAnalysis,
    pub extracted_skills: Vec<SkillExtraction>,
    pub experience_matches: Vec<ExperienceItem>,
    pub education: Vec<EducationItem>,
    pub languages: Vec<String>,
    pub certifications: Vec<String>,
    pub compatibility_scores: CompatibilityScores,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub improvement_areas: Vec<ImprovementArea>,
    pub processing_time_ms: i32,
    pub ai_model: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisDisplay {
    pub id: Uuid,
    pub match_score: f64,
    pub status: AnalysisStatus,
    pub analysis_type: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisListItem {
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
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisDashboardItem {
    pub analysis_id: Uuid,
    pub match_score: f64,
    pub status: AnalysisStatus,
    pub job_title: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub processing_time: Option<i32>,
}

fn default_rating() -> String {
    "good".to_string()
}

/// Per-analysis statistics supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisStatisticsInput {
    pub category_scores: BTreeMap<String, f64>,
    pub skill_matches: i64,
    pub experience_matches: i64,
    pub education_matches: i64,
    #[serde(default = "default_rating")]
    pub overall_rating: String,
}

impl Default for AnalysisStatisticsInput {
    fn default() -> Self {
        Self {
            category_scores: BTreeMap::new(),
            skill_matches: 0,
            experience_matches: 0,
            education_matches: 0,
            overall_rating: default_rating(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisWithStatistics {
    pub analysis: AnalysisResponse,
    pub statistics: AnalysisStatisticsInput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisExport {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resume_id: Uuid,
    pub job_id: Option<Uuid>,
    pub match_score: f64,
    pub status: AnalysisStatus,
    pub analysis_type: String,
    pub processing_time_ms: Option<i32>,
    pub created_at: String,
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisMinimal {
    pub analysis_id: Uuid,
    pub match_score: f64,
    pub status: AnalysisStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisBulkResult {
    pub total_analyses: usize,
    pub completed_analyses: usize,
    pub pending_analyses: usize,
    pub failed_analyses: usize,
    pub average_score: f64,
    pub analyses: Vec<AnalysisListItem>,
}

pub fn to_public(analysis: &CompatibilityAnalysis) -> AnalysisResponse {
    AnalysisResponse {
        analysis_id: analysis.analysis_id,
        user_id: analysis.user_id,
        resume_id: analysis.resume_id,
        job_id: analysis.job_id,
        match_score: analysis.match_score,
        status: analysis.status,
        analysis_type: analysis.analysis_type.clone(),
        processing_time_ms: analysis.processing_time_ms,
        created_at: analysis.created_at,
        completed_at: analysis.completed_at,
    }
}

/// Merge the relational row with its detail document, when one was found
pub fn to_detailed(
    analysis: &CompatibilityAnalysis,
    detail: Option<&AnalysisDetail>,
) -> DetailedAnalysisResponse {
    let job_analysis = detail
        .and_then(|d| d.job_analysis.clone())
        .unwrap_or_default();
    let resume_analysis = detail
        .and_then(|d| d.resume_analysis.clone())
        .unwrap_or_default();
    let report = detail
        .and_then(|d| d.compatibility_report.clone())
        .unwrap_or_default();

    let compatibility_scores = match detail.and_then(|d| d.compatibility_report.as_ref()) {
        Some(r) => CompatibilityScores {
            overall: r.overall_score,
            skills: r.category_scores.skills,
            experience: r.category_scores.experience,
            education: r.category_scores.education,
            cultural: r.category_scores.cultural,
        },
        None => CompatibilityScores {
            overall: analysis.match_score,
            ..Default::default()
        },
    };

    DetailedAnalysisResponse {
        analysis_id: analysis.analysis_id,
        match_score: analysis.match_score,
        status: analysis.status,
        job_analysis,
        extracted_skills: resume_analysis.extracted_skills,
        experience_matches: resume_analysis.experience,
        education: resume_analysis.education,
        languages: resume_analysis.languages,
        certifications: resume_analysis.certifications,
        compatibility_scores,
        strengths: report.strengths,
        weaknesses: report.weaknesses,
        recommendations: report.recommendations,
        improvement_areas: report.improvement_areas,
        processing_time_ms: analysis.processing_time_ms.unwrap_or(0),
        ai_model: detail
            .and_then(|d| d.ai_model.clone())
            .unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
        created_at: analysis.created_at,
    }
}

pub fn to_display(analysis: &CompatibilityAnalysis) -> AnalysisDisplay {
    AnalysisDisplay {
        id: analysis.analysis_id,
        match_score: analysis.match_score,
        status: analysis.status,
        analysis_type: analysis.analysis_type.clone(),
        created_at: analysis.created_at,
        completed_at: analysis.completed_at,
    }
}

pub fn to_list_item(analysis: &CompatibilityAnalysis) -> AnalysisListItem {
    AnalysisListItem {
        analysis_id: analysis.analysis_id,
        user_id: analysis.user_id,
        resume_id: analysis.resume_id,
        job_id: analysis.job_id,
        match_score: analysis.match_score,
        status: analysis.status,
        analysis_type: analysis.analysis_type.clone(),
        processing_time_ms: analysis.processing_time_ms,
        created_at: analysis.created_at,
        completed_at: analysis.completed_at,
    }
}

pub fn to_dashboard_item(
    analysis: &CompatibilityAnalysis,
    job_title: Option<&str>,
) -> AnalysisDashboardItem {
    AnalysisDashboardItem {
        analysis_id: analysis.analysis_id,
        match_score: analysis.match_score,
        status: analysis.status,
        job_title: job_title.unwrap_or(AD_HOC_JOB_TITLE).to_string(),
        created_at: analysis.created_at,
        completed_at: analysis.completed_at,
        processing_time: analysis.processing_time_ms,
    }
}

pub fn to_statistics(
    analysis: &CompatibilityAnalysis,
    stats: &AnalysisStatisticsInput,
) -> AnalysisWithStatistics {
    AnalysisWithStatistics {
        analysis: to_public(analysis),
        statistics: stats.clone(),
    }
}

pub fn to_export(analysis: &CompatibilityAnalysis) -> AnalysisExport {
    AnalysisExport {
        id: analysis.analysis_id,
        user_id: analysis.user_id,
        resume_id: analysis.resume_id,
        job_id: analysis.job_id,
        match_score: analysis.match_score,
        status: analysis.status,
        analysis_type: analysis.analysis_type.clone(),
        processing_time_ms: analysis.processing_time_ms,
        created_at: analysis.created_at.to_rfc3339(),
        completed_at: analysis.completed_at.map(|t| t.to_rfc3339()),
    }
}

pub fn to_minimal(analysis: &CompatibilityAnalysis) -> AnalysisMinimal {
    AnalysisMinimal {
        analysis_id: analysis.analysis_id,
        match_score: analysis.match_score,
        status: analysis.status,
    }
}

pub fn to_search_result(analysis: &CompatibilityAnalysis) -> SearchResult {
    SearchResult {
        id: analysis.analysis_id,
        kind: "analysis",
        title: format!("Analysis {}", analysis.analysis_type),
        description: format!("Score: {}%", analysis.match_score),
        score: analysis.match_score,
        created_at: analysis.created_at,
        highlight: Some(format!("Compatibility: {}%", analysis.match_score)),
    }
}

/// Status counts and mean score over a batch, in one pass
pub fn to_bulk_result(analyses: &[CompatibilityAnalysis]) -> AnalysisBulkResult {
    let mut completed = 0;
    let mut pending = 0;
    let mut failed = 0;
    let mut score_sum = 0.0;
    let mut items = Vec::with_capacity(analyses.len());

    for analysis in analyses {
        match analysis.status {
            AnalysisStatus::Completed => completed += 1,
            AnalysisStatus::Pending => pending += 1,
            AnalysisStatus::Failed => failed += 1,
            AnalysisStatus::Processing => {}
        }
        score_sum += analysis.match_score;
        items.push(to_list_item(analysis));
    }

    let average_score = if analyses.is_empty() {
        0.0
    } else {
        score_sum / analyses.len() as f64
    };

    AnalysisBulkResult {
        total_analyses: analyses.len(),
        completed_analyses: completed,
        pending_analyses: pending,
        failed_analyses: failed,
        average_score,
        analyses: items,
    }
}
