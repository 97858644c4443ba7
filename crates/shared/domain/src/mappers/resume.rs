//! Resume response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SearchResult;
use crate::resume::{Resume, ResumeStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeResponse {
    pub resume_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub version: String,
    pub status: ResumeStatus,
    pub original_filename: Option<String>,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_analyzed_at: Option<DateTime<Utc>>,
    pub analysis_count: i32,
    pub average_match_score: f64,
    /// Filled in by whoever can sign storage URLs
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeDisplay {
    pub id: Uuid,
    pub title: String,
    pub version: String,
    pub status: ResumeStatus,
    pub analysis_count: i32,
    pub average_score: f64,
    pub created_at: DateTime<Utc>,
    pub last_analyzed: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeListItem {
    pub resume_id: Uuid,
    pub title: String,
    pub version: String,
    pub status: ResumeStatus,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub analysis_count: i32,
    pub average_match_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_analyzed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeUploadResponse {
    pub resume_id: Uuid,
    pub title: String,
    pub status: ResumeStatus,
    pub upload_url: Option<String>,
    pub processing_status: &'static str,
}

/// Resume fields fed to the analysis pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeAnalysisInput {
    pub resume_id: Uuid,
    pub title: String,
    pub version: String,
    pub file_type: Option<String>,
    pub analysis_count: i32,
    pub average_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeStatistics {
    pub total_analyses: i64,
    pub best_match_score: f64,
    pub worst_match_score: f64,
    pub last_analysis_date: Option<DateTime<Utc>>,
    pub improvement_suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeWithStatistics {
    pub resume: ResumeResponse,
    pub statistics: ResumeStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeExport {
    pub id: Uuid,
    pub title: String,
    pub version: String,
    pub status: ResumeStatus,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub analysis_count: i32,
    pub average_match_score: f64,
    pub created_at: String,
    pub updated_at: String,
    pub last_analyzed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeMinimal {
    pub resume_id: Uuid,
    pub title: String,
    pub status: ResumeStatus,
}

pub fn to_public(resume: &Resume) -> ResumeResponse {
    ResumeResponse {
        resume_id: resume.resume_id,
        user_id: resume.user_id,
        title: resume.title.clone(),
        version: resume.version.clone(),
        status: resume.status,
        original_filename: resume.original_filename.clone(),
        file_size: resume.file_size,
        file_type: resume.file_type.clone(),
        created_at: resume.created_at,
        updated_at: resume.updated_at,
        last_analyzed_at: resume.last_analyzed_at,
        analysis_count: resume.analysis_count,
        average_match_score: resume.average_match_score,
        download_url: None,
    }
}

pub fn to_display(resume: &Resume) -> ResumeDisplay {
    ResumeDisplay {
        id: resume.resume_id,
        title: resume.title.clone(),
        version: resume.version.clone(),
        status: resume.status,
        analysis_count: resume.analysis_count,
        average_score: resume.average_match_score,
        created_at: resume.created_at,
        last_analyzed: resume.last_analyzed_at,
    }
}

pub fn to_list_item(resume: &Resume) -> ResumeListItem {
    ResumeListItem {
        resume_id: resume.resume_id,
        title: resume.title.clone(),
        version: resume.version.clone(),
        status: resume.status,
        file_type: resume.file_type.clone(),
        file_size: resume.file_size,
        analysis_count: resume.analysis_count,
        average_match_score: resume.average_match_score,
        created_at: resume.created_at,
        updated_at: resume.updated_at,
        last_analyzed_at: resume.last_analyzed_at,
    }
}

/// A resume counts as uploaded once it has an original filename
pub fn to_upload_response(resume: &Resume, upload_url: Option<String>) -> ResumeUploadResponse {
    let processing_status = if resume.original_filename.is_some() {
        "uploaded"
    } else {
        "pending"
    };

    ResumeUploadResponse {
        resume_id: resume.resume_id,
        title: resume.title.clone(),
        status: resume.status,
        upload_url,
        processing_status,
    }
}

pub fn to_analysis_input(resume: &Resume) -> ResumeAnalysisInput {
    ResumeAnalysisInput {
        resume_id: resume.resume_id,
        title: resume.title.clone(),
        version: resume.version.clone(),
        file_type: resume.file_type.clone(),
        analysis_count: resume.analysis_count,
        average_score: resume.average_match_score,
    }
}

pub fn to_statistics(resume: &Resume, stats: &ResumeStatistics) -> ResumeWithStatistics {
    ResumeWithStatistics {
        resume: to_public(resume),
        statistics: stats.clone(),
    }
}

pub fn to_export(resume: &Resume) -> ResumeExport {
    ResumeExport {
        id: resume.resume_id,
        title: resume.title.clone(),
        version: resume.version.clone(),
        status: resume.status,
        file_type: resume.file_type.clone(),
        file_size: resume.file_size,
        analysis_count: resume.analysis_count,
        average_match_score: resume.average_match_score,
        created_at: resume.created_at.to_rfc3339(),
        updated_at: resume.updated_at.to_rfc3339(),
        last_analyzed_at: resume.last_analyzed_at.map(|t| t.to_rfc3339()),
    }
}

pub fn to_minimal(resume: &Resume) -> ResumeMinimal {
    ResumeMinimal {
        resume_id: resume.resume_id,
        title: resume.title.clone(),
        status: resume.status,
    }
}

/// Search entry scored by `score`, or by the running average when none is given
pub fn to_search_result(resume: &Resume, score: Option<f64>) -> SearchResult {
    SearchResult {
        id: resume.resume_id,
        kind: "resume",
        title: resume.title.clone(),
        description: format!("Resume {}", resume.version),
        score: score.unwrap_or(resume.average_match_score),
        created_at: resume.created_at,
        highlight: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_resume() -> Resume {
        let created = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        Resume {
            resume_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Data Engineer".to_string(),
            version: "v2.1".to_string(),
            status: ResumeStatus::Active,
            data_lake_file_id: None,
            original_filename: None,
            file_size: Some(48_213),
            file_type: Some("pdf".to_string()),
            created_at: created,
            updated_at: created,
            last_analyzed_at: None,
            analysis_count: 4,
            average_match_score: 72.5,
        }
    }

    #[test]
    fn test_public_has_no_download_url() {
        let response = to_public(&sample_resume());
        assert!(response.download_url.is_none());
        assert_eq!(response.status, ResumeStatus::Active);
    }

    #[test]
    fn test_upload_status_follows_original_filename() {
        let mut resume = sample_resume();
        assert_eq!(to_upload_response(&resume, None).processing_status, "pending");

        resume.original_filename = Some("cv.pdf".to_string());
        let response = to_upload_response(&resume, Some("https://blob/upload".to_string()));
        assert_eq!(response.processing_status, "uploaded");
        assert_eq!(response.upload_url.as_deref(), Some("https://blob/upload"));
    }

    #[test]
    fn test_search_result_score_fallback() {
        let resume = sample_resume();

        let fallback = to_search_result(&resume, None);
        assert_eq!(fallback.score, 72.5);
        assert_eq!(fallback.description, "Resume v2.1");

        let explicit = to_search_result(&resume, Some(91.0));
        assert_eq!(explicit.score, 91.0);

        let json = serde_json::to_value(&explicit).unwrap();
        assert_eq!(json["type"], "resume");
    }

    #[test]
    fn test_statistics_defaults() {
        let stats: ResumeStatistics = serde_json::from_str("{}").unwrap();
        let shaped = to_statistics(&sample_resume(), &stats);

        assert_eq!(shaped.statistics.total_analyses, 0);
        assert_eq!(shaped.statistics.best_match_score, 0.0);
        assert!(shaped.statistics.improvement_suggestions.is_empty());
    }

    #[test]
    fn test_export_serializes_status_lowercase() {
        let export = to_export(&sample_resume());
        let json = serde_json::to_value(&export).unwrap();

        assert_eq!(json["status"], "active");
        assert_eq!(export.created_at, "2024-01-15T09:00:00+00:00");
        assert!(export.last_analyzed_at.is_none());
    }
}
