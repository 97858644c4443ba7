//! Resume domain entity.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    DEFAULT_RESUME_VERSION, RESUME_STATUS_ACTIVE, RESUME_STATUS_ARCHIVED, RESUME_STATUS_DRAFT,
};
use crate::error::DomainError;

/// Lifecycle status of a resume
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

impl ResumeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResumeStatus::Draft => RESUME_STATUS_DRAFT,
            ResumeStatus::Active => RESUME_STATUS_ACTIVE,
            ResumeStatus::Archived => RESUME_STATUS_ARCHIVED,
        }
    }
}

impl FromStr for ResumeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            RESUME_STATUS_DRAFT => Ok(ResumeStatus::Draft),
            RESUME_STATUS_ACTIVE => Ok(ResumeStatus::Active),
            RESUME_STATUS_ARCHIVED => Ok(ResumeStatus::Archived),
            other => Err(DomainError::unknown("resume status", other)),
        }
    }
}

impl std::fmt::Display for ResumeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resume domain entity.
///
/// `analysis_count` and `average_match_score` form a running aggregate that
/// the relational store recomputes on every completed analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub resume_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub version: String,
    pub status: ResumeStatus,
    pub data_lake_file_id: Option<Uuid>,
    pub original_filename: Option<String>,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_analyzed_at: Option<DateTime<Utc>>,
    pub analysis_count: i32,
    pub average_match_score: f64,
}

/// Resume creation data
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewResume {
    pub user_id: Uuid,
    pub title: String,
    pub version: String,
    pub status: ResumeStatus,
    pub data_lake_file_id: Option<Uuid>,
    pub original_filename: Option<String>,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
}

impl NewResume {
    /// Draft resume with the default version label and no file attached
    pub fn draft(user_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            version: DEFAULT_RESUME_VERSION.to_string(),
            status: ResumeStatus::Draft,
            data_lake_file_id: None,
            original_filename: None,
            file_size: None,
            file_type: None,
        }
    }
}
