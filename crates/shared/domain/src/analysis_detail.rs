//! Value types describing the AI output of a compatibility analysis.
//!
//! These are stored verbatim inside the detailed-analysis documents, so
//! they serialize with camelCase keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Skill found in a resume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillExtraction {
    pub name: String,
    pub confidence: f64,
    pub matched: bool,
    pub category: String,
}

/// Professional experience entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceItem {
    pub company: String,
    pub position: String,
    pub duration: String,
    pub description: String,
    pub relevance_score: f64,
}

/// Education entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationItem {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub year: String,
}

/// What the job description asks for
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobAnalysis {
    pub key_requirements: Vec<String>,
    pub required_skills: Vec<String>,
    pub experience_level: String,
    pub education: String,
    pub benefits: Vec<String>,
    pub company_info: BTreeMap<String, String>,
}

/// What the resume offers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeAnalysis {
    pub extracted_skills: Vec<SkillExtraction>,
    pub experience: Vec<ExperienceItem>,
    pub education: Vec<EducationItem>,
    pub languages: Vec<String>,
    pub certifications: Vec<String>,
}

/// Score per matching dimension (0-100)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub cultural: f64,
}

/// Area the candidate should work on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementArea {
    pub area: String,
    pub priority: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Final compatibility verdict
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompatibilityReport {
    pub overall_score: f64,
    pub category_scores: CategoryScores,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub improvement_areas: Vec<ImprovementArea>,
}

/// Full AI output for one analysis, without storage metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDetail {
    pub job_analysis: Option<JobAnalysis>,
    pub resume_analysis: Option<ResumeAnalysis>,
    pub compatibility_report: Option<CompatibilityReport>,
    pub ai_model: Option<String>,
}

impl AnalysisDetail {
    /// Overall score reported by the compatibility report, if any
    pub fn overall_score(&self) -> Option<f64> {
        self.compatibility_report.as_ref().map(|r| r.overall_score)
    }
}
