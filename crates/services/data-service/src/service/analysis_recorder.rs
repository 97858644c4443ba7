//! Cross-store analysis workflows.
//!
//! The two stores share no transaction. Steps run in order and a failed step
//! never undoes the ones before it; the outcome says which steps landed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mongodb::bson::doc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{
    AnalysisDetail, AnalysisStatus, AnalysisSummary, CompatibilityAnalysis,
    ACTIVITY_ANALYSIS_COMPLETED, ACTIVITY_ANALYSIS_FAILED, RESOURCE_ANALYSIS,
};

use crate::documents::{ActivityEntry, AnalysisStatistics, DetailedAnalysisDocument};
use crate::repository::documents::{ActivityLogRepository, AnalysisDocumentRepository};
use crate::repository::relational::{AnalysisRepository, ResumeRepository};
use crate::service::DataAccess;

/// Which steps of [`AnalysisRecorder::record_completion`] took effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionOutcome {
    /// `analysisId` of the stored detail document
    pub document_id: String,
    pub match_score: f64,
    pub status_updated: bool,
    pub resume_updated: bool,
    pub activity_logged: bool,
}

impl CompletionOutcome {
    pub fn is_complete(&self) -> bool {
        self.status_updated && self.resume_updated && self.activity_logged
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedAnalysisStatistics {
    pub sql: AnalysisSummary,
    pub documents: AnalysisStatistics,
    pub generated_at: DateTime<Utc>,
}

pub struct AnalysisRecorder {
    documents: Arc<dyn AnalysisDocumentRepository>,
    analyses: Arc<dyn AnalysisRepository>,
    resumes: Arc<dyn ResumeRepository>,
    activity: Arc<dyn ActivityLogRepository>,
}

impl AnalysisRecorder {
    pub fn new(
        documents: Arc<dyn AnalysisDocumentRepository>,
        analyses: Arc<dyn AnalysisRepository>,
        resumes: Arc<dyn ResumeRepository>,
        activity: Arc<dyn ActivityLogRepository>,
    ) -> Self {
        Self {
            documents,
            analyses,
            resumes,
            activity,
        }
    }

    pub fn from_access(access: &DataAccess) -> Self {
        Self::new(
            access.analysis_documents(),
            access.analyses(),
            access.resumes(),
            access.activity(),
        )
    }

    /// Store the AI output, complete the relational row, fold the score into
    /// the resume average and log the activity.
    ///
    /// An analysis already completed is rejected before anything is written.
    /// The resume average only changes when this call completed the row, so
    /// a repeated call never counts the score twice. Past those checks only a
    /// failure to store the document is an error.
    pub async fn record_completion(
        &self,
        analysis: &CompatibilityAnalysis,
        detail: AnalysisDetail,
        processing_time_ms: i32,
    ) -> AppResult<CompletionOutcome> {
        if analysis.status.is_completed() {
            return Err(AppError::validation(format!(
                "analysis {} is already completed",
                analysis.analysis_id
            )));
        }

        let document = DetailedAnalysisDocument::for_analysis(
            analysis,
            detail,
            Some(i64::from(processing_time_ms)),
        );
        let match_score = document.match_score;

        let document_id = self.documents.create_detailed_analysis(document).await?;

        let status_updated = self
            .analyses
            .complete_analysis(
                analysis.analysis_id,
                match_score,
                processing_time_ms,
                document_id.clone(),
            )
            .await;

        let resume_updated = status_updated
            && self
                .resumes
                .update_resume_analysis_stats(analysis.resume_id, match_score)
                .await;

        let entry = ActivityEntry::new(analysis.user_id.to_string(), ACTIVITY_ANALYSIS_COMPLETED)
            .on_resource(RESOURCE_ANALYSIS, analysis.analysis_id.to_string())
            .with_details(doc! {
                "resumeId": analysis.resume_id.to_string(),
                "matchScore": match_score,
                "processingTimeMs": processing_time_ms,
            });
        let activity_logged = self.activity.log_activity(entry).await.is_ok();

        let outcome = CompletionOutcome {
            document_id,
            match_score,
            status_updated,
            resume_updated,
            activity_logged,
        };

        if outcome.is_complete() {
            info!(analysis_id = %analysis.analysis_id, match_score, "Analysis recorded");
        } else {
            warn!(
                analysis_id = %analysis.analysis_id,
                status_updated,
                resume_updated,
                activity_logged,
                "Analysis recorded partially"
            );
        }

        Ok(outcome)
    }

    /// Mark the analysis failed and log why. Returns whether the row changed.
    pub async fn mark_failed(&self, analysis_id: Uuid, user_id: Uuid, reason: &str) -> bool {
        let updated = self
            .analyses
            .update_analysis_status(analysis_id, AnalysisStatus::Failed, None)
            .await;

        let entry = ActivityEntry::new(user_id.to_string(), ACTIVITY_ANALYSIS_FAILED)
            .on_resource(RESOURCE_ANALYSIS, analysis_id.to_string())
            .with_details(doc! { "reason": reason });
        if self.activity.log_activity(entry).await.is_err() {
            warn!(%analysis_id, "Failure of analysis not logged as activity");
        }

        updated
    }

    /// Relational summary and document statistics, read concurrently.
    pub async fn statistics(&self, user_id: Uuid) -> CombinedAnalysisStatistics {
        let user_key = user_id.to_string();
        let (sql, documents) = tokio::join!(
            self.analyses.get_analysis_summary(user_id),
            self.documents.get_analysis_statistics(&user_key)
        );

        CombinedAnalysisStatistics {
            sql,
            documents,
            generated_at: Utc::now(),
        }
    }
}
