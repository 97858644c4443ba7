//! MongoDB-backed repositories, one per collection.

mod activity_log_repository;
mod ai_cache_repository;
mod analysis_document_repository;
mod cover_letter_repository;
mod feedback_repository;
mod preferences_repository;

pub use activity_log_repository::{ActivityLogRepository, ActivityLogStore};
pub use ai_cache_repository::{AiCacheRepository, AiCacheStore};
pub use analysis_document_repository::{AnalysisDocumentRepository, AnalysisDocumentStore};
pub use cover_letter_repository::{CoverLetterRepository, CoverLetterStore};
pub use feedback_repository::{FeedbackRepository, FeedbackStore};
pub use preferences_repository::{PreferencesRepository, PreferencesStore};

#[cfg(any(test, feature = "test-utils"))]
pub use activity_log_repository::MockActivityLogRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use ai_cache_repository::MockAiCacheRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use analysis_document_repository::MockAnalysisDocumentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use cover_letter_repository::MockCoverLetterRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use feedback_repository::MockFeedbackRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use preferences_repository::MockPreferencesRepository;

use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::Collection;
use serde::de::DeserializeOwned;

use common::AppResult;

/// Newest-first page of documents matching `filter`
async fn find_recent<T>(
    collection: &Collection<T>,
    filter: Document,
    sort_field: &str,
    limit: i64,
) -> AppResult<Vec<T>>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    let cursor = collection
        .find(filter)
        .sort(doc! { sort_field: -1 })
        .limit(limit)
        .await?;

    Ok(cursor.try_collect().await?)
}
