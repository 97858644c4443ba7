//! Detailed analysis documents (`compatibility_analyses`).

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, DateTime};
use mongodb::Collection;

use common::{AppResult, ResultExt};

use super::find_recent;
use crate::documents::{
    AnalysisDocumentUpdate, AnalysisStatistics, DetailedAnalysisDocument, ANALYSES_COLLECTION,
};
use crate::infra::MongoStore;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Repository for the AI output of compatibility analyses.
///
/// Reads degrade to empty results and writes other than create degrade to
/// `false`; failures are logged either way.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AnalysisDocumentRepository: Send + Sync {
    /// Store a detailed analysis and return its `analysisId`
    async fn create_detailed_analysis(&self, analysis: DetailedAnalysisDocument) -> AppResult<String>;

    async fn get_detailed_analysis(&self, analysis_id: &str) -> Option<DetailedAnalysisDocument>;

    /// Newest first
    async fn get_user_analyses(&self, user_id: &str, limit: i64) -> Vec<DetailedAnalysisDocument>;

    async fn update_analysis(&self, analysis_id: &str, update: AnalysisDocumentUpdate) -> bool;

    async fn delete_analysis(&self, analysis_id: &str) -> bool;

    /// Count, mean, max and min score plus the score distribution
    async fn get_analysis_statistics(&self, user_id: &str) -> AnalysisStatistics;
}

pub struct AnalysisDocumentStore {
    collection: Collection<DetailedAnalysisDocument>,
}

impl AnalysisDocumentStore {
    pub fn new(store: &MongoStore) -> Self {
        Self {
            collection: store.collection(ANALYSES_COLLECTION),
        }
    }

    async fn apply_update(&self, analysis_id: &str, update: AnalysisDocumentUpdate) -> AppResult<bool> {
        let mut set = bson::to_document(&update)?;
        set.insert("updatedAt", DateTime::now());

        let result = self
            .collection
            .update_one(doc! { "analysisId": analysis_id }, doc! { "$set": set })
            .await?;

        Ok(result.modified_count > 0)
    }

    async fn statistics(&self, user_id: &str) -> AppResult<AnalysisStatistics> {
        let pipeline = vec![
            doc! { "$match": { "userId": user_id } },
            doc! { "$group": {
                "_id": null,
                "totalAnalyses": { "$sum": 1 },
                "averageScore": { "$avg": "$matchScore" },
                "maxScore": { "$max": "$matchScore" },
                "minScore": { "$min": "$matchScore" },
                "scoreDistribution": {
                    "$push": { "score": "$matchScore", "date": "$createdAt" }
                },
            } },
        ];

        let mut cursor = self.collection.aggregate(pipeline).await?;
        match cursor.try_next().await? {
            Some(group) => Ok(bson::from_document(group)?),
            None => Ok(AnalysisStatistics::default()),
        }
    }
}

#[async_trait]
impl AnalysisDocumentRepository for AnalysisDocumentStore {
    async fn create_detailed_analysis(&self, mut analysis: DetailedAnalysisDocument) -> AppResult<String> {
        let now = DateTime::now();
        analysis.id = None;
        analysis.created_at = now;
        analysis.updated_at = now;

        self.collection
            .insert_one(&analysis)
            .await
            .log_failure("create_detailed_analysis")?;

        Ok(analysis.analysis_id)
    }

    async fn get_detailed_analysis(&self, analysis_id: &str) -> Option<DetailedAnalysisDocument> {
        self.collection
            .find_one(doc! { "analysisId": analysis_id })
            .await
            .or_default_logged("get_detailed_analysis")
    }

    async fn get_user_analyses(&self, user_id: &str, limit: i64) -> Vec<DetailedAnalysisDocument> {
        find_recent(&self.collection, doc! { "userId": user_id }, "createdAt", limit)
            .await
            .or_default_logged("get_user_analyses")
    }

    async fn update_analysis(&self, analysis_id: &str, update: AnalysisDocumentUpdate) -> bool {
        self.apply_update(analysis_id, update)
            .await
            .or_default_logged("update_analysis")
    }

    async fn delete_analysis(&self, analysis_id: &str) -> bool {
        self.collection
            .delete_one(doc! { "analysisId": analysis_id })
            .await
            .map(|result| result.deleted_count > 0)
            .or_default_logged("delete_analysis")
    }

    async fn get_analysis_statistics(&self, user_id: &str) -> AnalysisStatistics {
        self.statistics(user_id)
            .await
            .or_default_logged("get_analysis_statistics")
    }
}
