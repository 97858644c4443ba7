//! User feedback (`user_feedback`).

use async_trait::async_trait;
use mongodb::bson::{doc, DateTime};
use mongodb::Collection;
use uuid::Uuid;

use common::{AppResult, ResultExt};
use domain::FEEDBACK_STATUS_NEW;

use super::find_recent;
use crate::documents::{feedback_status_update, FeedbackDocument, FEEDBACK_COLLECTION};
use crate::infra::MongoStore;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Store feedback with status `new`; returns its `feedbackId`
    async fn create_feedback(&self, feedback: FeedbackDocument) -> AppResult<String>;

    async fn get_feedback(&self, feedback_id: &str) -> Option<FeedbackDocument>;

    /// Newest first
    async fn get_user_feedback(&self, user_id: &str, limit: i64) -> Vec<FeedbackDocument>;

    /// `resolvedAt` is stamped only when `status` is `resolved`
    async fn update_feedback_status(
        &self,
        feedback_id: &str,
        status: &str,
        resolution: Option<String>,
    ) -> bool;

    async fn delete_feedback(&self, feedback_id: &str) -> bool;
}

pub struct FeedbackStore {
    collection: Collection<FeedbackDocument>,
}

impl FeedbackStore {
    pub fn new(store: &MongoStore) -> Self {
        Self {
            collection: store.collection(FEEDBACK_COLLECTION),
        }
    }
}

#[async_trait]
impl FeedbackRepository for FeedbackStore {
    async fn create_feedback(&self, mut feedback: FeedbackDocument) -> AppResult<String> {
        let now = DateTime::now();
        if feedback.feedback_id.is_empty() {
            feedback.feedback_id = Uuid::new_v4().to_string();
        }
        feedback.id = None;
        feedback.status = FEEDBACK_STATUS_NEW.to_string();
        feedback.resolved_at = None;
        feedback.created_at = now;
        feedback.updated_at = now;

        self.collection
            .insert_one(&feedback)
            .await
            .log_failure("create_feedback")?;

        Ok(feedback.feedback_id)
    }

    async fn get_feedback(&self, feedback_id: &str) -> Option<FeedbackDocument> {
        self.collection
            .find_one(doc! { "feedbackId": feedback_id })
            .await
            .or_default_logged("get_feedback")
    }

    async fn get_user_feedback(&self, user_id: &str, limit: i64) -> Vec<FeedbackDocument> {
        find_recent(&self.collection, doc! { "userId": user_id }, "createdAt", limit)
            .await
            .or_default_logged("get_user_feedback")
    }

    async fn update_feedback_status(
        &self,
        feedback_id: &str,
        status: &str,
        resolution: Option<String>,
    ) -> bool {
        let set = feedback_status_update(status, resolution.as_deref(), DateTime::now());

        self.collection
            .update_one(doc! { "feedbackId": feedback_id }, doc! { "$set": set })
            .await
            .map(|result| result.modified_count > 0)
            .or_default_logged("update_feedback_status")
    }

    async fn delete_feedback(&self, feedback_id: &str) -> bool {
        self.collection
            .delete_one(doc! { "feedbackId": feedback_id })
            .await
            .map(|result| result.deleted_count > 0)
            .or_default_logged("delete_feedback")
    }
}
