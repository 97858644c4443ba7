//! User preference documents (`user_preferences`).

use async_trait::async_trait;
use mongodb::bson::{self, doc, DateTime};
use mongodb::Collection;

use common::{AppResult, ResultExt};

use crate::documents::{PreferencesUpdate, UserPreferencesDocument, PREFERENCES_COLLECTION};
use crate::infra::MongoStore;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// One preference document per user, addressed by `userId`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    /// Store preferences and return the owning `userId`
    async fn create_user_preferences(&self, preferences: UserPreferencesDocument) -> AppResult<String>;

    async fn get_user_preferences(&self, user_id: &str) -> Option<UserPreferencesDocument>;

    /// Upsert; true when a document was modified or inserted
    async fn update_user_preferences(&self, user_id: &str, update: PreferencesUpdate) -> bool;

    async fn delete_user_preferences(&self, user_id: &str) -> bool;
}

pub struct PreferencesStore {
    collection: Collection<UserPreferencesDocument>,
}

impl PreferencesStore {
    pub fn new(store: &MongoStore) -> Self {
        Self {
            collection: store.collection(PREFERENCES_COLLECTION),
        }
    }

    async fn upsert(&self, user_id: &str, update: PreferencesUpdate) -> AppResult<bool> {
        let now = DateTime::now();
        let mut set = bson::to_document(&update)?;
        set.insert("updatedAt", now);

        let result = self
            .collection
            .update_one(
                doc! { "userId": user_id },
                doc! { "$set": set, "$setOnInsert": { "createdAt": now } },
            )
            .upsert(true)
            .await?;

        Ok(result.modified_count > 0 || result.upserted_id.is_some())
    }
}

#[async_trait]
impl PreferencesRepository for PreferencesStore {
    async fn create_user_preferences(&self, mut preferences: UserPreferencesDocument) -> AppResult<String> {
        let now = DateTime::now();
        preferences.id = None;
        preferences.created_at = now;
        preferences.updated_at = now;

        self.collection
            .insert_one(&preferences)
            .await
            .log_failure("create_user_preferences")?;

        Ok(preferences.user_id)
    }

    async fn get_user_preferences(&self, user_id: &str) -> Option<UserPreferencesDocument> {
        self.collection
            .find_one(doc! { "userId": user_id })
            .await
            .or_default_logged("get_user_preferences")
    }

    async fn update_user_preferences(&self, user_id: &str, update: PreferencesUpdate) -> bool {
        self.upsert(user_id, update)
            .await
            .or_default_logged("update_user_preferences")
    }

    async fn delete_user_preferences(&self, user_id: &str) -> bool {
        self.collection
            .delete_one(doc! { "userId": user_id })
            .await
            .map(|result| result.deleted_count > 0)
            .or_default_logged("delete_user_preferences")
    }
}
