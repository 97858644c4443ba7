//! Cover letter documents (`cover_letters`).

use async_trait::async_trait;
use mongodb::bson::{self, doc, DateTime, Document};
use mongodb::Collection;

use common::{AppResult, ResultExt};

use super::find_recent;
use crate::documents::{CoverLetterDocument, CoverLetterUpdate, COVER_LETTERS_COLLECTION};
use crate::infra::MongoStore;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const DEFAULT_EDITOR: &str = "user";
const CONTENT_CHANGE: &str = "Content updated";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CoverLetterRepository: Send + Sync {
    /// Store a cover letter and return its `coverLetterId`
    async fn create_cover_letter(&self, cover_letter: CoverLetterDocument) -> AppResult<String>;

    async fn get_cover_letter(&self, cover_letter_id: &str) -> Option<CoverLetterDocument>;

    /// Newest first
    async fn get_user_cover_letters(&self, user_id: &str, limit: i64) -> Vec<CoverLetterDocument>;

    /// Content or customization changes are recorded in the edit history first
    async fn update_cover_letter(&self, cover_letter_id: &str, update: CoverLetterUpdate) -> bool;

    async fn delete_cover_letter(&self, cover_letter_id: &str) -> bool;
}

pub struct CoverLetterStore {
    collection: Collection<CoverLetterDocument>,
}

impl CoverLetterStore {
    pub fn new(store: &MongoStore) -> Self {
        Self {
            collection: store.collection(COVER_LETTERS_COLLECTION),
        }
    }

    async fn apply_update(&self, cover_letter_id: &str, update: CoverLetterUpdate) -> AppResult<bool> {
        let filter = doc! { "coverLetterId": cover_letter_id };
        let now = DateTime::now();

        if update.touches_content() {
            let editor = update.edited_by.as_deref().unwrap_or(DEFAULT_EDITOR);
            self.collection
                .update_one(filter.clone(), history_push(editor, now))
                .await?;
        }

        let mut set = bson::to_document(&update)?;
        set.insert("updatedAt", now);

        let result = self.collection.update_one(filter, doc! { "$set": set }).await?;
        Ok(result.modified_count > 0)
    }
}

/// Pipeline update appending one history entry whose version is the
/// current history length + 1, computed server-side.
fn history_push(edited_by: &str, edited_at: DateTime) -> Vec<Document> {
    let history = doc! { "$ifNull": ["$editHistory", []] };

    vec![doc! {
        "$set": {
            "editHistory": {
                "$concatArrays": [
                    history.clone(),
                    [{
                        "version": { "$add": [{ "$size": history }, 1] },
                        "changes": { "$literal": CONTENT_CHANGE },
                        "editedBy": { "$literal": edited_by },
                        "editedAt": edited_at,
                    }],
                ],
            },
        },
    }]
}

#[async_trait]
impl CoverLetterRepository for CoverLetterStore {
    async fn create_cover_letter(&self, mut cover_letter: CoverLetterDocument) -> AppResult<String> {
        let now = DateTime::now();
        cover_letter.id = None;
        cover_letter.created_at = now;
        cover_letter.updated_at = now;

        self.collection
            .insert_one(&cover_letter)
            .await
            .log_failure("create_cover_letter")?;

        Ok(cover_letter.cover_letter_id)
    }

    async fn get_cover_letter(&self, cover_letter_id: &str) -> Option<CoverLetterDocument> {
        self.collection
            .find_one(doc! { "coverLetterId": cover_letter_id })
            .await
            .or_default_logged("get_cover_letter")
    }

    async fn get_user_cover_letters(&self, user_id: &str, limit: i64) -> Vec<CoverLetterDocument> {
        find_recent(&self.collection, doc! { "userId": user_id }, "createdAt", limit)
            .await
            .or_default_logged("get_user_cover_letters")
    }

    async fn update_cover_letter(&self, cover_letter_id: &str, update: CoverLetterUpdate) -> bool {
        self.apply_update(cover_letter_id, update)
            .await
            .or_default_logged("update_cover_letter")
    }

    async fn delete_cover_letter(&self, cover_letter_id: &str) -> bool {
        self.collection
            .delete_one(doc! { "coverLetterId": cover_letter_id })
            .await
            .map(|result| result.deleted_count > 0)
            .or_default_logged("delete_cover_letter")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_push_versions_from_length() {
        let now = DateTime::now();
        let pipeline = history_push("admin", now);
        assert_eq!(pipeline.len(), 1);

        let set = pipeline[0].get_document("$set").unwrap();
        let concat = set
            .get_document("editHistory")
            .unwrap()
            .get_array("$concatArrays")
            .unwrap();
        let entry = concat[1].as_array().unwrap()[0].as_document().unwrap();

        assert_eq!(
            entry.get_document("version").unwrap(),
            &doc! { "$add": [{ "$size": { "$ifNull": ["$editHistory", []] } }, 1] }
        );
        assert_eq!(
            entry.get_document("editedBy").unwrap(),
            &doc! { "$literal": "admin" }
        );
        assert_eq!(entry.get_datetime("editedAt").unwrap(), &now);
    }
}
