use mongodb::bson::{oid::ObjectId, DateTime, Document};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverLetterContent {
    pub subject: String,
    pub greeting: String,
    pub introduction: String,
    pub body: Vec<String>,
    pub conclusion: String,
    pub signature: String,
    pub full_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverLetterCustomization {
    /// formal, casual or enthusiastic
    pub tone: String,
    /// short, medium or long
    pub length: String,
    pub focus_areas: Vec<String>,
    pub company_research: Document,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditHistoryItem {
    pub version: i32,
    pub changes: String,
    pub edited_by: String,
    pub edited_at: DateTime,
}

/// Generated cover letter, stored in `cover_letters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub cover_letter_id: String,
    pub user_id: String,
    pub resume_id: String,
    pub job_id: Option<String>,
    pub content: CoverLetterContent,
    #[serde(default)]
    pub customizations: CoverLetterCustomization,
    #[serde(default)]
    pub edit_history: Vec<EditHistoryItem>,
    /// ai or manual
    pub generated_by: String,
    pub ai_model: Option<String>,
    pub language: String,
    pub word_count: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Partial update of a cover letter.
///
/// `edited_by` is not stored on the letter itself; it only labels the
/// history entry pushed when the content or customizations change.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<CoverLetterContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customizations: Option<CoverLetterCustomization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<i32>,
    #[serde(skip)]
    pub edited_by: Option<String>,
}

impl CoverLetterUpdate {
    /// Whether this update must be recorded in the edit history
    pub fn touches_content(&self) -> bool {
        self.content.is_some() || self.customizations.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc};

    #[test]
    fn test_touches_content() {
        let language_only = CoverLetterUpdate {
            language: Some("English".to_string()),
            ..Default::default()
        };
        assert!(!language_only.touches_content());

        let content = CoverLetterUpdate {
            content: Some(CoverLetterContent::default()),
            ..Default::default()
        };
        assert!(content.touches_content());
    }

    #[test]
    fn test_edited_by_not_serialized() {
        let update = CoverLetterUpdate {
            word_count: Some(320),
            edited_by: Some("admin".to_string()),
            ..Default::default()
        };

        assert_eq!(bson::to_document(&update).unwrap(), doc! { "wordCount": 320 });
    }

    #[test]
    fn test_missing_history_defaults_empty() {
        let stored = doc! {
            "coverLetterId": "cl-1",
            "userId": "u-1",
            "resumeId": "r-1",
            "jobId": bson::Bson::Null,
            "content": { "subject": "Application" },
            "generatedBy": "ai",
            "aiModel": "gpt-4",
            "language": "English",
            "wordCount": 280,
            "createdAt": DateTime::now(),
            "updatedAt": DateTime::now(),
        };
        let letter: CoverLetterDocument = bson::from_document(stored).unwrap();

        assert!(letter.edit_history.is_empty());
        assert_eq!(letter.content.subject, "Application");
        assert!(letter.id.is_none());
    }
}
