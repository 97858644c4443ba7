use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use serde::{Deserialize, Serialize};

use domain::{FEEDBACK_STATUS_NEW, FEEDBACK_STATUS_RESOLVED};

/// User feedback in `user_feedback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Assigned by the store when left empty
    #[serde(default)]
    pub feedback_id: String,
    pub user_id: String,
    /// analysis_feedback, feature_request, bug_report or general
    #[serde(rename = "type")]
    pub feedback_type: String,
    pub title: String,
    pub description: String,
    pub rating: Option<i32>,
    pub category: Option<String>,
    #[serde(default)]
    pub context: Document,
    pub status: String,
    pub resolution: Option<String>,
    pub resolved_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl FeedbackDocument {
    pub fn new(
        user_id: impl Into<String>,
        feedback_type: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            feedback_id: String::new(),
            user_id: user_id.into(),
            feedback_type: feedback_type.into(),
            title: title.into(),
            description: description.into(),
            rating: None,
            category: None,
            context: Document::new(),
            status: FEEDBACK_STATUS_NEW.to_string(),
            resolution: None,
            resolved_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// `$set` body for a status change; `resolvedAt` only when resolving.
pub(crate) fn status_update(status: &str, resolution: Option<&str>, now: DateTime) -> Document {
    let mut set = doc! {
        "status": status,
        "updatedAt": now,
    };
    if let Some(resolution) = resolution {
        set.insert("resolution", resolution);
    }
    if status == FEEDBACK_STATUS_RESOLVED {
        set.insert("resolvedAt", now);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_sets_resolved_at() {
        let now = DateTime::now();
        let set = status_update("resolved", Some("Fixed in 2.3"), now);

        assert_eq!(set.get_datetime("resolvedAt").unwrap(), &now);
        assert_eq!(set.get_str("resolution").unwrap(), "Fixed in 2.3");
    }

    #[test]
    fn test_other_status_leaves_resolved_at() {
        let set = status_update("in_review", None, DateTime::now());

        assert!(!set.contains_key("resolvedAt"));
        assert!(!set.contains_key("resolution"));
        assert_eq!(set.get_str("status").unwrap(), "in_review");
    }

    #[test]
    fn test_new_feedback_starts_new() {
        let feedback = FeedbackDocument::new("u-1", "bug_report", "Crash", "Upload fails on large PDFs");
        assert_eq!(feedback.status, "new");
        assert!(feedback.feedback_id.is_empty());
    }
}
