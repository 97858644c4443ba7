use std::collections::BTreeMap;

use mongodb::bson::{oid::ObjectId, DateTime, Document};
use serde::{Deserialize, Serialize};

/// Append-only user activity record in `activity_logs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub action: String,
    pub resource: Option<String>,
    pub resource_id: Option<String>,
    #[serde(default)]
    pub details: Document,
    /// Overwritten by the store on insert
    pub timestamp: DateTime,
}

impl ActivityEntry {
    pub fn new(user_id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            action: action.into(),
            resource: None,
            resource_id: None,
            details: Document::new(),
            timestamp: DateTime::now(),
        }
    }

    pub fn on_resource(mut self, resource: impl Into<String>, resource_id: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn with_details(mut self, details: Document) -> Self {
        self.details = details;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyActivity {
    /// `YYYY-MM-DD`, UTC
    pub date: String,
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionActivity {
    pub total_count: i64,
    pub daily_activity: Vec<DailyActivity>,
}

/// Activity counts keyed by action
pub type ActivityStatistics = BTreeMap<String, ActionActivity>;

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc};

    #[test]
    fn test_builder() {
        let entry = ActivityEntry::new("user-1", "analysis_completed")
            .on_resource("analysis", "a-1")
            .with_details(doc! { "matchScore": 81.5 });

        assert_eq!(entry.resource.as_deref(), Some("analysis"));
        assert_eq!(entry.details.get_f64("matchScore").unwrap(), 81.5);

        let stored = bson::to_document(&entry).unwrap();
        assert_eq!(stored.get_str("resourceId").unwrap(), "a-1");
        assert!(!stored.contains_key("_id"));
    }
}
