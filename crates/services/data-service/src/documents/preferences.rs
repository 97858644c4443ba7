use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use serde::{Deserialize, Serialize};

/// Per-user settings, one document per user in `user_preferences`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferencesDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    #[serde(default)]
    pub resume_preferences: Document,
    #[serde(default)]
    pub analysis_preferences: Document,
    #[serde(default)]
    pub notification_preferences: Document,
    #[serde(default)]
    pub privacy_settings: Document,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl UserPreferencesDocument {
    /// Preference set given to a freshly registered user
    pub fn defaults_for(user_id: impl Into<String>) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            user_id: user_id.into(),
            resume_preferences: doc! {
                "defaultFont": "Inter",
                "dateFormat": "MM/YYYY",
                "sectionOrder": ["experience", "education", "skills", "certifications"],
                "defaultLanguage": "English",
                "colorScheme": "professional",
                "template": "modern",
            },
            analysis_preferences: doc! {
                "autoAnalyze": true,
                "detailLevel": "comprehensive",
                "includeSkillSuggestions": true,
                "includeSalaryInsights": true,
                "preferredIndustries": [],
            },
            notification_preferences: doc! {
                "email": {
                    "analysisComplete": true,
                    "newJobMatches": true,
                    "weeklyDigest": false,
                    "marketingEmails": false,
                },
                "push": {
                    "analysisComplete": true,
                    "newJobMatches": false,
                    "reminders": true,
                },
            },
            privacy_settings: doc! {
                "profileVisibility": "private",
                "shareAnalytics": false,
                "allowDataExport": true,
                "retentionPeriod": 365,
            },
            created_at: now,
            updated_at: now,
        }
    }
}

/// Sections to replace; absent sections are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_preferences: Option<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_preferences: Option<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_preferences: Option<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_settings: Option<Document>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_private() {
        let prefs = UserPreferencesDocument::defaults_for("user-1");

        assert_eq!(prefs.user_id, "user-1");
        assert_eq!(
            prefs.privacy_settings.get_str("profileVisibility").unwrap(),
            "private"
        );
        assert!(!prefs.privacy_settings.get_bool("shareAnalytics").unwrap());
        assert!(prefs.analysis_preferences.get_bool("autoAnalyze").unwrap());
    }
}
