//! User response shapes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::{SubscriptionType, User};

/// Profile returned to the owning user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfileResponse {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub subscription_type: SubscriptionType,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub email_verified: bool,
    pub two_factor_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDisplay {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subscription: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserListItem {
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub subscription_type: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserAdminView {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub subscription_type: String,
    pub is_active: bool,
    pub email_verified: bool,
    pub two_factor_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Export row; timestamps are RFC 3339 strings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserExport {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub subscription_type: String,
    pub is_active: bool,
    pub email_verified: bool,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

/// Auxiliary per-user statistics; every field is optional on input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStatistics {
    pub total_resumes: i64,
    pub total_analyses: i64,
    pub average_match_score: f64,
    pub last_activity: Option<DateTime<Utc>>,
    pub subscription_usage: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserWithStatistics {
    pub user: UserProfileResponse,
    pub statistics: UserStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserMinimal {
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserActivityLog {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub details: serde_json::Value,
}

pub fn to_public(user: &User) -> UserProfileResponse {
    UserProfileResponse {
        user_id: user.user_id,
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        phone: user.phone.clone(),
        avatar_url: user.avatar_url.clone(),
        subscription_type: user.subscription_type,
        created_at: user.created_at,
        last_login_at: user.last_login_at,
        email_verified: user.email_verified,
        two_factor_enabled: user.two_factor_enabled,
    }
}

pub fn to_display(user: &User) -> UserDisplay {
    UserDisplay {
        id: user.user_id,
        name: user.full_name.clone(),
        email: user.email.clone(),
        subscription: user.subscription_type.to_string(),
        is_active: user.is_active,
    }
}

pub fn to_list_item(user: &User) -> UserListItem {
    UserListItem {
        user_id: user.user_id,
        full_name: user.full_name.clone(),
        email: user.email.clone(),
        subscription_type: user.subscription_type.to_string(),
        is_active: user.is_active,
        created_at: user.created_at,
        last_login_at: user.last_login_at,
    }
}

pub fn to_admin_view(user: &User) -> UserAdminView {
    UserAdminView {
        user_id: user.user_id,
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        phone: user.phone.clone(),
        subscription_type: user.subscription_type.to_string(),
        is_active: user.is_active,
        email_verified: user.email_verified,
        two_factor_enabled: user.two_factor_enabled,
        created_at: user.created_at,
        updated_at: user.updated_at,
        last_login_at: user.last_login_at,
    }
}

pub fn to_export(user: &User) -> UserExport {
    UserExport {
        id: user.user_id,
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        phone: user.phone.clone(),
        subscription_type: user.subscription_type.to_string(),
        is_active: user.is_active,
        email_verified: user.email_verified,
        created_at: user.created_at.to_rfc3339(),
        last_login_at: user.last_login_at.map(|t| t.to_rfc3339()),
    }
}

pub fn to_statistics(user: &User, stats: &UserStatistics) -> UserWithStatistics {
    UserWithStatistics {
        user: to_public(user),
        statistics: stats.clone(),
    }
}

pub fn to_minimal(user: &User) -> UserMinimal {
    UserMinimal {
        user_id: user.user_id,
        full_name: user.full_name.clone(),
        email: user.email.clone(),
    }
}

/// Activity log entry attributed to `user`; missing details become `{}`
pub fn to_activity_log(
    user: &User,
    action: &str,
    details: Option<serde_json::Value>,
    at: DateTime<Utc>,
) -> UserActivityLog {
    UserActivityLog {
        user_id: user.user_id,
        user_name: user.full_name.clone(),
        user_email: user.email.clone(),
        action: action.to_string(),
        timestamp: at,
        details: details.unwrap_or_else(|| serde_json::json!({})),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_user() -> User {
        User {
            user_id: Uuid::new_v4(),
            email: "ana@example.com".to_string(),
            password_hash: "hashed".to_string(),
            full_name: "Ana Souza".to_string(),
            phone: None,
            avatar_url: None,
            subscription_type: SubscriptionType::Pro,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap(),
            last_login_at: None,
            is_active: true,
            email_verified: true,
            two_factor_enabled: false,
        }
    }

    #[test]
    fn test_public_profile_hides_password_hash() {
        let user = sample_user();
        let json = serde_json::to_value(to_public(&user)).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["subscription_type"], "pro");
        assert_eq!(json["email"], "ana@example.com");
    }

    #[test]
    fn test_export_formats_timestamps() {
        let export = to_export(&sample_user());

        assert_eq!(export.created_at, "2024-03-01T12:00:00+00:00");
        assert_eq!(export.last_login_at, None);
        assert_eq!(export.subscription_type, "pro");
    }

    #[test]
    fn test_statistics_default_missing_fields() {
        let stats: UserStatistics =
            serde_json::from_value(serde_json::json!({ "total_resumes": 3 })).unwrap();
        let shaped = to_statistics(&sample_user(), &stats);

        assert_eq!(shaped.statistics.total_resumes, 3);
        assert_eq!(shaped.statistics.total_analyses, 0);
        assert_eq!(shaped.statistics.average_match_score, 0.0);
        assert!(shaped.statistics.subscription_usage.is_empty());
    }

    #[test]
    fn test_activity_log_defaults_details() {
        let at = Utc.with_ymd_and_hms(2024, 5, 10, 8, 30, 0).unwrap();
        let log = to_activity_log(&sample_user(), "login", None, at);

        assert_eq!(log.action, "login");
        assert_eq!(log.timestamp, at);
        assert_eq!(log.details, serde_json::json!({}));
        assert_eq!(log.user_name, "Ana Souza");
    }

    #[test]
    fn test_minimal_and_display() {
        let user = sample_user();
        let minimal = to_minimal(&user);
        let display = to_display(&user);

        assert_eq!(minimal.user_id, user.user_id);
        assert_eq!(display.subscription, "pro");
        assert!(display.is_active);
    }
}
