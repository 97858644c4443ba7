//! User domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{SUBSCRIPTION_FREE, SUBSCRIPTION_PRO};
use crate::error::DomainError;

/// Subscription tier enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionType {
    #[default]
    Free,
    Pro,
}

impl SubscriptionType {
    /// Stored representation of the tier
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionType::Free => SUBSCRIPTION_FREE,
            SubscriptionType::Pro => SUBSCRIPTION_PRO,
        }
    }

    /// Check if this tier is a paid one
    pub fn is_paid(&self) -> bool {
        matches!(self, SubscriptionType::Pro)
    }
}

impl FromStr for SubscriptionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SUBSCRIPTION_FREE => Ok(SubscriptionType::Free),
            SUBSCRIPTION_PRO => Ok(SubscriptionType::Pro),
            other => Err(DomainError::unknown("subscription type", other)),
        }
    }
}

impl std::fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub subscription_type: SubscriptionType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub email_verified: bool,
    pub two_factor_enabled: bool,
}

impl User {
    /// Check if the user has ever logged in
    pub fn has_logged_in(&self) -> bool {
        self.last_login_at.is_some()
    }
}

/// User creation data (password already hashed by the caller)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
}

/// Mutable user fields.
///
/// Only these columns may be changed through the repository; every `None`
/// leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub subscription_type: Option<SubscriptionType>,
}

impl UserUpdate {
    /// Check whether the update carries no change at all
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone.is_none()
            && self.avatar_url.is_none()
            && self.subscription_type.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_round_trip() {
        assert_eq!("pro".parse::<SubscriptionType>().unwrap(), SubscriptionType::Pro);
        assert_eq!(SubscriptionType::Free.to_string(), "free");
        assert!(SubscriptionType::Pro.is_paid());
    }

    #[test]
    fn test_unknown_subscription_rejected() {
        let err = "enterprise".parse::<SubscriptionType>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownVariant { .. }));
    }

    #[test]
    fn test_empty_update() {
        assert!(UserUpdate::default().is_empty());

        let update = UserUpdate {
            phone: Some("+55 11 99999-0000".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
