use chrono::{Duration, Utc};
use mongodb::bson::{oid::ObjectId, DateTime, Document};
use serde::{Deserialize, Serialize};

use common::{AppError, AppResult};

use super::to_bson_datetime;

/// Cached AI result in `ai_analysis_cache`, valid while `now < expires_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub cache_key: String,
    pub result: Document,
    pub created_at: DateTime,
    pub last_used_at: DateTime,
    pub expires_at: DateTime,
    pub hit_count: i64,
}

impl CacheEntry {
    /// Fresh entry expiring `ttl_hours` from now, with no hits.
    ///
    /// Fails when the expiry falls outside the representable date range.
    pub fn new(cache_key: impl Into<String>, result: Document, ttl_hours: i64) -> AppResult<Self> {
        let now = Utc::now();
        let expires_at = Duration::try_hours(ttl_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::validation(format!("cache TTL of {} hours is out of range", ttl_hours))
            })?;

        Ok(Self {
            id: None,
            cache_key: cache_key.into(),
            result,
            created_at: to_bson_datetime(now),
            last_used_at: to_bson_datetime(now),
            expires_at: to_bson_datetime(expires_at),
            hit_count: 0,
        })
    }

    pub fn is_valid_at(&self, at: DateTime) -> bool {
        at < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_ttl_window() {
        let entry = CacheEntry::new("resume:job", doc! { "score": 77 }, 24).unwrap();
        let created = entry.created_at.timestamp_millis();

        assert_eq!(entry.expires_at.timestamp_millis() - created, 24 * 3_600_000);
        assert_eq!(entry.hit_count, 0);
        assert!(entry.is_valid_at(entry.created_at));
        assert!(!entry.is_valid_at(entry.expires_at));
    }

    #[test]
    fn test_ttl_longer_than_a_day() {
        let entry = CacheEntry::new("k", Document::new(), 30).unwrap();
        let span = entry.expires_at.timestamp_millis() - entry.created_at.timestamp_millis();
        assert_eq!(span, 30 * 3_600_000);
    }

    #[test]
    fn test_negative_ttl_is_already_expired() {
        let entry = CacheEntry::new("k", Document::new(), -1).unwrap();
        assert!(!entry.is_valid_at(entry.created_at));
    }

    #[test]
    fn test_ttl_out_of_date_range_is_rejected() {
        for ttl_hours in [10_000_000_000, i64::MAX, i64::MIN] {
            let result = CacheEntry::new("k", Document::new(), ttl_hours);
            assert!(matches!(result, Err(AppError::Validation(_))), "ttl {}", ttl_hours);
        }
    }
}
