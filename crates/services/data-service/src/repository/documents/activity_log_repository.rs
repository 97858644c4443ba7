//! Append-only activity log (`activity_logs`).

use async_trait::async_trait;
use chrono::{DateTime as ChronoDateTime, Duration, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, doc, DateTime};
use mongodb::Collection;
use serde::Deserialize;

use common::{AppResult, ResultExt};

use super::find_recent;
use crate::documents::{
    to_bson_datetime, ActionActivity, ActivityEntry, ActivityStatistics, DailyActivity,
    ACTIVITY_LOGS_COLLECTION,
};
use crate::infra::MongoStore;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Activity log access. Entries are never updated or deleted.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    /// Append an entry stamped with the current time; returns the inserted id
    async fn log_activity(&self, entry: ActivityEntry) -> AppResult<String>;

    /// Newest first
    async fn get_user_activities(&self, user_id: &str, limit: i64) -> Vec<ActivityEntry>;

    /// Per-action totals and daily counts over the last `days` days
    async fn get_activity_statistics(&self, user_id: &str, days: i64) -> ActivityStatistics;
}

pub struct ActivityLogStore {
    collection: Collection<ActivityEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActionGroup {
    #[serde(rename = "_id")]
    action: String,
    total_count: i64,
    daily_activity: Vec<DailyActivity>,
}

/// UTC midnight of today, `days` days back. Clamps to the earliest
/// representable instant when the window reaches past it.
fn window_start(now: ChronoDateTime<Utc>, days: i64) -> ChronoDateTime<Utc> {
    let midnight = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|t| t.and_utc())
        .unwrap_or(now);
    Duration::try_days(days)
        .and_then(|window| midnight.checked_sub_signed(window))
        .unwrap_or(ChronoDateTime::<Utc>::MIN_UTC)
}

impl ActivityLogStore {
    pub fn new(store: &MongoStore) -> Self {
        Self {
            collection: store.collection(ACTIVITY_LOGS_COLLECTION),
        }
    }

    async fn statistics(&self, user_id: &str, days: i64) -> AppResult<ActivityStatistics> {
        let since = to_bson_datetime(window_start(Utc::now(), days));
        let pipeline = vec![
            doc! { "$match": { "userId": user_id, "timestamp": { "$gte": since } } },
            doc! { "$group": {
                "_id": {
                    "action": "$action",
                    "date": { "$dateToString": { "format": "%Y-%m-%d", "date": "$timestamp" } },
                },
                "count": { "$sum": 1 },
            } },
            doc! { "$group": {
                "_id": "$_id.action",
                "totalCount": { "$sum": "$count" },
                "dailyActivity": { "$push": { "date": "$_id.date", "count": "$count" } },
            } },
        ];

        let groups: Vec<bson::Document> = self
            .collection
            .aggregate(pipeline)
            .await?
            .try_collect()
            .await?;

        let mut statistics = ActivityStatistics::new();
        for group in groups {
            let group: ActionGroup = bson::from_document(group)?;
            statistics.insert(
                group.action,
                ActionActivity {
                    total_count: group.total_count,
                    daily_activity: group.daily_activity,
                },
            );
        }

        Ok(statistics)
    }
}

#[async_trait]
impl ActivityLogRepository for ActivityLogStore {
    async fn log_activity(&self, mut entry: ActivityEntry) -> AppResult<String> {
        entry.id = None;
        entry.timestamp = DateTime::now();

        let result = self
            .collection
            .insert_one(&entry)
            .await
            .log_failure("log_activity")?;

        Ok(match result.inserted_id.as_object_id() {
            Some(oid) => oid.to_hex(),
            None => result.inserted_id.to_string(),
        })
    }

    async fn get_user_activities(&self, user_id: &str, limit: i64) -> Vec<ActivityEntry> {
        find_recent(&self.collection, doc! { "userId": user_id }, "timestamp", limit)
            .await
            .or_default_logged("get_user_activities")
    }

    async fn get_activity_statistics(&self, user_id: &str, days: i64) -> ActivityStatistics {
        self.statistics(user_id, days)
            .await
            .or_default_logged("get_activity_statistics")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_starts_at_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 17, 42, 10).unwrap();
        let start = window_start(now, 30);

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 4, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_window_zero_days_is_today() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 1).unwrap();
        assert_eq!(window_start(now, 0), Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_window_clamps_when_out_of_range() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();

        assert_eq!(window_start(now, 1_000_000_000), ChronoDateTime::<Utc>::MIN_UTC);
        assert_eq!(window_start(now, i64::MAX), ChronoDateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_action_group_from_pipeline_output() {
        let group = doc! {
            "_id": "login",
            "totalCount": 3,
            "dailyActivity": [
                { "date": "2024-03-01", "count": 2 },
                { "date": "2024-03-02", "count": 1 },
            ],
        };
        let parsed: ActionGroup = bson::from_document(group).unwrap();

        assert_eq!(parsed.action, "login");
        assert_eq!(parsed.total_count, 3);
        assert_eq!(parsed.daily_activity[0].date, "2024-03-01");
    }
}
