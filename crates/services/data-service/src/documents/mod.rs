//! Document-store records, one typed record per collection.
//!
//! Every record carries the native `_id` as an optional field and keeps its
//! timestamps as BSON dates. Lookups always go through the domain key
//! (`analysisId`, `coverLetterId`, ...), never through `_id`.

mod activity;
mod analysis;
mod cache;
mod cover_letter;
mod feedback;
mod preferences;

pub use activity::{ActionActivity, ActivityEntry, ActivityStatistics, DailyActivity};
pub use analysis::{AnalysisDocumentUpdate, AnalysisStatistics, DetailedAnalysisDocument, ScorePoint};
pub use cache::CacheEntry;
pub use cover_letter::{
    CoverLetterContent, CoverLetterCustomization, CoverLetterDocument, CoverLetterUpdate,
    EditHistoryItem,
};
pub use feedback::FeedbackDocument;
pub(crate) use feedback::status_update as feedback_status_update;
pub use preferences::{PreferencesUpdate, UserPreferencesDocument};

use chrono::{DateTime, Utc};
use mongodb::bson;

pub const ANALYSES_COLLECTION: &str = "compatibility_analyses";
pub const COVER_LETTERS_COLLECTION: &str = "cover_letters";
pub const PREFERENCES_COLLECTION: &str = "user_preferences";
pub const ACTIVITY_LOGS_COLLECTION: &str = "activity_logs";
pub const AI_CACHE_COLLECTION: &str = "ai_analysis_cache";
pub const FEEDBACK_COLLECTION: &str = "user_feedback";

/// Millisecond-precision conversion into a BSON date
pub fn to_bson_datetime(value: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(value.timestamp_millis())
}

pub fn to_chrono(value: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_datetime_conversion_keeps_millis() {
        let at = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap()
            + chrono::Duration::milliseconds(250);

        assert_eq!(to_chrono(to_bson_datetime(at)), at);
    }
}
