//! Live MongoDB tests.
//!
//! Ignored by default. Run with a disposable database:
//! `TEST_MONGO_URL=mongodb://localhost:27017 cargo test -p data-service -- --ignored`

use std::time::Duration;

use chrono::Utc;
use mongodb::bson::{doc, DateTime, Document};
use uuid::Uuid;

use common::{AppError, MongoConfig};
use data_service_lib::documents::{
    ActivityEntry, CoverLetterContent, CoverLetterDocument, CoverLetterUpdate,
    DetailedAnalysisDocument, FeedbackDocument, UserPreferencesDocument, AI_CACHE_COLLECTION,
};
use data_service_lib::infra::MongoStore;
use data_service_lib::repository::documents::{
    ActivityLogRepository, ActivityLogStore, AiCacheRepository, AiCacheStore,
    AnalysisDocumentRepository, AnalysisDocumentStore, CoverLetterRepository, CoverLetterStore,
    FeedbackRepository, FeedbackStore, PreferencesRepository, PreferencesStore,
};
use domain::{
    AnalysisDetail, AnalysisStatus, CompatibilityAnalysis, CompatibilityReport, JobAnalysis,
};

async fn store() -> MongoStore {
    let url = std::env::var("TEST_MONGO_URL").unwrap_or_else(|_| "mongodb://localhost:27017".into());
    let config = MongoConfig {
        url,
        database: format!("skillsync_test_{}", Uuid::new_v4().simple()),
        ..Default::default()
    };
    MongoStore::connect(&config).await.expect("mongo connection")
}

/// Creates are stamped with the current millisecond; keep consecutive ones apart.
async fn tick() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

fn analysis_row(user_id: Uuid) -> CompatibilityAnalysis {
    CompatibilityAnalysis {
        analysis_id: Uuid::new_v4(),
        user_id,
        resume_id: Uuid::new_v4(),
        job_id: Some(Uuid::new_v4()),
        match_score: 0.0,
        status: AnalysisStatus::Processing,
        analysis_type: "job_match".to_string(),
        processing_time_ms: None,
        created_at: Utc::now(),
        completed_at: None,
        mongo_analysis_id: None,
    }
}

fn cover_letter(user_id: &str) -> CoverLetterDocument {
    CoverLetterDocument {
        id: None,
        cover_letter_id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        resume_id: Uuid::new_v4().to_string(),
        job_id: None,
        content: CoverLetterContent {
            subject: "Backend Engineer application".to_string(),
            full_text: "Dear team".to_string(),
            ..Default::default()
        },
        customizations: Default::default(),
        edit_history: Vec::new(),
        generated_by: "ai".to_string(),
        ai_model: Some("gpt-4".to_string()),
        language: "English".to_string(),
        word_count: 2,
        created_at: DateTime::now(),
        updated_at: DateTime::now(),
    }
}

#[tokio::test]
#[ignore]
async fn test_feedback_resolution_stamps_resolved_at() {
    let repo = FeedbackStore::new(&store().await);

    let id = repo
        .create_feedback(FeedbackDocument::new("u-1", "bug", "Upload fails", "PDF over 5MB"))
        .await
        .unwrap();

    repo.update_feedback_status(&id, "in_progress", None).await;
    let pending = repo.get_feedback(&id).await.unwrap();
    assert_eq!(pending.status, "in_progress");
    assert!(pending.resolved_at.is_none());

    assert!(
        repo.update_feedback_status(&id, "resolved", Some("Raised the limit".to_string()))
            .await
    );
    let resolved = repo.get_feedback(&id).await.unwrap();
    assert!(resolved.resolved_at.is_some());
    assert_eq!(resolved.resolution.as_deref(), Some("Raised the limit"));
}

#[tokio::test]
#[ignore]
async fn test_cache_hits_are_counted_and_expired_entries_hidden() {
    let store = store().await;
    let repo = AiCacheStore::new(&store);

    repo.put_cached("fresh", doc! { "score": 80 }, 24).await.unwrap();
    repo.put_cached("stale", Document::new(), -1).await.unwrap();

    assert_eq!(repo.get_cached("fresh").await.unwrap().hit_count, 1);
    assert_eq!(repo.get_cached("fresh").await.unwrap().hit_count, 2);
    assert!(repo.get_cached("stale").await.is_none());
    assert!(repo.get_cached("missing").await.is_none());

    let raw = store
        .collection::<Document>(AI_CACHE_COLLECTION)
        .find_one(doc! { "cacheKey": "stale" })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(raw.get_i64("hitCount").unwrap(), 0);

    assert_eq!(repo.purge_expired().await, 1);
}

#[tokio::test]
#[ignore]
async fn test_cache_ttl_out_of_range_is_rejected() {
    let repo = AiCacheStore::new(&store().await);

    let result = repo.put_cached("far", Document::new(), i64::MAX).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(repo.get_cached("far").await.is_none());
}

#[tokio::test]
#[ignore]
async fn test_detailed_analysis_round_trip() {
    let repo = AnalysisDocumentStore::new(&store().await);
    let row = analysis_row(Uuid::new_v4());
    let detail = AnalysisDetail {
        job_analysis: Some(JobAnalysis {
            required_skills: vec!["Rust".to_string(), "SQL".to_string()],
            experience_level: "senior".to_string(),
            ..Default::default()
        }),
        compatibility_report: Some(CompatibilityReport {
            overall_score: 82.5,
            strengths: vec!["Systems work".to_string()],
            ..Default::default()
        }),
        ai_model: Some("gpt-4".to_string()),
        ..Default::default()
    };

    let id = repo
        .create_detailed_analysis(DetailedAnalysisDocument::for_analysis(
            &row,
            detail.clone(),
            Some(1800),
        ))
        .await
        .unwrap();
    assert_eq!(id, row.analysis_id.to_string());

    let stored = repo.get_detailed_analysis(&id).await.unwrap();
    assert_eq!(stored.user_id, row.user_id.to_string());
    assert_eq!(stored.job_id, row.job_id.map(|j| j.to_string()));
    assert_eq!(stored.match_score, 82.5);
    assert_eq!(stored.processing_time, Some(1800));
    assert_eq!(stored.detail(), detail);
}

#[tokio::test]
#[ignore]
async fn test_logged_activity_is_read_back() {
    let repo = ActivityLogStore::new(&store().await);
    let entry = ActivityEntry::new("u-4", "resume_uploaded")
        .on_resource("resume", "r-1")
        .with_details(doc! { "fileName": "cv.pdf" });

    let id = repo.log_activity(entry).await.unwrap();

    let entries = repo.get_user_activities("u-4", 10).await;
    assert_eq!(entries.len(), 1);
    let stored = &entries[0];
    assert_eq!(stored.id.map(|oid| oid.to_hex()), Some(id));
    assert_eq!(stored.action, "resume_uploaded");
    assert_eq!(stored.resource_id.as_deref(), Some("r-1"));
    assert_eq!(stored.details.get_str("fileName").unwrap(), "cv.pdf");
}

#[tokio::test]
#[ignore]
async fn test_user_lists_are_newest_first() {
    let store = store().await;
    let analyses = AnalysisDocumentStore::new(&store);
    let letters = CoverLetterStore::new(&store);
    let activity = ActivityLogStore::new(&store);
    let feedback = FeedbackStore::new(&store);

    let user_id = Uuid::new_v4();
    let user_key = user_id.to_string();
    let mut created = (Vec::new(), Vec::new(), Vec::new(), Vec::new());

    for n in 0..3 {
        let row = analysis_row(user_id);
        let document = DetailedAnalysisDocument::for_analysis(&row, AnalysisDetail::default(), None);
        created.0.push(analyses.create_detailed_analysis(document).await.unwrap());
        created.1.push(letters.create_cover_letter(cover_letter(&user_key)).await.unwrap());
        created.2.push(
            activity
                .log_activity(ActivityEntry::new(user_key.as_str(), format!("step_{}", n)))
                .await
                .unwrap(),
        );
        created.3.push(
            feedback
                .create_feedback(FeedbackDocument::new(user_key.as_str(), "idea", "Title", "Body"))
                .await
                .unwrap(),
        );
        tick().await;
    }
    created.0.reverse();
    created.1.reverse();
    created.2.reverse();
    created.3.reverse();

    let listed: Vec<String> = analyses
        .get_user_analyses(&user_key, 10)
        .await
        .into_iter()
        .map(|d| d.analysis_id)
        .collect();
    assert_eq!(listed, created.0);

    let listed: Vec<String> = letters
        .get_user_cover_letters(&user_key, 10)
        .await
        .into_iter()
        .map(|d| d.cover_letter_id)
        .collect();
    assert_eq!(listed, created.1);

    let listed: Vec<String> = activity
        .get_user_activities(&user_key, 10)
        .await
        .into_iter()
        .filter_map(|e| e.id.map(|oid| oid.to_hex()))
        .collect();
    assert_eq!(listed, created.2);

    let listed: Vec<String> = feedback
        .get_user_feedback(&user_key, 10)
        .await
        .into_iter()
        .map(|f| f.feedback_id)
        .collect();
    assert_eq!(listed, created.3);

    assert_eq!(analyses.get_user_analyses(&user_key, 2).await.len(), 2);
}

#[tokio::test]
#[ignore]
async fn test_cover_letter_edits_are_versioned() {
    let repo = CoverLetterStore::new(&store().await);
    let id = repo.create_cover_letter(cover_letter("u-2")).await.unwrap();

    for text in ["First rewrite", "Second rewrite"] {
        let update = CoverLetterUpdate {
            content: Some(CoverLetterContent {
                full_text: text.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(repo.update_cover_letter(&id, update).await);
    }

    let stored = repo.get_cover_letter(&id).await.unwrap();
    let versions: Vec<i32> = stored.edit_history.iter().map(|e| e.version).collect();
    assert_eq!(versions, vec![1, 2]);
    assert_eq!(stored.edit_history[0].edited_by, "user");
    assert_eq!(stored.content.full_text, "Second rewrite");
}

#[tokio::test]
#[ignore]
async fn test_preferences_round_trip() {
    let repo = PreferencesStore::new(&store().await);

    repo.create_user_preferences(UserPreferencesDocument::defaults_for("u-3"))
        .await
        .unwrap();
    let stored = repo.get_user_preferences("u-3").await.unwrap();

    assert_eq!(stored.user_id, "u-3");
    assert!(repo.delete_user_preferences("u-3").await);
    assert!(repo.get_user_preferences("u-3").await.is_none());
}
