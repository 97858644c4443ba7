//! Live SQL Server tests against a database created from `sql/schema.sql`.
//!
//! Ignored by default. Configure with `TEST_SQL_SERVER`, `TEST_SQL_PORT`,
//! `TEST_SQL_DATABASE`, `TEST_SQL_USERNAME` and `TEST_SQL_PASSWORD`, then run
//! `cargo test -p data-service -- --ignored`.

use uuid::Uuid;

use common::SqlServerConfig;
use data_service_lib::infra::SqlServer;
use data_service_lib::repository::relational::{
    AnalysisRepository, AnalysisStore, DataLakeRepository, DataLakeStore, ResumeRepository,
    ResumeStore, UserRepository, UserStore,
};
use domain::{
    AnalysisStatus, NewAnalysis, NewDataLakeFile, NewResume, NewUser, ResumeStatus,
    SubscriptionType, User, UserUpdate,
};

async fn server() -> SqlServer {
    let defaults = SqlServerConfig::default();
    let config = SqlServerConfig {
        server: std::env::var("TEST_SQL_SERVER").unwrap_or(defaults.server),
        port: std::env::var("TEST_SQL_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port),
        database: std::env::var("TEST_SQL_DATABASE").unwrap_or(defaults.database),
        username: std::env::var("TEST_SQL_USERNAME").unwrap_or(defaults.username),
        password: std::env::var("TEST_SQL_PASSWORD").unwrap_or(defaults.password),
        ..defaults
    };
    SqlServer::connect(&config).await.expect("sql server connection")
}

async fn create_user(db: &SqlServer) -> User {
    UserStore::new(db.clone())
        .create_user(NewUser {
            email: format!("{}@example.com", Uuid::new_v4().simple()),
            password_hash: "argon2-hash".to_string(),
            full_name: "Test Candidate".to_string(),
            phone: None,
        })
        .await
        .unwrap()
}

#[tokio::test]
#[ignore]
async fn test_user_create_lookup_and_update() {
    let db = server().await;
    let users = UserStore::new(db.clone());
    let user = create_user(&db).await;

    let by_email = users.get_user_by_email(&user.email).await.unwrap();
    assert_eq!(by_email.user_id, user.user_id);
    assert_eq!(by_email.subscription_type, SubscriptionType::Free);

    assert!(!users.update_user(user.user_id, UserUpdate::default()).await);
    assert!(
        users
            .update_user(
                user.user_id,
                UserUpdate {
                    subscription_type: Some(SubscriptionType::Pro),
                    ..Default::default()
                },
            )
            .await
    );
    assert!(users.update_last_login(user.user_id).await);

    let updated = users.get_user_by_id(user.user_id).await.unwrap();
    assert_eq!(updated.subscription_type, SubscriptionType::Pro);
    assert!(updated.last_login_at.is_some());
}

#[tokio::test]
#[ignore]
async fn test_resume_running_average() {
    let db = server().await;
    let user = create_user(&db).await;
    let resumes = ResumeStore::new(db.clone());

    let resume = resumes
        .create_resume(NewResume::draft(user.user_id, "Platform Engineer"))
        .await
        .unwrap();
    assert_eq!(resume.analysis_count, 0);

    for score in [80.0, 60.0, 70.0] {
        assert!(resumes.update_resume_analysis_stats(resume.resume_id, score).await);
    }

    let stored = resumes.get_resume_by_id(resume.resume_id).await.unwrap();
    assert_eq!(stored.analysis_count, 3);
    assert!((stored.average_match_score - 70.0).abs() < 1e-9);
    assert!(stored.last_analyzed_at.is_some());

    let drafts = resumes
        .get_user_resumes(user.user_id, Some(ResumeStatus::Draft))
        .await;
    assert_eq!(drafts.len(), 1);
    assert!(resumes
        .get_user_resumes(user.user_id, Some(ResumeStatus::Archived))
        .await
        .is_empty());
}

#[tokio::test]
#[ignore]
async fn test_analysis_lifecycle() {
    let db = server().await;
    let user = create_user(&db).await;
    let resume = ResumeStore::new(db.clone())
        .create_resume(NewResume::draft(user.user_id, "Data Engineer"))
        .await
        .unwrap();
    let analyses = AnalysisStore::new(db.clone());

    let analysis = analyses
        .create_analysis(NewAnalysis::pending(user.user_id, resume.resume_id, None))
        .await
        .unwrap();
    assert_eq!(analysis.status, AnalysisStatus::Pending);

    assert!(
        analyses
            .update_analysis_status(analysis.analysis_id, AnalysisStatus::Processing, Some(10))
            .await
    );
    let processing = analyses.get_analysis_by_id(analysis.analysis_id).await.unwrap();
    assert!(processing.completed_at.is_none());

    assert!(
        analyses
            .complete_analysis(analysis.analysis_id, 91.0, 2400, "doc-1".to_string())
            .await
    );
    assert!(
        !analyses
            .complete_analysis(analysis.analysis_id, 12.0, 1, "doc-2".to_string())
            .await
    );
    let done = analyses
        .get_analysis_for_user(analysis.analysis_id, user.user_id)
        .await
        .unwrap();
    assert_eq!(done.status, AnalysisStatus::Completed);
    assert!(done.completed_at.is_some());
    assert_eq!(done.mongo_analysis_id.as_deref(), Some("doc-1"));
    assert_eq!(done.match_score, 91.0);

    assert!(analyses
        .get_analysis_for_user(analysis.analysis_id, Uuid::new_v4())
        .await
        .is_none());

    let summary = analyses.get_analysis_summary(user.user_id).await;
    assert_eq!(summary.total_analyses, 1);
    assert_eq!(summary.completed_analyses, 1);
    assert_eq!(summary.best_score, Some(91.0));
}

#[tokio::test]
#[ignore]
async fn test_file_reference_access_is_counted() {
    let db = server().await;
    let user = create_user(&db).await;
    let files = DataLakeStore::new(db.clone());

    let file = files
        .create_file_reference(NewDataLakeFile {
            user_id: user.user_id,
            filename: "cv.pdf".to_string(),
            file_type: "pdf".to_string(),
            file_size: 52_431,
            mime_type: Some("application/pdf".to_string()),
            storage_path: format!("resumes/{}/cv.pdf", user.user_id),
            bucket_name: "uploads".to_string(),
            storage_provider: "azure_blob".to_string(),
            metadata: Some(serde_json::json!({ "pages": 2 })),
        })
        .await
        .unwrap();

    assert!(files.record_file_access(file.file_id).await);
    let stored = files.get_file_reference(file.file_id).await.unwrap();
    assert_eq!(stored.access_count, 1);
    assert_eq!(stored.metadata, Some(serde_json::json!({ "pages": 2 })));
}

#[tokio::test]
#[ignore]
async fn test_user_lists_are_newest_first() {
    let db = server().await;
    let user = create_user(&db).await;
    let resumes = ResumeStore::new(db.clone());
    let analyses = AnalysisStore::new(db.clone());

    let mut created_resumes = Vec::new();
    let mut created_analyses = Vec::new();
    for title in ["First", "Second", "Third"] {
        let resume = resumes
            .create_resume(NewResume::draft(user.user_id, title))
            .await
            .unwrap();
        let analysis = analyses
            .create_analysis(NewAnalysis::pending(user.user_id, resume.resume_id, None))
            .await
            .unwrap();
        created_resumes.push(resume.resume_id);
        created_analyses.push(analysis.analysis_id);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }

    let listed: Vec<Uuid> = analyses
        .get_user_analyses(user.user_id, 10)
        .await
        .iter()
        .map(|a| a.analysis_id)
        .collect();
    created_analyses.reverse();
    assert_eq!(listed, created_analyses);
    assert_eq!(analyses.get_user_analyses(user.user_id, 2).await.len(), 2);

    // Touching the oldest resume moves it to the front
    assert!(resumes.update_resume_analysis_stats(created_resumes[0], 55.0).await);
    let listed: Vec<Uuid> = resumes
        .get_user_resumes(user.user_id, None)
        .await
        .iter()
        .map(|r| r.resume_id)
        .collect();
    assert_eq!(
        listed,
        vec![created_resumes[0], created_resumes[2], created_resumes[1]]
    );
}
