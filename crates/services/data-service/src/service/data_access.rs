//! Data access container - one handle to every repository.
//!
//! Repositories are held behind their traits so callers and tests can swap
//! implementations.

use std::sync::Arc;

use common::AppResult;

use crate::config::DataServiceConfig;
use crate::infra::{MongoStore, SqlServer};
use crate::repository::documents::{
    ActivityLogRepository, ActivityLogStore, AiCacheRepository, AiCacheStore,
    AnalysisDocumentRepository, AnalysisDocumentStore, CoverLetterRepository, CoverLetterStore,
    FeedbackRepository, FeedbackStore, PreferencesRepository, PreferencesStore,
};
use crate::repository::relational::{
    AnalysisRepository, AnalysisStore, DashboardRepository, DashboardStore, DataLakeRepository,
    DataLakeStore, ResumeRepository, ResumeStore, UserRepository, UserStore,
};

/// Repositories over the document store.
#[derive(Clone)]
pub struct DocumentRepositories {
    pub analyses: Arc<dyn AnalysisDocumentRepository>,
    pub cover_letters: Arc<dyn CoverLetterRepository>,
    pub preferences: Arc<dyn PreferencesRepository>,
    pub activity: Arc<dyn ActivityLogRepository>,
    pub ai_cache: Arc<dyn AiCacheRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
}

impl DocumentRepositories {
    pub fn from_store(store: &MongoStore) -> Self {
        Self {
            analyses: Arc::new(AnalysisDocumentStore::new(store)),
            cover_letters: Arc::new(CoverLetterStore::new(store)),
            preferences: Arc::new(PreferencesStore::new(store)),
            activity: Arc::new(ActivityLogStore::new(store)),
            ai_cache: Arc::new(AiCacheStore::new(store)),
            feedback: Arc::new(FeedbackStore::new(store)),
        }
    }
}

/// Repositories over the relational store.
#[derive(Clone)]
pub struct RelationalRepositories {
    pub users: Arc<dyn UserRepository>,
    pub resumes: Arc<dyn ResumeRepository>,
    pub analyses: Arc<dyn AnalysisRepository>,
    pub dashboard: Arc<dyn DashboardRepository>,
    pub data_lake: Arc<dyn DataLakeRepository>,
}

impl RelationalRepositories {
    pub fn from_server(db: &SqlServer) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            resumes: Arc::new(ResumeStore::new(db.clone())),
            analyses: Arc::new(AnalysisStore::new(db.clone())),
            dashboard: Arc::new(DashboardStore::new(db.clone())),
            data_lake: Arc::new(DataLakeStore::new(db.clone())),
        }
    }
}

struct Connections {
    mongo: MongoStore,
    sql: SqlServer,
}

pub struct DataAccess {
    connections: Option<Connections>,
    documents: DocumentRepositories,
    relational: RelationalRepositories,
}

impl DataAccess {
    /// Assemble from existing repositories, e.g. mocks.
    pub fn new(documents: DocumentRepositories, relational: RelationalRepositories) -> Self {
        Self {
            connections: None,
            documents,
            relational,
        }
    }

    /// Connect both stores and build every repository on top of them.
    pub async fn connect(config: &DataServiceConfig) -> AppResult<Self> {
        let (mongo, sql) = tokio::try_join!(
            MongoStore::connect(&config.mongo),
            SqlServer::connect(&config.sql)
        )?;

        Ok(Self {
            documents: DocumentRepositories::from_store(&mongo),
            relational: RelationalRepositories::from_server(&sql),
            connections: Some(Connections { mongo, sql }),
        })
    }

    /// Ping both stores. Always succeeds when built from plain repositories.
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(connections) = &self.connections {
            tokio::try_join!(connections.mongo.ping(), connections.sql.ping())?;
        }
        Ok(())
    }

    /// Shut down the document-store client; the SQL pool closes on drop.
    pub async fn close(self) {
        if let Some(connections) = self.connections {
            connections.mongo.disconnect().await;
        }
    }

    pub fn analysis_documents(&self) -> Arc<dyn AnalysisDocumentRepository> {
        self.documents.analyses.clone()
    }

    pub fn cover_letters(&self) -> Arc<dyn CoverLetterRepository> {
        self.documents.cover_letters.clone()
    }

    pub fn preferences(&self) -> Arc<dyn PreferencesRepository> {
        self.documents.preferences.clone()
    }

    pub fn activity(&self) -> Arc<dyn ActivityLogRepository> {
        self.documents.activity.clone()
    }

    pub fn ai_cache(&self) -> Arc<dyn AiCacheRepository> {
        self.documents.ai_cache.clone()
    }

    pub fn feedback(&self) -> Arc<dyn FeedbackRepository> {
        self.documents.feedback.clone()
    }

    pub fn users(&self) -> Arc<dyn UserRepository> {
        self.relational.users.clone()
    }

    pub fn resumes(&self) -> Arc<dyn ResumeRepository> {
        self.relational.resumes.clone()
    }

    pub fn analyses(&self) -> Arc<dyn AnalysisRepository> {
        self.relational.analyses.clone()
    }

    pub fn dashboard(&self) -> Arc<dyn DashboardRepository> {
        self.relational.dashboard.clone()
    }

    pub fn data_lake(&self) -> Arc<dyn DataLakeRepository> {
        self.relational.data_lake.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::documents::{
        MockActivityLogRepository, MockAiCacheRepository, MockAnalysisDocumentRepository,
        MockCoverLetterRepository, MockFeedbackRepository, MockPreferencesRepository,
    };
    use crate::repository::relational::{
        MockAnalysisRepository, MockDashboardRepository, MockDataLakeRepository,
        MockResumeRepository, MockUserRepository,
    };

    fn mock_documents() -> DocumentRepositories {
        DocumentRepositories {
            analyses: Arc::new(MockAnalysisDocumentRepository::new()),
            cover_letters: Arc::new(MockCoverLetterRepository::new()),
            preferences: Arc::new(MockPreferencesRepository::new()),
            activity: Arc::new(MockActivityLogRepository::new()),
            ai_cache: Arc::new(MockAiCacheRepository::new()),
            feedback: Arc::new(MockFeedbackRepository::new()),
        }
    }

    fn mock_relational() -> RelationalRepositories {
        RelationalRepositories {
            users: Arc::new(MockUserRepository::new()),
            resumes: Arc::new(MockResumeRepository::new()),
            analyses: Arc::new(MockAnalysisRepository::new()),
            dashboard: Arc::new(MockDashboardRepository::new()),
            data_lake: Arc::new(MockDataLakeRepository::new()),
        }
    }

    #[tokio::test]
    async fn test_ping_without_connections_succeeds() {
        let access = DataAccess::new(mock_documents(), mock_relational());
        tokio_test::assert_ok!(access.ping().await);
    }

    #[tokio::test]
    async fn test_accessors_hand_out_the_injected_repository() {
        let mut cache = MockAiCacheRepository::new();
        cache.expect_purge_expired().times(1).returning(|| 3);

        let mut documents = mock_documents();
        documents.ai_cache = Arc::new(cache);
        let access = DataAccess::new(documents, mock_relational());

        assert_eq!(access.ai_cache().purge_expired().await, 3);
    }
}
