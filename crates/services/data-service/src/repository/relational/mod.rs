//! SQL Server-backed repositories.
//!
//! Every call checks out one pooled connection and runs one statement.

mod analysis_repository;
mod dashboard_repository;
mod data_lake_repository;
mod resume_repository;
mod rows;
mod user_repository;

pub use analysis_repository::{AnalysisRepository, AnalysisStore};
pub use dashboard_repository::{DashboardRepository, DashboardStore, RecentAnalysis, UserTotals};
pub use data_lake_repository::{DataLakeRepository, DataLakeStore};
pub use resume_repository::{ResumeRepository, ResumeStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use analysis_repository::MockAnalysisRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use dashboard_repository::MockDashboardRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use data_lake_repository::MockDataLakeRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use resume_repository::MockResumeRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
