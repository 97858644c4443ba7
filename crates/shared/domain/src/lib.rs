//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Entities here are produced by the data-service repositories and reshaped
//! for callers by the `mappers` module.

pub mod analysis;
pub mod analysis_detail;
pub mod constants;
pub mod data_lake;
pub mod error;
pub mod mappers;
pub mod resume;
pub mod user;

pub use analysis::{AnalysisStatus, AnalysisSummary, CompatibilityAnalysis, JobSummary, NewAnalysis};
pub use analysis_detail::{
    AnalysisDetail, CategoryScores, CompatibilityReport, EducationItem, ExperienceItem,
    ImprovementArea, JobAnalysis, ResumeAnalysis, SkillExtraction,
};
pub use constants::*;
pub use data_lake::{DataLakeFile, NewDataLakeFile};
pub use error::{DomainError, DomainResult};
pub use resume::{NewResume, Resume, ResumeStatus};
pub use user::{NewUser, SubscriptionType, User, UserUpdate};
