//! Data Service Library
//!
//! Persistence for the resume matching backend: document repositories on
//! MongoDB, relational repositories on SQL Server, and the [`service::DataAccess`]
//! container that holds one of each.

pub mod config;
pub mod documents;
pub mod infra;
pub mod repository;
pub mod service;

pub use config::DataServiceConfig;
pub use service::{AnalysisRecorder, DataAccess};
