//! Pure conversions from domain entities into response shapes.
//!
//! Nothing here touches a store; repositories hand back entities and callers
//! pick the shape they need.

pub mod analysis;
pub mod resume;
pub mod user;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Entry in a cross-entity search listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: String,
    pub description: String,
    pub score: f64,
    pub created_at: DateTime<Utc>,
    pub highlight: Option<String>,
}
