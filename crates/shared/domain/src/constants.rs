//! Domain-level constants.
//!
//! These constants define enumerated values and defaults shared by the
//! repositories and the mappers.

// =============================================================================
// Subscriptions
// =============================================================================

/// Free subscription tier
pub const SUBSCRIPTION_FREE: &str = "free";

/// Paid subscription tier
pub const SUBSCRIPTION_PRO: &str = "pro";

// =============================================================================
// Resume status
// =============================================================================

pub const RESUME_STATUS_DRAFT: &str = "draft";
pub const RESUME_STATUS_ACTIVE: &str = "active";
pub const RESUME_STATUS_ARCHIVED: &str = "archived";

/// Version label given to a freshly uploaded resume
pub const DEFAULT_RESUME_VERSION: &str = "v1.0";

// =============================================================================
// Analysis status
// =============================================================================

pub const ANALYSIS_STATUS_PENDING: &str = "pending";
pub const ANALYSIS_STATUS_PROCESSING: &str = "processing";
pub const ANALYSIS_STATUS_COMPLETED: &str = "completed";
pub const ANALYSIS_STATUS_FAILED: &str = "failed";

/// Analysis type used when the caller does not specify one
pub const DEFAULT_ANALYSIS_TYPE: &str = "job_match";

/// AI model reported when a detailed analysis does not record one
pub const DEFAULT_AI_MODEL: &str = "gpt-4";

/// Title shown for analyses that are not tied to a stored job description
pub const AD_HOC_JOB_TITLE: &str = "Ad-hoc analysis";

// =============================================================================
// Feedback
// =============================================================================

/// Status assigned to every new feedback record
pub const FEEDBACK_STATUS_NEW: &str = "new";

/// Terminal feedback status; setting it stamps the resolution time
pub const FEEDBACK_STATUS_RESOLVED: &str = "resolved";

// =============================================================================
// Storage
// =============================================================================

/// Storage provider recorded for data lake files by default
pub const DEFAULT_STORAGE_PROVIDER: &str = "azure_blob";

// =============================================================================
// Query limits
// =============================================================================

/// Default page size for per-user list queries
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Default page size for activity log queries
pub const DEFAULT_ACTIVITY_LIMIT: i64 = 100;

/// Default number of rows on the dashboard "recent analyses" panel
pub const DEFAULT_RECENT_ANALYSES_LIMIT: i64 = 5;

/// Default window for activity statistics, in days
pub const DEFAULT_ACTIVITY_WINDOW_DAYS: i64 = 30;

/// Default lifetime of an AI cache entry, in hours
pub const DEFAULT_CACHE_TTL_HOURS: i64 = 24;

// =============================================================================
// Activity actions
// =============================================================================

pub const ACTIVITY_ANALYSIS_COMPLETED: &str = "analysis_completed";
pub const ACTIVITY_ANALYSIS_FAILED: &str = "analysis_failed";
pub const RESOURCE_ANALYSIS: &str = "analysis";
