//! Data Service - maintenance CLI for the persistence layer.

use clap::{Parser, Subcommand};
use mongodb::bson;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use data_service_lib::{DataAccess, DataServiceConfig};
use domain::mappers::analysis::to_list_item;
use domain::{
    DEFAULT_ACTIVITY_LIMIT, DEFAULT_ACTIVITY_WINDOW_DAYS, DEFAULT_CACHE_TTL_HOURS,
    DEFAULT_LIST_LIMIT, DEFAULT_RECENT_ANALYSES_LIMIT,
};

#[derive(Parser)]
#[command(name = "data-service")]
#[command(about = "Resume matching persistence layer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check connectivity to MongoDB and SQL Server
    Ping,
    /// Delete expired AI cache entries
    PurgeCache,
    /// Print dashboard statistics for a user as JSON
    Dashboard {
        #[arg(long)]
        user_id: Uuid,
        #[arg(long, default_value_t = DEFAULT_RECENT_ANALYSES_LIMIT)]
        limit: i64,
    },
    /// Print a user's analyses and cover letters as JSON
    History {
        #[arg(long)]
        user_id: Uuid,
        #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: i64,
    },
    /// Print a user's recent activity and per-action statistics as JSON
    Activity {
        #[arg(long)]
        user_id: Uuid,
        #[arg(long, default_value_t = DEFAULT_ACTIVITY_LIMIT)]
        limit: i64,
        #[arg(long, default_value_t = DEFAULT_ACTIVITY_WINDOW_DAYS)]
        days: i64,
    },
    /// Store a JSON object in the AI cache
    CachePut {
        #[arg(long)]
        key: String,
        /// JSON object to cache
        #[arg(long)]
        result: String,
        #[arg(long, default_value_t = DEFAULT_CACHE_TTL_HOURS, allow_negative_numbers = true)]
        ttl_hours: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = DataServiceConfig::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.service.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let access = DataAccess::connect(&config).await?;

    match cli.command {
        Commands::Ping => {
            access.ping().await?;
            println!("MongoDB: ok");
            println!("SQL Server: ok");
        }
        Commands::PurgeCache => {
            let deleted = access.ai_cache().purge_expired().await;
            println!("Purged {} expired cache entries", deleted);
        }
        Commands::Dashboard { user_id, limit } => {
            let dashboard = access.dashboard();
            let (stats, recent, totals) = tokio::join!(
                dashboard.get_dashboard_stats(user_id),
                dashboard.get_recent_analyses(user_id, limit),
                dashboard.get_user_totals(user_id)
            );

            let report = serde_json::json!({
                "userId": user_id,
                "stats": stats,
                "totals": totals,
                "recentAnalyses": recent,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::History { user_id, limit } => {
            let user_key = user_id.to_string();
            let analyses_repo = access.analyses();
            let documents_repo = access.analysis_documents();
            let cover_letters_repo = access.cover_letters();
            let (analyses, documents, cover_letters) = tokio::join!(
                analyses_repo.get_user_analyses(user_id, limit),
                documents_repo.get_user_analyses(&user_key, limit),
                cover_letters_repo.get_user_cover_letters(&user_key, limit)
            );

            let items: Vec<_> = analyses.iter().map(to_list_item).collect();
            let report = serde_json::json!({
                "userId": user_id,
                "analyses": items,
                "analysisDocuments": documents,
                "coverLetters": cover_letters,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Activity {
            user_id,
            limit,
            days,
        } => {
            let user_key = user_id.to_string();
            let activity = access.activity();
            let (entries, statistics) = tokio::join!(
                activity.get_user_activities(&user_key, limit),
                activity.get_activity_statistics(&user_key, days)
            );

            let report = serde_json::json!({
                "userId": user_id,
                "days": days,
                "statistics": statistics,
                "activities": entries,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::CachePut {
            key,
            result,
            ttl_hours,
        } => {
            let value: serde_json::Value = serde_json::from_str(&result)?;
            let document = bson::to_document(&value)?;
            let key = access.ai_cache().put_cached(&key, document, ttl_hours).await?;
            println!("Cached {} for {} hours", key, ttl_hours);
        }
    }

    access.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: &str = "7d3c9a4e-2f41-4b8e-9c55-0e6a1f2b3c4d";

    #[test]
    fn test_list_commands_default_to_shared_limits() {
        let cli = Cli::try_parse_from(["data-service", "history", "--user-id", USER]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::History { limit, .. } if limit == DEFAULT_LIST_LIMIT
        ));

        let cli = Cli::try_parse_from(["data-service", "activity", "--user-id", USER]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Activity { limit, days, .. }
                if limit == DEFAULT_ACTIVITY_LIMIT && days == DEFAULT_ACTIVITY_WINDOW_DAYS
        ));
    }

    #[test]
    fn test_cache_put_accepts_negative_ttl() {
        let cli = Cli::try_parse_from([
            "data-service",
            "cache-put",
            "--key",
            "k",
            "--result",
            "{}",
            "--ttl-hours",
            "-1",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::CachePut { ttl_hours: -1, .. }));

        let cli = Cli::try_parse_from(["data-service", "cache-put", "--key", "k", "--result", "{}"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::CachePut { ttl_hours, .. } if ttl_hours == DEFAULT_CACHE_TTL_HOURS
        ));
    }
}
