use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::{CommentRepository, DatabaseManager, PgCommentRepository};

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Create the comments table and index if missing")]
    Migrate,

    #[command(about = "Check connectivity to the configured database")]
    Health,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    let result = match cmd {
        DbCommands::Migrate => DatabaseManager::migrate(&pool).await.map(|_| "migrated"),
        DbCommands::Health => PgCommentRepository::new(pool.clone())
            .health_check()
            .await
            .map(|_| "ok"),
    };

    DatabaseManager::close(&pool).await;
    let status = result?;

    match output_format {
        OutputFormat::Json => println!("{}", json!({ "status": status })),
        OutputFormat::Text => println!("{}", status),
    }
    Ok(())
}
