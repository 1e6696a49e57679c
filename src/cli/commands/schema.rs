use clap::Subcommand;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;
use crate::database::{DatabaseManager, TABLES};

#[derive(Subcommand)]
pub enum SchemaCommands {
    #[command(about = "Create any missing tables in DATABASE_URL")]
    Install,

    #[command(about = "List the tables the API stores")]
    Tables,
}

pub async fn handle(cmd: SchemaCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SchemaCommands::Install => {
            let pool = DatabaseManager::main_pool(&config::config().database).await?;
            DatabaseManager::install_schema(&pool).await?;
            DatabaseManager::close_all().await;
            output_success(output_format, &format!("Schema installed ({} tables)", TABLES.len()), None)
        }
        SchemaCommands::Tables => output_success(
            output_format,
            &format!("{} tables", TABLES.len()),
            Some(serde_json::json!({ "tables": TABLES })),
        ),
    }
}
