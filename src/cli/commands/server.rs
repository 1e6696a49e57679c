use clap::Subcommand;
use serde_json::Value;

use crate::cli::utils::{api_data, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Show server information from API root endpoint")]
    Info,

    #[command(about = "Check server health status from API /health endpoint")]
    Health,
}

pub async fn handle(cmd: ServerCommands, url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let path = match cmd {
        ServerCommands::Info => "/",
        ServerCommands::Health => "/health",
    };
    let endpoint = format!("{}{}", url.trim_end_matches('/'), path);

    let response = reqwest::get(&endpoint).await?;
    let status = response.status();
    let body: Value = response.json().await?;
    let data = api_data(status, body)?;

    output_success(output_format, &format!("{} responded {}", endpoint, status), Some(data))
}
