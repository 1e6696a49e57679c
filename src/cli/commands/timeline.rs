use clap::Args;
use serde_json::Value;

use crate::cli::utils::{api_data, output_success};
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct TimelineArgs {
    #[arg(help = "Progeny id")]
    pub progeny_id: i32,

    #[arg(long, env = "KINAUNA_TOKEN", help = "Bearer token (anonymous when omitted)")]
    pub token: Option<String>,

    #[arg(long, help = "Restrict to one item type, e.g. picture or sleep")]
    pub item_type: Option<String>,

    #[arg(long, default_value_t = 1)]
    pub page: i32,

    #[arg(long, default_value_t = 0, help = "0 uses the server default")]
    pub page_size: usize,
}

pub async fn handle(args: TimelineArgs, url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let endpoint = format!("{}/api/progeny/{}/timeline", url.trim_end_matches('/'), args.progeny_id);

    let mut query = vec![("page", args.page.to_string()), ("page_size", args.page_size.to_string())];
    if let Some(item_type) = &args.item_type {
        query.push(("item_type", item_type.clone()));
    }

    let mut request = reqwest::Client::new().get(&endpoint).query(&query);
    if let Some(token) = &args.token {
        request = request.bearer_auth(token);
    }
    let response = request.send().await?;
    let status = response.status();
    let body: Value = response.json().await?;
    let page = api_data(status, body)?;

    let total = page.get("total_items").and_then(Value::as_u64).unwrap_or(0);
    output_success(
        output_format,
        &format!("Progeny {} timeline: {} visible items", args.progeny_id, total),
        Some(page),
    )
}
