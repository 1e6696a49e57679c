use clap::Subcommand;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Mint a bearer token for a user, signed with JWT_SECRET")]
    Token {
        #[arg(help = "User email")]
        email: String,
        #[arg(long, help = "Display name carried in the token")]
        name: Option<String>,
        #[arg(long, help = "Lifetime in hours (defaults to the configured expiry)")]
        hours: Option<u64>,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Token { email, name, hours } => {
            let security = &config::config().security;
            let mut claims = Claims::new(&email, hours.unwrap_or(security.jwt_expiry_hours));
            if let Some(name) = name {
                claims = claims.with_name(name);
            }
            let token = generate_jwt(&claims, &security.jwt_secret)?;
            output_success(
                output_format,
                &format!("Token issued for {}", claims.sub),
                Some(json!({ "token": token, "expires": claims.exp })),
            )
        }
    }
}
