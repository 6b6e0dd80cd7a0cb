use anyhow::Context;
use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Issue a bearer token for a user id")]
    Token {
        #[arg(long, help = "User id the token authenticates")]
        user: Uuid,
        #[arg(long, help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
        hours: Option<u64>,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Token { user, hours } => {
            let config = AppConfig::from_env().context("invalid configuration")?;
            let hours = hours.unwrap_or(config.security.jwt_expiry_hours);

            let token = generate_jwt(&Claims::new(user, hours)?, &config.security.jwt_secret)?;

            match output_format {
                OutputFormat::Json => println!(
                    "{}",
                    json!({ "token": token, "user": user, "expires_in_hours": hours })
                ),
                OutputFormat::Text => println!("{}", token),
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn out_of_range_lifetime_is_reported_not_panicked() {
        let cmd = AuthCommands::Token {
            user: Uuid::new_v4(),
            hours: Some(10_000_000_000_000_000),
        };
        let err = handle(cmd, OutputFormat::Text).await.unwrap_err();
        assert!(err.to_string().contains("out of range"), "{}", err);
    }
}
