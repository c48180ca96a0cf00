use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Args;
use log::info;
use tokenauth::client::config::ClientConfig;
use tokenauth::client::Endpoint;
use tokenauth::config::{CommonConfig, ConfigArgs};
use tokenauth::display::display_json;

use super::{setup, RunCommand};

/// Exchange the configured username and password for an API token.
#[derive(Args)]
pub struct AuthArgs {
    /// Override the username from config.
    #[arg(short, long)]
    pub username: Option<String>,

    /// Label describing what the token will be used for, default is the
    /// `usage` in config.
    #[arg(long)]
    pub usage: Option<String>,

    /// Requested token lifetime in seconds, default is decided by the server.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub ttl: Option<u64>,

    /// Print the whole token response as JSON instead of only the token.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for AuthArgs {
    async fn run(&self) -> Result<()> {
        let ps = setup(&self.config)?;
        let mut cfg: ClientConfig = ps.load_config("client", ClientConfig::default)?;
        if let Some(ref username) = self.username {
            cfg.username = username.clone();
        }

        let client = cfg.build_client()?;

        let mut req = cfg.token_request();
        if let Some(ref usage) = self.usage {
            req.usage = usage.clone();
        }
        if let Some(ttl) = self.ttl {
            req = req.with_ttl(ttl);
        }

        info!(
            "Requesting token from '{}' as user '{}'",
            client.endpoint(),
            cfg.username
        );
        let resp = client
            .request_token(&cfg.credentials(), &req)
            .await
            .context("request token")?;
        info!("Token issued for usage '{}'", req.usage);

        if self.json {
            return display_json(resp);
        }
        println!("{}", resp.token.api_token);
        Ok(())
    }
}
