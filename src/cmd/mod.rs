mod auth;
mod config;
mod version;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tokenauth::config::{CommonConfig, ConfigArgs, PathSet};
use tokenauth::logs::config::LogConfig;
use tokenauth::logs::init_logger;

#[async_trait]
pub trait RunCommand {
    async fn run(&self) -> Result<()>;
}

#[derive(Parser)]
#[command(author, about, version = env!("TOKENAUTH_VERSION"))]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Auth(auth::AuthArgs),
    Config(config::ShowConfigArgs),
    Version(version::VersionArgs),
}

#[async_trait]
impl RunCommand for App {
    async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Auth(args) => args.run().await,
            Commands::Config(args) => args.run().await,
            Commands::Version(args) => args.run().await,
        }
    }
}

/// Build the path set and install the logger described by `log.toml`.
fn setup(config: &ConfigArgs) -> Result<PathSet> {
    let ps = config.build_path_set()?;
    let log_cfg = ps.load_config("log", LogConfig::default)?;
    init_logger(&log_cfg)?;
    Ok(ps)
}
