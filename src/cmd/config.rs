use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, ValueEnum};
use tokenauth::client::config::ClientConfig;
use tokenauth::config::{CommonConfig, ConfigArgs};
use tokenauth::display::display_json;
use tokenauth::logs::config::LogConfig;

use super::RunCommand;

/// Display the configuration information used in JSON format.
#[derive(Args)]
pub struct ShowConfigArgs {
    /// Name of the configuration to display.
    #[arg(default_value = "client")]
    pub name: ConfigType,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigType {
    Client,
    Log,
}

#[async_trait]
impl RunCommand for ShowConfigArgs {
    async fn run(&self) -> Result<()> {
        let ps = self.config.build_path_set()?;

        match self.name {
            ConfigType::Client => {
                let mut cfg = ps.load_config("client", ClientConfig::default)?;
                if !cfg.password.is_empty() {
                    cfg.password = String::from("******");
                }
                display_json(cfg)
            }
            ConfigType::Log => {
                let cfg = ps.load_config("log", LogConfig::default)?;
                display_json(cfg)
            }
        }
    }
}
