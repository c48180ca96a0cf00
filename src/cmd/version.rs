use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use super::RunCommand;

/// Display version and build information.
#[derive(Args)]
pub struct VersionArgs {}

#[async_trait]
impl RunCommand for VersionArgs {
    async fn run(&self) -> Result<()> {
        println!("tokenauth {}", env!("TOKENAUTH_VERSION"));
        println!("Target: {}", env!("TOKENAUTH_TARGET"));
        println!("Rustc: {}", env!("VERGEN_RUSTC_SEMVER"));
        println!("Build time: {}", env!("VERGEN_BUILD_TIMESTAMP"));
        Ok(())
    }
}
