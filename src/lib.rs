//! Exchange a username and password for a short-lived API token.
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use tokenauth::client::Client;
//!
//! let client = Client::new("https://auth.example.com", "", Client::DEFAULT_TIMEOUT)?;
//! let resp = client.authenticate("alice", "s3cret", "ci").await?;
//! println!("{}", resp.token.api_token);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod display;
pub mod logs;
pub mod types;
