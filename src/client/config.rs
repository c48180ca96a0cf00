use std::time::Duration;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};
use crate::types::credentials::Credentials;
use crate::types::token::TokenRequest;

use super::{Client, Endpoint};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClientConfig {
    #[serde(default = "ClientConfig::default_server")]
    pub server: String,

    #[serde(default = "ClientConfig::default_username")]
    pub username: String,

    #[serde(default = "ClientConfig::default_password")]
    pub password: String,

    #[serde(default = "ClientConfig::default_usage")]
    pub usage: String,

    /// Requested token lifetime in seconds, server default when unset.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,

    #[serde(default = "ClientConfig::default_cert_path")]
    pub cert_path: String,

    #[serde(default = "ClientConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl CommonConfig for ClientConfig {
    fn default() -> Self {
        Self {
            server: Self::default_server(),
            username: Self::default_username(),
            password: Self::default_password(),
            usage: Self::default_usage(),
            ttl: None,
            cert_path: Self::default_cert_path(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        // We won't check server url is valid, the Client::new will check it.
        self.server = expandenv("server", &self.server)?;
        if self.server.is_empty() {
            bail!("server cannot be empty");
        }

        if self.server.starts_with("https") {
            self.cert_path = expandenv("cert_path", &self.cert_path)?;
            if self.cert_path.is_empty() {
                ps.ensure_pki_dir()?;
                let path = ps.pki_path.join("cert.pem");
                self.cert_path = format!("{}", path.display());
            }
        }

        // Credentials are checked by the server, not here.
        self.username = expandenv("username", &self.username)?;
        self.password = expandenv("password", &self.password)?;
        self.usage = expandenv("usage", &self.usage)?;

        if self.ttl == Some(0) {
            bail!("ttl must be greater than 0, remove it to use the server default");
        }

        if self.timeout_secs < Self::MIN_TIMEOUT_SECS || self.timeout_secs > Self::MAX_TIMEOUT_SECS
        {
            bail!(
                "timeout_secs should be in range [{},{}], found {}",
                Self::MIN_TIMEOUT_SECS,
                Self::MAX_TIMEOUT_SECS,
                self.timeout_secs
            );
        }

        Ok(())
    }
}

impl Endpoint for ClientConfig {
    fn endpoint(&self) -> &str {
        &self.server
    }
}

impl ClientConfig {
    const MIN_TIMEOUT_SECS: u64 = 1;
    const MAX_TIMEOUT_SECS: u64 = 600;

    pub fn build_client(&self) -> Result<Client> {
        Client::new(
            self,
            &self.cert_path,
            Duration::from_secs(self.timeout_secs),
        )
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }

    pub fn token_request(&self) -> TokenRequest {
        let req = TokenRequest::new(&self.usage);
        match self.ttl {
            Some(ttl) => req.with_ttl(ttl),
            None => req,
        }
    }

    pub fn default_server() -> String {
        String::from("http://127.0.0.1:7881")
    }

    pub fn default_username() -> String {
        String::new()
    }

    pub fn default_password() -> String {
        String::new()
    }

    pub fn default_usage() -> String {
        String::from("cli")
    }

    pub fn default_cert_path() -> String {
        String::new()
    }

    pub fn default_timeout_secs() -> u64 {
        30
    }
}
