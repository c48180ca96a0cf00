use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::{CommonConfig, PathSet};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_name")]
    pub name: LogName,

    #[serde(default = "LogConfig::default_level")]
    pub level: LogLevel,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum LogName {
    #[serde(rename = "stdout")]
    Stdout,
    #[serde(rename = "stderr")]
    Stderr,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "debug")]
    Debug,
}

impl CommonConfig for LogConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            level: Self::default_level(),
        }
    }

    fn complete(&mut self, _ps: &PathSet) -> Result<()> {
        Ok(())
    }
}

impl LogConfig {
    // Token output goes to stdout, keep logs out of its way.
    pub fn default_name() -> LogName {
        LogName::Stderr
    }

    pub fn default_level() -> LogLevel {
        LogLevel::Warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let cfg: LogConfig = toml::from_str("name = \"stdout\"\nlevel = \"debug\"\n").unwrap();
        assert_eq!(cfg.name, LogName::Stdout);
        assert_eq!(cfg.level, LogLevel::Debug);

        let cfg: LogConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.name, LogName::Stderr);
        assert_eq!(cfg.level, LogLevel::Warning);

        assert!(toml::from_str::<LogConfig>("level = \"trace\"\n").is_err());
    }
}
