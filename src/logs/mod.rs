pub mod config;

use std::io::{self, IsTerminal};
use std::time::SystemTime;

use anyhow::{Context, Result};
use config::{LogConfig, LogLevel, LogName};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

pub fn init_logger(cfg: &LogConfig) -> Result<()> {
    let level = match cfg.level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warning => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
    };

    let is_terminal = match cfg.name {
        LogName::Stdout => io::stdout().is_terminal(),
        LogName::Stderr => io::stderr().is_terminal(),
    };

    let colors = ColoredLevelConfig::new()
        .info(Color::Green)
        .debug(Color::Magenta);

    let dispatch = fern::Dispatch::new()
        .format(move |out, message, record| {
            let now = humantime::format_rfc3339_millis(SystemTime::now());
            if is_terminal {
                out.finish(format_args!(
                    "{} [{}] {}",
                    now,
                    colors.color(record.level()),
                    message
                ))
            } else {
                out.finish(format_args!("{} [{}] {}", now, record.level(), message))
            }
        })
        .level(level);

    let dispatch = match cfg.name {
        LogName::Stdout => dispatch.chain(io::stdout()),
        LogName::Stderr => dispatch.chain(io::stderr()),
    };
    dispatch.apply().context("init logger")?;

    Ok(())
}
