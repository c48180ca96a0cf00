use std::ffi::OsString;
use std::path::PathBuf;
use std::{env, fs, io};

use anyhow::{bail, Context, Result};
use clap::Args;
use log::warn;
use serde::de::DeserializeOwned;

/// Directories the configuration files and certificates are read from.
pub struct PathSet {
    pub config_path: PathBuf,
    pub pki_path: PathBuf,
}

impl PathSet {
    const CONFIG_ENV: &'static str = "TOKENAUTH_CONFIG";
    const ROOT_CONFIG_PATH: &'static str = "/etc/tokenauth";

    /// Resolve the config directory and create it if missing. An explicit
    /// path wins, then `$TOKENAUTH_CONFIG`, then `/etc/tokenauth` for root,
    /// then `~/.config/tokenauth`.
    ///
    /// The pki directory is only located here; it is created by
    /// [`PathSet::ensure_pki_dir`] once something needs a certificate from it.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => Self::default_config_path(
                env::var_os(Self::CONFIG_ENV),
                running_as_root(),
                env::var_os("HOME").or_else(|| env::var_os("USERPROFILE")),
            )?,
        };

        fs::create_dir_all(&config_path)
            .with_context(|| format!("ensure config directory: {}", config_path.display()))?;

        let pki_path = config_path.join("pki");
        Ok(Self {
            config_path,
            pki_path,
        })
    }

    fn default_config_path(
        env_path: Option<OsString>,
        root: bool,
        home: Option<OsString>,
    ) -> Result<PathBuf> {
        if let Some(path) = env_path.filter(|path| !path.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        if root {
            return Ok(PathBuf::from(Self::ROOT_CONFIG_PATH));
        }
        match home.filter(|home| !home.is_empty()) {
            Some(home) => Ok(PathBuf::from(home).join(".config").join("tokenauth")),
            None => bail!(
                "could not determine home directory, set {} or pass --config-path",
                Self::CONFIG_ENV
            ),
        }
    }

    /// Create the pki directory so a certificate can be dropped into it.
    pub fn ensure_pki_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.pki_path)
            .with_context(|| format!("ensure pki directory: {}", self.pki_path.display()))
    }

    /// Load `<name>.toml` from the config directory, falling back to
    /// `default_func` when it does not exist. Either way the result has been
    /// through [`CommonConfig::complete`], so callers never see a config with
    /// unexpanded or unchecked values.
    pub fn load_config<T, F>(&self, name: &str, default_func: F) -> Result<T>
    where
        T: CommonConfig + DeserializeOwned,
        F: FnOnce() -> T,
    {
        let path = self.config_path.join(format!("{name}.toml"));
        let mut cfg: T = match fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s)
                .with_context(|| format!("parse config toml: {}", path.display()))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!("Config file for {name} not found, using defaults");
                default_func()
            }
            Err(err) => {
                return Err(err).context(format!("read config file: {}", path.display()));
            }
        };

        cfg.complete(self)
            .with_context(|| format!("validate {name} config"))?;
        Ok(cfg)
    }
}

#[cfg(unix)]
fn running_as_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn running_as_root() -> bool {
    false
}

/// A config section stored as `<name>.toml` under [`PathSet::config_path`].
pub trait CommonConfig {
    /// The values used when the file does not exist. These still go through
    /// [`CommonConfig::complete`].
    fn default() -> Self;

    /// Turn freshly parsed values into usable ones, or fail.
    ///
    /// After a successful call every string field has had `$VAR`/`~`
    /// expansion applied (see [`expandenv`]), relative locations are resolved
    /// against `ps`, and every local range check holds. For
    /// [`ClientConfig`](crate::client::config::ClientConfig) that means:
    /// `server` is non-empty, an https server has a `cert_path` (defaulting to
    /// `<pki>/cert.pem`, with the pki directory created), `ttl` is unset or
    /// positive, and `timeout_secs` is within bounds. Checks that need the
    /// server, such as the credentials themselves, are left to it.
    fn complete(&mut self, ps: &PathSet) -> Result<()>;
}

/// Common arguments for commands that need to read configuration.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// The config directory, default is `~/.config/tokenauth`, or
    /// `/etc/tokenauth` when running as root.
    #[arg(short = 'c', long)]
    pub config_path: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn build_path_set(&self) -> Result<PathSet> {
        PathSet::new(self.config_path.clone())
    }
}

/// Expand `$VAR`, `${VAR}` and a leading `~` in a config value, see
/// [`shellexpand::full`]. `name` is the field, used in the error message.
pub fn expandenv(name: &str, s: impl AsRef<str>) -> Result<String> {
    let s =
        shellexpand::full(s.as_ref()).with_context(|| format!("expand env value for '{name}'"))?;
    Ok(s.to_string())
}
