//! Scanner configuration.
//!
//! Values are layered: built-in defaults, then an optional file, then
//! `SWEEP_`-prefixed environment variables.

pub mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use sweep_catalog::SpectrumInversion;
use tracing::debug;

use crate::error::{ErrorKind, Result};

const ENV_PREFIX: &str = "SWEEP_";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Bounded wait for group metadata after each tune, in milliseconds.
    pub group_info_timeout_ms: u64,
    /// Bounded wait for the network information table, in milliseconds.
    pub network_info_timeout_ms: u64,
    /// First inversion hypothesis for cable carriers configured as `Auto`.
    pub initial_inversion: SpectrumInversion,
    /// Refuse to start a pass while the device is streaming to consumers.
    pub require_idle_device: bool,
    pub thread_name: String,
}
impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            group_info_timeout_ms: 5000,
            network_info_timeout_ms: 5000,
            initial_inversion: SpectrumInversion::On,
            require_idle_device: true,
            thread_name: "sweep-scanner".to_string(),
        }
    }
}

impl ScannerConfig {
    /// Loads the layered configuration.
    ///
    /// With no explicit `path`, `config.toml` in the platform configuration
    /// directory is used if it exists. An explicit path must exist; its
    /// format follows the extension (`toml`, `yaml`/`yml` or `json`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        let file = match path {
            Some(path) if !path.exists() => {
                exn::bail!(ErrorKind::Invalid(format!("configuration file {} does not exist", path.display())))
            },
            Some(path) => Some(path.to_path_buf()),
            None => default_path(),
        };
        if let Some(file) = file {
            debug!(path = %file.display(), "loading configuration file");
            figment = match file.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
                Some("toml") => figment.merge(Toml::file(&file)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(&file)),
                Some("json") => figment.merge(Json::file(&file)),
                _ => exn::bail!(ErrorKind::Invalid(format!("unsupported configuration format: {}", file.display()))),
            };
        }
        let config: Self = figment.merge(Env::prefixed(ENV_PREFIX)).extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.group_info_timeout_ms == 0 {
            exn::bail!(ErrorKind::Invalid("group_info_timeout_ms must be positive".to_string()));
        }
        if self.network_info_timeout_ms == 0 {
            exn::bail!(ErrorKind::Invalid("network_info_timeout_ms must be positive".to_string()));
        }
        if self.thread_name.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("thread_name must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn group_info_timeout(&self) -> Duration {
        Duration::from_millis(self.group_info_timeout_ms)
    }

    pub fn network_info_timeout(&self) -> Duration {
        Duration::from_millis(self.network_info_timeout_ms)
    }
}

fn default_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "sweep")?;
    Some(dirs.config_dir().join(CONFIG_FILE)).filter(|path| path.exists())
}
