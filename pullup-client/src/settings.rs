use crate::backend::BackendKind;
use crate::mock::MockLatency;
use crate::token_store::FileTokenStore;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File as ConfigFile, FileFormat};
use eyre::{eyre, Context, Result};
use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

const EXAMPLE_CONFIG: &str = include_str!("../config.toml");

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct Settings {
    pub server_address: String,
    pub timeout_secs: u64,
    pub token_path: String,
    pub backend: BackendKind,
    pub mock_latency: bool,
}

impl Settings {
    /// Defaults only. `new` layers the config file and then the environment on top.
    pub fn builder() -> Result<ConfigBuilder<DefaultState>> {
        let data_dir = pullup_common::utils::data_dir();
        let token_path = data_dir.join("session");

        Ok(Config::builder()
            .set_default("server_address", "http://127.0.0.1:8000")?
            .set_default("timeout_secs", 10)?
            .set_default("token_path", token_path.to_str())?
            .set_default("backend", "real")?
            .set_default("mock_latency", true)?)
    }

    fn environment() -> Environment {
        Environment::with_prefix("pullup")
            .prefix_separator("_")
            .separator("__")
    }

    pub fn new() -> Result<Self> {
        let config_dir = pullup_common::utils::config_dir();
        let data_dir = pullup_common::utils::data_dir();

        create_dir_all(&config_dir)
            .wrap_err_with(|| format!("Failed to create dir {config_dir:?}"))?;
        create_dir_all(&data_dir).wrap_err_with(|| format!("Failed to create dir {data_dir:?}"))?;

        let mut config_file = if let Ok(p) = std::env::var("PULLUP_CONFIG_DIR") {
            PathBuf::from(p)
        } else {
            config_dir
        };

        config_file.push("config.toml");

        let mut config_builder = Self::builder()?;
        config_builder = if config_file.exists() {
            let path = config_file
                .to_str()
                .ok_or_else(|| eyre!("Config path {config_file:?} is not valid utf-8"))?;
            config_builder.add_source(ConfigFile::new(path, FileFormat::Toml))
        } else {
            let mut file = File::create(&config_file).wrap_err("Failed to create config file")?;
            file.write_all(EXAMPLE_CONFIG.as_bytes())
                .wrap_err("Failed to write default config file")?;
            config_builder
        };

        Self::from_builder(config_builder.add_source(Self::environment()))
    }

    /// Settings from the defaults and the environment, without touching the filesystem.
    pub fn from_env() -> Result<Self> {
        Self::from_builder(Self::builder()?.add_source(Self::environment()))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let mut settings: Settings = builder
            .build()?
            .try_deserialize()
            .map_err(|e| eyre!("Failed to deserialize {}", e))?;

        settings.token_path = expand_shell(&settings.token_path)?;
        settings.server_address = settings.server_address.trim_end_matches('/').to_string();

        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn token_store(&self) -> FileTokenStore {
        FileTokenStore::new(&self.token_path)
    }

    pub fn latency(&self) -> MockLatency {
        if self.mock_latency {
            MockLatency::default()
        } else {
            MockLatency::none()
        }
    }
}

fn expand_shell(value: &str) -> Result<String> {
    Ok(shellexpand::full(value)?.to_string())
}
