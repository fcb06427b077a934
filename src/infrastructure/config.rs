use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_BIND: &str = "0.0.0.0:3001";
const DEFAULT_DATA_FILE: &str = "data/dashboards.json";
const DEFAULT_ENDPOINT: &str = "http://localhost:3001/api/dashboards";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    /// Hub URL or token missing; the app cannot talk to the hub.
    #[error("hub connection is not configured (set HA_HOST and HA_TOKEN or save credentials)")]
    HubNotConfigured,

    #[error("credentials file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode credentials: {0}")]
    Encode(#[from] toml::ser::Error),
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub persistence: PersistenceSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            data_file: default_data_file(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PersistenceSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

/// Hub connection: base URL and long-lived access token.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct HubSettings {
    pub host: String,
    pub token: String,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_data_file() -> String {
    DEFAULT_DATA_FILE.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

/// Load `config/server` (any supported format, optional) overlaid with
/// `DASHBOARD__SECTION__KEY` environment variables.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    app_config_from(
        config::File::with_name("config/server").required(false),
        config::Environment::with_prefix("DASHBOARD").separator("__"),
    )
}

fn app_config_from<S>(file: S, env: config::Environment) -> Result<AppConfig, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .add_source(file)
        .add_source(env)
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Hub settings from `HA_HOST` / `HA_TOKEN`, falling back to the saved
/// credentials file. Either value missing or blank means not configured.
pub fn load_hub_settings(credentials: &Path) -> Result<HubSettings, ConfigError> {
    hub_settings_from(credentials, config::Environment::with_prefix("HA"))
}

fn hub_settings_from(
    credentials: &Path,
    env: config::Environment,
) -> Result<HubSettings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(
            config::File::from(credentials)
                .format(config::FileFormat::Toml)
                .required(false),
        )
        .add_source(env)
        .build()?;

    let host = settings.get_string("host").unwrap_or_default();
    let token = settings.get_string("token").unwrap_or_default();
    if host.trim().is_empty() || token.trim().is_empty() {
        return Err(ConfigError::HubNotConfigured);
    }

    Ok(HubSettings {
        host: host.trim_end_matches('/').to_string(),
        token,
    })
}

/// Persist hub credentials for later sessions.
pub fn save_hub_settings(credentials: &Path, settings: &HubSettings) -> Result<(), ConfigError> {
    if let Some(parent) = credentials.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(credentials, toml::to_string(settings)?)?;
    Ok(())
}

/// Forget saved hub credentials (logout).
pub fn clear_hub_settings(credentials: &Path) -> Result<(), ConfigError> {
    match std::fs::remove_file(credentials) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
