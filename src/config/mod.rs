//! Configuration management for `issuetrack`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`IT_*`, `ISSUETRACK_URL`, `ISSUETRACK_API_KEY`)
//! 3. Project config (.issuetrack/config.yaml)
//! 4. User config (~/.config/issuetrack/config.yaml)
//! 5. Defaults

use crate::error::{Result, TrackError};
use crate::gateway::{IssueGateway, RestConfig, RestGateway};
use crate::session::Session;
use crate::storage::SqliteStorage;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Name of the per-project directory.
pub const PROJECT_DIR_NAME: &str = ".issuetrack";
/// Default database filename.
const DEFAULT_DB_FILENAME: &str = "issues.db";
/// Default `SQLite` busy timeout in milliseconds.
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 30_000;

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Local `SQLite` file.
    #[default]
    Sqlite,
    /// Hosted table API.
    Rest,
}

impl Backend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Rest => "rest",
        }
    }

    /// Name of the identity provider paired with this backend.
    #[must_use]
    pub const fn provider_name(self) -> &'static str {
        match self {
            Self::Sqlite => "local",
            Self::Rest => "remote",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "local" => Ok(Self::Sqlite),
            "rest" | "remote" | "supabase" => Ok(Self::Rest),
            other => Err(TrackError::Config(format!(
                "unknown backend '{other}' (expected sqlite or rest)"
            ))),
        }
    }
}

/// A flat key/value configuration layer.
///
/// Keys are stored in canonical form (lowercase, `.` separators), so
/// `rest.api-key`, `rest_api_key` and `REST_API_KEY` all name the same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
}

impl ConfigLayer {
    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    /// Set a key, normalizing it.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(normalize_key(key), value.into());
    }

    /// Look up a key in any spelling. Blank values count as unset.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&normalize_key(key))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Build a layer from a YAML file path. Missing files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&contents)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(layer_from_yaml_value(&value))
    }

    /// Build a layer from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(env::vars())
    }

    /// Build a layer from `(name, value)` pairs shaped like environment variables.
    #[must_use]
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut layer = Self::default();
        for (key, value) in vars {
            match key.as_str() {
                "ISSUETRACK_URL" => layer.set("rest.url", value),
                "ISSUETRACK_API_KEY" => layer.set("rest.api-key", value),
                _ => {
                    if let Some(stripped) = key.strip_prefix("IT_") {
                        layer.set(stripped, value);
                    }
                }
            }
        }
        layer
    }
}

/// CLI overrides for config loading (optional).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db: Option<PathBuf>,
    pub backend: Option<String>,
    pub lock_timeout: Option<u64>,
    pub json: Option<bool>,
    pub quiet: Option<bool>,
    pub no_color: Option<bool>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();

        if let Some(path) = &self.db {
            layer.set("db", path.to_string_lossy());
        }
        if let Some(backend) = &self.backend {
            layer.set("backend", backend.clone());
        }
        if let Some(lock_timeout) = self.lock_timeout {
            layer.set("lock-timeout", lock_timeout.to_string());
        }
        if let Some(json) = self.json {
            layer.set("json", json.to_string());
        }
        if let Some(quiet) = self.quiet {
            layer.set("quiet", quiet.to_string());
        }
        if self.no_color == Some(true) {
            layer.set("color", "false");
        }

        layer
    }
}

/// Discover the project `.issuetrack` directory.
///
/// Honors `ISSUETRACK_DIR` when set, otherwise walks up from `start` (or CWD).
#[must_use]
pub fn discover_project_dir(start: Option<&Path>) -> Option<PathBuf> {
    if let Ok(value) = env::var("ISSUETRACK_DIR") {
        let path = PathBuf::from(value.trim());
        if !value.trim().is_empty() && path.is_dir() {
            return Some(path);
        }
    }

    let mut current = match start {
        Some(path) => path.to_path_buf(),
        None => env::current_dir().ok()?,
    };

    loop {
        let candidate = current.join(PROJECT_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Per-user config directory (`~/.config/issuetrack`).
#[must_use]
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("issuetrack"))
}

/// Load project config (.issuetrack/config.yaml).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_dir: &Path) -> Result<ConfigLayer> {
    ConfigLayer::from_yaml(&project_dir.join("config.yaml"))
}

/// Load user config (~/.config/issuetrack/config.yaml).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<ConfigLayer> {
    match user_config_dir() {
        Some(dir) => ConfigLayer::from_yaml(&dir.join("config.yaml")),
        None => Ok(ConfigLayer::default()),
    }
}

/// Default config layer (lowest precedence).
#[must_use]
pub fn default_config_layer() -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    layer.set("backend", Backend::Sqlite.as_str());
    layer.set("lock-timeout", DEFAULT_LOCK_TIMEOUT_MS.to_string());
    layer.set("rest.table", "issues");
    layer
}

/// Load configuration with the full precedence order.
///
/// # Errors
///
/// Returns an error if any config file cannot be read or parsed.
pub fn load_config(project_dir: Option<&Path>, cli: &CliOverrides) -> Result<ConfigLayer> {
    let defaults = default_config_layer();
    let user = load_user_config()?;
    let project = match project_dir {
        Some(dir) => load_project_config(dir)?,
        None => ConfigLayer::default(),
    };
    let env_layer = ConfigLayer::from_env();
    let cli_layer = cli.as_layer();

    Ok(ConfigLayer::merge_layers(&[
        defaults, user, project, env_layer, cli_layer,
    ]))
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend: Backend,
    pub db_path: PathBuf,
    pub lock_timeout: u64,
    pub rest_url: Option<String>,
    pub rest_api_key: Option<String>,
    pub rest_table: String,
    pub session_file: PathBuf,
    pub color: bool,
    pub json: bool,
    pub quiet: bool,
}

impl Settings {
    /// Discover the project directory, load every layer, and resolve.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file is malformed or a value is invalid.
    pub fn load(cli: &CliOverrides) -> Result<Self> {
        let project_dir = discover_project_dir(None);
        let layer = load_config(project_dir.as_deref(), cli)?;
        Self::from_layer(&layer, project_dir.as_deref())
    }

    /// Resolve settings from a merged layer.
    ///
    /// Relative paths are joined onto the project directory itself
    /// (`.issuetrack/`, next to the default database) when one exists.
    /// Without a project, the database lives in
    /// `~/.local/share/issuetrack`.
    ///
    /// # Errors
    ///
    /// Returns `Config` for an unknown backend, a non-numeric lock timeout,
    /// or a missing home directory when a default path is needed.
    pub fn from_layer(layer: &ConfigLayer, project_dir: Option<&Path>) -> Result<Self> {
        let backend = layer
            .get("backend")
            .map_or(Ok(Backend::default()), Backend::from_str)?;

        let lock_timeout = match layer.get("lock-timeout") {
            Some(value) => value.parse::<u64>().map_err(|_| {
                TrackError::Config(format!("lock-timeout must be milliseconds, got '{value}'"))
            })?,
            None => DEFAULT_LOCK_TIMEOUT_MS,
        };

        let db_path = match layer.get("db") {
            Some(value) => resolve_relative(PathBuf::from(value), project_dir),
            None => match project_dir {
                Some(dir) => dir.join(DEFAULT_DB_FILENAME),
                None => home_dir()?
                    .join(".local")
                    .join("share")
                    .join("issuetrack")
                    .join(DEFAULT_DB_FILENAME),
            },
        };

        let session_file = match layer.get("session-file") {
            Some(value) => resolve_relative(PathBuf::from(value), project_dir),
            None => home_dir()?
                .join(".config")
                .join("issuetrack")
                .join("session.json"),
        };

        let flag = |key: &str, default: bool| layer.get(key).and_then(parse_bool).unwrap_or(default);

        Ok(Self {
            backend,
            db_path,
            lock_timeout,
            rest_url: layer.get("rest.url").map(str::to_string),
            rest_api_key: layer.get("rest.api-key").map(str::to_string),
            rest_table: layer.get("rest.table").unwrap_or("issues").to_string(),
            session_file,
            color: flag("color", true),
            json: flag("json", false),
            quiet: flag("quiet", false),
        })
    }

    /// Connection settings for the hosted backend.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the URL or API key is missing.
    pub fn rest_config(&self) -> Result<RestConfig> {
        let url = self.rest_url.as_deref().ok_or_else(|| {
            TrackError::Config("rest.url is not set (config or ISSUETRACK_URL)".to_string())
        })?;
        let api_key = self.rest_api_key.as_deref().ok_or_else(|| {
            TrackError::Config("rest.api-key is not set (config or ISSUETRACK_API_KEY)".to_string())
        })?;
        Ok(RestConfig::new(url, api_key).with_table(self.rest_table.clone()))
    }

    /// Open the local database, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the database opened.
    pub fn open_storage(&self) -> Result<SqliteStorage> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        debug!(path = %self.db_path.display(), "Opening database");
        Ok(SqliteStorage::open_with_timeout(
            &self.db_path,
            Some(self.lock_timeout),
        )?)
    }

    /// Open the issue gateway for the configured backend.
    ///
    /// The hosted backend authenticates with the session's access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or is misconfigured.
    pub fn open_gateway(&self, session: Option<&Session>) -> Result<Box<dyn IssueGateway>> {
        match self.backend {
            Backend::Sqlite => Ok(Box::new(self.open_storage()?)),
            Backend::Rest => {
                let token = session.and_then(|s| s.access_token.clone());
                Ok(Box::new(RestGateway::new(self.rest_config()?, token)?))
            }
        }
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| TrackError::Config("cannot determine home directory".to_string()))
}

fn resolve_relative(path: PathBuf, project_dir: Option<&Path>) -> PathBuf {
    match project_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path,
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace(['_', '-'], ".")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn layer_from_yaml_value(value: &serde_yaml::Value) -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    let mut flat = HashMap::new();
    flatten_yaml(value, "", &mut flat);

    for (key, value) in flat {
        layer.set(&key, value);
    }

    layer
}

fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, out: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                let Some(key_str) = key.as_str() else {
                    continue;
                };
                let next_prefix = if prefix.is_empty() {
                    key_str.to_string()
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml(value, &next_prefix, out);
            }
        }
        _ => {
            if let Some(value) = yaml_scalar_to_string(value) {
                out.insert(prefix.to_string(), value);
            }
        }
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}
