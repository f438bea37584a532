use std::collections::HashMap;
use std::path::PathBuf;

use notewell_core::config_utils::{
    to_array_config, to_boolean_config, to_integer_config, ConfigError, RawConfig,
};

/// Raw configuration values: an optional JSON file overlaid by the process
/// environment.
#[derive(Debug, Default, Clone)]
pub struct ConfigSource {
    file: HashMap<String, RawConfig>,
    env: HashMap<String, String>,
}

impl ConfigSource {
    /// Load the JSON file named by `CONFIG_FILE` (if any) and snapshot the
    /// environment.
    ///
    /// A missing or unreadable file is logged and ignored; only the
    /// environment is used then.
    pub fn load() -> Self {
        let env: HashMap<String, String> = std::env::vars().collect();
        let file = match env.get("CONFIG_FILE") {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(text) => parse_config_file(&text).unwrap_or_else(|e| {
                    tracing::warn!(path = %path, error = %e, "Ignoring malformed config file");
                    HashMap::new()
                }),
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Config file not readable");
                    HashMap::new()
                }
            },
            None => HashMap::new(),
        };
        Self { file, env }
    }

    /// Build a source from explicit values (used by tests).
    pub fn from_parts(file: HashMap<String, RawConfig>, env: HashMap<String, String>) -> Self {
        Self { file, env }
    }

    /// Look up `key`, preferring the environment over the file.
    pub fn get(&self, key: &str) -> Option<RawConfig> {
        self.env
            .get(key)
            .map(|v| RawConfig::Text(v.clone()))
            .or_else(|| self.file.get(key).cloned())
    }

    fn text(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|v| v.to_string())
            .filter(|v| !v.is_empty())
    }

    fn boolean(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        to_boolean_config(self.get(key))
            .map(|v| v.unwrap_or(default))
            .map_err(|e| e.for_key(key))
    }

    fn integer<T: TryFrom<i64>>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        match to_integer_config(self.get(key)).map_err(|e| e.for_key(key))? {
            None => Ok(default),
            Some(n) => T::try_from(n).map_err(|_| ConfigError::OutOfRange {
                key: key.to_string(),
                value: n.to_string(),
            }),
        }
    }
}

/// Parse a flat JSON object of configuration values.
///
/// Arrays of strings are joined with `,` so they coerce like their
/// environment counterparts; other nested values are skipped.
pub fn parse_config_file(text: &str) -> Result<HashMap<String, RawConfig>, serde_json::Error> {
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)?;
    let values = object
        .into_iter()
        .filter_map(|(key, value)| {
            let raw = match value {
                serde_json::Value::String(s) => RawConfig::Text(s),
                serde_json::Value::Bool(b) => RawConfig::Bool(b),
                serde_json::Value::Number(n) => match n.as_i64() {
                    Some(i) => RawConfig::Integer(i),
                    None => RawConfig::Text(n.to_string()),
                },
                serde_json::Value::Array(items) => RawConfig::Text(
                    items
                        .iter()
                        .filter_map(|item| item.as_str())
                        .collect::<Vec<_>>()
                        .join(","),
                ),
                _ => {
                    tracing::debug!(key = %key, "Skipping nested config value");
                    return None;
                }
            };
            Some((key, raw))
        })
        .collect();
    Ok(values)
}

/// Server configuration.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Public base URL used in redirects and avatar links, without a
    /// trailing slash.
    pub server_url: String,
    /// Allowed CORS origins for the JSON API.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Hard deadline for draining on shutdown, in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Longest note body accepted on creation (default: `100000`).
    pub document_max_length: usize,
    /// Hand out Libravatar URLs for users with an email (default: `true`).
    pub allow_gravatar: bool,
    /// Create notes on first visit to an unknown alias (default: `false`).
    pub allow_free_url: bool,
    /// Enable the GitHub gist export action (default: `false`).
    pub gist_enabled: bool,
    /// Lock or unix socket file removed on shutdown.
    pub lock_path: Option<PathBuf>,
    /// Source repository URL reported on `/status`.
    pub source_repository: Option<String>,
    /// Directory whose `.git` identifies the running build (default: `.`).
    pub app_root: PathBuf,
}

impl ServerConfig {
    /// Load configuration from `CONFIG_FILE` and the environment.
    ///
    /// | Key                    | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `SERVER_URL`           | `http://localhost:<PORT>`  |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `DOCUMENT_MAX_LENGTH`  | `100000`                   |
    /// | `ALLOW_GRAVATAR`       | `true`                     |
    /// | `ALLOW_FREE_URL`       | `false`                    |
    /// | `GITHUB_GIST_ENABLED`  | `false`                    |
    /// | `SOCKET_PATH`          | unset                      |
    /// | `SOURCE_REPOSITORY`    | unset                      |
    /// | `APP_ROOT`             | `.`                        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&ConfigSource::load())
    }

    pub fn from_source(source: &ConfigSource) -> Result<Self, ConfigError> {
        let host = source.text("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = source.integer("PORT", 3000)?;

        let server_url = source
            .text("SERVER_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let cors_origins: Vec<String> = to_array_config(
            source.text("CORS_ORIGINS").as_deref(),
            ",",
            vec!["http://localhost:5173".to_string()],
        )
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();

        Ok(Self {
            host,
            port,
            server_url,
            cors_origins,
            request_timeout_secs: source.integer("REQUEST_TIMEOUT_SECS", 30)?,
            shutdown_timeout_secs: source.integer("SHUTDOWN_TIMEOUT_SECS", 30)?,
            document_max_length: source.integer("DOCUMENT_MAX_LENGTH", 100_000)?,
            allow_gravatar: source.boolean("ALLOW_GRAVATAR", true)?,
            allow_free_url: source.boolean("ALLOW_FREE_URL", false)?,
            gist_enabled: source.boolean("GITHUB_GIST_ENABLED", false)?,
            lock_path: source.text("SOCKET_PATH").map(PathBuf::from),
            source_repository: source.text("SOURCE_REPOSITORY"),
            app_root: source
                .text("APP_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        })
    }
}
