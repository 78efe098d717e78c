use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default = "default_languages")]
    pub languages: Vec<LanguageConfig>,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            model: ModelConfig::default(),
            database: DatabaseConfig::default(),
            languages: default_languages(),
            metrics: MetricsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// "text" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// Directory holding `index.html` and any other static assets
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            static_dir: default_static_dir(),
        }
    }
}

/// Locations of the fitted artifacts and input limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default = "default_scaler_path")]
    pub scaler_path: String,
    #[serde(default = "default_classifier_path")]
    pub classifier_path: String,
    /// Longest accepted input, in characters
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            scaler_path: default_scaler_path(),
            classifier_path: default_classifier_path(),
            max_text_length: default_max_text_length(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_logs_limit")]
    pub default_logs_limit: usize,
    /// Upper bound applied to `?limit=` on the logs endpoint
    #[serde(default = "default_max_logs_limit")]
    pub max_logs_limit: usize,
    /// When true a failed log write turns a successful prediction into a 500.
    /// When false the prediction is returned and the failure is only logged.
    #[serde(default = "default_fail_on_write_error")]
    pub fail_on_write_error: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
            default_logs_limit: default_logs_limit(),
            max_logs_limit: default_max_logs_limit(),
            fail_on_write_error: default_fail_on_write_error(),
        }
    }
}

/// One row of the class label -> language table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LanguageConfig {
    pub index: i64,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_endpoint")]
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            endpoint: default_metrics_endpoint(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_scaler_path() -> String {
    "models/scaler.json".to_string()
}

fn default_classifier_path() -> String {
    "models/classifier.json".to_string()
}

fn default_max_text_length() -> usize {
    10_000
}

fn default_database_path() -> String {
    "predictions.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_logs_limit() -> usize {
    10
}

fn default_max_logs_limit() -> usize {
    1000
}

fn default_fail_on_write_error() -> bool {
    true
}

fn default_metrics_enabled() -> bool {
    true
}

fn default_metrics_endpoint() -> String {
    "/metrics".to_string()
}

pub fn default_languages() -> Vec<LanguageConfig> {
    [(0, "English", "en"), (1, "Russian", "ru"), (2, "Spanish", "es")]
        .into_iter()
        .map(|(index, name, code)| LanguageConfig {
            index,
            name: name.to_string(),
            code: code.to_string(),
        })
        .collect()
}

/// Load configuration from `path` (optional) layered with `LANG_DETECT__*`
/// environment variables, then validate it.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("LANG_DETECT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.server.port == 0 {
        anyhow::bail!("Server port must be non-zero");
    }

    match cfg.server.log_format.as_str() {
        "text" | "json" => {}
        other => anyhow::bail!("Invalid log format '{}', expected 'text' or 'json'", other),
    }

    if cfg.model.scaler_path.trim().is_empty() {
        anyhow::bail!("Model scaler_path cannot be empty");
    }
    if cfg.model.classifier_path.trim().is_empty() {
        anyhow::bail!("Model classifier_path cannot be empty");
    }
    if cfg.model.max_text_length < crate::handlers::predict::MIN_TEXT_LENGTH {
        anyhow::bail!(
            "max_text_length must be at least {}",
            crate::handlers::predict::MIN_TEXT_LENGTH
        );
    }

    if cfg.database.path.trim().is_empty() {
        anyhow::bail!("Database path cannot be empty");
    }
    if cfg.database.max_connections == 0 {
        anyhow::bail!("Database max_connections must be at least 1");
    }
    if cfg.database.default_logs_limit > cfg.database.max_logs_limit {
        anyhow::bail!(
            "default_logs_limit ({}) exceeds max_logs_limit ({})",
            cfg.database.default_logs_limit,
            cfg.database.max_logs_limit
        );
    }

    let mut seen = HashSet::new();
    for lang in &cfg.languages {
        if !seen.insert(lang.index) {
            anyhow::bail!("Duplicate language index: {}", lang.index);
        }
        if lang.name.trim().is_empty() || lang.code.trim().is_empty() {
            anyhow::bail!("Language {} must have a name and a code", lang.index);
        }
    }

    if cfg.metrics.enabled && !cfg.metrics.endpoint.starts_with('/') {
        anyhow::bail!("Metrics endpoint must start with '/': {}", cfg.metrics.endpoint);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = Config::default();
        assert!(validate_config(&cfg).is_ok());
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.database.default_logs_limit, 10);
        assert!(cfg.database.fail_on_write_error);
    }

    #[test]
    fn test_validate_rejects_duplicate_language_index() {
        let mut cfg = Config::default();
        cfg.languages.push(LanguageConfig {
            index: 0,
            name: "German".to_string(),
            code: "de".to_string(),
        });

        let result = validate_config(&cfg);
        assert!(result.unwrap_err().to_string().contains("Duplicate language index"));
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut cfg = Config::default();
        cfg.server.log_format = "yaml".to_string();
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_validate_rejects_tiny_max_text_length() {
        let mut cfg = Config::default();
        cfg.model.max_text_length = 2;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090
log_format = "json"

[database]
path = "/tmp/preds.db"
fail_on_write_error = false

[[languages]]
index = 0
name = "English"
code = "en"

[[languages]]
index = 7
name = "German"
code = "de"
"#
        )
        .unwrap();

        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.log_format, "json");
        assert_eq!(cfg.database.path, "/tmp/preds.db");
        assert!(!cfg.database.fail_on_write_error);
        assert_eq!(cfg.languages.len(), 2);
        assert_eq!(cfg.languages[1].code, "de");
        assert_eq!(cfg.model.classifier_path, "models/classifier.json");
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.languages, default_languages());
    }
}
