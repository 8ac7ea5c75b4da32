use config::{Config, Environment, File, Map};
use cwatch_domain::constants::{CONFIG_FILE, ENV_PREFIX};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Custom error type for config loading.
#[cwatch_derive::cwatch_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads configuration from an optional file overlaid with environment variables.
///
/// Layers, lowest precedence first:
/// 1. **Defaults**: whatever `T`'s `#[serde(default)]` provides.
/// 2. **File**: `path` (or `server` in the working directory when `None`). The
///    extension may be omitted; `server.toml`, `server.json`, ... are all found.
///    A missing file is not an error.
/// 3. **Environment**: variables prefixed with `CWATCH__`, nested keys separated
///    by `__` (e.g., `CWATCH__SERVER__PORT=8080` maps to `server.port`).
///
/// # Errors
/// Returns [`ConfigError::Config`] when the file cannot be parsed or a value
/// does not fit the target type.
///
/// # Example
/// ```rust
/// use cwatch_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_config_with_env(path, None)
}

/// Same as [`load_config`], reading overrides from `vars` instead of the
/// process environment when given.
fn load_config_with_env<T>(
    path: Option<impl AsRef<Path>>,
    vars: Option<Map<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let path = path.map_or_else(|| PathBuf::from(CONFIG_FILE), |p| p.as_ref().to_path_buf());

    Config::builder()
        .add_source(File::from(path.as_path()).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true).source(vars),
        )
        .build()
        .context(format!("Failed to build config from {}", path.display()))?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cwatch_domain::config::ApiConfig;
    use std::fs;
    use tempfile::tempdir;

    fn vars(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let cfg: ApiConfig =
            load_config_with_env(Some(dir.path().join("absent")), Some(Map::new())).unwrap();

        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.dataset.size, 10_000);
        assert!(cfg.profiler.enabled);
    }

    #[test]
    fn file_is_found_without_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("server.toml"), "[server]\nport = 8081\n\n[dataset]\nsize = 16\n")
            .unwrap();

        let cfg: ApiConfig =
            load_config_with_env(Some(dir.path().join("server")), Some(Map::new())).unwrap();

        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.dataset.size, 16);
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("server.toml"), "[server]\nport = 8081\n").unwrap();

        let env = vars(&[
            ("CWATCH__SERVER__PORT", "9090"),
            ("CWATCH__PROFILER__ENABLED", "false"),
            ("UNRELATED__SERVER__PORT", "1"),
        ]);
        let cfg: ApiConfig = load_config_with_env(Some(dir.path().join("server")), Some(env)).unwrap();

        assert_eq!(cfg.server.port, 9090);
        assert!(!cfg.profiler.enabled);
    }

    #[test]
    fn malformed_value_is_reported() {
        let dir = tempdir().unwrap();
        let env = vars(&[("CWATCH__SERVER__PORT", "not-a-port")]);
        let err = load_config_with_env::<ApiConfig>(Some(dir.path().join("server")), Some(env))
            .unwrap_err();

        assert!(err.to_string().contains("Failed to deserialize config"));
    }
}
