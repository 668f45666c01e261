mod api;
mod defaults;
mod validation;

use crate::cli::Args;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub use api::{ApiConfig, AuthConfig};
pub use defaults::DEFAULT_API_BASE_URL;
pub use validation::{expand_env_var_in_string, normalize_base_url, parse_bool};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout: Duration,
    /// Secret the backend signs access credentials with. The route gate is
    /// unavailable without it.
    pub access_secret: Option<String>,
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JsonConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let json_config = JsonConfig::load()?;
        Self::resolve(args, &json_config, |key| env::var(key).ok())
    }

    /// Layer CLI args > environment > config file > defaults.
    pub fn resolve<F>(args: &Args, json_config: &JsonConfig, env_var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = args
            .api_url
            .clone()
            .or_else(|| env_var("EVENTMATES_API_URL"))
            .or_else(|| json_config.api.base_url.clone())
            .map(|url| expand_env_var_in_string(&url))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = normalize_base_url(&api_base_url)?;

        let timeout_secs = env_var("EVENTMATES_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .or(json_config.api.timeout_secs)
            .unwrap_or_else(defaults::default_timeout_secs);

        let access_secret = env_var("JWT_ACCESS_SECRET")
            .or_else(|| json_config.auth.access_secret.clone())
            .map(|s| expand_env_var_in_string(&s))
            .filter(|s| !s.is_empty() && !s.starts_with("${"));

        let verbose = args.verbose
            || env_var("EVENTMATES_VERBOSE")
                .and_then(|v| parse_bool(&v))
                .or(json_config.session.verbose)
                .unwrap_or_else(defaults::default_verbose);

        Ok(Config {
            api_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            access_secret,
            verbose,
        })
    }
}

impl JsonConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        // No config file found, return default
        Ok(JsonConfig::default())
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );

        if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))
        }
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".eventmates.yaml"),
            PathBuf::from(".eventmates.yml"),
            PathBuf::from(".eventmates.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("eventmates");
            paths.push(config_dir.join("eventmates.yaml"));
            paths.push(config_dir.join("eventmates.yml"));
            paths.push(config_dir.join("eventmates.json"));
        }

        paths
    }
}
