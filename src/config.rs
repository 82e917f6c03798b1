use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::search::SERPSTACK_SEARCH_URL;

#[derive(Debug, Clone)]
pub struct Config {
    /// Unset is allowed at startup; every analysis then fails with a configuration error.
    pub serpstack_api_key: Option<String>,
    pub serpstack_base_url: String,
    pub search_result_count: u32,
    pub search_timeout: Duration,
    pub bind_addr: String,
    pub static_dir: PathBuf,
    pub metrics_seed: Option<u64>,
}

impl Config {
    /// Reads the process environment, loading `.env` first if present.
    pub fn from_env() -> Result<Config> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            serpstack_api_key: get_env_opt(&lookup, "SERPSTACK_API_KEY"),
            serpstack_base_url: get_env_or_default(
                &lookup,
                "SERPSTACK_BASE_URL",
                SERPSTACK_SEARCH_URL,
            ),
            search_result_count: get_parsed_or_default(&lookup, "SEARCH_RESULT_COUNT", 100)?,
            search_timeout: Duration::from_secs(get_parsed_or_default(
                &lookup,
                "SEARCH_TIMEOUT_SECS",
                30,
            )?),
            bind_addr: get_env_or_default(&lookup, "BIND_ADDR", "0.0.0.0:3000"),
            static_dir: PathBuf::from(get_env_or_default(&lookup, "STATIC_DIR", "static")),
            metrics_seed: get_env_opt(&lookup, "METRICS_SEED")
                .map(|raw| parse_value("METRICS_SEED", &raw))
                .transpose()?,
        })
    }
}

fn get_env_opt<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn get_env_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get_env_opt(lookup, key).unwrap_or_else(|| default.to_string())
}

fn get_parsed_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get_env_opt(lookup, key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .with_context(|| format!("Invalid value for environment variable {key}: {raw:?}"))
}
