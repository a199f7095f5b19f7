use std::{env, net::IpAddr, path::PathBuf, time::Duration};
use thiserror::Error;

pub const DEFAULT_TARGET_WEIGHT: f64 = 75.0;
pub const DEFAULT_MODEL: &str = "deepseek-v3-241226";

#[derive(Debug, Error, PartialEq)]
#[error("invalid value {value:?} for {name}: {reason}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    File,
    Memory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind: IpAddr,
    pub port: u16,
    pub data_dir: PathBuf,
    pub store: StoreKind,
    pub target_weight: f64,
    pub ai: Option<AiConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let store = match var("APP_STORE").as_deref().map(str::trim) {
            None | Some("file") => StoreKind::File,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(ConfigError {
                    name: "APP_STORE",
                    value: other.to_string(),
                    reason: "expected 'file' or 'memory'",
                });
            }
        };

        let target_weight =
            parse_or("TARGET_WEIGHT", var("TARGET_WEIGHT"), DEFAULT_TARGET_WEIGHT)?;
        if !(target_weight.is_finite() && target_weight > 0.0) {
            return Err(ConfigError {
                name: "TARGET_WEIGHT",
                value: target_weight.to_string(),
                reason: "must be a positive number",
            });
        }

        let ai = match var("AI_API_URL") {
            Some(endpoint) => Some(AiConfig {
                endpoint: endpoint.trim().to_string(),
                api_key: var("AI_API_KEY"),
                model: var("AI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                temperature: parse_or("AI_TEMPERATURE", var("AI_TEMPERATURE"), 0.7)?,
                max_tokens: parse_or("AI_MAX_TOKENS", var("AI_MAX_TOKENS"), 800)?,
                timeout: Duration::from_secs(parse_or(
                    "AI_TIMEOUT_SECS",
                    var("AI_TIMEOUT_SECS"),
                    60,
                )?),
            }),
            None => None,
        };

        Ok(Self {
            bind: parse_or("BIND", var("BIND"), IpAddr::from([0, 0, 0, 0]))?,
            port: parse_or("PORT", var("PORT"), 8080)?,
            data_dir: var("APP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            store,
            target_weight,
            ai,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError {
            name,
            value,
            reason: "could not be parsed",
        }),
    }
}
