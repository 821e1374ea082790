use anyhow::{Context, bail};
use std::str::FromStr;

use crate::hub::HubOptions;

/// Runtime settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `WSPORT`
    pub port: u16,
    /// `WS_PATH`: the only path accepting websocket upgrades.
    pub ws_path: String,
    /// `OUTBOUND_CAPACITY`: events queued per connection before it is dropped.
    pub outbound_capacity: usize,
    /// `ENFORCE_TURN_ORDER`
    pub enforce_turn_order: bool,
    /// `LOG_LEVEL`
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            ws_path: String::from("/ws"),
            outbound_capacity: 256,
            enforce_turn_order: false,
            log_level: tracing::Level::DEBUG,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            port: parse_or(&lookup, "WSPORT", defaults.port)?,
            ws_path: lookup("WS_PATH").unwrap_or(defaults.ws_path),
            outbound_capacity: parse_or(&lookup, "OUTBOUND_CAPACITY", defaults.outbound_capacity)?,
            enforce_turn_order: match lookup("ENFORCE_TURN_ORDER") {
                Some(value) => parse_flag(&value).context("invalid ENFORCE_TURN_ORDER")?,
                None => defaults.enforce_turn_order,
            },
            log_level: parse_or(&lookup, "LOG_LEVEL", defaults.log_level)?,
        };

        if config.outbound_capacity == 0 {
            bail!("OUTBOUND_CAPACITY must be greater than zero");
        }
        if !config.ws_path.starts_with('/') {
            bail!("WS_PATH must start with '/', got {:?}", config.ws_path);
        }
        Ok(config)
    }

    pub fn hub_options(&self) -> HubOptions {
        HubOptions {
            enforce_turn_order: self.enforce_turn_order,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {} {:?}: {}", key, value, e)),
        None => Ok(default),
    }
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => bail!("expected a boolean, got {:?}", other),
    }
}
