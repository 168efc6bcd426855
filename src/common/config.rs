// src/common/config.rs
//! Runtime configuration read from the environment
//! CLI flags can override the product name rule

use std::env;
use thiserror::Error;

use crate::accounts::validators::ProductNameRule;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:3001,http://localhost:5173";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got '{0}'")]
    InvalidPort(String),
    #[error("PRODUCT_NAME_RULE must be 'advance-info-only' or 'unconditional', got '{0}'")]
    InvalidProductNameRule(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub product_name_rule: ProductNameRule,
    pub log_bodies: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cors_origins: split_origins(DEFAULT_CORS_ORIGINS),
            product_name_rule: ProductNameRule::default(),
            log_bodies: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let cors_origins =
            split_origins(&lookup("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string()));

        let product_name_rule = match lookup("PRODUCT_NAME_RULE") {
            Some(raw) => parse_product_name_rule(&raw)
                .ok_or(ConfigError::InvalidProductNameRule(raw))?,
            None => ProductNameRule::default(),
        };

        let log_bodies = lookup("LOG_BODIES")
            .map(|v| v.trim().to_lowercase() == "true")
            .unwrap_or(false);

        Ok(Self {
            port,
            cors_origins,
            product_name_rule,
            log_bodies,
        })
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_product_name_rule(raw: &str) -> Option<ProductNameRule> {
    match raw.trim().to_lowercase().as_str() {
        "advance-info-only" | "advance_info_only" => Some(ProductNameRule::AdvanceInfoOnly),
        "unconditional" => Some(ProductNameRule::Unconditional),
        _ => None,
    }
}

/// CLI argument parsing for the product name rule
pub fn parse_product_name_args<I>(args: I) -> Option<ProductNameRule>
where
    I: IntoIterator<Item = String>,
{
    let mut chosen = None;
    for arg in args {
        match arg.as_str() {
            "--product-name-unconditional" => chosen = Some(ProductNameRule::Unconditional),
            "--product-name-advance-info" => chosen = Some(ProductNameRule::AdvanceInfoOnly),
            _ => {}
        }
    }
    chosen
}

/// Override the product name rule from CLI args
pub fn apply_cli_override(mut config: AppConfig) -> AppConfig {
    if let Some(rule) = parse_product_name_args(env::args().skip(1)) {
        tracing::info!(?rule, "CLI override: PRODUCT_NAME_RULE");
        config.product_name_rule = rule;
    }

    config
}

/// Log the effective configuration on startup
pub fn log_config_status(config: &AppConfig) {
    tracing::info!(
        port = config.port,
        cors_origins = ?config.cors_origins,
        product_name_rule = ?config.product_name_rule,
        log_bodies = config.log_bodies,
        "Configuration loaded"
    );
    if config.product_name_rule == ProductNameRule::AdvanceInfoOnly {
        tracing::info!("Product name is only required under AdvanceInfo; cascaded products skip it");
    }
}
