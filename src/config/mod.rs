/*
 * Configuration management for the quoting service
 */

use crate::models::{QuoterError, Result};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_FACTORY_ADDRESS: &str = "0x1F98431c8aD98523631AE11a59f14dF3b4aC0cfc";
pub const DEFAULT_QUOTER_ADDRESS: &str = "0x61fFE014bA17989E743c5F6cB21bF9697530B21e";
pub const DEFAULT_FEE_TIERS: [u32; 4] = [100, 500, 3000, 10000];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub chain: ChainConfig,
    pub uniswap: UniswapConfig,
    pub quote: QuoteConfig,
    pub tokens: TokenSourceConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub chain_id: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UniswapConfig {
    pub factory: Address,
    pub quoter: Address,
    pub fee_tiers: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuoteConfig {
    pub debounce_ms: u64,
    pub notice_duration_ms: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TokenSourceConfig {
    pub list_url: Option<String>,
    pub file: Option<String>,
}

impl QuoteConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            notice_duration_ms: 4000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let defaults = QuoteConfig::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("SERVER_PORT", 8080)?,
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            chain: ChainConfig {
                rpc_url: env::var("RPC_URL")
                    .map_err(|_| QuoterError::ConfigError("RPC_URL not set".to_string()))?,
                chain_id: parse_var("CHAIN_ID", 1)?,
            },
            uniswap: UniswapConfig {
                factory: parse_address(
                    &env::var("UNISWAP_V3_FACTORY").unwrap_or_else(|_| DEFAULT_FACTORY_ADDRESS.to_string()),
                )?,
                quoter: parse_address(
                    &env::var("UNISWAP_V3_QUOTER").unwrap_or_else(|_| DEFAULT_QUOTER_ADDRESS.to_string()),
                )?,
                fee_tiers: match env::var("UNISWAP_V3_FEE_TIERS") {
                    Ok(raw) => parse_fee_tiers(&raw)?,
                    Err(_) => DEFAULT_FEE_TIERS.to_vec(),
                },
            },
            quote: QuoteConfig {
                debounce_ms: parse_var("QUOTE_DEBOUNCE_MS", defaults.debounce_ms)?,
                notice_duration_ms: parse_var("QUOTE_NOTICE_DURATION_MS", defaults.notice_duration_ms)?,
            },
            tokens: TokenSourceConfig {
                list_url: env::var("TOKEN_LIST_URL").ok(),
                file: env::var("TOKENS_FILE").ok(),
            },
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| QuoterError::ConfigError(format!("Invalid {name}: {e}"))),
        Err(_) => Ok(default),
    }
}

pub fn parse_address(raw: &str) -> Result<Address> {
    let trimmed = raw.trim();
    if !trimmed.starts_with("0x") || trimmed.len() != 42 {
        return Err(QuoterError::ConfigError(format!("Invalid address format: {raw}")));
    }
    Address::from_str(trimmed).map_err(|e| QuoterError::ConfigError(format!("Invalid address {raw}: {e}")))
}

pub fn parse_fee_tiers(raw: &str) -> Result<Vec<u32>> {
    let tiers = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .map_err(|e| QuoterError::ConfigError(format!("Invalid fee tier {s}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    if tiers.is_empty() {
        return Err(QuoterError::ConfigError("No fee tiers configured".to_string()));
    }
    Ok(tiers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn fee_tiers_parse_with_whitespace() {
        assert_eq!(parse_fee_tiers("100, 500,3000 ").unwrap(), vec![100, 500, 3000]);
        assert_err!(parse_fee_tiers(" , "));
        assert_err!(parse_fee_tiers("500,abc"));
    }

    #[test]
    fn address_must_be_prefixed_and_full_length() {
        assert_ok!(parse_address(DEFAULT_QUOTER_ADDRESS));
        assert_ok!(parse_address(DEFAULT_FACTORY_ADDRESS));
        assert_err!(parse_address("61fFE014bA17989E743c5F6cB21bF9697530B21e"));
        assert_err!(parse_address("0x1234"));
    }
}
