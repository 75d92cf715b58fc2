/*
 * Token configuration: symbol keys mapped to token records
 */

use crate::config::parse_address;
use crate::models::{QuoterError, Result, Token};
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

const MAINNET_TOKENS: [(&str, &str, u8); 5] = [
    ("WETH", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", 18),
    ("USDC", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", 6),
    ("USDT", "0xdAC17F958D2ee523a2206206994597C13D831ec7", 6),
    ("DAI", "0x6B175474E89094C44Da98b954EedeAC495271d0F", 18),
    ("WBTC", "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599", 8),
];

#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: BTreeMap<String, Token>,
}

#[derive(Debug, Deserialize)]
struct TokenFile {
    tokens: HashMap<String, TokenEntry>,
}

#[derive(Debug, Deserialize)]
struct TokenEntry {
    address: String,
    symbol: Option<String>,
    decimals: u8,
    #[serde(default)]
    image: String,
}

#[derive(Debug, Deserialize)]
struct TokenList {
    tokens: Vec<TokenListEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenListEntry {
    chain_id: u64,
    address: String,
    symbol: String,
    decimals: u8,
    #[serde(default, rename = "logoURI")]
    logo_uri: Option<String>,
}

impl TokenRegistry {
    pub fn mainnet() -> Result<Self> {
        let mut registry = Self::default();
        for (symbol, address, decimals) in MAINNET_TOKENS {
            registry.insert(
                symbol,
                Token {
                    address: parse_address(address)?,
                    symbol: symbol.to_string(),
                    decimals,
                    image: format!("/tokens/{}.png", symbol.to_lowercase()),
                },
            );
        }
        Ok(registry)
    }

    /// Loads `[tokens.<KEY>]` tables from a TOML or JSON file.
    pub fn from_file(path: &str) -> Result<Self> {
        Self::from_source(config::File::with_name(path))
    }

    pub fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let file: TokenFile = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;

        let mut registry = Self::default();
        for (key, entry) in file.tokens {
            let symbol = entry.symbol.unwrap_or_else(|| key.to_uppercase());
            registry.insert(
                &key,
                Token {
                    address: parse_address(&entry.address)?,
                    symbol,
                    decimals: entry.decimals,
                    image: entry.image,
                },
            );
        }
        Ok(registry)
    }

    /// Fetches a standard token list document and keeps the entries for `chain_id`.
    pub async fn fetch_token_list(client: &Client, url: &str, chain_id: u64) -> Result<Self> {
        let list = client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<TokenList>()
            .await?;

        let mut registry = Self::default();
        for entry in list.tokens.into_iter().filter(|t| t.chain_id == chain_id) {
            let address = parse_address(&entry.address)
                .map_err(|e| QuoterError::TokenListError(format!("{}: {e}", entry.symbol)))?;
            registry.insert(
                &entry.symbol,
                Token {
                    address,
                    symbol: entry.symbol.clone(),
                    decimals: entry.decimals,
                    image: entry.logo_uri.unwrap_or_default(),
                },
            );
        }

        if registry.is_empty() {
            return Err(QuoterError::TokenListError(format!(
                "No tokens for chain {chain_id} in {url}"
            )));
        }
        info!("Loaded {} tokens from token list", registry.len());
        Ok(registry)
    }

    pub fn insert(&mut self, key: &str, token: Token) {
        self.tokens.insert(key.to_uppercase(), token);
    }

    /// Keys are case-insensitive.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Token> {
        self.tokens.get(&key.to_uppercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Token)> {
        self.tokens.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
