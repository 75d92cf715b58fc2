/*
 * Data models and types for the swap quoting engine
 */

use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Integer quantity in a token's smallest unit.
pub type AmountUnits = U256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    #[serde(default)]
    pub image: String,
}

/// Order-independent cache key for a token pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey(Address, Address);

impl PairKey {
    #[must_use]
    pub fn new(a: Address, b: Address) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}", self.0, self.1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolCandidate {
    pub fee: u32,
    pub token0: Address,
    pub token1: Address,
    #[serde(default)]
    pub address: Address,
}

/// A successful quote. Both fields are always present together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteResult {
    pub fee: u32,
    pub output_amount: AmountUnits,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteInput {
    pub token_in: Option<Token>,
    pub token_out: Option<Token>,
    pub amount: Option<AmountUnits>,
}

impl QuoteInput {
    #[must_use]
    pub fn new(token_in: Option<Token>, token_out: Option<Token>, amount: Option<AmountUnits>) -> Self {
        Self {
            token_in,
            token_out,
            amount,
        }
    }

    /// Returns the fully populated request when there is something to quote.
    #[must_use]
    pub fn request(&self) -> Option<QuoteRequest> {
        match (&self.token_in, &self.token_out, self.amount) {
            (Some(token_in), Some(token_out), Some(amount)) if !amount.is_zero() => Some(QuoteRequest {
                token_in: token_in.clone(),
                token_out: token_out.clone(),
                amount,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub token_in: Token,
    pub token_out: Token,
    pub amount: AmountUnits,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineSnapshot {
    pub loading: bool,
    pub fee: Option<u32>,
    pub output_amount: Option<AmountUnits>,
}

impl EngineSnapshot {
    #[must_use]
    pub fn settled(result: QuoteResult) -> Self {
        Self {
            loading: false,
            fee: Some(result.fee),
            output_amount: Some(result.output_amount),
        }
    }
}

#[derive(Debug, Error)]
pub enum QuoterError {
    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Contract interaction error: {0}")]
    ContractError(String),

    #[error("Pool discovery error: {0}")]
    DiscoveryError(String),

    #[error("Simulation error: {0}")]
    SimulationError(String),

    #[error("No pool found for pair {0}")]
    NoPath(PairKey),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Token list error: {0}")]
    TokenListError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Config source error: {0}")]
    ConfigSourceError(#[from] config::ConfigError),

    #[error("Metrics error: {0}")]
    MetricsError(#[from] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, QuoterError>;
