/*
 * DEX integration: the pool discovery and trade simulation primitives
 */

pub mod uniswap_v3;

use async_trait::async_trait;
use ethers::types::Address;
#[cfg(test)]
use mockall::automock;
use crate::models::{AmountUnits, PoolCandidate, Result};

/// Looks up the liquidity pools that connect two tokens.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PoolDiscovery: Send + Sync {
    async fn discover_pools(&self, token_in: Address, token_out: Address) -> Result<Vec<PoolCandidate>>;
}

/// Computes the output of a hypothetical exact-input trade against one pool.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TradeSimulator: Send + Sync {
    async fn simulate(
        &self,
        pool: &PoolCandidate,
        token_in: Address,
        token_out: Address,
        amount_in: AmountUnits,
    ) -> Result<AmountUnits>;
}
