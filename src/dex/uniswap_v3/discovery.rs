/*
 * Uniswap V3 factory lookups for pool discovery
 */

use async_trait::async_trait;
use ethers::abi::Token;
use ethers::types::{Address, U256};
use std::sync::Arc;
use tracing::debug;
use crate::dex::PoolDiscovery;
use crate::models::{PoolCandidate, QuoterError, Result};
use crate::rpc::{encode_call, RpcClient};

pub struct UniswapV3PoolDiscovery {
    rpc: Arc<RpcClient>,
    factory: Address,
    fee_tiers: Vec<u32>,
}

impl UniswapV3PoolDiscovery {
    #[must_use]
    pub fn new(rpc: Arc<RpcClient>, factory: Address, fee_tiers: Vec<u32>) -> Self {
        Self {
            rpc,
            factory,
            fee_tiers,
        }
    }
}

#[async_trait]
impl PoolDiscovery for UniswapV3PoolDiscovery {
    async fn discover_pools(&self, token_in: Address, token_out: Address) -> Result<Vec<PoolCandidate>> {
        let (token0, token1) = sort_tokens(token_in, token_out);
        let mut pools = Vec::new();

        for &fee in &self.fee_tiers {
            let call_data = encode_call(
                super::GET_POOL_SIGNATURE,
                &[
                    Token::Address(token0),
                    Token::Address(token1),
                    Token::Uint(U256::from(fee)),
                ],
            );

            let result = self
                .rpc
                .call(self.factory, call_data)
                .await
                .map_err(|e| QuoterError::DiscoveryError(format!("getPool fee {fee}: {e}")))?;

            if let Some(address) = decode_pool_address(&result)? {
                debug!("Found pool {:?} at fee tier {}", address, fee);
                pools.push(PoolCandidate {
                    fee,
                    token0,
                    token1,
                    address,
                });
            }
        }

        Ok(pools)
    }
}

/// Factory pools are keyed by ascending token address.
pub(crate) fn sort_tokens(a: Address, b: Address) -> (Address, Address) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// The factory returns the zero address for pairs without a pool.
pub(crate) fn decode_pool_address(result: &[u8]) -> Result<Option<Address>> {
    if result.len() < 32 {
        return Err(QuoterError::DiscoveryError("Invalid getPool response".to_string()));
    }

    let address = Address::from_slice(&result[12..32]);
    Ok((!address.is_zero()).then_some(address))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_tokens_ascending() {
        let low = Address::repeat_byte(0x01);
        let high = Address::repeat_byte(0xfe);
        assert_eq!(sort_tokens(high, low), (low, high));
        assert_eq!(sort_tokens(low, high), (low, high));
    }

    #[test]
    fn zero_address_means_no_pool() {
        assert_eq!(decode_pool_address(&[0u8; 32]).unwrap(), None);
    }

    #[test]
    fn decodes_right_aligned_address() {
        let pool = Address::repeat_byte(0xab);
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(pool.as_bytes());
        assert_eq!(decode_pool_address(&word).unwrap(), Some(pool));
    }

    #[test]
    fn short_response_is_an_error() {
        assert!(matches!(
            decode_pool_address(&[0u8; 4]),
            Err(QuoterError::DiscoveryError(_))
        ));
    }
}
