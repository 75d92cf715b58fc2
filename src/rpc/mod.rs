/*
 * RPC client module for read-only contract calls
 */

use crate::models::{QuoterError, Result};
use ethers::abi::{encode, Token};
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, Bytes, TransactionRequest};
use ethers::utils::keccak256;
use std::sync::Arc;

pub struct RpcClient {
    provider: Arc<Provider<Http>>,
    chain_id: u64,
}

impl RpcClient {
    pub async fn new(rpc_url: &str, chain_id: u64) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| QuoterError::RpcError(format!("Failed to create provider: {e}")))?;

        let chain = provider
            .get_chainid()
            .await
            .map_err(|e| QuoterError::RpcError(format!("Failed to get chain ID: {e}")))?;

        if chain.as_u64() != chain_id {
            return Err(QuoterError::RpcError(format!(
                "Chain ID mismatch: expected {}, got {}",
                chain_id,
                chain.as_u64()
            )));
        }

        Ok(Self {
            provider: Arc::new(provider),
            chain_id,
        })
    }

    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Executes an `eth_call` against the latest block.
    pub async fn call(&self, to: Address, call_data: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::new().to(to).data(call_data);

        self.provider
            .call(&tx.into(), None)
            .await
            .map_err(|e| QuoterError::ContractError(format!("eth_call to {to:?} failed: {e}")))
    }
}

/// Builds calldata from a canonical function signature and its arguments.
#[must_use]
pub fn encode_call(signature: &str, args: &[Token]) -> Bytes {
    let selector = &keccak256(signature.as_bytes())[0..4];
    let mut call_data = Vec::from(selector);
    call_data.extend_from_slice(&encode(args));
    Bytes::from(call_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::U256;

    #[test]
    fn encodes_selector_then_arguments() {
        let data = encode_call("balanceOf(address)", &[Token::Address(Address::repeat_byte(0x11))]);
        assert_eq!(&data[0..4], &[0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(data.len(), 4 + 32);
        assert_eq!(&data[16..36], Address::repeat_byte(0x11).as_bytes());

        let data = encode_call("f(uint24)", &[Token::Uint(U256::from(3000))]);
        assert_eq!(U256::from_big_endian(&data[4..36]), U256::from(3000));
    }
}
