/*
 * Uniswap V3 QuoterV2 client for exact-input trade simulation
 */

use async_trait::async_trait;
use ethers::abi::Token;
use ethers::types::{Address, U256};
use std::sync::Arc;
use crate::dex::TradeSimulator;
use crate::models::{AmountUnits, PoolCandidate, QuoterError, Result};
use crate::rpc::{encode_call, RpcClient};

pub struct UniswapV3Quoter {
    rpc: Arc<RpcClient>,
    quoter: Address,
}

impl UniswapV3Quoter {
    #[must_use]
    pub fn new(rpc: Arc<RpcClient>, quoter: Address) -> Self {
        Self { rpc, quoter }
    }
}

#[async_trait]
impl TradeSimulator for UniswapV3Quoter {
    async fn simulate(
        &self,
        pool: &PoolCandidate,
        token_in: Address,
        token_out: Address,
        amount_in: AmountUnits,
    ) -> Result<AmountUnits> {
        let call_data = quote_call_data(pool, token_in, token_out, amount_in)?;

        let result = self
            .rpc
            .call(self.quoter, call_data)
            .await
            .map_err(|e| QuoterError::SimulationError(format!("quoteExactInputSingle: {e}")))?;

        decode_amount_out(&result)
    }
}

pub(crate) fn quote_call_data(
    pool: &PoolCandidate,
    token_in: Address,
    token_out: Address,
    amount_in: AmountUnits,
) -> Result<ethers::types::Bytes> {
    let pool_tokens = [pool.token0, pool.token1];
    if !pool_tokens.contains(&token_in) || !pool_tokens.contains(&token_out) || token_in == token_out {
        return Err(QuoterError::SimulationError(format!(
            "Pool {:?} does not trade {:?} for {:?}",
            pool.address, token_in, token_out
        )));
    }

    Ok(encode_call(
        super::QUOTE_EXACT_INPUT_SINGLE_SIGNATURE,
        &[Token::Tuple(vec![
            Token::Address(token_in),
            Token::Address(token_out),
            Token::Uint(amount_in),
            Token::Uint(U256::from(pool.fee)),
            Token::Uint(U256::zero()),
        ])],
    ))
}

/// QuoterV2 returns (amountOut, sqrtPriceX96After, initializedTicksCrossed, gasEstimate).
pub(crate) fn decode_amount_out(result: &[u8]) -> Result<AmountUnits> {
    if result.len() < 32 {
        return Err(QuoterError::SimulationError("Invalid quoter response".to_string()));
    }
    Ok(U256::from_big_endian(&result[0..32]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(a: Address, b: Address) -> PoolCandidate {
        PoolCandidate {
            fee: 3000,
            token0: a,
            token1: b,
            address: Address::repeat_byte(0x99),
        }
    }

    #[test]
    fn encodes_single_hop_params() {
        let weth = Address::repeat_byte(0x0c);
        let usdc = Address::repeat_byte(0xa0);
        let data = quote_call_data(&pool(weth, usdc), weth, usdc, U256::exp10(18)).unwrap();

        assert_eq!(data.len(), 4 + 5 * 32);
        assert_eq!(&data[16..36], weth.as_bytes());
        assert_eq!(&data[48..68], usdc.as_bytes());
        assert_eq!(U256::from_big_endian(&data[68..100]), U256::exp10(18));
        assert_eq!(U256::from_big_endian(&data[100..132]), U256::from(3000));
        assert!(U256::from_big_endian(&data[132..164]).is_zero());
    }

    #[test]
    fn rejects_tokens_outside_the_pool() {
        let weth = Address::repeat_byte(0x0c);
        let usdc = Address::repeat_byte(0xa0);
        let dai = Address::repeat_byte(0x6b);
        assert!(quote_call_data(&pool(weth, usdc), weth, dai, U256::one()).is_err());
        assert!(quote_call_data(&pool(weth, usdc), weth, weth, U256::one()).is_err());
    }

    #[test]
    fn decodes_first_word_as_amount_out() {
        let mut response = vec![0u8; 128];
        U256::from(1_800_000_000u64).to_big_endian(&mut response[0..32]);
        response[63] = 7;
        assert_eq!(decode_amount_out(&response).unwrap(), U256::from(1_800_000_000u64));
        assert!(decode_amount_out(&response[..16]).is_err());
    }
}
