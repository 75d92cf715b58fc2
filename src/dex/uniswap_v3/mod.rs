/*
 * Uniswap V3 integration module
 */

mod discovery;
mod quoter;

pub use discovery::UniswapV3PoolDiscovery;
pub use quoter::UniswapV3Quoter;

pub const GET_POOL_SIGNATURE: &str = "getPool(address,address,uint24)";
pub const QUOTE_EXACT_INPUT_SINGLE_SIGNATURE: &str =
    "quoteExactInputSingle((address,address,uint256,uint24,uint160))";
