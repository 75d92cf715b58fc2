/*
 * Quote service that wires configuration, chain access and the engine together
 */

use reqwest::Client;
use std::sync::Arc;
use tracing::{info, warn};
use crate::{
    config::Config,
    dex::uniswap_v3::{UniswapV3PoolDiscovery, UniswapV3Quoter},
    metrics::QuoteMetrics,
    models::Result,
    quote::{EngineSettings, PairCache, PoolResolver, QuoteEngine, QuoteSimulator, TracingNotifier},
    rpc::RpcClient,
    tokens::TokenRegistry,
};

pub struct QuoteService {
    pub engine: Arc<QuoteEngine>,
    pub tokens: Arc<TokenRegistry>,
    pub metrics: Arc<QuoteMetrics>,
}

impl QuoteService {
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Initializing Quote Service");

        let rpc = Arc::new(RpcClient::new(&config.chain.rpc_url, config.chain.chain_id).await?);
        info!("Connected to RPC on chain {}", rpc.chain_id());

        let tokens = Arc::new(load_tokens(config).await?);
        info!("Token registry ready with {} tokens", tokens.len());

        let metrics = Arc::new(QuoteMetrics::new()?);

        let discovery = Arc::new(UniswapV3PoolDiscovery::new(
            rpc.clone(),
            config.uniswap.factory,
            config.uniswap.fee_tiers.clone(),
        ));
        let quoter = Arc::new(UniswapV3Quoter::new(rpc, config.uniswap.quoter));
        info!("Uniswap V3 clients initialized");

        let engine = QuoteEngine::new(
            PoolResolver::new(discovery, Arc::new(PairCache::new()), metrics.clone()),
            QuoteSimulator::new(quoter, metrics.clone()),
            Arc::new(TracingNotifier),
            metrics.clone(),
            EngineSettings::from(&config.quote),
        );

        Ok(Self {
            engine: Arc::new(engine),
            tokens,
            metrics,
        })
    }
}

/// Token file first, then token list URL, then the built-in mainnet table.
async fn load_tokens(config: &Config) -> Result<TokenRegistry> {
    if let Some(path) = &config.tokens.file {
        info!("Loading tokens from {}", path);
        return TokenRegistry::from_file(path);
    }

    if let Some(url) = &config.tokens.list_url {
        info!("Fetching token list from {}", url);
        return TokenRegistry::fetch_token_list(&Client::new(), url, config.chain.chain_id).await;
    }

    if config.chain.chain_id != 1 {
        warn!("Using mainnet token table on chain {}", config.chain.chain_id);
    }
    TokenRegistry::mainnet()
}
