/*
 * Pool resolution backed by the pair cache
 */

use ethers::types::Address;
use std::sync::Arc;
use tracing::{debug, info};
use crate::dex::PoolDiscovery;
use crate::metrics::QuoteMetrics;
use crate::models::{PairKey, PoolCandidate, Result};
use super::PairCache;

pub struct PoolResolver {
    discovery: Arc<dyn PoolDiscovery>,
    cache: Arc<PairCache>,
    metrics: Arc<QuoteMetrics>,
}

impl PoolResolver {
    #[must_use]
    pub fn new(discovery: Arc<dyn PoolDiscovery>, cache: Arc<PairCache>, metrics: Arc<QuoteMetrics>) -> Self {
        Self {
            discovery,
            cache,
            metrics,
        }
    }

    /// Returns the candidate pools for a pair, discovering them at most once per pair.
    /// An empty list is a valid answer and is cached like any other.
    pub async fn resolve(&self, token_in: Address, token_out: Address) -> Result<Vec<PoolCandidate>> {
        let key = PairKey::new(token_in, token_out);

        if let Some(candidates) = self.cache.get(&key) {
            debug!("Pool cache hit for {} ({} candidates)", key, candidates.len());
            self.metrics.cache_hits.inc();
            return Ok(candidates);
        }

        self.metrics.discovery_calls.inc();
        let candidates = self.discovery.discover_pools(token_in, token_out).await?;
        info!("Discovered {} pools for {}", candidates.len(), key);

        self.cache.put(key, candidates.clone());
        Ok(candidates)
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<PairCache> {
        &self.cache
    }
}

/// Picks the lowest fee tier; ties keep discovery order.
#[must_use]
pub fn select_pool(candidates: &[PoolCandidate]) -> Option<&PoolCandidate> {
    candidates.iter().min_by_key(|candidate| candidate.fee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::MockPoolDiscovery;
    use crate::models::QuoterError;

    fn candidate(fee: u32, tag: u8) -> PoolCandidate {
        PoolCandidate {
            fee,
            token0: Address::repeat_byte(1),
            token1: Address::repeat_byte(2),
            address: Address::repeat_byte(tag),
        }
    }

    fn resolver(discovery: MockPoolDiscovery) -> PoolResolver {
        PoolResolver::new(
            Arc::new(discovery),
            Arc::new(PairCache::new()),
            Arc::new(QuoteMetrics::new().unwrap()),
        )
    }

    #[test]
    fn selects_lowest_fee_tier() {
        let candidates = vec![candidate(3000, 1), candidate(500, 2), candidate(10000, 3)];
        assert_eq!(select_pool(&candidates).unwrap().fee, 500);
        assert!(select_pool(&[]).is_none());
    }

    #[test]
    fn fee_ties_keep_discovery_order() {
        let candidates = vec![candidate(500, 7), candidate(500, 8)];
        assert_eq!(select_pool(&candidates).unwrap().address, Address::repeat_byte(7));
    }

    #[tokio::test]
    async fn discovers_each_pair_once() {
        let mut discovery = MockPoolDiscovery::new();
        discovery
            .expect_discover_pools()
            .times(1)
            .returning(|_, _| Ok(vec![candidate(3000, 1)]));
        let resolver = resolver(discovery);
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);

        assert_eq!(resolver.resolve(a, b).await.unwrap(), vec![candidate(3000, 1)]);
        assert_eq!(resolver.resolve(b, a).await.unwrap(), vec![candidate(3000, 1)]);
        assert_eq!(resolver.metrics.cache_hits.get(), 1);
    }

    #[tokio::test]
    async fn empty_discovery_is_cached() {
        let mut discovery = MockPoolDiscovery::new();
        discovery.expect_discover_pools().times(1).returning(|_, _| Ok(Vec::new()));
        let resolver = resolver(discovery);
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);

        assert!(resolver.resolve(a, b).await.unwrap().is_empty());
        assert!(resolver.resolve(a, b).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_discovery_is_not_cached() {
        let mut discovery = MockPoolDiscovery::new();
        discovery
            .expect_discover_pools()
            .times(2)
            .returning(|_, _| Err(QuoterError::DiscoveryError("rpc down".to_string())));
        let resolver = resolver(discovery);
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);

        assert!(resolver.resolve(a, b).await.is_err());
        assert!(resolver.resolve(a, b).await.is_err());
        assert!(resolver.cache().is_empty());
    }
}
