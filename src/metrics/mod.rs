/*
 * Prometheus counters for the quoting engine
 */

use prometheus::{Encoder, IntCounter, Registry, TextEncoder};
use crate::models::{QuoterError, Result};

pub struct QuoteMetrics {
    registry: Registry,
    pub attempts: IntCounter,
    pub discovery_calls: IntCounter,
    pub cache_hits: IntCounter,
    pub simulations: IntCounter,
    pub failures: IntCounter,
    pub stale_results: IntCounter,
}

impl QuoteMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let counter = |name: &str, help: &str| -> Result<IntCounter> {
            let counter = IntCounter::new(name, help)?;
            registry.register(Box::new(counter.clone()))?;
            Ok(counter)
        };

        Ok(Self {
            attempts: counter("quote_attempts_total", "Debounced quoting attempts started")?,
            discovery_calls: counter("quote_discovery_calls_total", "Pool discovery calls issued")?,
            cache_hits: counter("quote_cache_hits_total", "Pair lookups served from the pool cache")?,
            simulations: counter("quote_simulations_total", "Trade simulations issued")?,
            failures: counter("quote_failures_total", "Attempts that ended with a no-path notice")?,
            stale_results: counter("quote_stale_results_total", "Completions dropped for a superseded attempt")?,
            registry,
        })
    }

    /// Renders all counters in the text exposition format.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| QuoterError::CalculationError(format!("Invalid metrics output: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_registered_counters() {
        let metrics = QuoteMetrics::new().unwrap();
        metrics.cache_hits.inc();
        metrics.cache_hits.inc();

        let text = metrics.render().unwrap();
        assert!(text.contains("quote_cache_hits_total 2"));
        assert!(text.contains("quote_stale_results_total 0"));
    }
}
