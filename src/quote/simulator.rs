/*
 * Trade simulation against a resolved pool
 */

use ethers::types::Address;
use std::sync::Arc;
use tracing::debug;
use crate::dex::TradeSimulator;
use crate::metrics::QuoteMetrics;
use crate::models::{AmountUnits, PoolCandidate, QuoterError, Result};

pub struct QuoteSimulator {
    simulator: Arc<dyn TradeSimulator>,
    metrics: Arc<QuoteMetrics>,
}

impl QuoteSimulator {
    #[must_use]
    pub fn new(simulator: Arc<dyn TradeSimulator>, metrics: Arc<QuoteMetrics>) -> Self {
        Self { simulator, metrics }
    }

    /// Every failure comes back as a `SimulationError`, distinct from a missing pool.
    pub async fn simulate(
        &self,
        pool: &PoolCandidate,
        token_in: Address,
        token_out: Address,
        amount_in: AmountUnits,
    ) -> Result<AmountUnits> {
        self.metrics.simulations.inc();

        let amount_out = self
            .simulator
            .simulate(pool, token_in, token_out, amount_in)
            .await
            .map_err(|e| match e {
                QuoterError::SimulationError(_) => e,
                other => QuoterError::SimulationError(other.to_string()),
            })?;

        debug!("Simulated {} in -> {} out at fee {}", amount_in, amount_out, pool.fee);
        Ok(amount_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::MockTradeSimulator;
    use ethers::types::U256;

    fn pool() -> PoolCandidate {
        PoolCandidate {
            fee: 3000,
            token0: Address::repeat_byte(1),
            token1: Address::repeat_byte(2),
            address: Address::repeat_byte(3),
        }
    }

    #[tokio::test]
    async fn passes_through_simulated_amount() {
        let mut inner = MockTradeSimulator::new();
        inner
            .expect_simulate()
            .withf(|pool, _, _, amount| pool.fee == 3000 && *amount == U256::exp10(18))
            .times(1)
            .returning(|_, _, _, _| Ok(U256::from(1_800_000_000u64)));
        let simulator = QuoteSimulator::new(Arc::new(inner), Arc::new(QuoteMetrics::new().unwrap()));

        let out = simulator
            .simulate(&pool(), Address::repeat_byte(1), Address::repeat_byte(2), U256::exp10(18))
            .await
            .unwrap();
        assert_eq!(out, U256::from(1_800_000_000u64));
        assert_eq!(simulator.metrics.simulations.get(), 1);
    }

    #[tokio::test]
    async fn wraps_transport_errors_as_simulation_failures() {
        let mut inner = MockTradeSimulator::new();
        inner
            .expect_simulate()
            .returning(|_, _, _, _| Err(QuoterError::ContractError("execution reverted".to_string())));
        let simulator = QuoteSimulator::new(Arc::new(inner), Arc::new(QuoteMetrics::new().unwrap()));

        let err = simulator
            .simulate(&pool(), Address::repeat_byte(1), Address::repeat_byte(2), U256::one())
            .await
            .unwrap_err();
        assert!(matches!(err, QuoterError::SimulationError(msg) if msg.contains("execution reverted")));
    }
}
