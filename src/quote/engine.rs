/*
 * Debounced quoting state machine
 */

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use crate::config::QuoteConfig;
use crate::metrics::QuoteMetrics;
use crate::models::{EngineSnapshot, PairKey, QuoteInput, QuoteRequest, QuoteResult, QuoterError, Result};
use super::{select_pool, DebounceScheduler, NoticeOptions, Notifier, PoolResolver, QuoteSimulator};

pub const NO_PATH_MESSAGE: &str = "No path found for this token pair";
const NOTICE_ID: &str = "quote-error";

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub debounce: Duration,
    pub notice: NoticeOptions,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&QuoteConfig::default())
    }
}

impl From<&QuoteConfig> for EngineSettings {
    fn from(config: &QuoteConfig) -> Self {
        Self {
            debounce: config.debounce(),
            notice: NoticeOptions {
                id: Some(NOTICE_ID.to_string()),
                duration: Some(config.notice_duration()),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    /// Nothing to quote.
    Idle,
    /// Debounce timer armed.
    Pending,
    /// Discovery or simulation in flight.
    Resolving,
    Settled,
    Failed,
}

struct EngineState {
    input: QuoteInput,
    generation: u64,
    phase: EnginePhase,
    debounce: DebounceScheduler,
}

struct EngineInner {
    resolver: PoolResolver,
    simulator: QuoteSimulator,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<QuoteMetrics>,
    settings: EngineSettings,
    state: Mutex<EngineState>,
    snapshot: watch::Sender<EngineSnapshot>,
}

/// Turns (token in, token out, amount) changes into a debounced quote snapshot.
///
/// Every input change bumps the request generation; a completion is applied only if its
/// generation is still the latest, so out-of-order results never overwrite newer state.
pub struct QuoteEngine {
    inner: Arc<EngineInner>,
}

impl QuoteEngine {
    #[must_use]
    pub fn new(
        resolver: PoolResolver,
        simulator: QuoteSimulator,
        notifier: Arc<dyn Notifier>,
        metrics: Arc<QuoteMetrics>,
        settings: EngineSettings,
    ) -> Self {
        let (snapshot, _) = watch::channel(EngineSnapshot::default());

        Self {
            inner: Arc::new(EngineInner {
                resolver,
                simulator,
                notifier,
                metrics,
                settings,
                state: Mutex::new(EngineState {
                    input: QuoteInput::default(),
                    generation: 0,
                    phase: EnginePhase::Idle,
                    debounce: DebounceScheduler::new(),
                }),
                snapshot,
            }),
        }
    }

    /// Supplies the current inputs. Identical inputs are ignored.
    ///
    /// # Panics
    /// Arming the debounce timer spawns a task, so this must run inside a tokio runtime.
    pub fn on_input_change(&self, input: QuoteInput) {
        let mut state = self.inner.lock_state();
        if state.input == input {
            return;
        }

        state.input = input;
        state.generation += 1;
        state.debounce.cancel();

        if state.input.request().is_none() {
            debug!("Inputs incomplete, engine idle");
            state.phase = EnginePhase::Idle;
            self.inner.snapshot.send_replace(EngineSnapshot::default());
            return;
        }

        // A pending engine looks idle until the timer fires.
        state.phase = EnginePhase::Pending;
        self.inner.snapshot.send_replace(EngineSnapshot::default());

        let armed = state.generation;
        let inner = Arc::downgrade(&self.inner);
        state.debounce.schedule(self.inner.settings.debounce, move || {
            if let Some(inner) = inner.upgrade() {
                inner.start_attempt(armed);
            }
        });
    }

    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        *self.inner.snapshot.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<EngineSnapshot> {
        self.inner.snapshot.subscribe()
    }

    #[must_use]
    pub fn phase(&self) -> EnginePhase {
        self.inner.lock_state().phase
    }

    #[must_use]
    pub fn input(&self) -> QuoteInput {
        self.inner.lock_state().input.clone()
    }

    /// Reads the snapshot together with the inputs it belongs to.
    #[must_use]
    pub fn view(&self) -> (EngineSnapshot, QuoteInput) {
        let state = self.inner.lock_state();
        let snapshot = *self.inner.snapshot.borrow();
        (snapshot, state.input.clone())
    }
}

impl EngineInner {
    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start_attempt(self: Arc<Self>, armed: u64) {
        let (generation, request) = {
            let mut state = self.lock_state();
            if state.generation != armed {
                return;
            }
            let Some(request) = state.input.request() else {
                return;
            };

            state.generation += 1;
            state.phase = EnginePhase::Resolving;
            self.snapshot.send_modify(|snapshot| snapshot.loading = true);
            (state.generation, request)
        };

        self.metrics.attempts.inc();
        debug!(generation, "Quoting {} {} -> {}", request.amount, request.token_in.symbol, request.token_out.symbol);

        tokio::spawn(async move {
            let outcome = self.quote(&request).await;
            self.complete(generation, outcome);
        });
    }

    async fn quote(&self, request: &QuoteRequest) -> Result<QuoteResult> {
        let token_in = request.token_in.address;
        let token_out = request.token_out.address;

        let candidates = self.resolver.resolve(token_in, token_out).await?;
        let pool = select_pool(&candidates).ok_or(QuoterError::NoPath(PairKey::new(token_in, token_out)))?;

        let output_amount = self
            .simulator
            .simulate(pool, token_in, token_out, request.amount)
            .await?;

        Ok(QuoteResult {
            fee: pool.fee,
            output_amount,
        })
    }

    fn complete(&self, generation: u64, outcome: Result<QuoteResult>) {
        let mut state = self.lock_state();
        if state.generation != generation {
            debug!(generation, current = state.generation, "Dropping stale quote result");
            self.metrics.stale_results.inc();
            return;
        }

        match outcome {
            Ok(result) => {
                info!(generation, fee = result.fee, "Quote settled: {}", result.output_amount);
                state.phase = EnginePhase::Settled;
                self.snapshot.send_replace(EngineSnapshot::settled(result));
            }
            Err(e) => {
                warn!(generation, "Quote failed: {}", e);
                self.metrics.failures.inc();
                state.phase = EnginePhase::Failed;
                self.snapshot.send_replace(EngineSnapshot::default());
                drop(state);
                self.notifier.notify_error(NO_PATH_MESSAGE, &self.settings.notice);
            }
        }
    }
}
