/*
 * Quoting engine: pair cache, pool resolution, simulation and the debounced state machine
 */

mod cache;
mod debounce;
mod engine;
mod notify;
mod resolver;
mod simulator;

pub use cache::PairCache;
pub use debounce::DebounceScheduler;
pub use engine::{EnginePhase, EngineSettings, QuoteEngine, NO_PATH_MESSAGE};
pub use notify::{NoticeOptions, Notifier, TracingNotifier};
pub use resolver::{select_pool, PoolResolver};
pub use simulator::QuoteSimulator;
