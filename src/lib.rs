/*
 * Swap Quoter - debounced swap quoting service
 * Core library exports and module declarations
 */

pub mod api;
pub mod config;
pub mod dex;
pub mod metrics;
pub mod models;
pub mod quote;
pub mod rpc;
pub mod service;
pub mod tokens;
pub mod utils;

pub use config::Config;
pub use models::*;
pub use quote::QuoteEngine;
pub use service::QuoteService;
