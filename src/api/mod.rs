/*
 * REST API module: quote inputs in, engine snapshot out
 */

use chrono::{DateTime, Utc};
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{get, put, routes, State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use crate::metrics::QuoteMetrics;
use crate::models::{self, QuoteInput, QuoterError, Token};
use crate::quote::QuoteEngine;
use crate::tokens::TokenRegistry;
use crate::utils::{format_units, to_units};

const DEFAULT_DECIMALS: u8 = 18;

pub struct ApiState {
    pub engine: Arc<QuoteEngine>,
    pub tokens: Arc<TokenRegistry>,
    pub metrics: Arc<QuoteMetrics>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QuoteInputRequest {
    pub token_in: Option<String>,
    pub token_out: Option<String>,
    pub amount: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuoteResponse {
    pub loading: bool,
    pub fee: Option<u32>,
    pub output_amount: Option<String>,
    pub output_amount_formatted: Option<String>,
    pub timestamp_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub key: String,
    #[serde(flatten)]
    pub token: Token,
}

fn lookup_token(tokens: &TokenRegistry, key: Option<&str>) -> models::Result<Option<Token>> {
    match key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => tokens
            .get(key)
            .cloned()
            .map(Some)
            .ok_or_else(|| QuoterError::ConfigError(format!("Unknown token: {key}"))),
        None => Ok(None),
    }
}

/// Resolves token keys and converts the amount using the input token's decimals.
pub fn parse_input(request: &QuoteInputRequest, tokens: &TokenRegistry) -> models::Result<QuoteInput> {
    let token_in = lookup_token(tokens, request.token_in.as_deref())?;
    let token_out = lookup_token(tokens, request.token_out.as_deref())?;

    let decimals = token_in.as_ref().map_or(DEFAULT_DECIMALS, |t| t.decimals);
    let amount = match request.amount.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        Some(raw) => {
            let amount = Decimal::from_str(raw)
                .map_err(|e| QuoterError::CalculationError(format!("Invalid amount {raw}: {e}")))?;
            Some(to_units(amount, decimals)?)
        }
        None => None,
    };

    Ok(QuoteInput::new(token_in, token_out, amount))
}

fn quote_response(engine: &QuoteEngine) -> QuoteResponse {
    let (snapshot, input) = engine.view();
    let formatted = match (snapshot.output_amount, input.token_out) {
        (Some(amount), Some(token)) => format_units(amount, token.decimals).ok(),
        _ => None,
    };

    QuoteResponse {
        loading: snapshot.loading,
        fee: snapshot.fee,
        output_amount: snapshot.output_amount.map(|amount| amount.to_string()),
        output_amount_formatted: formatted,
        timestamp_utc: Utc::now(),
    }
}

#[get("/api/v1/quote")]
pub fn get_quote(state: &State<ApiState>) -> Json<QuoteResponse> {
    Json(quote_response(&state.engine))
}

#[put("/api/v1/quote", data = "<request>")]
pub fn put_quote_inputs(
    request: Json<QuoteInputRequest>,
    state: &State<ApiState>,
) -> Result<Json<QuoteResponse>, Custom<String>> {
    let input = parse_input(&request, &state.tokens)
        .map_err(|e| Custom(Status::BadRequest, format!("Invalid quote input: {e}")))?;

    state.engine.on_input_change(input);
    Ok(Json(quote_response(&state.engine)))
}

#[get("/api/v1/tokens")]
pub fn list_tokens(state: &State<ApiState>) -> Json<Vec<TokenResponse>> {
    Json(
        state
            .tokens
            .iter()
            .map(|(key, token)| TokenResponse {
                key: key.clone(),
                token: token.clone(),
            })
            .collect(),
    )
}

#[get("/metrics")]
pub fn prometheus_metrics(state: &State<ApiState>) -> Result<String, Custom<String>> {
    state
        .metrics
        .render()
        .map_err(|e| Custom(Status::InternalServerError, e.to_string()))
}

#[get("/health")]
pub fn health_check() -> &'static str {
    "OK"
}

#[must_use]
pub fn create_rocket(state: ApiState) -> rocket::Rocket<rocket::Build> {
    rocket::build()
        .manage(state)
        .mount("/", routes![get_quote, put_quote_inputs, list_tokens, prometheus_metrics, health_check])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::{MockPoolDiscovery, MockTradeSimulator};
    use crate::quote::{EngineSettings, PairCache, PoolResolver, QuoteSimulator, TracingNotifier};
    use ethers::types::U256;
    use rocket::local::asynchronous::Client;
    use std::time::Duration;

    fn api_state() -> ApiState {
        let metrics = Arc::new(QuoteMetrics::new().unwrap());
        let mut discovery = MockPoolDiscovery::new();
        discovery.expect_discover_pools().never();
        let settings = EngineSettings {
            debounce: Duration::from_secs(3600),
            ..EngineSettings::default()
        };
        let engine = QuoteEngine::new(
            PoolResolver::new(Arc::new(discovery), Arc::new(PairCache::new()), metrics.clone()),
            QuoteSimulator::new(Arc::new(MockTradeSimulator::new()), metrics.clone()),
            Arc::new(TracingNotifier),
            metrics.clone(),
            settings,
        );
        ApiState {
            engine: Arc::new(engine),
            tokens: Arc::new(TokenRegistry::mainnet().unwrap()),
            metrics,
        }
    }

    fn request(token_in: Option<&str>, token_out: Option<&str>, amount: Option<&str>) -> QuoteInputRequest {
        QuoteInputRequest {
            token_in: token_in.map(String::from),
            token_out: token_out.map(String::from),
            amount: amount.map(String::from),
        }
    }

    #[test]
    fn amount_uses_input_token_decimals() {
        let tokens = TokenRegistry::mainnet().unwrap();

        let input = parse_input(&request(Some("USDC"), Some("WETH"), Some("2.5")), &tokens).unwrap();
        assert_eq!(input.amount, Some(U256::from(2_500_000u64)));

        let input = parse_input(&request(None, Some("WETH"), Some("1")), &tokens).unwrap();
        assert_eq!(input.amount, Some(U256::exp10(18)));
        assert!(input.token_in.is_none());
    }

    #[test]
    fn blank_fields_are_absent() {
        let tokens = TokenRegistry::mainnet().unwrap();
        let input = parse_input(&request(Some(" "), None, Some("")), &tokens).unwrap();
        assert_eq!(input, QuoteInput::default());
    }

    #[test]
    fn rejects_unknown_tokens_and_bad_amounts() {
        let tokens = TokenRegistry::mainnet().unwrap();
        assert!(parse_input(&request(Some("NOPE"), Some("USDC"), Some("1")), &tokens).is_err());
        assert!(parse_input(&request(Some("WETH"), Some("USDC"), Some("abc")), &tokens).is_err());
        assert!(parse_input(&request(Some("WETH"), Some("USDC"), Some("-1")), &tokens).is_err());
    }

    #[rocket::async_test]
    async fn health_and_tokens_routes() {
        let client = Client::tracked(create_rocket(api_state())).await.unwrap();

        let response = client.get("/health").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.into_string().await.unwrap(), "OK");

        let tokens: Vec<TokenResponse> = client
            .get("/api/v1/tokens")
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        assert!(tokens.iter().any(|t| t.key == "WETH" && t.token.decimals == 18));
    }

    #[rocket::async_test]
    async fn put_quote_updates_engine_inputs() {
        let client = Client::tracked(create_rocket(api_state())).await.unwrap();

        let response = client
            .put("/api/v1/quote")
            .json(&request(Some("WETH"), Some("USDC"), Some("1.5")))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let quote: QuoteResponse = response.into_json().await.unwrap();
        assert!(!quote.loading);
        assert!(quote.output_amount.is_none());

        let state = client.rocket().state::<ApiState>().unwrap();
        assert_eq!(state.engine.input().amount, Some(U256::from(1_500_000_000_000_000_000u64)));
    }

    #[rocket::async_test]
    async fn put_quote_with_unknown_token_is_rejected() {
        let client = Client::tracked(create_rocket(api_state())).await.unwrap();

        let response = client
            .put("/api/v1/quote")
            .json(&request(Some("DOGE"), Some("USDC"), Some("1")))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
    }

    #[rocket::async_test]
    async fn metrics_route_exposes_counters() {
        let client = Client::tracked(create_rocket(api_state())).await.unwrap();

        let body = client.get("/metrics").dispatch().await.into_string().await.unwrap();
        assert!(body.contains("quote_attempts_total 0"));
    }
}
