//! Current token price fetching from the Jupiter quote API
//!
//! One batched request per portfolio computation. Mints the oracle does
//! not know are simply absent from the returned map; the aggregator
//! applies the zero default at the join.

use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::str::FromStr;

use crate::config::Config;
use crate::error::PortfolioError;

/// Map of mint address to current USD unit price
pub type PriceMap = HashMap<Pubkey, f64>;

/// Price API response: `{"data": {"<mint>": {"price": ...} | null}}`
#[derive(Debug, Deserialize)]
struct PriceResponse {
    #[serde(default)]
    data: HashMap<String, Option<PriceQuote>>,
}

#[derive(Debug, Deserialize)]
struct PriceQuote {
    /// Arrives as a string or a number depending on the quote
    price: Option<serde_json::Value>,
}

pub struct PriceOracleClient {
    http: reqwest::Client,
    api_base: String,
}

impl PriceOracleClient {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|err| {
                eprintln!(
                    "Warning: failed to build price API client ({}); falling back to default client.",
                    err
                );
                reqwest::Client::new()
            });

        Self {
            http,
            api_base: config.price_api_base.clone(),
        }
    }

    /// Fetch current unit prices for a batch of mints in one request
    ///
    /// Returns only the mints the oracle quoted with a non-null price.
    /// Any transport failure or non-success status fails the whole call;
    /// the aggregator degrades to an empty map rather than aborting.
    pub async fn get_prices(&self, mints: &[Pubkey]) -> Result<PriceMap, PortfolioError> {
        if mints.is_empty() {
            return Ok(PriceMap::new());
        }

        let ids = mints.iter().map(Pubkey::to_string).collect::<Vec<_>>().join(",");
        let url = format!("{}?ids={}", self.api_base, ids);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| PortfolioError::PriceOracleUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PortfolioError::PriceOracleUnavailable(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body: PriceResponse = response
            .json()
            .await
            .map_err(|e| PortfolioError::PriceOracleUnavailable(format!("Parse error: {}", e)))?;

        Ok(collect_prices(body))
    }
}

/// Flatten the response into a price map, skipping null and unparseable quotes
fn collect_prices(response: PriceResponse) -> PriceMap {
    let mut prices = PriceMap::new();

    for (mint_str, quote) in response.data {
        let Some(quote) = quote else { continue };
        let Some(value) = quote.price else { continue };
        let Ok(mint) = Pubkey::from_str(&mint_str) else { continue };

        if let Some(price) = parse_price_value(&value) {
            prices.insert(mint, price);
        }
    }

    prices
}

/// Quotes arrive as `"1.2345"` or `1.2345`; accept both
fn parse_price_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_response(body: &str) -> PriceMap {
        collect_prices(serde_json::from_str(body).unwrap())
    }

    #[test]
    fn test_string_and_number_prices() {
        let mint_a = Pubkey::new_unique();
        let mint_b = Pubkey::new_unique();
        let body = format!(
            r#"{{"data": {{"{}": {{"price": "1.5"}}, "{}": {{"price": 0.25}}}}}}"#,
            mint_a, mint_b
        );

        let prices = parse_response(&body);
        assert_eq!(prices.get(&mint_a), Some(&1.5));
        assert_eq!(prices.get(&mint_b), Some(&0.25));
    }

    #[test]
    fn test_null_quote_is_absent() {
        let mint = Pubkey::new_unique();
        let body = format!(r#"{{"data": {{"{}": null}}}}"#, mint);

        let prices = parse_response(&body);
        assert!(prices.is_empty());
    }

    #[test]
    fn test_null_price_field_is_absent() {
        let mint = Pubkey::new_unique();
        let body = format!(r#"{{"data": {{"{}": {{"price": null}}}}}}"#, mint);

        let prices = parse_response(&body);
        assert!(prices.is_empty());
    }

    #[test]
    fn test_missing_data_section() {
        let prices = parse_response(r#"{}"#);
        assert!(prices.is_empty());
    }

    #[test]
    fn test_unparseable_price_string_is_skipped() {
        let mint = Pubkey::new_unique();
        let body = format!(r#"{{"data": {{"{}": {{"price": "n/a"}}}}}}"#, mint);

        let prices = parse_response(&body);
        assert!(prices.is_empty());
    }
}
