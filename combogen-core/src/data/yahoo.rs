//! Yahoo Finance quote provider.
//!
//! Fetches spot prices from Yahoo's v8 chart API (the `meta` block carries
//! the regular market price, so a one-day range is enough). Handles rate
//! limiting, retries with exponential backoff, and response parsing.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes; manual price overrides are the fallback when it is unavailable.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::provider::{Quote, QuoteError, QuoteProvider};

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    symbol: String,
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "regularMarketTime")]
    regular_market_time: Option<i64>,
}

/// Yahoo Finance quote provider.
pub struct YahooQuotes {
    client: reqwest::blocking::Client,
    max_retries: u32,
    base_delay: Duration,
}

impl Default for YahooQuotes {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooQuotes {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }

    /// Build the chart API URL for a spot quote.
    fn chart_url(symbol: &str) -> String {
        format!("https://query2.finance.yahoo.com/v8/finance/chart/{symbol}?range=1d&interval=1d")
    }

    /// Parse the chart API response into a Quote.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Quote, QuoteError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    QuoteError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    QuoteError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                QuoteError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| QuoteError::ResponseFormatChanged("result array is empty".into()))?;

        let price = data.meta.regular_market_price.ok_or_else(|| {
            QuoteError::ResponseFormatChanged(format!("no regular market price for {symbol}"))
        })?;

        let as_of: Option<DateTime<Utc>> = data
            .meta
            .regular_market_time
            .and_then(|ts| DateTime::from_timestamp(ts, 0));

        Ok(Quote {
            symbol: data.meta.symbol,
            price,
            as_of,
        })
    }

    /// Execute a single quote request with retry logic.
    fn fetch_with_retry(&self, symbol: &str) -> Result<Quote, QuoteError> {
        let url = Self::chart_url(symbol);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                std::thread::sleep(delay);
            }

            match self.client.get(&url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(QuoteError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    // Unknown symbols come back as 404 with a JSON error
                    // body; let the parser map it to SymbolNotFound.
                    if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
                        last_error = Some(QuoteError::Other(format!("HTTP {status} for {symbol}")));
                        continue;
                    }

                    let chart: ChartResponse = resp.json().map_err(|e| {
                        QuoteError::ResponseFormatChanged(format!(
                            "failed to parse response for {symbol}: {e}"
                        ))
                    })?;

                    return Self::parse_response(symbol, chart);
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(QuoteError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(QuoteError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| QuoteError::Other("max retries exceeded".into())))
    }
}

impl QuoteProvider for YahooQuotes {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
        self.fetch_with_retry(symbol)
    }
}
