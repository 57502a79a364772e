use crate::core::currency::validate_rate;
use crate::domain::model::ExchangeRate;
use crate::domain::ports::{ConfigProvider, RateSource};
use crate::utils::error::{ReportError, Result, UpstreamFailure};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_FX_ENDPOINT: &str = "https://forex-api.coin.z.com/public/v1/ticker";
pub const DEFAULT_FX_SYMBOL: &str = "USD_JPY";

#[derive(Debug, Deserialize)]
struct TickerResponse {
    status: i64,
    #[serde(default)]
    data: Vec<Ticker>,
}

#[derive(Debug, Deserialize)]
struct Ticker {
    symbol: String,
    ask: String,
    timestamp: Option<String>,
}

/// Reads the latest ask price from a GMO Coin style forex ticker.
pub struct TickerRateSource {
    client: Client,
    endpoint: String,
    symbol: String,
    timeout: Duration,
}

impl TickerRateSource {
    pub fn new(endpoint: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            symbol: symbol.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.fx_endpoint(), config.fx_symbol())
            .with_timeout(Duration::from_secs(config.request_timeout_seconds()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn parse_ticker(&self, body: &str) -> std::result::Result<ExchangeRate, UpstreamFailure> {
        let response: TickerResponse = serde_json::from_str(body)
            .map_err(|e| UpstreamFailure::Malformed(format!("invalid ticker JSON: {}", e)))?;

        if response.status != 0 {
            return Err(UpstreamFailure::Malformed(format!(
                "ticker status is {}",
                response.status
            )));
        }

        let ticker = response
            .data
            .into_iter()
            .find(|t| t.symbol == self.symbol)
            .ok_or_else(|| {
                UpstreamFailure::Malformed(format!("symbol {} not found in ticker", self.symbol))
            })?;

        let rate = Decimal::from_str(ticker.ask.trim()).map_err(|e| {
            UpstreamFailure::Malformed(format!("ask '{}' is not a number: {}", ticker.ask, e))
        })?;

        // 報價時間不可解析時，以取得時間代替
        let observed_at = ticker
            .timestamp
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        Ok(ExchangeRate { rate, observed_at })
    }
}

#[async_trait]
impl RateSource for TickerRateSource {
    async fn fetch_rate(&self) -> Result<ExchangeRate> {
        tracing::debug!("Making FX request to: {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ReportError::ExchangeRate(e.into()))?;
        tracing::debug!("FX response status: {}", response.status());

        let response = response
            .error_for_status()
            .map_err(|e| ReportError::ExchangeRate(e.into()))?;
        let body = response
            .text()
            .await
            .map_err(|e| ReportError::ExchangeRate(e.into()))?;

        let rate = self.parse_ticker(&body).map_err(|e| {
            tracing::error!("Failed to retrieve exchange rate: {}", e);
            ReportError::ExchangeRate(e)
        })?;
        validate_rate(rate.rate)?;

        tracing::info!("Successfully retrieved exchange rate: {}", rate.rate);
        Ok(rate)
    }
}
