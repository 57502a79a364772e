use crate::domain::model::{AccountInfo, CostRecord, ExchangeRate, ReportingPeriod};
use crate::utils::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Actual spend grouped by service for a `[start, end)` window.
#[async_trait]
pub trait CostDataSource: Send + Sync {
    async fn fetch_costs(&self, period: &ReportingPeriod) -> Result<Vec<CostRecord>>;
}

/// Predicted total spend for a `[start, end)` window.
#[async_trait]
pub trait ForecastDataSource: Send + Sync {
    async fn fetch_forecast(&self, period: &ReportingPeriod) -> Result<Decimal>;
}

#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rate(&self) -> Result<ExchangeRate>;
}

#[async_trait]
pub trait AccountSource: Send + Sync {
    async fn fetch_account(&self) -> Result<AccountInfo>;
}

#[async_trait]
pub trait Deliverer: Send + Sync {
    async fn deliver(&self, text: &str) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn webhook_url(&self) -> Option<&str>;
    fn include_tax(&self) -> bool;
    fn fx_endpoint(&self) -> &str;
    fn fx_symbol(&self) -> &str;
    fn request_timeout_seconds(&self) -> u64;
}
