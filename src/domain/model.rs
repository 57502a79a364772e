use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const USD: &str = "USD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodLabel {
    CostQuery,
    ForecastQuery,
    Display,
}

/// 日期區間。查詢用區間為 `[start, end)`，顯示用區間兩端皆包含。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub label: PeriodLabel,
}

impl ReportingPeriod {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, label: PeriodLabel) -> Self {
        debug_assert!(start_date <= end_date);
        Self {
            start_date,
            end_date,
            label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostRecord {
    pub service_name: String,
    pub amount: Decimal,
    pub currency: String,
}

impl CostRecord {
    pub fn usd(service_name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            service_name: service_name.into(),
            amount,
            currency: USD.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostSummary {
    pub total_amount: Decimal,
    pub top_services: Vec<CostRecord>,
    pub other_amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastSource {
    /// 上游預測值
    Forecast,
    /// 月初時直接沿用已結算的實際金額
    ActualTotal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub predicted_amount: Decimal,
    pub source: ForecastSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub rate: Decimal,
    pub observed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub account_id: String,
    pub alias: Option<String>,
}

/// A top service together with its yen amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedService {
    pub record: CostRecord,
    pub amount_jpy: i64,
}

/// Every monetary figure of a report, converted to whole yen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedSummary {
    pub total_jpy: i64,
    pub top_services: Vec<ConvertedService>,
    pub other_jpy: i64,
    pub forecast_jpy: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub account: AccountInfo,
    pub period: ReportingPeriod,
    pub costs: CostSummary,
    pub forecast: ForecastSummary,
    pub exchange_rate: ExchangeRate,
    pub converted: ConvertedSummary,
    pub generated_at: DateTime<Utc>,
}
