use async_trait::async_trait;
use chrono::NaiveDate;
use cost_report::adapters::account::StaticAccountSource;
use cost_report::adapters::fx::TickerRateSource;
use cost_report::adapters::notify::Notifier;
use cost_report::domain::model::{CostRecord, ReportingPeriod};
use cost_report::domain::ports::{CostDataSource, ForecastDataSource};
use cost_report::utils::error::{ReportError, Result, UpstreamFailure};
use cost_report::{ReportConfig, ReportEngine, ReportPipeline};
use httpmock::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

struct FixedCosts;

#[async_trait]
impl CostDataSource for FixedCosts {
    async fn fetch_costs(&self, _period: &ReportingPeriod) -> Result<Vec<CostRecord>> {
        Ok(vec![
            CostRecord::usd("Amazon EC2", dec!(42.5)),
            CostRecord::usd("Tax", dec!(4.25)),
        ])
    }
}

struct FixedForecast;

#[async_trait]
impl ForecastDataSource for FixedForecast {
    async fn fetch_forecast(&self, _period: &ReportingPeriod) -> Result<Decimal> {
        Ok(dec!(100))
    }
}

fn mock_ticker(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/ticker");
        then.status(200).json_body(serde_json::json!({
            "status": 0,
            "data": [{"symbol": "USD_JPY", "ask": "150", "bid": "149.9"}]
        }));
    });
}

fn engine_for(config: &ReportConfig, fx_url: String) -> ReportEngine {
    let pipeline = ReportPipeline::new(
        Box::new(FixedCosts),
        Box::new(FixedForecast),
        Box::new(TickerRateSource::new(fx_url, "USD_JPY")),
        Box::new(StaticAccountSource::new("123456789012", None)),
    );
    ReportEngine::new(pipeline, Box::new(Notifier::from_config(config)))
}

#[tokio::test]
async fn test_report_is_posted_to_configured_webhook() {
    let server = MockServer::start();
    mock_ticker(&server);
    let hook = server.mock(|when, then| {
        when.method(POST)
            .path("/services/T000/B000/XXXX")
            .body_contains("アカウント: N/A (123456789012)")
            .body_contains("1. 42.50 USD / 6,375 円");
        then.status(200).body("ok");
    });

    let config = ReportConfig {
        webhook_url: Some(server.url("/services/T000/B000/XXXX")),
        ..ReportConfig::default()
    };
    let notifier = Notifier::from_config(&config);
    assert!(notifier.is_webhook());

    engine_for(&config, server.url("/ticker"))
        .run(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
        .await
        .unwrap();

    hook.assert();
}

#[tokio::test]
async fn test_webhook_rejection_is_delivery_error() {
    let server = MockServer::start();
    mock_ticker(&server);
    let hook = server.mock(|when, then| {
        when.method(POST).path("/hook");
        then.status(403).body("invalid_token");
    });

    let config = ReportConfig {
        webhook_url: Some(server.url("/hook")),
        ..ReportConfig::default()
    };

    let err = engine_for(&config, server.url("/ticker"))
        .run(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
        .await
        .unwrap_err();

    hook.assert();
    assert!(matches!(
        err,
        ReportError::Delivery(UpstreamFailure::Status(403))
    ));
}

#[tokio::test]
async fn test_missing_webhook_falls_back_to_stdout() {
    let server = MockServer::start();
    mock_ticker(&server);
    let hook = server.mock(|when, then| {
        when.method(POST);
        then.status(200);
    });

    let config = ReportConfig {
        webhook_url: None,
        ..ReportConfig::default()
    };
    assert!(!Notifier::from_config(&config).is_webhook());

    let report = engine_for(&config, server.url("/ticker"))
        .run(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
        .await
        .unwrap();

    hook.assert_hits(0);
    assert_eq!(report.costs.total_amount, dec!(46.75));
}

#[test]
fn test_blank_webhook_is_treated_as_unset() {
    let config = ReportConfig {
        webhook_url: Some("  ".to_string()),
        ..ReportConfig::default()
    };
    assert!(!Notifier::from_config(&config).is_webhook());
}
