use chrono::Utc;
use cost_report::adapters::aws::engine_from_config;
use cost_report::utils::{logger, validation::Validate};
use cost_report::ReportConfig;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Scheduled events carry `time`; manual invocations may also set `include_tax`.
#[derive(Debug, Default, Deserialize)]
pub struct Request {
    pub time: Option<String>,
    pub include_tax: Option<bool>,
}

#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub period_start: String,
    pub period_end: String,
    pub total_usd: Decimal,
    pub total_jpy: i64,
    pub forecast_usd: Decimal,
}

async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    tracing::info!("Starting cost report Lambda function");

    let mut config = ReportConfig::from_env()?;
    if let Some(include_tax) = event.payload.include_tax {
        config.include_tax = include_tax;
    }
    config.validate()?;

    let resolver = config.period_resolver()?;
    let today = match event.payload.time.as_deref() {
        Some(time) => resolver.today_from_timestamp(time)?,
        None => resolver.today_at(Utc::now()),
    };

    let engine = engine_from_config(&config).await;
    let report = engine.run(today).await.map_err(|e| {
        tracing::error!(
            "❌ Cost report failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        e
    })?;

    let response = Response {
        message: "Cost report delivered".to_string(),
        period_start: report.period.start_date.to_string(),
        period_end: report.period.end_date.to_string(),
        total_usd: report.costs.total_amount,
        total_jpy: report.converted.total_jpy,
        forecast_usd: report.forecast.predicted_amount,
    };

    tracing::info!("Cost report Lambda function completed successfully");
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
