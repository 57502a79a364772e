use crate::domain::model::{
    ConvertedService, ConvertedSummary, CostSummary, ExchangeRate, ForecastSummary,
};
use crate::utils::error::{ReportError, Result, UpstreamFailure};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rejects rates that cannot be used for conversion.
pub fn validate_rate(rate: Decimal) -> Result<Decimal> {
    if rate <= Decimal::ZERO {
        return Err(ReportError::ExchangeRate(UpstreamFailure::Malformed(
            format!("rate must be positive, got {}", rate),
        )));
    }
    Ok(rate)
}

/// Converts a USD amount to whole yen, rounding half to even.
pub fn usd_to_jpy(rate: &ExchangeRate, usd: Decimal) -> Result<i64> {
    validate_rate(rate.rate)?;
    usd.checked_mul(rate.rate)
        .map(|jpy| jpy.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
        .and_then(|jpy| jpy.to_i64())
        .ok_or_else(|| {
            ReportError::ExchangeRate(UpstreamFailure::Malformed(format!(
                "{} USD at rate {} does not fit in a yen amount",
                usd, rate.rate
            )))
        })
}

/// Converts every monetary figure of the report. Any failure aborts the whole
/// conversion so a report never carries a partial set of yen amounts.
pub fn convert_summary(
    rate: &ExchangeRate,
    costs: &CostSummary,
    forecast: &ForecastSummary,
) -> Result<ConvertedSummary> {
    let top_services = costs
        .top_services
        .iter()
        .map(|record| {
            Ok(ConvertedService {
                record: record.clone(),
                amount_jpy: usd_to_jpy(rate, record.amount)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ConvertedSummary {
        total_jpy: usd_to_jpy(rate, costs.total_amount)?,
        top_services,
        other_jpy: usd_to_jpy(rate, costs.other_amount)?,
        forecast_jpy: usd_to_jpy(rate, forecast.predicted_amount)?,
    })
}
