use crate::core::period::ResolvedPeriods;
use crate::domain::model::{CostSummary, ForecastSource, ForecastSummary};
use crate::domain::ports::ForecastDataSource;
use crate::utils::error::Result;

/// On the first of the month the reported window is already closed, so the
/// actual total is restated and no forecast request is made.
pub async fn resolve_forecast(
    source: &dyn ForecastDataSource,
    periods: &ResolvedPeriods,
    costs: &CostSummary,
) -> Result<ForecastSummary> {
    if periods.is_first_of_month {
        tracing::info!("📅 First day of the month, using total cost as forecast");
        return Ok(ForecastSummary {
            predicted_amount: costs.total_amount,
            source: ForecastSource::ActualTotal,
        });
    }

    let predicted_amount = source.fetch_forecast(&periods.forecast_query).await?;
    Ok(ForecastSummary {
        predicted_amount,
        source: ForecastSource::Forecast,
    })
}
