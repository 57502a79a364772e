use crate::core::currency::convert_summary;
use crate::core::forecast::resolve_forecast;
use crate::core::period::resolve_periods;
use crate::core::ranking::ServiceRanker;
use crate::domain::model::Report;
use crate::domain::ports::{AccountSource, CostDataSource, ForecastDataSource, RateSource};
use crate::utils::error::Result;
use chrono::{NaiveDate, Utc};

/// Collects and computes everything a report needs. Stages run one after
/// another and the first failure aborts the build.
pub struct ReportPipeline {
    costs: Box<dyn CostDataSource>,
    forecasts: Box<dyn ForecastDataSource>,
    rates: Box<dyn RateSource>,
    accounts: Box<dyn AccountSource>,
    ranker: ServiceRanker,
}

impl ReportPipeline {
    pub fn new(
        costs: Box<dyn CostDataSource>,
        forecasts: Box<dyn ForecastDataSource>,
        rates: Box<dyn RateSource>,
        accounts: Box<dyn AccountSource>,
    ) -> Self {
        Self {
            costs,
            forecasts,
            rates,
            accounts,
            ranker: ServiceRanker::default(),
        }
    }

    pub fn with_ranker(mut self, ranker: ServiceRanker) -> Self {
        self.ranker = ranker;
        self
    }

    pub async fn build_report(&self, today: NaiveDate) -> Result<Report> {
        let periods = resolve_periods(today)?;
        tracing::info!(
            "🗓️ Reporting {} - {} (today: {})",
            periods.display.start_date,
            periods.display.end_date,
            today
        );

        let account = self.accounts.fetch_account().await?;
        tracing::debug!("Account: {} ({:?})", account.account_id, account.alias);

        tracing::info!(
            "💰 Fetching costs from {} to {}",
            periods.cost_query.start_date,
            periods.cost_query.end_date
        );
        let records = self.costs.fetch_costs(&periods.cost_query).await?;
        tracing::info!("Retrieved {} service cost records", records.len());

        let costs = self.ranker.rank(records);
        tracing::info!("Total cost: {} USD", costs.total_amount);

        let forecast = resolve_forecast(self.forecasts.as_ref(), &periods, &costs).await?;
        tracing::info!("🔮 Forecast: {} USD", forecast.predicted_amount);

        let exchange_rate = self.rates.fetch_rate().await?;
        tracing::info!("💱 Exchange rate: 1 USD = {} JPY", exchange_rate.rate);

        let converted = convert_summary(&exchange_rate, &costs, &forecast)?;

        Ok(Report {
            account,
            period: periods.display,
            costs,
            forecast,
            exchange_rate,
            converted,
            generated_at: Utc::now(),
        })
    }
}
