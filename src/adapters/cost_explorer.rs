use crate::domain::model::{CostRecord, ReportingPeriod, USD};
use crate::domain::ports::{CostDataSource, ForecastDataSource};
use crate::utils::error::{ReportError, Result, UpstreamFailure};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_costexplorer::config::http::HttpResponse;
use aws_sdk_costexplorer::config::Region;
use aws_sdk_costexplorer::error::{DisplayErrorContext, SdkError};
use aws_sdk_costexplorer::operation::get_cost_and_usage::GetCostAndUsageOutput;
use aws_sdk_costexplorer::types::{
    DateInterval, Granularity, Group, GroupDefinition, GroupDefinitionType, Metric,
};
use aws_sdk_costexplorer::Client as CostExplorerClient;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

const UNBLENDED_COST: &str = "UnblendedCost";
// Cost Explorer 只有 us-east-1 端點
const COST_EXPLORER_REGION: &str = "us-east-1";

/// Actual and forecast spend from AWS Cost Explorer.
#[derive(Debug, Clone)]
pub struct CostExplorerSource {
    client: CostExplorerClient,
}

impl CostExplorerSource {
    pub fn new(client: CostExplorerClient) -> Self {
        Self { client }
    }

    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        let config = aws_sdk_costexplorer::config::Builder::from(config)
            .region(Region::new(COST_EXPLORER_REGION))
            .build();
        Self::new(CostExplorerClient::from_conf(config))
    }
}

#[async_trait]
impl CostDataSource for CostExplorerSource {
    async fn fetch_costs(&self, period: &ReportingPeriod) -> Result<Vec<CostRecord>> {
        let interval = date_interval(period).map_err(ReportError::CostQuery)?;
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut next_page_token: Option<String> = None;
        let mut pages = 0;

        loop {
            let output = self
                .client
                .get_cost_and_usage()
                .time_period(interval.clone())
                .granularity(Granularity::Monthly)
                .metrics(UNBLENDED_COST)
                .group_by(
                    GroupDefinition::builder()
                        .r#type(GroupDefinitionType::Dimension)
                        .key("SERVICE")
                        .build(),
                )
                .set_next_page_token(next_page_token.take())
                .send()
                .await
                .map_err(|e| {
                    tracing::error!("Failed to retrieve cost and usage data: {}", DisplayErrorContext(&e));
                    ReportError::CostQuery(sdk_failure(e))
                })?;
            pages += 1;

            next_page_token =
                accumulate_page(&output, &mut totals).map_err(ReportError::CostQuery)?;
            if next_page_token.is_none() {
                break;
            }
        }

        tracing::debug!("Cost and usage: {} page(s), {} services", pages, totals.len());

        Ok(into_records(totals))
    }
}

/// Adds one page of grouped results to the running per-service totals and
/// returns the token of the next page, if any.
fn accumulate_page(
    output: &GetCostAndUsageOutput,
    totals: &mut BTreeMap<String, Decimal>,
) -> std::result::Result<Option<String>, UpstreamFailure> {
    for result in output.results_by_time() {
        for group in result.groups() {
            let record = parse_group(group)?;
            *totals.entry(record.service_name).or_default() += record.amount;
        }
    }

    Ok(output
        .next_page_token()
        .filter(|token| !token.is_empty())
        .map(str::to_string))
}

fn into_records(totals: BTreeMap<String, Decimal>) -> Vec<CostRecord> {
    totals
        .into_iter()
        .map(|(service_name, amount)| {
            // 退款或抵用金可能讓單一服務的淨額為負，排名時視為 0
            let amount = if amount < Decimal::ZERO {
                tracing::warn!("{} has negative cost {}, treating as zero", service_name, amount);
                Decimal::ZERO
            } else {
                amount
            };
            CostRecord::usd(service_name, amount)
        })
        .collect()
}

#[async_trait]
impl ForecastDataSource for CostExplorerSource {
    async fn fetch_forecast(&self, period: &ReportingPeriod) -> Result<Decimal> {
        let interval = date_interval(period).map_err(ReportError::ForecastQuery)?;

        let output = self
            .client
            .get_cost_forecast()
            .time_period(interval)
            .granularity(Granularity::Monthly)
            .metric(Metric::UnblendedCost)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to retrieve cost forecast: {}", DisplayErrorContext(&e));
                ReportError::ForecastQuery(sdk_failure(e))
            })?;

        let amount = output
            .total()
            .and_then(|total| total.amount())
            .ok_or_else(|| {
                ReportError::ForecastQuery(UpstreamFailure::Malformed(
                    "forecast response has no total amount".to_string(),
                ))
            })?;

        parse_amount(amount).map_err(ReportError::ForecastQuery)
    }
}

fn date_interval(period: &ReportingPeriod) -> std::result::Result<DateInterval, UpstreamFailure> {
    DateInterval::builder()
        .start(period.start_date.format("%Y-%m-%d").to_string())
        .end(period.end_date.format("%Y-%m-%d").to_string())
        .build()
        .map_err(|e| UpstreamFailure::Malformed(format!("invalid time period: {}", e)))
}

fn parse_group(group: &Group) -> std::result::Result<CostRecord, UpstreamFailure> {
    let service_name = group
        .keys()
        .first()
        .cloned()
        .ok_or_else(|| UpstreamFailure::Malformed("cost group has no service key".to_string()))?;

    let metric = group
        .metrics()
        .and_then(|metrics| metrics.get(UNBLENDED_COST))
        .ok_or_else(|| {
            UpstreamFailure::Malformed(format!("no {} for {}", UNBLENDED_COST, service_name))
        })?;

    if let Some(unit) = metric.unit() {
        if unit != USD {
            return Err(UpstreamFailure::Malformed(format!(
                "unexpected currency {} for {}",
                unit, service_name
            )));
        }
    }

    let amount = metric
        .amount()
        .ok_or_else(|| UpstreamFailure::Malformed(format!("no amount for {}", service_name)))
        .and_then(parse_amount)?;

    Ok(CostRecord::usd(service_name, amount))
}

fn parse_amount(value: &str) -> std::result::Result<Decimal, UpstreamFailure> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|e| UpstreamFailure::Malformed(format!("amount '{}' is not a number: {}", value, e)))
}

fn sdk_failure<E>(err: SdkError<E, HttpResponse>) -> UpstreamFailure
where
    E: std::error::Error + 'static,
{
    match &err {
        SdkError::ServiceError(service) => UpstreamFailure::Status(service.raw().status().as_u16()),
        SdkError::ResponseError(_) => {
            UpstreamFailure::Malformed(DisplayErrorContext(&err).to_string())
        }
        _ => UpstreamFailure::Transport(DisplayErrorContext(&err).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PeriodLabel;
    use aws_sdk_costexplorer::types::{MetricValue, ResultByTime};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn group(service: &str, amount: &str, unit: &str) -> Group {
        Group::builder()
            .keys(service)
            .metrics(
                UNBLENDED_COST,
                MetricValue::builder().amount(amount).unit(unit).build(),
            )
            .build()
    }

    #[test]
    fn test_parse_group() {
        let record = parse_group(&group("Amazon EC2", "123.4567891", "USD")).unwrap();
        assert_eq!(record.service_name, "Amazon EC2");
        assert_eq!(record.amount, dec!(123.4567891));
        assert_eq!(record.currency, "USD");
    }

    #[test]
    fn test_parse_group_rejects_malformed_groups() {
        assert!(parse_group(&group("Amazon EC2", "abc", "USD")).is_err());
        assert!(parse_group(&group("Amazon EC2", "1.0", "EUR")).is_err());
        assert!(parse_group(&Group::builder().keys("Amazon EC2").build()).is_err());
    }

    fn page(buckets: Vec<Vec<Group>>, next_page_token: Option<&str>) -> GetCostAndUsageOutput {
        let mut builder = GetCostAndUsageOutput::builder();
        for groups in buckets {
            builder = builder.results_by_time(ResultByTime::builder().set_groups(Some(groups)).build());
        }
        builder.set_next_page_token(next_page_token.map(str::to_string)).build()
    }

    #[test]
    fn test_pages_are_merged_per_service() {
        let mut totals = BTreeMap::new();

        let first = page(
            vec![vec![
                group("Amazon EC2", "100.25", "USD"),
                group("Amazon S3", "5", "USD"),
            ]],
            Some("page-2"),
        );
        let token = accumulate_page(&first, &mut totals).unwrap();
        assert_eq!(token.as_deref(), Some("page-2"));

        let second = page(
            vec![
                vec![group("Amazon EC2", "20.75", "USD")],
                vec![group("AWS Lambda", "1.5", "USD")],
            ],
            None,
        );
        assert_eq!(accumulate_page(&second, &mut totals).unwrap(), None);

        let records = into_records(totals);
        let amounts: Vec<(&str, Decimal)> = records
            .iter()
            .map(|r| (r.service_name.as_str(), r.amount))
            .collect();
        assert_eq!(
            amounts,
            vec![
                ("AWS Lambda", dec!(1.5)),
                ("Amazon EC2", dec!(121.00)),
                ("Amazon S3", dec!(5)),
            ]
        );
    }

    #[test]
    fn test_empty_page_token_ends_pagination() {
        let mut totals = BTreeMap::new();
        let last = page(vec![vec![group("Amazon EC2", "1", "USD")]], Some(""));
        assert_eq!(accumulate_page(&last, &mut totals).unwrap(), None);
    }

    #[test]
    fn test_malformed_group_fails_the_page() {
        let mut totals = BTreeMap::new();
        let bad = page(vec![vec![group("Amazon EC2", "abc", "USD")]], Some("next"));
        assert!(matches!(
            accumulate_page(&bad, &mut totals),
            Err(UpstreamFailure::Malformed(_))
        ));
    }

    #[test]
    fn test_negative_net_amount_is_clamped_after_merge() {
        let mut totals = BTreeMap::new();
        let output = page(
            vec![
                vec![group("Amazon EC2", "10", "USD"), group("Refund", "-3.20", "USD")],
                vec![group("Amazon EC2", "-3", "USD")],
            ],
            None,
        );
        accumulate_page(&output, &mut totals).unwrap();

        let records = into_records(totals);
        assert_eq!(records[0].service_name, "Amazon EC2");
        assert_eq!(records[0].amount, dec!(7));
        assert_eq!(records[1].service_name, "Refund");
        assert_eq!(records[1].amount, Decimal::ZERO);
    }

    #[test]
    fn test_parse_group_keeps_negative_amount() {
        let record = parse_group(&group("Refund", "-3.20", "USD")).unwrap();
        assert_eq!(record.amount, dec!(-3.20));
    }

    #[test]
    fn test_parse_amount_accepts_scientific_notation() {
        assert_eq!(parse_amount("1.5E-7").unwrap(), dec!(0.00000015));
        assert_eq!(parse_amount("0.0000000001").unwrap(), dec!(0.0000000001));
    }

    #[test]
    fn test_date_interval_is_formatted_as_dates() {
        let period = ReportingPeriod::new(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            PeriodLabel::CostQuery,
        );
        let interval = date_interval(&period).unwrap();
        assert_eq!(interval.start(), "2024-06-01");
        assert_eq!(interval.end(), "2024-06-15");
    }
}
