use crate::domain::model::{PeriodLabel, ReportingPeriod};
use crate::utils::error::{ReportError, Result};
use chrono::{DateTime, Datelike, Days, FixedOffset, Months, NaiveDate, Utc};

/// The three windows a single invocation works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPeriods {
    pub today: NaiveDate,
    pub is_first_of_month: bool,
    pub cost_query: ReportingPeriod,
    pub forecast_query: ReportingPeriod,
    pub display: ReportingPeriod,
}

/// Computes reporting windows in a fixed reporting timezone.
#[derive(Debug, Clone, Copy)]
pub struct PeriodResolver {
    offset: FixedOffset,
}

impl PeriodResolver {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Normalizes a trigger timestamp to the calendar date in the reporting timezone.
    pub fn today_at(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// 排程事件的 `time` 欄位是 RFC 3339 字串
    pub fn today_from_timestamp(&self, timestamp: &str) -> Result<NaiveDate> {
        let parsed = DateTime::parse_from_rfc3339(timestamp).map_err(|e| {
            ReportError::InvalidDate {
                message: format!("cannot parse trigger timestamp '{}': {}", timestamp, e),
            }
        })?;
        Ok(self.today_at(parsed.with_timezone(&Utc)))
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| ReportError::InvalidDate {
        message: format!("'{}' is not a YYYY-MM-DD date: {}", value, e),
    })
}

pub fn resolve_periods(today: NaiveDate) -> Result<ResolvedPeriods> {
    let is_first_of_month = today.day() == 1;
    let month_start = first_day_of_month(today)?;
    let yesterday = today
        .checked_sub_days(Days::new(1))
        .ok_or_else(|| out_of_range(today, "previous day"))?;

    // Cost Explorer 要求 start < end，所以月初時改查整個上個月
    let start_date = if is_first_of_month {
        month_start
            .checked_sub_months(Months::new(1))
            .ok_or_else(|| out_of_range(today, "previous month"))?
    } else {
        month_start
    };

    let cost_query = ReportingPeriod::new(start_date, today, PeriodLabel::CostQuery);
    let display = ReportingPeriod::new(start_date, yesterday, PeriodLabel::Display);

    let forecast_query = if is_first_of_month {
        ReportingPeriod {
            label: PeriodLabel::ForecastQuery,
            ..cost_query
        }
    } else {
        let next_month_start = month_start
            .checked_add_months(Months::new(1))
            .ok_or_else(|| out_of_range(today, "next month"))?;
        ReportingPeriod::new(today, next_month_start, PeriodLabel::ForecastQuery)
    };

    let (display_start, display_end) = (display.start_date, display.end_date);
    tracing::debug!(
        "Resolved periods for {}: cost {}..{}, forecast {}..{}, display {}..{}",
        today,
        cost_query.start_date,
        cost_query.end_date,
        forecast_query.start_date,
        forecast_query.end_date,
        display_start,
        display_end
    );

    Ok(ResolvedPeriods {
        today,
        is_first_of_month,
        cost_query,
        forecast_query,
        display,
    })
}

fn first_day_of_month(date: NaiveDate) -> Result<NaiveDate> {
    date.with_day(1)
        .ok_or_else(|| out_of_range(date, "first day of month"))
}

fn out_of_range(date: NaiveDate, what: &str) -> ReportError {
    ReportError::InvalidDate {
        message: format!("{} of {} is out of range", what, date),
    }
}
