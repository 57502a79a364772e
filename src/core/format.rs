use crate::domain::model::{ForecastSource, Report};
use rust_decimal::{Decimal, RoundingStrategy};

/// Renders a report as the chat message body.
pub struct ReportFormatter;

impl ReportFormatter {
    pub fn format(report: &Report) -> String {
        let mut message = String::new();
        let costs = &report.costs;
        let converted = &report.converted;
        let alias = report.account.alias.as_deref().unwrap_or("N/A");

        message.push_str(&format!(
            "アカウント: {} ({})\n",
            alias, report.account.account_id
        ));
        message.push_str(&format!(
            "期間: {} - {}\n",
            report.period.start_date.format("%Y-%m-%d"),
            report.period.end_date.format("%Y-%m-%d")
        ));
        message.push('\n');

        message.push_str(&format!(
            "利用額: {} USD / {} 円\n",
            format_usd(costs.total_amount),
            format_jpy(converted.total_jpy)
        ));
        let forecast_note = match report.forecast.source {
            ForecastSource::Forecast => "",
            ForecastSource::ActualTotal => " (確定)",
        };
        message.push_str(&format!(
            "予想金額: {} USD / {} 円{}\n",
            format_usd(report.forecast.predicted_amount),
            format_jpy(converted.forecast_jpy),
            forecast_note
        ));
        message.push_str(&format!(
            "* 為替レート: 1 USD = {} 円\n",
            format_rate(report.exchange_rate.rate)
        ));
        message.push('\n');

        message.push_str(&format!("Top{}:\n", converted.top_services.len()));
        for (i, service) in converted.top_services.iter().enumerate() {
            message.push_str(&format!(
                "{}. {} USD / {} 円 ({}): {}\n",
                i + 1,
                format_usd(service.record.amount),
                format_jpy(service.amount_jpy),
                format_share(service.record.amount, costs.total_amount),
                service.record.service_name
            ));
        }
        message.push_str(&format!(
            "その他: {} USD / {} 円 ({})\n",
            format_usd(costs.other_amount),
            format_jpy(converted.other_jpy),
            format_share(costs.other_amount, costs.total_amount)
        ));

        message
    }
}

/// `1234.5` -> `1,234.50`
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let text = format!("{:.2}", rounded);
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits, "00"));
    format!("{}{}.{}", sign, group_thousands(integer), fraction)
}

/// `185184` -> `185,184`
pub fn format_jpy(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}{}", sign, group_thousands(&digits))
}

fn format_rate(rate: Decimal) -> String {
    format!(
        "{:.2}",
        rate.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
    )
}

fn format_share(amount: Decimal, total: Decimal) -> String {
    if total.is_zero() {
        return "0.0%".to_string();
    }
    let percent = (amount * Decimal::ONE_HUNDRED / total)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven);
    format!("{:.1}%", percent)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
