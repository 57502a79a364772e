use crate::config::ReportConfig;
use crate::utils::error::{ReportError, Result};
use std::env;

impl ReportConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key/value lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ReportConfig::default();

        let include_tax = match lookup("INCLUDE_TAX") {
            Some(value) => parse_bool("INCLUDE_TAX", &value)?,
            None => defaults.include_tax,
        };

        let request_timeout_seconds = match lookup("REQUEST_TIMEOUT_SECONDS") {
            Some(value) => value.trim().parse().map_err(|_| {
                ReportError::InvalidConfigValueError {
                    field: "REQUEST_TIMEOUT_SECONDS".to_string(),
                    value: value.clone(),
                    reason: "Value must be a whole number of seconds".to_string(),
                }
            })?,
            None => defaults.request_timeout_seconds,
        };

        Ok(ReportConfig {
            webhook_url: lookup("SLACK_WEBHOOK_URL"),
            include_tax,
            utc_offset: lookup("REPORT_UTC_OFFSET").unwrap_or(defaults.utc_offset),
            fx_endpoint: lookup("FX_ENDPOINT").unwrap_or(defaults.fx_endpoint),
            fx_symbol: lookup("FX_SYMBOL").unwrap_or(defaults.fx_symbol),
            request_timeout_seconds,
            aws_region: lookup("COST_REPORT_AWS_REGION"),
            account_id: lookup("ACCOUNT_ID"),
            account_alias: lookup("ACCOUNT_ALIAS"),
            tag: lookup("TAG"),
        }
        .normalize())
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ReportError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "Expected true or false".to_string(),
        }),
    }
}
