#[cfg(feature = "cli")]
pub mod cli;
pub mod lambda;
pub mod toml_config;

use crate::adapters::fx::{DEFAULT_FX_ENDPOINT, DEFAULT_FX_SYMBOL};
use crate::core::period::PeriodResolver;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    parse_utc_offset, validate_non_empty_string, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_UTC_OFFSET: &str = "+09:00";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Everything one invocation needs to know, read once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Incoming webhook. Unset or empty means the report goes to standard output.
    pub webhook_url: Option<String>,
    /// Let the "Tax" line compete for a top-5 slot.
    pub include_tax: bool,
    /// Offset of the reporting timezone, e.g. `+09:00`.
    pub utc_offset: String,
    pub fx_endpoint: String,
    pub fx_symbol: String,
    pub request_timeout_seconds: u64,
    pub aws_region: Option<String>,
    /// Skips the STS/IAM lookup when set.
    pub account_id: Option<String>,
    pub account_alias: Option<String>,
    /// Resource tag used by the deployment stack only.
    pub tag: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            include_tax: false,
            utc_offset: DEFAULT_UTC_OFFSET.to_string(),
            fx_endpoint: DEFAULT_FX_ENDPOINT.to_string(),
            fx_symbol: DEFAULT_FX_SYMBOL.to_string(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            aws_region: None,
            account_id: None,
            account_alias: None,
            tag: None,
        }
    }
}

impl ReportConfig {
    pub fn period_resolver(&self) -> Result<PeriodResolver> {
        Ok(PeriodResolver::new(parse_utc_offset(
            "utc_offset",
            &self.utc_offset,
        )?))
    }

    /// 空字串一律視為未設定
    pub(crate) fn normalize(mut self) -> Self {
        fn non_empty(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }
        self.webhook_url = non_empty(self.webhook_url);
        self.aws_region = non_empty(self.aws_region);
        self.account_id = non_empty(self.account_id);
        self.account_alias = non_empty(self.account_alias);
        self.tag = non_empty(self.tag);
        self
    }
}

impl ConfigProvider for ReportConfig {
    fn webhook_url(&self) -> Option<&str> {
        self.webhook_url.as_deref()
    }

    fn include_tax(&self) -> bool {
        self.include_tax
    }

    fn fx_endpoint(&self) -> &str {
        &self.fx_endpoint
    }

    fn fx_symbol(&self) -> &str {
        &self.fx_symbol
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.request_timeout_seconds
    }
}

impl Validate for ReportConfig {
    fn validate(&self) -> Result<()> {
        if let Some(webhook_url) = &self.webhook_url {
            validate_url("webhook_url", webhook_url)?;
        }

        validate_url("fx_endpoint", &self.fx_endpoint)?;
        validate_non_empty_string("fx_symbol", &self.fx_symbol)?;
        parse_utc_offset("utc_offset", &self.utc_offset)?;
        validate_range("request_timeout_seconds", self.request_timeout_seconds, 1, 300)?;

        tracing::debug!("✅ Report configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ReportError;

    #[test]
    fn test_default_config_is_valid() {
        let config = ReportConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.webhook_url(), None);
        assert!(!config.include_tax());
        assert_eq!(config.fx_symbol(), "USD_JPY");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_webhook = ReportConfig {
            webhook_url: Some("not a url".to_string()),
            ..ReportConfig::default()
        };
        assert!(matches!(
            bad_webhook.validate(),
            Err(ReportError::InvalidConfigValueError { .. })
        ));

        let bad_offset = ReportConfig {
            utc_offset: "JST".to_string(),
            ..ReportConfig::default()
        };
        assert!(bad_offset.validate().is_err());
        assert!(bad_offset.period_resolver().is_err());

        let bad_timeout = ReportConfig {
            request_timeout_seconds: 0,
            ..ReportConfig::default()
        };
        assert!(bad_timeout.validate().is_err());
    }

    #[test]
    fn test_normalize_drops_blank_values() {
        let config = ReportConfig {
            webhook_url: Some("   ".to_string()),
            account_id: Some(" 123456789012 ".to_string()),
            ..ReportConfig::default()
        }
        .normalize();

        assert_eq!(config.webhook_url, None);
        assert_eq!(config.account_id.as_deref(), Some("123456789012"));
    }
}
