use thiserror::Error;

/// 上游服務失敗的具體原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamFailure {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for UpstreamFailure {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => UpstreamFailure::Status(status.as_u16()),
            None if e.is_decode() => UpstreamFailure::Malformed(e.to_string()),
            None => UpstreamFailure::Transport(e.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid date: {message}")]
    InvalidDate { message: String },

    #[error("Cost query failed: {0}")]
    CostQuery(#[source] UpstreamFailure),

    #[error("Forecast query failed: {0}")]
    ForecastQuery(#[source] UpstreamFailure),

    #[error("Exchange rate retrieval failed: {0}")]
    ExchangeRate(#[source] UpstreamFailure),

    #[error("Account lookup failed: {0}")]
    AccountLookup(#[source] UpstreamFailure),

    #[error("Report delivery failed: {0}")]
    Delivery(#[source] UpstreamFailure),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Upstream,
    Delivery,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::ConfigError { .. } | ReportError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            ReportError::InvalidDate { .. } => ErrorCategory::Input,
            ReportError::CostQuery(_)
            | ReportError::ForecastQuery(_)
            | ReportError::ExchangeRate(_)
            | ReportError::AccountLookup(_) => ErrorCategory::Upstream,
            ReportError::Delivery(_) => ErrorCategory::Delivery,
            ReportError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 上游暫時性錯誤，下一次排程可能成功
            ReportError::CostQuery(UpstreamFailure::Transport(_))
            | ReportError::ForecastQuery(UpstreamFailure::Transport(_))
            | ReportError::ExchangeRate(UpstreamFailure::Transport(_))
            | ReportError::AccountLookup(UpstreamFailure::Transport(_))
            | ReportError::Delivery(UpstreamFailure::Transport(_)) => ErrorSeverity::Medium,
            ReportError::CostQuery(_)
            | ReportError::ForecastQuery(_)
            | ReportError::ExchangeRate(_)
            | ReportError::AccountLookup(_)
            | ReportError::Delivery(_)
            | ReportError::InvalidDate { .. } => ErrorSeverity::High,
            ReportError::ConfigError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ReportError::InvalidDate { .. } => {
                "Check the trigger timestamp or the --date argument (expected YYYY-MM-DD)"
            }
            ReportError::CostQuery(_) | ReportError::ForecastQuery(_) => {
                "Verify AWS credentials and that the role allows ce:GetCostAndUsage and ce:GetCostForecast"
            }
            ReportError::ExchangeRate(_) => {
                "Check that the FX endpoint is reachable and still serves the configured symbol"
            }
            ReportError::AccountLookup(_) => {
                "Verify the role allows sts:GetCallerIdentity and iam:ListAccountAliases"
            }
            ReportError::Delivery(_) => {
                "Check the webhook URL, or unset it to print the report to standard output"
            }
            ReportError::IoError(_) => "Check that standard output and the config file are accessible",
            ReportError::ConfigError { .. } | ReportError::InvalidConfigValueError { .. } => {
                "Review the configuration file and environment variables"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Could not determine the reporting period: {}", self),
            ErrorCategory::Upstream => format!("Could not collect report data: {}", self),
            ErrorCategory::Delivery => format!("The report was built but not delivered: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
