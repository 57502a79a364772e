use crate::utils::error::{ReportError, Result};
use chrono::FixedOffset;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ReportError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 解析 `+09:00` / `-05:30` 形式的 UTC 偏移
pub fn parse_utc_offset(field_name: &str, value: &str) -> Result<FixedOffset> {
    let invalid = |reason: &str| ReportError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = value.trim();
    let (sign, rest) = match trimmed.chars().next() {
        Some('+') => (1, &trimmed[1..]),
        Some('-') => (-1, &trimmed[1..]),
        _ => return Err(invalid("UTC offset must start with '+' or '-'")),
    };

    let (hours, minutes) = rest
        .split_once(':')
        .ok_or_else(|| invalid("UTC offset must look like +HH:MM"))?;
    let hours: i32 = hours
        .parse()
        .map_err(|_| invalid("UTC offset hours are not a number"))?;
    let minutes: i32 = minutes
        .parse()
        .map_err(|_| invalid("UTC offset minutes are not a number"))?;

    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(invalid("UTC offset is out of range"));
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| invalid("UTC offset is out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("webhook_url", "https://hooks.slack.com/services/T/B/X").is_ok());
        assert!(validate_url("webhook_url", "http://localhost:8080").is_ok());
        assert!(validate_url("webhook_url", "").is_err());
        assert!(validate_url("webhook_url", "invalid-url").is_err());
        assert!(validate_url("webhook_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("request_timeout_seconds", 30, 1, 300).is_ok());
        assert!(validate_range("request_timeout_seconds", 0, 1, 300).is_err());
    }

    #[test]
    fn test_parse_utc_offset() {
        let jst = parse_utc_offset("utc_offset", "+09:00").unwrap();
        assert_eq!(jst.local_minus_utc(), 9 * 3600);

        let est = parse_utc_offset("utc_offset", "-05:30").unwrap();
        assert_eq!(est.local_minus_utc(), -(5 * 3600 + 30 * 60));

        assert!(parse_utc_offset("utc_offset", "09:00").is_err());
        assert!(parse_utc_offset("utc_offset", "+9").is_err());
        assert!(parse_utc_offset("utc_offset", "+25:00").is_err());
    }
}
