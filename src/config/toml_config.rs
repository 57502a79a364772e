use crate::config::ReportConfig;
use crate::utils::error::{ReportError, Result};
use regex::Regex;
use std::path::Path;

impl ReportConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，`${VAR}` 以環境變數替換
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |key| std::env::var(key).ok())
    }

    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed_content = substitute_env_vars(content, lookup)?;

        let config: ReportConfig =
            toml::from_str(&processed_content).map_err(|e| ReportError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;

        Ok(config.normalize())
    }
}

/// 未設定的變數替換為空字串，例如 webhook 未設定時改為輸出到 stdout
fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| ReportError::ConfigError {
        message: format!("invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        lookup(var_name).unwrap_or_else(|| {
            tracing::warn!("Environment variable {} is not set", var_name);
            String::new()
        })
    });

    Ok(result.into_owned())
}
