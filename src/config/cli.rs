use crate::config::ReportConfig;
use crate::core::period::parse_date;
use crate::utils::error::Result;
use chrono::NaiveDate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "cost-report")]
#[command(about = "Weekly AWS cost report with a USD/JPY breakdown")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Report as if today were this date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Webhook URL; overrides the config file and SLACK_WEBHOOK_URL
    #[arg(long)]
    pub webhook_url: Option<String>,

    /// Print the report to standard output even if a webhook is configured
    #[arg(long)]
    pub stdout: bool,

    /// Let the Tax line compete for a top-5 slot
    #[arg(long)]
    pub include_tax: bool,

    /// Reporting timezone offset, e.g. +09:00
    #[arg(long)]
    pub utc_offset: Option<String>,

    #[arg(long)]
    pub aws_region: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Config file (or the environment when no file is given), then flags on top.
    pub fn load_report_config(&self) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::from_file(path)?,
            None => ReportConfig::from_env()?,
        };

        if let Some(webhook_url) = &self.webhook_url {
            config.webhook_url = Some(webhook_url.clone());
        }
        if self.stdout {
            config.webhook_url = None;
        }
        if self.include_tax {
            config.include_tax = true;
        }
        if let Some(utc_offset) = &self.utc_offset {
            config.utc_offset = utc_offset.clone();
        }
        if let Some(aws_region) = &self.aws_region {
            config.aws_region = Some(aws_region.clone());
        }

        Ok(config.normalize())
    }

    pub fn date_override(&self) -> Result<Option<NaiveDate>> {
        self.date.as_deref().map(parse_date).transpose()
    }
}
