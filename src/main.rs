use chrono::Utc;
use clap::Parser;
use cost_report::adapters::aws::engine_from_config;
use cost_report::utils::error::{ErrorSeverity, ReportError};
use cost_report::utils::{logger, validation::Validate};
use cost_report::CliConfig;

fn exit_with(e: &ReportError) -> ! {
    tracing::error!(
        "❌ Cost report failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2, // 可重試
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting cost-report CLI");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.load_report_config() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let today = match cli.date_override() {
        Ok(Some(date)) => date,
        Ok(None) => match config.period_resolver() {
            Ok(resolver) => resolver.today_at(Utc::now()),
            Err(e) => exit_with(&e),
        },
        Err(e) => exit_with(&e),
    };

    let engine = engine_from_config(&config).await;
    if let Err(e) = engine.run(today).await {
        exit_with(&e);
    }
}
