use crate::adapters::account::{AwsAccountSource, StaticAccountSource};
use crate::adapters::cost_explorer::CostExplorerSource;
use crate::adapters::fx::TickerRateSource;
use crate::adapters::notify::Notifier;
use crate::config::ReportConfig;
use crate::core::engine::ReportEngine;
use crate::core::pipeline::ReportPipeline;
use crate::core::ranking::ServiceRanker;
use crate::domain::ports::{AccountSource, ConfigProvider};
use aws_config::{BehaviorVersion, Region, SdkConfig};

pub async fn load_sdk_config(region: Option<&str>) -> SdkConfig {
    let loader = aws_config::defaults(BehaviorVersion::latest());
    match region {
        Some(region) => loader.region(Region::new(region.to_string())).load().await,
        None => loader.load().await,
    }
}

/// Wires the AWS-backed sources, the FX ticker and the notifier for one invocation.
pub async fn engine_from_config(config: &ReportConfig) -> ReportEngine {
    let sdk_config = load_sdk_config(config.aws_region.as_deref()).await;
    let cost_explorer = CostExplorerSource::from_sdk_config(&sdk_config);

    // 設定了帳號 ID 就不呼叫 STS/IAM
    let accounts: Box<dyn AccountSource> = match &config.account_id {
        Some(account_id) => Box::new(StaticAccountSource::new(
            account_id.clone(),
            config.account_alias.clone(),
        )),
        None => Box::new(AwsAccountSource::from_sdk_config(&sdk_config)),
    };

    let pipeline = ReportPipeline::new(
        Box::new(cost_explorer.clone()),
        Box::new(cost_explorer),
        Box::new(TickerRateSource::from_config(config)),
        accounts,
    )
    .with_ranker(ServiceRanker::for_report(config.include_tax()));

    ReportEngine::new(pipeline, Box::new(Notifier::from_config(config)))
}
