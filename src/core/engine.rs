use crate::core::format::ReportFormatter;
use crate::core::pipeline::ReportPipeline;
use crate::domain::model::Report;
use crate::domain::ports::Deliverer;
use crate::utils::error::Result;
use chrono::NaiveDate;

pub struct ReportEngine {
    pipeline: ReportPipeline,
    deliverer: Box<dyn Deliverer>,
}

impl ReportEngine {
    pub fn new(pipeline: ReportPipeline, deliverer: Box<dyn Deliverer>) -> Self {
        Self {
            pipeline,
            deliverer,
        }
    }

    /// Builds, formats and delivers one report.
    pub async fn run(&self, today: NaiveDate) -> Result<Report> {
        tracing::info!("🚀 Starting cost report for {}", today);

        let report = self.pipeline.build_report(today).await?;

        let message = ReportFormatter::format(&report);
        tracing::debug!("Formatted report ({} bytes)", message.len());

        tracing::info!("📤 Delivering report...");
        self.deliverer.deliver(&message).await?;

        tracing::info!("✅ Cost report completed");
        Ok(report)
    }
}
