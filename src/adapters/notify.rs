use crate::domain::ports::{ConfigProvider, Deliverer};
use crate::utils::error::{ReportError, Result, UpstreamFailure};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

/// Posts `{"text": ...}` to an incoming webhook.
pub struct WebhookDeliverer {
    client: Client,
    url: String,
    timeout: Duration,
}

impl WebhookDeliverer {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Deliverer for WebhookDeliverer {
    async fn deliver(&self, text: &str) -> Result<()> {
        tracing::debug!("Posting report to webhook");

        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&WebhookPayload { text })
            .send()
            .await
            .map_err(|e| ReportError::Delivery(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Failed to send message to webhook: HTTP {}", status);
            return Err(ReportError::Delivery(UpstreamFailure::Status(status.as_u16())));
        }

        tracing::info!("Successfully sent message to webhook");
        Ok(())
    }
}

/// Writes the report to a local stream, standard output by default.
pub struct ConsoleDeliverer<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleDeliverer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleDeliverer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl<W: Write + Send> Deliverer for ConsoleDeliverer<W> {
    async fn deliver(&self, text: &str) -> Result<()> {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        write!(out, "{}", text)?;
        out.flush()?;
        Ok(())
    }
}

/// Chooses the delivery channel from configuration: the webhook when one is
/// set, standard output otherwise.
pub enum Notifier {
    Webhook(WebhookDeliverer),
    Console(ConsoleDeliverer<std::io::Stdout>),
}

impl Notifier {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        match config.webhook_url().map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => Notifier::Webhook(
                WebhookDeliverer::new(url)
                    .with_timeout(Duration::from_secs(config.request_timeout_seconds())),
            ),
            None => {
                tracing::info!("Webhook URL not set, printing message to console");
                Notifier::Console(ConsoleDeliverer::stdout())
            }
        }
    }

    pub fn is_webhook(&self) -> bool {
        matches!(self, Notifier::Webhook(_))
    }
}

#[async_trait]
impl Deliverer for Notifier {
    async fn deliver(&self, text: &str) -> Result<()> {
        match self {
            Notifier::Webhook(webhook) => webhook.deliver(text).await,
            Notifier::Console(console) => console.deliver(text).await,
        }
    }
}
