use crate::domain::model::AccountInfo;
use crate::domain::ports::AccountSource;
use crate::utils::error::Result;
#[cfg(feature = "aws")]
use crate::utils::error::{ReportError, UpstreamFailure};
use async_trait::async_trait;
#[cfg(feature = "aws")]
use aws_config::SdkConfig;
#[cfg(feature = "aws")]
use aws_sdk_iam::Client as IamClient;
#[cfg(feature = "aws")]
use aws_sdk_sts::error::DisplayErrorContext;
#[cfg(feature = "aws")]
use aws_sdk_sts::Client as StsClient;

/// Account id from STS and the first account alias from IAM.
#[cfg(feature = "aws")]
#[derive(Debug, Clone)]
pub struct AwsAccountSource {
    sts: StsClient,
    iam: IamClient,
}

#[cfg(feature = "aws")]
impl AwsAccountSource {
    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self {
            sts: StsClient::new(config),
            iam: IamClient::new(config),
        }
    }
}

#[cfg(feature = "aws")]
#[async_trait]
impl AccountSource for AwsAccountSource {
    async fn fetch_account(&self) -> Result<AccountInfo> {
        let identity = self.sts.get_caller_identity().send().await.map_err(|e| {
            tracing::error!("Failed to get caller identity: {}", DisplayErrorContext(&e));
            ReportError::AccountLookup(UpstreamFailure::Transport(
                DisplayErrorContext(&e).to_string(),
            ))
        })?;

        let account_id = identity
            .account()
            .map(str::to_string)
            .ok_or_else(|| {
                ReportError::AccountLookup(UpstreamFailure::Malformed(
                    "caller identity has no account id".to_string(),
                ))
            })?;

        let aliases = self.iam.list_account_aliases().send().await.map_err(|e| {
            tracing::error!(
                "Failed to list account aliases: {}",
                aws_sdk_iam::error::DisplayErrorContext(&e)
            );
            ReportError::AccountLookup(UpstreamFailure::Transport(
                aws_sdk_iam::error::DisplayErrorContext(&e).to_string(),
            ))
        })?;

        Ok(AccountInfo {
            account_id,
            alias: aliases.account_aliases().first().cloned(),
        })
    }
}

/// Fixed account details, for local runs without IAM access.
#[derive(Debug, Clone)]
pub struct StaticAccountSource {
    account: AccountInfo,
}

impl StaticAccountSource {
    pub fn new(account_id: impl Into<String>, alias: Option<String>) -> Self {
        Self {
            account: AccountInfo {
                account_id: account_id.into(),
                alias,
            },
        }
    }
}

#[async_trait]
impl AccountSource for StaticAccountSource {
    async fn fetch_account(&self) -> Result<AccountInfo> {
        Ok(self.account.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_account_source() {
        let source = StaticAccountSource::new("123456789012", Some("acme-prod".to_string()));
        let account = source.fetch_account().await.unwrap();
        assert_eq!(account.account_id, "123456789012");
        assert_eq!(account.alias.as_deref(), Some("acme-prod"));
    }
}
