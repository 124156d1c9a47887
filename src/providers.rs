pub mod aws;

use async_trait::async_trait;
use thiserror::Error;

use crate::resource::{ExistingResource, Lookup};
use crate::terraform::ResourceChange;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("unsupported resource type: {0}")]
    Unsupported(String),
    #[error("aws error: {0}")]
    Aws(String),
}

#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub region: Option<String>,
    pub account_id: Option<String>,
}

/// Existence checks and remediation for one cloud provider's resource types.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    /// Terraform resource types this provider can check.
    fn resource_types(&self) -> Vec<&str>;

    fn supports(&self, resource_type: &str) -> bool {
        self.resource_types().contains(&resource_type)
    }

    /// Looks up the live resource a planned creation would collide with.
    async fn find_existing(&self, change: &ResourceChange) -> Result<Lookup, ProviderError>;

    async fn delete(&self, existing: &ExistingResource) -> Result<(), ProviderError>;
}

pub async fn get_provider(
    name: &str,
    config: &ProviderConfig,
) -> Result<Box<dyn Provider>, ProviderError> {
    match name {
        "aws" => {
            let client = aws::AwsClient::from_env(config.region.as_deref()).await;
            Ok(Box::new(aws::AwsProvider::new(
                client,
                config.account_id.clone(),
            )))
        }
        other => Err(ProviderError::UnknownProvider(other.to_string())),
    }
}
