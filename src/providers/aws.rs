mod client;
mod error;
mod types;

pub use client::AwsClient;
pub use error::AwsError;
pub use types::{
    AwsResourceKind, CallerIdentity, DEFAULT_PARTITION, SUPPORTED_KINDS, policy_arn,
};

use async_trait::async_trait;
use tokio::sync::OnceCell;

use super::{Provider, ProviderError};
use crate::resource::{ExistingResource, Lookup};
use crate::terraform::ResourceChange;

/// The calls the handlers need from AWS, keyed by resource kind.
///
/// `id` is always the import identifier: a name, or an ARN for policies.
#[async_trait]
pub trait AwsApi: Send + Sync {
    /// `Ok(false)` when AWS reports the resource as not found.
    async fn exists(&self, kind: AwsResourceKind, id: &str) -> Result<bool, AwsError>;
    async fn delete(&self, kind: AwsResourceKind, id: &str) -> Result<(), AwsError>;
    async fn caller_identity(&self) -> Result<CallerIdentity, AwsError>;
}

pub struct AwsProvider<A = AwsClient> {
    api: A,
    account_id: Option<String>,
    identity: OnceCell<CallerIdentity>,
}

impl<A: AwsApi> AwsProvider<A> {
    pub fn new(api: A, account_id: Option<String>) -> Self {
        Self {
            api,
            account_id,
            identity: OnceCell::new(),
        }
    }

    // NOTE: Only policies need the account, so STS is called lazily and at most once
    async fn identity(&self) -> Result<&CallerIdentity, AwsError> {
        self.identity
            .get_or_try_init(|| async {
                match &self.account_id {
                    Some(account) => Ok(CallerIdentity::new(account, DEFAULT_PARTITION)),
                    None => self.api.caller_identity().await.inspect(|identity| {
                        tracing::debug!(account = %identity.account, "resolved caller identity");
                    }),
                }
            })
            .await
    }

    async fn import_id(
        &self,
        kind: AwsResourceKind,
        change: &ResourceChange,
        name: &str,
    ) -> Result<String, AwsError> {
        match kind {
            AwsResourceKind::IamPolicy => {
                let identity = self.identity().await?;
                Ok(policy_arn(identity, change.after_str("path"), name))
            }
            _ => Ok(name.to_string()),
        }
    }
}

#[async_trait]
impl<A: AwsApi> Provider for AwsProvider<A> {
    fn name(&self) -> &str {
        "aws"
    }

    fn resource_types(&self) -> Vec<&str> {
        SUPPORTED_KINDS.iter().map(|k| k.resource_type()).collect()
    }

    async fn find_existing(&self, change: &ResourceChange) -> Result<Lookup, ProviderError> {
        let kind = AwsResourceKind::from_resource_type(&change.resource_type)
            .ok_or_else(|| ProviderError::Unsupported(change.resource_type.clone()))?;

        let attribute = kind.identifying_attribute();
        let Some(name) = change.after_str(attribute) else {
            if change.is_unknown(attribute) {
                tracing::debug!(address = %change.address, attribute, "identifier unknown until apply");
                return Ok(Lookup::Unknown {
                    attribute: attribute.to_string(),
                });
            }
            tracing::debug!(address = %change.address, attribute, "no identifier in plan");
            return Ok(Lookup::NotFound);
        };

        let import_id = self.import_id(kind, change, name).await?;
        if !self.api.exists(kind, &import_id).await? {
            return Ok(Lookup::NotFound);
        }

        tracing::info!(
            address = %change.address,
            resource_type = kind.resource_type(),
            identifier = %import_id,
            "resource already exists"
        );

        Ok(Lookup::Found(ExistingResource {
            address: change.address.clone(),
            resource_type: change.resource_type.clone(),
            kind_label: kind.label().to_string(),
            name: name.to_string(),
            import_id,
        }))
    }

    async fn delete(&self, existing: &ExistingResource) -> Result<(), ProviderError> {
        let kind = AwsResourceKind::from_resource_type(&existing.resource_type)
            .ok_or_else(|| ProviderError::Unsupported(existing.resource_type.clone()))?;
        self.api.delete(kind, &existing.import_id).await?;
        Ok(())
    }
}
