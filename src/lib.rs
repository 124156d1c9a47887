//! terraport - find planned Terraform creations that already exist in the cloud
//!
//! A library for reading a Terraform plan, checking each pending creation
//! against the live provider, and producing `terraform import` commands (or
//! deleting the stale resource).

pub mod drill;
pub mod import;
pub mod output;
pub mod providers;
pub mod resource;
pub mod terraform;

mod error;

pub use drill::{Checked, DrillOptions, DrillReport, Outcome, drill};
pub use error::TerraportError;
pub use import::{ImportCommand, SecretsWrapper};
pub use providers::aws::{AwsApi, AwsClient, AwsError, AwsProvider, AwsResourceKind, CallerIdentity};
pub use providers::{Provider, ProviderConfig, ProviderError, get_provider};
pub use resource::{ExistingResource, Lookup};
pub use terraform::{Plan, ResourceChange, load_plan};
