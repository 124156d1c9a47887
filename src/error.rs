use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerraportError {
    #[error("no plan file found at '{}'. Please create a terraform plan first", .0.display())]
    PlanNotFound(PathBuf),

    #[error(
        "terraform is not initialised in '{}'. Please run `terraform init` first",
        .0.display()
    )]
    NotInitialised(PathBuf),

    #[error("`terraform show` exited with {status}: {stderr}")]
    TerraformFailed { status: String, stderr: String },

    #[error("failed to parse plan JSON: {0}")]
    PlanParse(#[from] serde_json::Error),

    #[error(transparent)]
    Provider(#[from] crate::providers::ProviderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
