use thiserror::Error;

/// AWS-specific errors from existence checks and deletions.
///
/// "Not found" responses are not errors; they surface as `Ok(false)`.
#[derive(Debug, Error)]
pub enum AwsError {
    /// An SDK call failed for a reason other than the resource being absent
    #[error("{operation} failed: {message}")]
    Sdk {
        operation: &'static str,
        message: String,
    },

    /// STS did not tell us which account the credentials belong to
    #[error("could not determine AWS account: {message}")]
    AccountLookup { message: String },
}

impl AwsError {
    pub fn sdk(operation: &'static str, err: impl std::error::Error) -> Self {
        AwsError::Sdk {
            operation,
            message: aws_sdk_iam::error::DisplayErrorContext(err).to_string(),
        }
    }
}

impl From<AwsError> for crate::providers::ProviderError {
    fn from(err: AwsError) -> Self {
        crate::providers::ProviderError::Aws(err.to_string())
    }
}
