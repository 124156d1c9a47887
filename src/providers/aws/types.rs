pub const DEFAULT_PARTITION: &str = "aws";

/// Terraform AWS resource types that can be checked for prior existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AwsResourceKind {
    IamRole,
    IamPolicy,
    CloudWatchLogGroup,
    EksCluster,
    IamInstanceProfile,
    EcrRepository,
    EcrLifecyclePolicy,
}

pub const SUPPORTED_KINDS: &[AwsResourceKind] = &[
    AwsResourceKind::IamRole,
    AwsResourceKind::IamPolicy,
    AwsResourceKind::CloudWatchLogGroup,
    AwsResourceKind::EksCluster,
    AwsResourceKind::IamInstanceProfile,
    AwsResourceKind::EcrRepository,
    AwsResourceKind::EcrLifecyclePolicy,
];

impl AwsResourceKind {
    pub fn from_resource_type(resource_type: &str) -> Option<Self> {
        SUPPORTED_KINDS
            .iter()
            .copied()
            .find(|kind| kind.resource_type() == resource_type)
    }

    pub fn resource_type(self) -> &'static str {
        match self {
            Self::IamRole => "aws_iam_role",
            Self::IamPolicy => "aws_iam_policy",
            Self::CloudWatchLogGroup => "aws_cloudwatch_log_group",
            Self::EksCluster => "aws_eks_cluster",
            Self::IamInstanceProfile => "aws_iam_instance_profile",
            Self::EcrRepository => "aws_ecr_repository",
            Self::EcrLifecyclePolicy => "aws_ecr_lifecycle_policy",
        }
    }

    /// Planned attribute that names the live resource.
    pub fn identifying_attribute(self) -> &'static str {
        match self {
            Self::EcrLifecyclePolicy => "repository",
            _ => "name",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::IamRole => "Role",
            Self::IamPolicy => "Policy",
            Self::CloudWatchLogGroup => "Log group",
            Self::EksCluster => "Cluster",
            Self::IamInstanceProfile => "Instance profile",
            Self::EcrRepository => "Repository",
            Self::EcrLifecyclePolicy => "Lifecycle policy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub account: String,
    pub partition: String,
}

impl CallerIdentity {
    pub fn new(account: impl Into<String>, partition: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            partition: partition.into(),
        }
    }

    // NOTE: Partition is the second field of any ARN, e.g. arn:aws-cn:sts::...
    pub fn from_sts(account: &str, arn: Option<&str>) -> Self {
        let partition = arn
            .and_then(|arn| arn.split(':').nth(1))
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PARTITION);
        Self::new(account, partition)
    }
}

/// `arn:<partition>:iam::<account>:policy<path><name>`, where `path`
/// defaults to `/` and is normalised to start and end with a slash.
pub fn policy_arn(identity: &CallerIdentity, path: Option<&str>, name: &str) -> String {
    let path = path.unwrap_or("/").trim_matches('/');
    let path = if path.is_empty() {
        "/".to_string()
    } else {
        format!("/{path}/")
    };
    format!(
        "arn:{}:iam::{}:policy{}{}",
        identity.partition, identity.account, path, name
    )
}
