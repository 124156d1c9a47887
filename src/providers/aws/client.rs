use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};

use super::types::{AwsResourceKind, CallerIdentity};
use super::{AwsApi, AwsError};

/// SDK-backed [`AwsApi`] holding one client per service the handlers touch.
#[derive(Debug, Clone)]
pub struct AwsClient {
    iam: aws_sdk_iam::Client,
    logs: aws_sdk_cloudwatchlogs::Client,
    eks: aws_sdk_eks::Client,
    ecr: aws_sdk_ecr::Client,
    sts: aws_sdk_sts::Client,
}

impl AwsClient {
    /// Loads credentials from the standard AWS chain. `region` overrides
    /// whatever the environment or profile would pick.
    pub async fn from_env(region: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let config = loader.load().await;

        tracing::debug!(region = ?config.region(), "AWS config loaded");

        Self::from_conf(&config)
    }

    pub fn from_conf(config: &SdkConfig) -> Self {
        Self {
            iam: aws_sdk_iam::Client::new(config),
            logs: aws_sdk_cloudwatchlogs::Client::new(config),
            eks: aws_sdk_eks::Client::new(config),
            ecr: aws_sdk_ecr::Client::new(config),
            sts: aws_sdk_sts::Client::new(config),
        }
    }

    async fn role_exists(&self, name: &str) -> Result<bool, AwsError> {
        match self.iam.get_role().role_name(name).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                let err = err.into_service_error();
                if err.is_no_such_entity_exception() {
                    Ok(false)
                } else {
                    Err(AwsError::sdk("GetRole", err))
                }
            }
        }
    }

    async fn policy_exists(&self, arn: &str) -> Result<bool, AwsError> {
        match self.iam.get_policy().policy_arn(arn).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                let err = err.into_service_error();
                if err.is_no_such_entity_exception() {
                    Ok(false)
                } else {
                    Err(AwsError::sdk("GetPolicy", err))
                }
            }
        }
    }

    async fn instance_profile_exists(&self, name: &str) -> Result<bool, AwsError> {
        match self
            .iam
            .get_instance_profile()
            .instance_profile_name(name)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let err = err.into_service_error();
                if err.is_no_such_entity_exception() {
                    Ok(false)
                } else {
                    Err(AwsError::sdk("GetInstanceProfile", err))
                }
            }
        }
    }

    // NOTE: The prefix filter also matches longer names, so compare exactly and page through
    async fn log_group_exists(&self, name: &str) -> Result<bool, AwsError> {
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .logs
                .describe_log_groups()
                .log_group_name_prefix(name)
                .set_next_token(next_token)
                .send()
                .await
                .map_err(|e| AwsError::sdk("DescribeLogGroups", e.into_service_error()))?;

            if output
                .log_groups()
                .iter()
                .any(|group| group.log_group_name() == Some(name))
            {
                return Ok(true);
            }

            match output.next_token().filter(|t| !t.is_empty()) {
                Some(token) => next_token = Some(token.to_string()),
                None => return Ok(false),
            }
        }
    }

    async fn cluster_exists(&self, name: &str) -> Result<bool, AwsError> {
        match self.eks.describe_cluster().name(name).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                let err = err.into_service_error();
                if err.is_resource_not_found_exception() {
                    Ok(false)
                } else {
                    Err(AwsError::sdk("DescribeCluster", err))
                }
            }
        }
    }

    async fn repository_exists(&self, name: &str) -> Result<bool, AwsError> {
        match self
            .ecr
            .describe_repositories()
            .repository_names(name)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let err = err.into_service_error();
                if err.is_repository_not_found_exception() {
                    Ok(false)
                } else {
                    Err(AwsError::sdk("DescribeRepositories", err))
                }
            }
        }
    }

    async fn lifecycle_policy_exists(&self, repository: &str) -> Result<bool, AwsError> {
        match self
            .ecr
            .get_lifecycle_policy()
            .repository_name(repository)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let err = err.into_service_error();
                if err.is_lifecycle_policy_not_found_exception()
                    || err.is_repository_not_found_exception()
                {
                    Ok(false)
                } else {
                    Err(AwsError::sdk("GetLifecyclePolicy", err))
                }
            }
        }
    }
}

#[async_trait]
impl AwsApi for AwsClient {
    async fn exists(&self, kind: AwsResourceKind, id: &str) -> Result<bool, AwsError> {
        match kind {
            AwsResourceKind::IamRole => self.role_exists(id).await,
            AwsResourceKind::IamPolicy => self.policy_exists(id).await,
            AwsResourceKind::CloudWatchLogGroup => self.log_group_exists(id).await,
            AwsResourceKind::EksCluster => self.cluster_exists(id).await,
            AwsResourceKind::IamInstanceProfile => self.instance_profile_exists(id).await,
            AwsResourceKind::EcrRepository => self.repository_exists(id).await,
            AwsResourceKind::EcrLifecyclePolicy => self.lifecycle_policy_exists(id).await,
        }
    }

    async fn delete(&self, kind: AwsResourceKind, id: &str) -> Result<(), AwsError> {
        match kind {
            AwsResourceKind::IamRole => {
                self.iam
                    .delete_role()
                    .role_name(id)
                    .send()
                    .await
                    .map_err(|e| AwsError::sdk("DeleteRole", e.into_service_error()))?;
            }
            AwsResourceKind::IamPolicy => {
                self.iam
                    .delete_policy()
                    .policy_arn(id)
                    .send()
                    .await
                    .map_err(|e| AwsError::sdk("DeletePolicy", e.into_service_error()))?;
            }
            AwsResourceKind::CloudWatchLogGroup => {
                self.logs
                    .delete_log_group()
                    .log_group_name(id)
                    .send()
                    .await
                    .map_err(|e| AwsError::sdk("DeleteLogGroup", e.into_service_error()))?;
            }
            AwsResourceKind::EksCluster => {
                self.eks
                    .delete_cluster()
                    .name(id)
                    .send()
                    .await
                    .map_err(|e| AwsError::sdk("DeleteCluster", e.into_service_error()))?;
            }
            AwsResourceKind::IamInstanceProfile => {
                self.iam
                    .delete_instance_profile()
                    .instance_profile_name(id)
                    .send()
                    .await
                    .map_err(|e| {
                        AwsError::sdk("DeleteInstanceProfile", e.into_service_error())
                    })?;
            }
            AwsResourceKind::EcrRepository => {
                self.ecr
                    .delete_repository()
                    .repository_name(id)
                    .send()
                    .await
                    .map_err(|e| AwsError::sdk("DeleteRepository", e.into_service_error()))?;
            }
            AwsResourceKind::EcrLifecyclePolicy => {
                self.ecr
                    .delete_lifecycle_policy()
                    .repository_name(id)
                    .send()
                    .await
                    .map_err(|e| {
                        AwsError::sdk("DeleteLifecyclePolicy", e.into_service_error())
                    })?;
            }
        }

        tracing::info!(resource_type = kind.resource_type(), identifier = id, "deleted");
        Ok(())
    }

    async fn caller_identity(&self) -> Result<CallerIdentity, AwsError> {
        let output = self
            .sts
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| AwsError::sdk("GetCallerIdentity", e.into_service_error()))?;

        let account = output.account().ok_or_else(|| AwsError::AccountLookup {
            message: "GetCallerIdentity returned no account".to_string(),
        })?;

        Ok(CallerIdentity::from_sts(account, output.arn()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_cloudwatchlogs::operation::describe_log_groups::DescribeLogGroupsOutput;
    use aws_sdk_cloudwatchlogs::types::LogGroup;
    use aws_sdk_ecr::operation::describe_repositories::DescribeRepositoriesError;
    use aws_sdk_ecr::operation::get_lifecycle_policy::GetLifecyclePolicyError;
    use aws_sdk_eks::operation::describe_cluster::{DescribeClusterError, DescribeClusterOutput};
    use aws_sdk_iam::operation::get_role::{GetRoleError, GetRoleOutput};
    use aws_sdk_sts::operation::get_caller_identity::GetCallerIdentityOutput;
    use aws_smithy_mocks::{RuleMode, mock, mock_client};

    fn offline_config() -> SdkConfig {
        SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("eu-west-1"))
            .build()
    }

    #[test]
    fn test_client_from_conf() {
        let client = AwsClient::from_conf(&offline_config());
        let debug_output = format!("{:?}", client);
        assert!(debug_output.contains("AwsClient"));
    }

    #[test]
    fn test_client_is_clone() {
        let client = AwsClient::from_conf(&offline_config());
        let _cloned = client.clone();
    }

    fn log_groups(names: &[&str], next_token: Option<&str>) -> DescribeLogGroupsOutput {
        let groups = names
            .iter()
            .map(|name| LogGroup::builder().log_group_name(*name).build())
            .collect();
        DescribeLogGroupsOutput::builder()
            .set_log_groups(Some(groups))
            .set_next_token(next_token.map(str::to_string))
            .build()
    }

    #[tokio::test]
    async fn test_log_group_prefix_match_only_is_absent() {
        let page = mock!(aws_sdk_cloudwatchlogs::Client::describe_log_groups)
            .match_requests(|req| req.log_group_name_prefix() == Some("/app"))
            .then_output(|| log_groups(&["/app-old", "/app/worker"], None));
        let client = AwsClient {
            logs: mock_client!(aws_sdk_cloudwatchlogs, [&page]),
            ..AwsClient::from_conf(&offline_config())
        };

        let exists = client
            .exists(AwsResourceKind::CloudWatchLogGroup, "/app")
            .await
            .unwrap();
        assert!(!exists);
    }

    #[tokio::test]
    async fn test_log_group_found_on_second_page() {
        let first = mock!(aws_sdk_cloudwatchlogs::Client::describe_log_groups)
            .match_requests(|req| req.next_token().is_none())
            .then_output(|| log_groups(&["/aws/eks/main-old"], Some("page-2")));
        let second = mock!(aws_sdk_cloudwatchlogs::Client::describe_log_groups)
            .match_requests(|req| req.next_token() == Some("page-2"))
            .then_output(|| log_groups(&["/aws/eks/main"], None));
        let client = AwsClient {
            logs: mock_client!(aws_sdk_cloudwatchlogs, RuleMode::MatchAny, [&first, &second]),
            ..AwsClient::from_conf(&offline_config())
        };

        let exists = client
            .exists(AwsResourceKind::CloudWatchLogGroup, "/aws/eks/main")
            .await
            .unwrap();
        assert!(exists);
        assert_eq!(first.num_calls(), 1);
        assert_eq!(second.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_role_exists() {
        let get_role = mock!(aws_sdk_iam::Client::get_role)
            .match_requests(|req| req.role_name() == Some("app-role"))
            .then_output(|| GetRoleOutput::builder().build());
        let client = AwsClient {
            iam: mock_client!(aws_sdk_iam, [&get_role]),
            ..AwsClient::from_conf(&offline_config())
        };

        assert!(client.exists(AwsResourceKind::IamRole, "app-role").await.unwrap());
    }

    #[tokio::test]
    async fn test_role_no_such_entity_is_absent() {
        let get_role = mock!(aws_sdk_iam::Client::get_role).then_error(|| {
            GetRoleError::NoSuchEntityException(
                aws_sdk_iam::types::error::NoSuchEntityException::builder()
                    .message("The role with name app-role cannot be found.")
                    .build(),
            )
        });
        let client = AwsClient {
            iam: mock_client!(aws_sdk_iam, [&get_role]),
            ..AwsClient::from_conf(&offline_config())
        };

        let exists = client.exists(AwsResourceKind::IamRole, "app-role").await.unwrap();
        assert!(!exists);
    }

    #[tokio::test]
    async fn test_role_service_failure_is_sdk_error() {
        let get_role = mock!(aws_sdk_iam::Client::get_role).then_error(|| {
            GetRoleError::ServiceFailureException(
                aws_sdk_iam::types::error::ServiceFailureException::builder()
                    .message("internal failure")
                    .build(),
            )
        });
        let client = AwsClient {
            iam: mock_client!(aws_sdk_iam, [&get_role]),
            ..AwsClient::from_conf(&offline_config())
        };

        let result = client.exists(AwsResourceKind::IamRole, "app-role").await;
        match result {
            Err(AwsError::Sdk { operation, .. }) => assert_eq!(operation, "GetRole"),
            other => panic!("expected AwsError::Sdk, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cluster_not_found_is_absent() {
        let describe = mock!(aws_sdk_eks::Client::describe_cluster).then_error(|| {
            DescribeClusterError::ResourceNotFoundException(
                aws_sdk_eks::types::error::ResourceNotFoundException::builder().build(),
            )
        });
        let client = AwsClient {
            eks: mock_client!(aws_sdk_eks, [&describe]),
            ..AwsClient::from_conf(&offline_config())
        };

        assert!(!client.exists(AwsResourceKind::EksCluster, "main").await.unwrap());
    }

    #[tokio::test]
    async fn test_cluster_exists() {
        let describe = mock!(aws_sdk_eks::Client::describe_cluster)
            .match_requests(|req| req.name() == Some("main"))
            .then_output(|| DescribeClusterOutput::builder().build());
        let client = AwsClient {
            eks: mock_client!(aws_sdk_eks, [&describe]),
            ..AwsClient::from_conf(&offline_config())
        };

        assert!(client.exists(AwsResourceKind::EksCluster, "main").await.unwrap());
    }

    #[tokio::test]
    async fn test_repository_not_found_is_absent() {
        let describe = mock!(aws_sdk_ecr::Client::describe_repositories).then_error(|| {
            DescribeRepositoriesError::RepositoryNotFoundException(
                aws_sdk_ecr::types::error::RepositoryNotFoundException::builder().build(),
            )
        });
        let client = AwsClient {
            ecr: mock_client!(aws_sdk_ecr, [&describe]),
            ..AwsClient::from_conf(&offline_config())
        };

        assert!(!client.exists(AwsResourceKind::EcrRepository, "api").await.unwrap());
    }

    #[tokio::test]
    async fn test_lifecycle_policy_not_found_is_absent() {
        let get_policy = mock!(aws_sdk_ecr::Client::get_lifecycle_policy).then_error(|| {
            GetLifecyclePolicyError::LifecyclePolicyNotFoundException(
                aws_sdk_ecr::types::error::LifecyclePolicyNotFoundException::builder().build(),
            )
        });
        let client = AwsClient {
            ecr: mock_client!(aws_sdk_ecr, [&get_policy]),
            ..AwsClient::from_conf(&offline_config())
        };

        let exists = client
            .exists(AwsResourceKind::EcrLifecyclePolicy, "web")
            .await
            .unwrap();
        assert!(!exists);
    }

    #[tokio::test]
    async fn test_caller_identity_reads_partition_from_arn() {
        let identity = mock!(aws_sdk_sts::Client::get_caller_identity).then_output(|| {
            GetCallerIdentityOutput::builder()
                .account("123456789012")
                .arn("arn:aws-us-gov:sts::123456789012:assumed-role/ci/session")
                .build()
        });
        let client = AwsClient {
            sts: mock_client!(aws_sdk_sts, [&identity]),
            ..AwsClient::from_conf(&offline_config())
        };

        let identity = client.caller_identity().await.unwrap();
        assert_eq!(identity.account, "123456789012");
        assert_eq!(identity.partition, "aws-us-gov");
    }

    #[tokio::test]
    async fn test_caller_identity_without_account_is_lookup_error() {
        let identity = mock!(aws_sdk_sts::Client::get_caller_identity)
            .then_output(|| GetCallerIdentityOutput::builder().build());
        let client = AwsClient {
            sts: mock_client!(aws_sdk_sts, [&identity]),
            ..AwsClient::from_conf(&offline_config())
        };

        let result = client.caller_identity().await;
        assert!(matches!(result, Err(AwsError::AccountLookup { .. })));
    }
}
