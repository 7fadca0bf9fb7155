//! DynamoDB repository implementation.
//!
//! Implements the store client traits from `portfolio_core::storage` using DynamoDB.

use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use uuid::Uuid;

use portfolio_core::portfolio::{Project, User};
use portfolio_core::storage::{
    ProjectProjection, ProjectRepository, RepositoryError, Result, UserProjection, UserRepository,
};

use super::conversions::{
    item_to_project, item_to_user, project_attribute_name, project_to_item, projection_expression,
    user_attribute_name, user_to_item, Item,
};
use super::error::{map_delete_item_error, map_get_item_error, map_put_item_error, map_scan_error};
use crate::config::Config;

/// DynamoDB-based repository over the users and projects tables.
pub struct DynamoDbRepository {
    client: Client,
    users_table: String,
    projects_table: String,
}

impl DynamoDbRepository {
    pub fn new(
        client: Client,
        users_table: impl Into<String>,
        projects_table: impl Into<String>,
    ) -> Self {
        Self {
            client,
            users_table: users_table.into(),
            projects_table: projects_table.into(),
        }
    }

    /// Creates a repository from application configuration.
    ///
    /// Uses the AWS SDK default credential chain. Every call carries the
    /// configured operation timeout.
    pub async fn from_config(config: &Config) -> Self {
        let timeouts = TimeoutConfig::builder()
            .operation_timeout(config.store_timeout)
            .build();

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).timeout_config(timeouts);
        if let Some(region) = &config.aws_region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.dynamodb_endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        tracing::info!(
            users_table = %config.users_table,
            projects_table = %config.projects_table,
            timeout_secs = config.store_timeout.as_secs(),
            "Connecting to DynamoDB"
        );

        Self::new(
            Client::new(&sdk_config),
            &config.users_table,
            &config.projects_table,
        )
    }

    async fn get_item(&self, table: &str, id: Uuid) -> Result<Option<Item>> {
        let result = self
            .client
            .get_item()
            .table_name(table)
            .key("id", AttributeValue::S(id.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(map_get_item_error)?;

        Ok(result.item)
    }

    /// Reads the whole table, following `LastEvaluatedKey` until exhausted.
    async fn scan_table(&self, table: &str, projection: Option<&[&str]>) -> Result<Vec<Item>> {
        let projection = projection.map(|names| projection_expression(names.iter().copied()));

        let mut items = Vec::new();
        let mut start_key: Option<Item> = None;
        let mut pages = 0usize;
        loop {
            let mut request = self
                .client
                .scan()
                .table_name(table)
                .set_exclusive_start_key(start_key.take());
            if let Some((expression, names)) = &projection {
                request = request
                    .projection_expression(expression)
                    .set_expression_attribute_names(Some(names.clone()));
            }

            let output = request.send().await.map_err(map_scan_error)?;
            pages += 1;
            items.extend(output.items.unwrap_or_default());

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        tracing::debug!(table, pages, items = items.len(), "Scanned table");
        Ok(items)
    }

    async fn put_item(&self, table: &str, item: Item) -> Result<()> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(map_put_item_error)?;
        Ok(())
    }

    async fn delete_item(&self, table: &str, entity_type: &'static str, id: Uuid) -> Result<()> {
        self.client
            .delete_item()
            .table_name(table)
            .key("id", AttributeValue::S(id.to_string()))
            .condition_expression("attribute_exists(id)")
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, entity_type, id.to_string()))?;
        Ok(())
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for DynamoDbRepository {
    async fn get_user(&self, id: Uuid) -> Result<User> {
        match self.get_item(&self.users_table, id).await? {
            Some(item) => item_to_user(&item),
            None => Err(RepositoryError::not_found("User", id)),
        }
    }

    async fn scan_users(&self, projection: Option<&UserProjection>) -> Result<Vec<User>> {
        let names: Option<Vec<&str>> = projection.map(|p| {
            p.attributes()
                .iter()
                .map(|attribute| user_attribute_name(*attribute))
                .collect()
        });
        let items = self
            .scan_table(&self.users_table, names.as_deref())
            .await?;
        items.iter().map(item_to_user).collect()
    }

    async fn put_user(&self, user: &User) -> Result<()> {
        self.put_item(&self.users_table, user_to_item(user)).await
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        self.delete_item(&self.users_table, "User", id).await
    }
}

// ============================================================================
// ProjectRepository implementation
// ============================================================================

#[async_trait]
impl ProjectRepository for DynamoDbRepository {
    async fn get_project(&self, id: Uuid) -> Result<Project> {
        match self.get_item(&self.projects_table, id).await? {
            Some(item) => item_to_project(&item),
            None => Err(RepositoryError::not_found("Project", id)),
        }
    }

    async fn scan_projects(&self, projection: Option<&ProjectProjection>) -> Result<Vec<Project>> {
        let names: Option<Vec<&str>> = projection.map(|p| {
            p.attributes()
                .iter()
                .map(|attribute| project_attribute_name(*attribute))
                .collect()
        });
        let items = self
            .scan_table(&self.projects_table, names.as_deref())
            .await?;
        items.iter().map(item_to_project).collect()
    }

    async fn put_project(&self, project: &Project) -> Result<()> {
        self.put_item(&self.projects_table, project_to_item(project))
            .await
    }

    async fn delete_project(&self, id: Uuid) -> Result<()> {
        self.delete_item(&self.projects_table, "Project", id).await
    }
}
