//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use portfolio_core::portfolio::{Project, User};
use portfolio_core::storage::{
    ProjectProjection, ProjectRepository, RepositoryError, Result, UserProjection, UserRepository,
};

/// In-memory storage backend.
///
/// Data is not persisted and is lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    projects: Arc<RwLock<HashMap<Uuid, Project>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, id: Uuid) -> Result<User> {
        let users = self.users.read().await;
        users
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("User", id))
    }

    async fn scan_users(&self, projection: Option<&UserProjection>) -> Result<Vec<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .cloned()
            .map(|user| match projection {
                Some(projection) => projection.apply(user),
                None => user,
            })
            .collect())
    }

    async fn put_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        let mut users = self.users.write().await;
        users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found("User", id))
    }
}

#[async_trait]
impl ProjectRepository for InMemoryRepository {
    async fn get_project(&self, id: Uuid) -> Result<Project> {
        let projects = self.projects.read().await;
        projects
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("Project", id))
    }

    async fn scan_projects(&self, projection: Option<&ProjectProjection>) -> Result<Vec<Project>> {
        let projects = self.projects.read().await;
        Ok(projects
            .values()
            .cloned()
            .map(|project| match projection {
                Some(projection) => projection.apply(project),
                None => project,
            })
            .collect())
    }

    async fn put_project(&self, project: &Project) -> Result<()> {
        let mut projects = self.projects.write().await;
        projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn delete_project(&self, id: Uuid) -> Result<()> {
        let mut projects = self.projects.write().await;
        projects
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found("Project", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use portfolio_core::storage::UserAttribute;

    fn sample_project(owner: &User) -> Project {
        Project {
            id: Uuid::new_v4(),
            owner_id: owner.id,
            owner_email: owner.email.clone(),
            title: "P1".to_string(),
            body: String::new(),
            rate: 3,
            created_at: Utc::now(),
            owner_name: String::new(),
            owner_title: String::new(),
        }
    }

    #[tokio::test]
    async fn test_get_missing_user_is_not_found() {
        let repo = InMemoryRepository::new();
        let result = repo.get_user(Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { entity_type: "User", .. })));
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let repo = InMemoryRepository::new();
        let user = User::new("a@x.com", "hash");
        repo.put_user(&user).await.unwrap();

        let renamed = user.clone().with_name("Ada", "Lovelace");
        repo.put_user(&renamed).await.unwrap();

        assert_eq!(repo.get_user(user.id).await.unwrap().first_name, "Ada");
        assert_eq!(repo.scan_users(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_scan_applies_projection() {
        let repo = InMemoryRepository::new();
        repo.put_user(&User::new("a@x.com", "hash").with_name("Ada", "L"))
            .await
            .unwrap();

        let projection = UserProjection::new([UserAttribute::Email]);
        let users = repo.scan_users(Some(&projection)).await.unwrap();

        assert_eq!(users[0].email, "a@x.com");
        assert_eq!(users[0].first_name, "");
        assert_eq!(users[0].password_hash, "");
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let repo = InMemoryRepository::new();
        let owner = User::new("a@x.com", "hash");
        let project = sample_project(&owner);
        repo.put_project(&project).await.unwrap();

        repo.delete_project(project.id).await.unwrap();
        let second = repo.delete_project(project.id).await;

        assert!(second.unwrap_err().is_not_found());
        assert!(repo.scan_projects(None).await.unwrap().is_empty());
    }
}
