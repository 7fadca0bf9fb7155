use async_trait::async_trait;
use uuid::Uuid;

use crate::portfolio::{Project, User};

use super::{ProjectProjection, Result, UserProjection};

/// Store client for the `users` table.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by id. Returns `NotFound` if the key is absent.
    async fn get_user(&self, id: Uuid) -> Result<User>;

    /// Reads every user in the table.
    ///
    /// With a projection, attributes outside it come back defaulted.
    async fn scan_users(&self, projection: Option<&UserProjection>) -> Result<Vec<User>>;

    /// Writes the full record, replacing whatever is stored under its id.
    async fn put_user(&self, user: &User) -> Result<()>;

    /// Deletes a user by id. Returns `NotFound` if the key is absent.
    async fn delete_user(&self, id: Uuid) -> Result<()>;
}

/// Store client for the `projects` table.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Gets a project by id. Returns `NotFound` if the key is absent.
    async fn get_project(&self, id: Uuid) -> Result<Project>;

    /// Reads every project in the table.
    async fn scan_projects(&self, projection: Option<&ProjectProjection>) -> Result<Vec<Project>>;

    /// Writes the full record, replacing whatever is stored under its id.
    async fn put_project(&self, project: &Project) -> Result<()>;

    /// Deletes a project by id. Returns `NotFound` if the key is absent.
    async fn delete_project(&self, id: Uuid) -> Result<()>;
}
