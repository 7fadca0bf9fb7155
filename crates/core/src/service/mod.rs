//! The consistency service.
//!
//! Owns every write that touches both tables and keeps each user's
//! `projects` map in agreement with the `projects` table.

mod error;
mod http_mapping;
mod projects;
mod steps;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
mod users;

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::auth::PasswordHasher;
use crate::storage::{self, ProjectRepository, UserRepository};

pub use error::{Result, ServiceError};
pub use http_mapping::service_error_to_status_code;
pub use steps::{
    plan_project_creation, plan_project_deletion, plan_project_update, plan_user_deletion,
    WriteStep,
};

/// Orchestrates reads and ordered multi-step writes over both tables.
#[derive(Clone)]
pub struct PortfolioService {
    users: Arc<dyn UserRepository>,
    projects: Arc<dyn ProjectRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl PortfolioService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        projects: Arc<dyn ProjectRepository>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            users,
            projects,
            hasher,
        }
    }

    /// Hashes on the blocking pool.
    pub async fn hash_password(&self, password: String) -> Result<String> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServiceError::Internal(format!("hashing task failed: {e}")))?
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }

    /// Verifies on the blocking pool.
    pub async fn verify_password(&self, hash: String, password: String) -> Result<bool> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .map_err(|e| ServiceError::Internal(format!("verification task failed: {e}")))?
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }

    /// Applies steps in order and stops at the first failure.
    ///
    /// Completed steps stay written. The error says how far the plan got.
    async fn run_steps(&self, operation: &'static str, steps: Vec<WriteStep>) -> Result<()> {
        let total = steps.len();
        for (completed, step) in steps.iter().enumerate() {
            debug!(operation, step = %step, index = completed, total, "Applying write step");
            if let Err(source) = self.apply_step(step).await {
                error!(
                    operation,
                    step = %step,
                    completed,
                    total,
                    error = %source,
                    "Write step failed, leaving completed steps in place"
                );
                return Err(ServiceError::PartialWrite {
                    operation,
                    completed,
                    total,
                    source,
                });
            }
        }
        Ok(())
    }

    async fn apply_step(&self, step: &WriteStep) -> storage::Result<()> {
        let result = match step {
            WriteStep::PutUser(user) => self.users.put_user(user).await,
            WriteStep::PutProject(project) => self.projects.put_project(project).await,
            WriteStep::DeleteProject(id) => self.projects.delete_project(*id).await,
            WriteStep::DeleteUser(id) => self.users.delete_user(*id).await,
        };
        match result {
            // An earlier, interrupted run already removed this row.
            Err(e) if e.is_not_found() && is_delete(step) => {
                warn!(step = %step, "Row already absent, treating delete as done");
                Ok(())
            }
            other => other,
        }
    }
}

fn is_delete(step: &WriteStep) -> bool {
    matches!(step, WriteStep::DeleteProject(_) | WriteStep::DeleteUser(_))
}
