//! In-memory store with failure injection, and a cheap password hasher.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::Barrier;
use uuid::Uuid;

use crate::auth::{self, AuthError, PasswordHasher};
use crate::portfolio::{Project, User};
use crate::storage::{
    ProjectProjection, ProjectRepository, RepositoryError, Result, UserProjection, UserRepository,
};

use super::PortfolioService;

/// A store call that should fail until cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailPoint {
    GetUser,
    ScanUsers,
    PutUser,
    DeleteUser,
    PutProject,
    DeleteProject(Uuid),
}

/// Both tables in one struct, so a test can inspect the raw rows.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<Uuid, User>>,
    projects: Mutex<HashMap<Uuid, Project>>,
    failures: Mutex<Vec<FailPoint>>,
    scan_barrier: Mutex<Option<Arc<Barrier>>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes `scan_users` wait until `parties` scans are in flight.
    pub fn with_scan_barrier(parties: usize) -> Arc<Self> {
        let store = Self::default();
        *lock(&store.scan_barrier) = Some(Arc::new(Barrier::new(parties)));
        Arc::new(store)
    }

    pub fn fail_on(&self, point: FailPoint) {
        lock(&self.failures).push(point);
    }

    pub fn clear_failures(&self) {
        lock(&self.failures).clear();
    }

    pub fn insert_user(&self, user: User) {
        lock(&self.users).insert(user.id, user);
    }

    pub fn insert_project(&self, project: Project) {
        lock(&self.projects).insert(project.id, project);
    }

    pub fn user_row(&self, id: Uuid) -> Option<User> {
        lock(&self.users).get(&id).cloned()
    }

    pub fn project_row(&self, id: Uuid) -> Option<Project> {
        lock(&self.projects).get(&id).cloned()
    }

    pub fn user_count(&self) -> usize {
        lock(&self.users).len()
    }

    pub fn project_count(&self) -> usize {
        lock(&self.projects).len()
    }

    fn check(&self, point: FailPoint) -> Result<()> {
        if lock(&self.failures).contains(&point) {
            return Err(RepositoryError::ConnectionFailed(format!(
                "injected failure: {point:?}"
            )));
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get_user(&self, id: Uuid) -> Result<User> {
        self.check(FailPoint::GetUser)?;
        self.user_row(id)
            .ok_or_else(|| RepositoryError::not_found("User", id))
    }

    async fn scan_users(&self, projection: Option<&UserProjection>) -> Result<Vec<User>> {
        self.check(FailPoint::ScanUsers)?;
        let snapshot: Vec<User> = lock(&self.users).values().cloned().collect();

        let barrier = lock(&self.scan_barrier).clone();
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }

        Ok(match projection {
            Some(projection) => snapshot
                .into_iter()
                .map(|user| projection.apply(user))
                .collect(),
            None => snapshot,
        })
    }

    async fn put_user(&self, user: &User) -> Result<()> {
        self.check(FailPoint::PutUser)?;
        self.insert_user(user.clone());
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        self.check(FailPoint::DeleteUser)?;
        lock(&self.users)
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found("User", id))
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn get_project(&self, id: Uuid) -> Result<Project> {
        self.project_row(id)
            .ok_or_else(|| RepositoryError::not_found("Project", id))
    }

    async fn scan_projects(&self, projection: Option<&ProjectProjection>) -> Result<Vec<Project>> {
        let snapshot: Vec<Project> = lock(&self.projects).values().cloned().collect();
        Ok(match projection {
            Some(projection) => snapshot
                .into_iter()
                .map(|project| projection.apply(project))
                .collect(),
            None => snapshot,
        })
    }

    async fn put_project(&self, project: &Project) -> Result<()> {
        self.check(FailPoint::PutProject)?;
        self.insert_project(project.clone());
        Ok(())
    }

    async fn delete_project(&self, id: Uuid) -> Result<()> {
        self.check(FailPoint::DeleteProject(id))?;
        lock(&self.projects)
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found("Project", id))
    }
}

/// Reversible stand-in for a real password hash. Test use only.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeHasher;

impl PasswordHasher for FakeHasher {
    fn hash(&self, password: &str) -> auth::Result<String> {
        if password.is_empty() {
            return Err(AuthError::Hashing("empty password".to_string()));
        }
        Ok(format!("fake${password}"))
    }

    fn verify(&self, hash: &str, password: &str) -> auth::Result<bool> {
        match hash.strip_prefix("fake$") {
            Some(expected) => Ok(expected == password),
            None => Err(AuthError::Hashing("unrecognized hash".to_string())),
        }
    }
}

/// A service wired to a single memory store for both tables.
pub fn service_with(store: Arc<MemoryStore>) -> PortfolioService {
    PortfolioService::new(store.clone(), store, Arc::new(FakeHasher))
}
