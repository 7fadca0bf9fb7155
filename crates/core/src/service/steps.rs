//! Ordered write plans for operations that touch both tables.
//!
//! The store has no multi-key transactions, so every such operation is a
//! list of single-row writes applied in order. Planning is pure; the service
//! executes the plan and stops at the first failure without rolling back.

use std::fmt;

use uuid::Uuid;

use crate::portfolio::{Project, User};

/// One single-row write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStep {
    PutUser(User),
    PutProject(Project),
    DeleteProject(Uuid),
    DeleteUser(Uuid),
}

impl fmt::Display for WriteStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PutUser(user) => write!(f, "put user {}", user.id),
            Self::PutProject(project) => write!(f, "put project {}", project.id),
            Self::DeleteProject(id) => write!(f, "delete project {id}"),
            Self::DeleteUser(id) => write!(f, "delete user {id}"),
        }
    }
}

/// Owner first, then the project row.
///
/// A failure between the two leaves the owner pointing at a project that was
/// never written, never a project row missing from its owner's map.
pub fn plan_project_creation(owner: &User, project: &Project) -> Vec<WriteStep> {
    let mut owner = owner.clone();
    owner.projects.insert(project.id, project.summary());
    vec![
        WriteStep::PutUser(owner),
        WriteStep::PutProject(project.clone()),
    ]
}

/// Project row first, then the refreshed summary in the owner's map.
///
/// The owner write is skipped when the owner is gone or does not list the
/// project.
pub fn plan_project_update(owner: Option<&User>, project: &Project) -> Vec<WriteStep> {
    let mut steps = vec![WriteStep::PutProject(project.clone())];
    if let Some(owner) = owner {
        let summary = project.summary();
        if owner
            .projects
            .get(&project.id)
            .is_some_and(|current| *current != summary)
        {
            let mut owner = owner.clone();
            owner.projects.insert(project.id, summary);
            steps.push(WriteStep::PutUser(owner));
        }
    }
    steps
}

/// Owner without the project first, then the project row.
pub fn plan_project_deletion(owner: Option<&User>, project_id: Uuid) -> Vec<WriteStep> {
    let mut steps = Vec::with_capacity(2);
    if let Some(owner) = owner {
        let mut owner = owner.clone();
        owner.projects.remove(&project_id);
        steps.push(WriteStep::PutUser(owner));
    }
    steps.push(WriteStep::DeleteProject(project_id));
    steps
}

/// Every listed project row, then the user row.
///
/// The user row goes last so that an interrupted run still lists whatever is
/// left to delete.
pub fn plan_user_deletion(user: &User) -> Vec<WriteStep> {
    user.projects
        .keys()
        .copied()
        .map(WriteStep::DeleteProject)
        .chain(std::iter::once(WriteStep::DeleteUser(user.id)))
        .collect()
}
