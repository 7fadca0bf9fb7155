use chrono::{SubsecRound, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::portfolio::{
    build_project, validate_project_draft, validate_project_update, Project, ProjectDraft, User,
};

use super::{
    plan_project_creation, plan_project_deletion, plan_project_update, PortfolioService, Result,
};

impl PortfolioService {
    /// Creates a project under an existing owner.
    ///
    /// The owner's `projects` map is written before the project row.
    pub async fn create_project(&self, draft: ProjectDraft) -> Result<Project> {
        validate_project_draft(&draft)?;
        let owner = self.resolve_user(&draft.owner).await?;

        let project = build_project(draft, &owner, Uuid::new_v4(), Utc::now().trunc_subsecs(0));
        let steps = plan_project_creation(&owner, &project);
        self.run_steps("create_project", steps).await?;

        info!(project_id = %project.id, owner_id = %owner.id, "Created project");
        Ok(project)
    }

    pub async fn read_project(&self, id: Uuid) -> Result<Project> {
        Ok(self.projects.get_project(id).await?)
    }

    pub async fn read_projects(&self) -> Result<Vec<Project>> {
        let projects = self.projects.scan_projects(None).await?;
        debug!(count = projects.len(), "Read projects");
        Ok(projects)
    }

    /// Replaces a project's content.
    ///
    /// The owner cannot change and `created_at` is kept from the stored row.
    /// If the owner lists the project, its summary is refreshed afterwards.
    pub async fn update_project(&self, project: Project) -> Result<Project> {
        let current = self.read_project(project.id).await?;
        validate_project_update(&current, &project)?;

        let updated = Project {
            owner_email: current.owner_email,
            created_at: current.created_at,
            ..project
        };
        let owner = self.owner_of(&updated).await?;
        let steps = plan_project_update(owner.as_ref(), &updated);
        self.run_steps("update_project", steps).await?;

        info!(project_id = %updated.id, "Updated project");
        Ok(updated)
    }

    /// Removes the project from its owner's map, then deletes the row.
    ///
    /// A project whose owner is already gone is deleted without the owner write.
    pub async fn delete_project(&self, id: Uuid) -> Result<()> {
        let project = self.read_project(id).await?;
        let owner = self.owner_of(&project).await?;

        let steps = plan_project_deletion(owner.as_ref(), id);
        self.run_steps("delete_project", steps).await?;

        info!(project_id = %id, owner_id = %project.owner_id, "Deleted project");
        Ok(())
    }

    async fn owner_of(&self, project: &Project) -> Result<Option<User>> {
        match self.users.get_user(project.owner_id).await {
            Ok(owner) => Ok(Some(owner)),
            Err(e) if e.is_not_found() => {
                warn!(
                    project_id = %project.id,
                    owner_id = %project.owner_id,
                    "Project owner no longer exists"
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
