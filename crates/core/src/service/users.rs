use std::collections::BTreeMap;

use tracing::{debug, info};
use uuid::Uuid;

use crate::portfolio::{
    emails_match, find_by_email, validate_user, validate_user_draft, User, UserDraft, UserKey,
    ValidationError,
};
use crate::storage::UserProjection;

use super::{plan_user_deletion, PortfolioService, Result, ServiceError};

impl PortfolioService {
    /// Registers a new account.
    ///
    /// Uniqueness is a read-before-write over a full scan. Two concurrent
    /// calls with the same email can both pass the check.
    pub async fn create_user(&self, draft: UserDraft) -> Result<User> {
        validate_user_draft(&draft)?;
        let email = draft.email.trim().to_string();

        self.ensure_email_free(&email, None).await?;

        let password_hash = self.hash_password(draft.password).await?;
        let user = User {
            id: Uuid::new_v4(),
            email,
            first_name: draft.first_name,
            last_name: draft.last_name,
            title: draft.title,
            password_hash,
            projects: BTreeMap::new(),
        };
        self.users.put_user(&user).await?;

        info!(user_id = %user.id, email = %user.email, "Created user");
        Ok(user)
    }

    /// Reads a full user record, password hash included.
    pub async fn read_user(&self, id: Uuid) -> Result<User> {
        Ok(self.users.get_user(id).await?)
    }

    /// Looks a user up by email, then reads the full record by id.
    pub async fn read_user_with_email(&self, email: &str) -> Result<User> {
        let candidates = self
            .users
            .scan_users(Some(&UserProjection::identity()))
            .await?;
        let id = find_by_email(&candidates, email)
            .map(|user| user.id)
            .ok_or_else(|| ServiceError::not_found("User", email.trim()))?;
        self.read_user(id).await
    }

    pub async fn resolve_user(&self, key: &UserKey) -> Result<User> {
        match key {
            UserKey::Id(id) => self.read_user(*id).await,
            UserKey::Email(email) => self.read_user_with_email(email).await,
        }
    }

    /// Every user, without password hashes.
    pub async fn read_users(&self) -> Result<Vec<User>> {
        let users = self
            .users
            .scan_users(Some(&UserProjection::public_profile()))
            .await?;
        debug!(count = users.len(), "Read users");
        Ok(users)
    }

    /// Replaces a user's profile.
    ///
    /// The password hash and the `projects` map are kept from the stored row;
    /// only the password flow and the project operations write them.
    pub async fn update_user(&self, user: User) -> Result<User> {
        validate_user(&user)?;
        let current = self.read_user(user.id).await?;

        if !emails_match(&current.email, &user.email) {
            self.ensure_email_free(&user.email, Some(user.id)).await?;
        }

        let updated = User {
            email: user.email.trim().to_string(),
            password_hash: current.password_hash,
            projects: current.projects,
            ..user
        };
        self.users.put_user(&updated).await?;

        info!(user_id = %updated.id, "Updated user");
        Ok(updated)
    }

    /// Re-hashes and stores a new password.
    pub async fn change_password(&self, id: Uuid, new_password: String) -> Result<()> {
        if new_password.is_empty() {
            return Err(ValidationError::MissingPassword.into());
        }
        let mut user = self.read_user(id).await?;
        user.password_hash = self.hash_password(new_password).await?;
        self.users.put_user(&user).await?;

        info!(user_id = %id, "Changed password");
        Ok(())
    }

    /// Deletes every project the user lists, then the user.
    ///
    /// Not atomic, and the user row is never rewritten. On failure it keeps
    /// its full `projects` map, so entries for projects already deleted
    /// dangle until a retry finishes the job.
    pub async fn delete_user(&self, key: &UserKey) -> Result<()> {
        let user = self.resolve_user(key).await?;
        let steps = plan_user_deletion(&user);
        let project_count = steps.len() - 1;

        self.run_steps("delete_user", steps).await?;

        info!(user_id = %user.id, projects = project_count, "Deleted user");
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str, except: Option<Uuid>) -> Result<()> {
        let existing = self
            .users
            .scan_users(Some(&UserProjection::identity()))
            .await?;
        let taken = existing
            .iter()
            .any(|user| Some(user.id) != except && emails_match(&user.email, email));
        if taken {
            return Err(ServiceError::Conflict {
                email: email.trim().to_string(),
            });
        }
        Ok(())
    }
}
