use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::ValidationError;
use super::requests::{ProjectDraft, UserDraft};
use super::types::{Project, User, UserKey};

/// Emails match when they are equal after trimming, ignoring ASCII case.
pub fn emails_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Validates a signup draft before anything is written.
pub fn validate_user_draft(draft: &UserDraft) -> Result<(), ValidationError> {
    let email = draft.email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if !is_plausible_email(email) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    if draft.password.is_empty() {
        return Err(ValidationError::MissingPassword);
    }
    Ok(())
}

/// Validates the profile part of a full user replacement.
pub fn validate_user(user: &User) -> Result<(), ValidationError> {
    let email = user.email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if !is_plausible_email(email) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

/// Validates a project draft. Owner existence is checked by the service.
pub fn validate_project_draft(draft: &ProjectDraft) -> Result<(), ValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    match &draft.owner {
        UserKey::Email(email) if email.trim().is_empty() => Err(ValidationError::MissingOwner),
        UserKey::Id(id) if id.is_nil() => Err(ValidationError::MissingOwner),
        _ => Ok(()),
    }
}

/// Validates a full project replacement against the stored record.
pub fn validate_project_update(current: &Project, next: &Project) -> Result<(), ValidationError> {
    if next.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if current.owner_id != next.owner_id || !emails_match(&current.owner_email, &next.owner_email)
    {
        return Err(ValidationError::OwnerChanged);
    }
    Ok(())
}

/// Finds the first user whose email matches.
pub fn find_by_email<'a>(users: &'a [User], email: &str) -> Option<&'a User> {
    users.iter().find(|user| emails_match(&user.email, email))
}

/// Builds the project record for a validated draft and its resolved owner.
///
/// Owner display fields are copied at this point and never refreshed.
pub fn build_project(
    draft: ProjectDraft,
    owner: &User,
    id: Uuid,
    created_at: DateTime<Utc>,
) -> Project {
    Project {
        id,
        owner_id: owner.id,
        owner_email: owner.email.clone(),
        title: draft.title.trim().to_string(),
        body: draft.body,
        rate: draft.rate,
        created_at,
        owner_name: owner.display_name(),
        owner_title: owner.title.clone(),
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}
