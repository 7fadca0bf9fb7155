//! Inbound payloads and the drafts the service consumes.

use serde::Deserialize;

use super::types::{Project, User, UserKey};

/// Input for account creation.
///
/// The password is plaintext and only lives until the service hashes it.
#[derive(Clone, Deserialize)]
pub struct UserDraft {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub title: String,
}

impl UserDraft {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            first_name: String::new(),
            last_name: String::new(),
            title: String::new(),
        }
    }

    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl std::fmt::Debug for UserDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDraft")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("title", &self.title)
            .finish()
    }
}

/// Input for project creation. The owner must resolve to an existing user.
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub owner: UserKey,
    pub title: String,
    pub body: String,
    pub rate: u8,
}

impl ProjectDraft {
    pub fn new(owner: impl Into<UserKey>, title: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            title: title.into(),
            body: String::new(),
            rate: 0,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_rate(mut self, rate: u8) -> Self {
        self.rate = rate;
        self
    }
}

/// Request body for `POST /api/v1/projects`. The owner comes from the caller's identity.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub rate: u8,
}

impl CreateProjectRequest {
    pub fn into_draft(self, owner: UserKey) -> ProjectDraft {
        ProjectDraft {
            owner,
            title: self.title,
            body: self.body,
            rate: self.rate,
        }
    }
}

/// Request body for `PUT /api/v1/users/{id}`.
///
/// Carries the editable profile; id, password hash and project summaries are
/// taken from the stored record so the result is a complete replacement.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub title: String,
}

impl UpdateUserRequest {
    pub fn apply_to(self, current: User) -> User {
        User {
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            title: self.title,
            ..current
        }
    }
}

/// Request body for `PUT /api/v1/projects/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub rate: u8,
}

impl UpdateProjectRequest {
    pub fn apply_to(self, current: Project) -> Project {
        Project {
            title: self.title,
            body: self.body,
            rate: self.rate,
            ..current
        }
    }
}

/// Request body for `PUT /api/v1/users/{id}/password`.
#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}
