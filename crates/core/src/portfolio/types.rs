use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account.
///
/// `projects` is a denormalized copy of the projects this user owns, keyed by
/// project id. The consistency service is the only writer that keeps it in
/// step with the `projects` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub title: String,
    /// PHC-formatted password hash. Never serialized into responses.
    #[serde(default, skip_serializing)]
    pub password_hash: String,
    #[serde(default)]
    pub projects: BTreeMap<Uuid, ProjectSummary>,
}

impl User {
    /// Creates a user with a fresh id and no projects.
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            title: String::new(),
            password_hash: password_hash.into(),
            projects: BTreeMap::new(),
        }
    }

    /// Sets the display name fields.
    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// Sets the professional title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets a specific ID for this user (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// "First Last", with missing parts dropped.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Returns true if the project id is listed under this user.
    pub fn owns(&self, project_id: Uuid) -> bool {
        self.projects.contains_key(&project_id)
    }
}

/// The slice of a project embedded in its owner's record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub title: String,
    pub rate: u8,
    pub owner_name: String,
    pub owner_title: String,
}

/// A portfolio project stored in its own table.
///
/// `owner_name` and `owner_title` are captured from the owner when the project
/// is created and are not refreshed when the owner later changes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_email: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub rate: u8,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub owner_title: String,
}

impl Project {
    /// Builds the summary stored in the owner's `projects` map.
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id,
            title: self.title.clone(),
            rate: self.rate,
            owner_name: self.owner_name.clone(),
            owner_title: self.owner_title.clone(),
        }
    }
}

/// Addresses a user either by id or by email.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserKey {
    Id(Uuid),
    Email(String),
}

impl UserKey {
    /// Interprets a path segment: a UUID is an id, anything else an email.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match Uuid::parse_str(raw) {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Email(raw.to_string()),
        }
    }
}

impl From<Uuid> for UserKey {
    fn from(id: Uuid) -> Self {
        Self::Id(id)
    }
}

impl std::fmt::Display for UserKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Email(email) => write!(f, "{email}"),
        }
    }
}
