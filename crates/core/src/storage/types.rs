use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::portfolio::{Project, User};

/// An attribute set whose key attribute is always part of any projection.
pub trait KeyAttribute: Copy + PartialEq {
    const KEY: Self;
}

/// Attributes of a `users` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAttribute {
    Id,
    Email,
    FirstName,
    LastName,
    Title,
    PasswordHash,
    Projects,
}

impl UserAttribute {
    pub const ALL: [UserAttribute; 7] = [
        Self::Id,
        Self::Email,
        Self::FirstName,
        Self::LastName,
        Self::Title,
        Self::PasswordHash,
        Self::Projects,
    ];
}

impl KeyAttribute for UserAttribute {
    const KEY: Self = Self::Id;
}

/// Attributes of a `projects` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectAttribute {
    Id,
    OwnerId,
    OwnerEmail,
    Title,
    Body,
    Rate,
    CreatedAt,
    OwnerName,
    OwnerTitle,
}

impl KeyAttribute for ProjectAttribute {
    const KEY: Self = Self::Id;
}

/// The attributes a scan should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection<A> {
    attributes: Vec<A>,
}

pub type UserProjection = Projection<UserAttribute>;
pub type ProjectProjection = Projection<ProjectAttribute>;

impl<A: KeyAttribute> Projection<A> {
    /// Builds a projection. The key attribute is added if missing.
    pub fn new(attributes: impl IntoIterator<Item = A>) -> Self {
        let mut projected = vec![A::KEY];
        for attribute in attributes {
            if !projected.contains(&attribute) {
                projected.push(attribute);
            }
        }
        Self {
            attributes: projected,
        }
    }

    pub fn includes(&self, attribute: A) -> bool {
        self.attributes.contains(&attribute)
    }

    pub fn attributes(&self) -> &[A] {
        &self.attributes
    }
}

impl Projection<UserAttribute> {
    /// Id and email only; enough for uniqueness checks and lookups by email.
    pub fn identity() -> Self {
        Self::new([UserAttribute::Email])
    }

    /// Everything except the password hash.
    pub fn public_profile() -> Self {
        Self::new(
            UserAttribute::ALL
                .into_iter()
                .filter(|attribute| *attribute != UserAttribute::PasswordHash),
        )
    }

    /// Clears every attribute outside the projection.
    pub fn apply(&self, user: User) -> User {
        User {
            id: user.id,
            email: self.keep(UserAttribute::Email, user.email),
            first_name: self.keep(UserAttribute::FirstName, user.first_name),
            last_name: self.keep(UserAttribute::LastName, user.last_name),
            title: self.keep(UserAttribute::Title, user.title),
            password_hash: self.keep(UserAttribute::PasswordHash, user.password_hash),
            projects: if self.includes(UserAttribute::Projects) {
                user.projects
            } else {
                BTreeMap::new()
            },
        }
    }

    fn keep(&self, attribute: UserAttribute, value: String) -> String {
        if self.includes(attribute) {
            value
        } else {
            String::new()
        }
    }
}

impl Projection<ProjectAttribute> {
    /// Clears every attribute outside the projection.
    pub fn apply(&self, project: Project) -> Project {
        let text = |attribute, value: String| {
            if self.includes(attribute) {
                value
            } else {
                String::new()
            }
        };
        Project {
            id: project.id,
            owner_id: if self.includes(ProjectAttribute::OwnerId) {
                project.owner_id
            } else {
                uuid::Uuid::nil()
            },
            owner_email: text(ProjectAttribute::OwnerEmail, project.owner_email),
            title: text(ProjectAttribute::Title, project.title),
            body: text(ProjectAttribute::Body, project.body),
            rate: if self.includes(ProjectAttribute::Rate) {
                project.rate
            } else {
                0
            },
            created_at: if self.includes(ProjectAttribute::CreatedAt) {
                project.created_at
            } else {
                DateTime::<Utc>::default()
            },
            owner_name: text(ProjectAttribute::OwnerName, project.owner_name),
            owner_title: text(ProjectAttribute::OwnerTitle, project.owner_title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::ProjectSummary;
    use uuid::Uuid;

    fn user_with_project() -> User {
        let mut user = User::new("a@x.com", "$argon2id$hash").with_name("Ada", "Lovelace");
        let project_id = Uuid::new_v4();
        user.projects.insert(
            project_id,
            ProjectSummary {
                id: project_id,
                title: "P1".to_string(),
                rate: 3,
                owner_name: "Ada Lovelace".to_string(),
                owner_title: String::new(),
            },
        );
        user
    }

    #[test]
    fn projection_always_includes_key() {
        let projection = UserProjection::new([UserAttribute::Email, UserAttribute::Email]);
        assert_eq!(
            projection.attributes(),
            &[UserAttribute::Id, UserAttribute::Email]
        );
        assert!(ProjectProjection::new([]).includes(ProjectAttribute::Id));
    }

    #[test]
    fn identity_projection_keeps_id_and_email_only() {
        let user = user_with_project();
        let projected = UserProjection::identity().apply(user.clone());

        assert_eq!(projected.id, user.id);
        assert_eq!(projected.email, "a@x.com");
        assert_eq!(projected.first_name, "");
        assert_eq!(projected.password_hash, "");
        assert!(projected.projects.is_empty());
    }

    #[test]
    fn public_profile_drops_password_hash() {
        let user = user_with_project();
        let projected = UserProjection::public_profile().apply(user.clone());

        assert_eq!(projected.password_hash, "");
        assert_eq!(projected.first_name, "Ada");
        assert_eq!(projected.projects, user.projects);
    }

    #[test]
    fn project_projection_defaults_unprojected_fields() {
        let project = Project {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            owner_email: "a@x.com".to_string(),
            title: "P1".to_string(),
            body: "body".to_string(),
            rate: 2,
            created_at: Utc::now(),
            owner_name: "Ada".to_string(),
            owner_title: "Eng".to_string(),
        };
        let projected =
            ProjectProjection::new([ProjectAttribute::Title, ProjectAttribute::Rate])
                .apply(project.clone());

        assert_eq!(projected.id, project.id);
        assert_eq!(projected.title, "P1");
        assert_eq!(projected.rate, 2);
        assert!(projected.owner_id.is_nil());
        assert_eq!(projected.body, "");
        assert_eq!(projected.created_at.timestamp(), 0);
    }
}
