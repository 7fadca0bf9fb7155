//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and domain types.
//! These are testable in isolation without DynamoDB access.
//!
//! Only `id` is required when reading. Every other attribute may be missing
//! from a projected scan and falls back to its default.

use std::collections::{BTreeMap, HashMap};

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use portfolio_core::portfolio::{Project, ProjectSummary, User};
use portfolio_core::storage::{ProjectAttribute, RepositoryError, UserAttribute};
use uuid::Uuid;

pub type Item = HashMap<String, AttributeValue>;

// ============================================================================
// Attribute names
// ============================================================================

pub fn user_attribute_name(attribute: UserAttribute) -> &'static str {
    match attribute {
        UserAttribute::Id => "id",
        UserAttribute::Email => "email",
        UserAttribute::FirstName => "firstname",
        UserAttribute::LastName => "lastname",
        UserAttribute::Title => "title",
        UserAttribute::PasswordHash => "password",
        UserAttribute::Projects => "projects",
    }
}

pub fn project_attribute_name(attribute: ProjectAttribute) -> &'static str {
    match attribute {
        ProjectAttribute::Id => "id",
        ProjectAttribute::OwnerId => "user_id",
        ProjectAttribute::OwnerEmail => "owner_email",
        ProjectAttribute::Title => "title",
        ProjectAttribute::Body => "body",
        ProjectAttribute::Rate => "rate",
        ProjectAttribute::CreatedAt => "created_at",
        ProjectAttribute::OwnerName => "user_name",
        ProjectAttribute::OwnerTitle => "user_title",
    }
}

/// Builds a projection expression with `#aN` placeholders, so reserved words
/// like `title` are safe.
pub fn projection_expression<'a>(
    names: impl IntoIterator<Item = &'a str>,
) -> (String, HashMap<String, String>) {
    let mut placeholders = Vec::new();
    let mut attribute_names = HashMap::new();
    for (index, name) in names.into_iter().enumerate() {
        let placeholder = format!("#a{index}");
        attribute_names.insert(placeholder.clone(), name.to_string());
        placeholders.push(placeholder);
    }
    (placeholders.join(", "), attribute_names)
}

// ============================================================================
// User conversions
// ============================================================================

/// Convert a User to DynamoDB item.
pub fn user_to_item(user: &User) -> Item {
    let mut item = HashMap::new();

    item.insert("id".to_string(), AttributeValue::S(user.id.to_string()));
    item.insert("email".to_string(), AttributeValue::S(user.email.clone()));
    item.insert(
        "firstname".to_string(),
        AttributeValue::S(user.first_name.clone()),
    );
    item.insert(
        "lastname".to_string(),
        AttributeValue::S(user.last_name.clone()),
    );
    item.insert("title".to_string(), AttributeValue::S(user.title.clone()));
    item.insert(
        "password".to_string(),
        AttributeValue::S(user.password_hash.clone()),
    );

    let projects = user
        .projects
        .iter()
        .map(|(id, summary)| (id.to_string(), AttributeValue::M(summary_to_item(summary))))
        .collect();
    item.insert("projects".to_string(), AttributeValue::M(projects));

    item
}

/// Convert a DynamoDB item to User.
pub fn item_to_user(item: &Item) -> Result<User, RepositoryError> {
    let projects = match item.get("projects") {
        Some(AttributeValue::M(map)) => map
            .values()
            .map(|value| match value {
                AttributeValue::M(summary) => {
                    item_to_summary(summary).map(|summary| (summary.id, summary))
                }
                _ => Err(RepositoryError::Serialization(
                    "Invalid project summary in projects".to_string(),
                )),
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?,
        _ => BTreeMap::new(),
    };

    Ok(User {
        id: get_uuid(item, "id")?,
        email: get_string_or_default(item, "email"),
        first_name: get_string_or_default(item, "firstname"),
        last_name: get_string_or_default(item, "lastname"),
        title: get_string_or_default(item, "title"),
        password_hash: get_string_or_default(item, "password"),
        projects,
    })
}

fn summary_to_item(summary: &ProjectSummary) -> Item {
    HashMap::from([
        ("id".to_string(), AttributeValue::S(summary.id.to_string())),
        ("title".to_string(), AttributeValue::S(summary.title.clone())),
        ("rate".to_string(), AttributeValue::N(summary.rate.to_string())),
        (
            "user_name".to_string(),
            AttributeValue::S(summary.owner_name.clone()),
        ),
        (
            "user_title".to_string(),
            AttributeValue::S(summary.owner_title.clone()),
        ),
    ])
}

fn item_to_summary(item: &Item) -> Result<ProjectSummary, RepositoryError> {
    Ok(ProjectSummary {
        id: get_uuid(item, "id")?,
        title: get_string_or_default(item, "title"),
        rate: get_number_or_default(item, "rate")?,
        owner_name: get_string_or_default(item, "user_name"),
        owner_title: get_string_or_default(item, "user_title"),
    })
}

// ============================================================================
// Project conversions
// ============================================================================

/// Convert a Project to DynamoDB item.
pub fn project_to_item(project: &Project) -> Item {
    let mut item = HashMap::new();

    item.insert("id".to_string(), AttributeValue::S(project.id.to_string()));
    item.insert(
        "user_id".to_string(),
        AttributeValue::S(project.owner_id.to_string()),
    );
    item.insert(
        "owner_email".to_string(),
        AttributeValue::S(project.owner_email.clone()),
    );
    item.insert("title".to_string(), AttributeValue::S(project.title.clone()));
    item.insert("body".to_string(), AttributeValue::S(project.body.clone()));
    item.insert(
        "rate".to_string(),
        AttributeValue::N(project.rate.to_string()),
    );
    item.insert(
        "created_at".to_string(),
        AttributeValue::N(project.created_at.timestamp().to_string()),
    );
    item.insert(
        "user_name".to_string(),
        AttributeValue::S(project.owner_name.clone()),
    );
    item.insert(
        "user_title".to_string(),
        AttributeValue::S(project.owner_title.clone()),
    );

    item
}

/// Convert a DynamoDB item to Project.
pub fn item_to_project(item: &Item) -> Result<Project, RepositoryError> {
    let owner_id = match item.get("user_id") {
        Some(_) => get_uuid(item, "user_id")?,
        None => Uuid::nil(),
    };
    let created_at_secs: i64 = get_number_or_default(item, "created_at")?;
    let created_at = DateTime::<Utc>::from_timestamp(created_at_secs, 0).ok_or_else(|| {
        RepositoryError::Serialization(format!("created_at out of range: {created_at_secs}"))
    })?;

    Ok(Project {
        id: get_uuid(item, "id")?,
        owner_id,
        owner_email: get_string_or_default(item, "owner_email"),
        title: get_string_or_default(item, "title"),
        body: get_string_or_default(item, "body"),
        rate: get_number_or_default(item, "rate")?,
        created_at,
        owner_name: get_string_or_default(item, "user_name"),
        owner_title: get_string_or_default(item, "user_title"),
    })
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get a required string attribute.
fn get_string(item: &Item, key: &str) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| RepositoryError::Serialization(format!("Missing or invalid field: {key}")))
}

/// Get a string attribute, or an empty string when absent.
fn get_string_or_default(item: &Item, key: &str) -> String {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .unwrap_or_default()
}

/// Get a required UUID attribute.
fn get_uuid(item: &Item, key: &str) -> Result<Uuid, RepositoryError> {
    let s = get_string(item, key)?;
    Uuid::parse_str(&s)
        .map_err(|e| RepositoryError::Serialization(format!("Invalid UUID {key}: {e}")))
}

/// Get a numeric attribute, or zero when absent.
fn get_number_or_default<T>(item: &Item, key: &str) -> Result<T, RepositoryError>
where
    T: std::str::FromStr + Default,
{
    match item.get(key) {
        None => Ok(T::default()),
        Some(value) => value
            .as_n()
            .ok()
            .and_then(|n| n.parse::<T>().ok())
            .ok_or_else(|| RepositoryError::Serialization(format!("Invalid number field: {key}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let mut user = User::new("ada@example.com", "$argon2id$hash")
            .with_name("Ada", "Lovelace")
            .with_title("Mathematician");
        let project_id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440010").unwrap();
        user.projects.insert(
            project_id,
            ProjectSummary {
                id: project_id,
                title: "Engine".to_string(),
                rate: 5,
                owner_name: "Ada Lovelace".to_string(),
                owner_title: "Mathematician".to_string(),
            },
        );
        user
    }

    fn sample_project() -> Project {
        Project {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            owner_email: "ada@example.com".to_string(),
            title: "Engine".to_string(),
            body: "Notes".to_string(),
            rate: 4,
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            owner_name: "Ada Lovelace".to_string(),
            owner_title: "Mathematician".to_string(),
        }
    }

    #[test]
    fn test_user_item_uses_table_attribute_names() {
        let item = user_to_item(&sample_user());

        for key in ["id", "email", "firstname", "lastname", "title", "password", "projects"] {
            assert!(item.contains_key(key), "missing {key}");
        }
        assert_eq!(item["password"].as_s().unwrap(), "$argon2id$hash");
        let projects = item["projects"].as_m().unwrap();
        let summary = projects["550e8400-e29b-41d4-a716-446655440010"]
            .as_m()
            .unwrap();
        assert_eq!(summary["rate"].as_n().unwrap(), "5");
        assert_eq!(summary["user_name"].as_s().unwrap(), "Ada Lovelace");
    }

    #[test]
    fn test_user_round_trip() {
        let user = sample_user();
        assert_eq!(item_to_user(&user_to_item(&user)).unwrap(), user);
    }

    #[test]
    fn test_project_item_stores_created_at_as_seconds() {
        let item = project_to_item(&sample_project());

        assert_eq!(item["created_at"].as_n().unwrap(), "1700000000");
        assert!(item.contains_key("user_id"));
        assert!(item.contains_key("user_title"));
    }

    #[test]
    fn test_project_round_trip() {
        let project = sample_project();
        assert_eq!(item_to_project(&project_to_item(&project)).unwrap(), project);
    }

    #[test]
    fn test_projected_item_defaults_missing_attributes() {
        let id = Uuid::new_v4();
        let item = HashMap::from([
            ("id".to_string(), AttributeValue::S(id.to_string())),
            ("email".to_string(), AttributeValue::S("a@x.com".to_string())),
        ]);

        let user = item_to_user(&item).unwrap();

        assert_eq!(user.id, id);
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.password_hash, "");
        assert!(user.projects.is_empty());
    }

    #[test]
    fn test_missing_id_is_serialization_error() {
        let item = HashMap::from([(
            "email".to_string(),
            AttributeValue::S("a@x.com".to_string()),
        )]);
        assert!(matches!(
            item_to_user(&item),
            Err(RepositoryError::Serialization(_))
        ));
    }

    #[test]
    fn test_bad_number_is_serialization_error() {
        let mut item = project_to_item(&sample_project());
        item.insert("rate".to_string(), AttributeValue::N("999".to_string()));
        assert!(item_to_project(&item).is_err());
    }

    #[test]
    fn test_projection_expression_uses_placeholders() {
        let (expression, names) = projection_expression([
            user_attribute_name(UserAttribute::Id),
            user_attribute_name(UserAttribute::Title),
        ]);

        assert_eq!(expression, "#a0, #a1");
        assert_eq!(names["#a0"], "id");
        assert_eq!(names["#a1"], "title");
    }
}
