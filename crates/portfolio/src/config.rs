use std::{env, time::Duration};

use clap::ValueEnum;
use thiserror::Error;

/// Deployment environment selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Development,
    Production,
    /// Like development, but reads and writes the dev tables.
    Testing,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive number: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    /// Name of the users table.
    pub users_table: String,
    /// Name of the projects table.
    pub projects_table: String,
    /// AWS region override. The SDK default chain applies when unset.
    #[cfg_attr(not(feature = "dynamodb"), allow(dead_code))]
    pub aws_region: Option<String>,
    /// Endpoint override, e.g. a local DynamoDB.
    #[cfg_attr(not(feature = "dynamodb"), allow(dead_code))]
    pub dynamodb_endpoint: Option<String>,
    /// Deadline applied to every store call (default: 5 seconds).
    #[cfg_attr(not(feature = "dynamodb"), allow(dead_code))]
    pub store_timeout: Duration,
    /// Origin allowed by CORS (default: `http://localhost:3000`).
    pub cors_origin: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `USERS_TABLE` - Users table name (default: "users")
    /// - `PROJECTS_TABLE` - Projects table name (default: "projects")
    /// - `DEV_USERS_TABLE` / `DEV_PROJECTS_TABLE` - Used instead in testing mode
    /// - `AWS_REGION` - AWS region override
    /// - `DYNAMODB_ENDPOINT` - DynamoDB endpoint override
    /// - `STORE_TIMEOUT_SECS` - Per-call store deadline in seconds (default: 5)
    /// - `CORS_ORIGIN` - Allowed CORS origin (default: "http://localhost:3000")
    pub fn from_env(environment: Environment) -> Result<Self, ConfigError> {
        Self::from_lookup(environment, |name| env::var(name).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup(
        environment: Environment,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let (users_var, projects_var) = match environment {
            Environment::Testing => ("DEV_USERS_TABLE", "DEV_PROJECTS_TABLE"),
            _ => ("USERS_TABLE", "PROJECTS_TABLE"),
        };
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let store_timeout_secs = match lookup("STORE_TIMEOUT_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        name: "STORE_TIMEOUT_SECS",
                        value,
                    })
                }
            },
            None => 5,
        };

        Ok(Self {
            environment,
            users_table: non_empty(users_var)
                .unwrap_or_else(|| default_table(environment, "users")),
            projects_table: non_empty(projects_var)
                .unwrap_or_else(|| default_table(environment, "projects")),
            aws_region: non_empty("AWS_REGION"),
            dynamodb_endpoint: non_empty("DYNAMODB_ENDPOINT"),
            store_timeout: Duration::from_secs(store_timeout_secs),
            cors_origin: non_empty("CORS_ORIGIN")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
        })
    }
}

fn default_table(environment: Environment, name: &str) -> String {
    match environment {
        Environment::Testing => format!("dev_{name}"),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_names() {
        assert_eq!(default_table(Environment::Development, "users"), "users");
        assert_eq!(default_table(Environment::Production, "projects"), "projects");
        assert_eq!(default_table(Environment::Testing, "users"), "dev_users");
    }

    #[test]
    fn test_only_production_is_production() {
        assert!(Environment::Production.is_production());
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Testing.is_production());
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name: &str| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(Environment::Development, lookup(&[])).unwrap();

        assert_eq!(config.users_table, "users");
        assert_eq!(config.projects_table, "projects");
        assert_eq!(config.store_timeout, Duration::from_secs(5));
        assert_eq!(config.cors_origin, "http://localhost:3000");
        assert!(config.aws_region.is_none());
    }

    #[test]
    fn test_testing_environment_reads_dev_tables() {
        let vars = [
            ("USERS_TABLE", "prod_users"),
            ("DEV_USERS_TABLE", "staging_users"),
        ];

        let testing = Config::from_lookup(Environment::Testing, lookup(&vars)).unwrap();
        assert_eq!(testing.users_table, "staging_users");
        assert_eq!(testing.projects_table, "dev_projects");

        let production = Config::from_lookup(Environment::Production, lookup(&vars)).unwrap();
        assert_eq!(production.users_table, "prod_users");
        assert_eq!(production.projects_table, "projects");
    }

    #[test]
    fn test_store_timeout_must_be_positive() {
        for raw in ["0", "abc", "-1"] {
            let result = Config::from_lookup(
                Environment::Development,
                lookup(&[("STORE_TIMEOUT_SECS", raw)]),
            );
            assert!(
                matches!(result, Err(ConfigError::InvalidNumber { .. })),
                "{raw} should be rejected"
            );
        }

        let config = Config::from_lookup(
            Environment::Development,
            lookup(&[("STORE_TIMEOUT_SECS", " 12 ")]),
        )
        .unwrap();
        assert_eq!(config.store_timeout, Duration::from_secs(12));
    }
}
