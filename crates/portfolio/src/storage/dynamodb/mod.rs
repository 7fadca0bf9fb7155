//! DynamoDB storage backend.
//!
//! Two tables, `users` and `projects`, each keyed by the string attribute
//! `id`. Item attribute names follow the existing table layout.

mod conversions;
mod error;
mod repository;

pub use repository::DynamoDbRepository;
