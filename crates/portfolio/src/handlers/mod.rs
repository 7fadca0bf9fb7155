pub mod error;
pub mod health;
pub mod projects;
pub mod users;

pub use error::AppError;
