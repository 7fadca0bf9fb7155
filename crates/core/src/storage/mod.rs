mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use traits::{ProjectRepository, UserRepository};
pub use types::{
    KeyAttribute, ProjectAttribute, ProjectProjection, Projection, UserAttribute, UserProjection,
};
