mod error;
mod operations;
mod requests;
mod types;

pub use error::ValidationError;
pub use operations::{
    build_project, emails_match, find_by_email, validate_project_draft,
    validate_project_update, validate_user, validate_user_draft,
};
pub use requests::{
    ChangePasswordRequest, CreateProjectRequest, ProjectDraft, UpdateProjectRequest,
    UpdateUserRequest, UserDraft,
};
pub use types::{Project, ProjectSummary, User, UserKey};
