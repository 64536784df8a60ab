//! User and organization membership management.

mod repository;
mod types;

pub use repository::UserRepository;
pub use types::{NewUser, OrgMembership, OrgRole, User, UserProfile};
