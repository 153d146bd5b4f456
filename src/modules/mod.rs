pub mod applications;
pub mod auth;
pub mod jobs;
pub mod profile;

pub use self::auth::model::User;
