//! Configuration modules for the Jobdesk API.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables with development defaults.
//!
//! # Modules
//!
//! - [`cors`]: CORS allowed origins
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`email`]: SMTP settings for verification and reset mails
//! - [`jwt`]: JWT signing secret and token lifetime
//! - [`rate_limit`]: API rate limiting buckets
//! - [`storage`]: Upload directory and public media URL

pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
pub mod rate_limit;
pub mod storage;
