//! Utility modules for the Jobdesk API.
//!
//! - [`email`]: Email sending over SMTP
//! - [`jwt`]: JWT token creation and verification
//! - [`tokens`]: One-time token generation for email flows

pub mod email;
pub mod jwt;
pub mod tokens;
