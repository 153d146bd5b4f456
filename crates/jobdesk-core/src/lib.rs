//! # Jobdesk Core
//!
//! Core types, errors, and utilities for the Jobdesk API.
//!
//! This crate provides foundational types used throughout the Jobdesk
//! application:
//!
//! - [`errors`]: Application error types with HTTP response conversion
//! - [`pagination`]: Page-based pagination for listing endpoints
//! - [`password`]: Secure password hashing and verification
//! - [`file_storage`]: Storage backend abstraction for uploaded files

pub mod errors;
pub mod file_storage;
pub mod pagination;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use file_storage::{FileStorage, LocalFileStorage, StorageError};
pub use pagination::{PaginationMeta, PaginationParams, SortOrder};
pub use password::{hash_password, verify_password};
