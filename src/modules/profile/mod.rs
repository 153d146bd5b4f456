//! Profile module.
//!
//! Lazily-created user profiles with avatar and resume uploads stored
//! behind the file storage abstraction.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
