//! # Jobdesk API
//!
//! A job-board REST API built with Rust, Axum, and PostgreSQL. Users
//! register as seekers or employers, employers post jobs, seekers apply,
//! and both sides track application status.
//!
//! ## Overview
//!
//! - **Authentication**: JWT-based auth with email verification and
//!   password reset tokens held in Redis with explicit TTLs
//! - **Job listing**: the public search endpoint runs through a
//!   Redis-backed result cache with short TTLs and whole-namespace
//!   invalidation on every job mutation
//! - **Applications**: seekers apply with cover letter and resume;
//!   employers move applications through a review pipeline
//! - **Profiles**: lazily-created profiles with avatar and resume
//!   uploads behind a storage abstraction
//!
//! ## Architecture
//!
//! The codebase follows a modular architecture inspired by NestJS:
//!
//! ```text
//! src/
//! ├── config/           # Env-driven configuration (database, JWT, SMTP, CORS)
//! ├── middleware/       # Auth extractor
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Registration, login, verification, reset
//! │   ├── jobs/        # Postings and the cached public listing
//! │   ├── applications/# Applications and review pipeline
//! │   └── profile/     # Profiles and media uploads
//! └── utils/           # JWT, email, one-time tokens
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `controller.rs`: HTTP handlers (routes)
//! - `service.rs`: Business logic
//! - `model.rs`: Data models, DTOs, database structs
//! - `router.rs`: Axum router configuration
//!
//! ## The listing cache
//!
//! `GET /api/jobs` derives a deterministic cache key from the
//! whitelisted query parameters (see `jobdesk_cache::keys`), serves
//! cached pages for up to 60 seconds, and falls through to a filtered
//! query plus an independent count query on a miss. Every job mutation
//! sweeps the `jobs:list:` namespace with cursor-based SCAN before
//! reporting success. The cache is optional: without Redis all reads go
//! straight to PostgreSQL.

pub mod config;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;

// Re-export workspace crates for convenience
pub use jobdesk_cache;
pub use jobdesk_core;
