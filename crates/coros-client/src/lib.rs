//! `coros-client`: authenticated client for the Coros team API.
//!
//! Implements the remote-session contract consumed by the stride sync
//! orchestrator: login, paged activity listing, and the two-step activity
//! download (resolve a file URL, then fetch the bytes into the caller's
//! target directory).
//!
//! # Architecture
//!
//! ```text
//! CorosClient      ← unauthenticated; POST /account/login
//!     │
//!     ▼
//! CorosSession     ← carries the access token (header + region cookie)
//!     │               GET  /activity/query            (paged listing)
//!     │               POST /activity/detail/download  (resolve fileUrl)
//!     ▼               GET  <fileUrl>                  (raw bytes)
//! stride_core::session traits
//! ```
//!
//! The client never retries; transient-failure policy belongs to callers.
//! Dropping a [`CorosSession`] releases its connection pool.

pub mod client;
pub mod error;
pub mod types;

pub use client::{CorosClient, CorosSession, DEFAULT_BASE_URL};
pub use error::CorosError;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, CorosError>;
