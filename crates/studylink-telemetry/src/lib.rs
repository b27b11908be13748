#![forbid(unsafe_code)]
#![deny(
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Logging setup shared by the StudyLink client binaries.
//!
//! Layout: `init.rs` (subscriber installation and format selection),
//! `context.rs` (invocation span), `error.rs` (telemetry error type).

pub mod context;
pub mod error;
pub mod init;

pub use context::command_span;
pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
