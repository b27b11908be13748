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
#![allow(clippy::redundant_pub_crate)]

//! Command-line client for the StudyLink study-group service.
//!
//! Each subcommand plays the role of one page: it resolves the route it
//! belongs to, lets the route guard decide whether it may render, and then
//! issues its requests through the shared session.
//!
//! Layout:
//! - `cli.rs`: argument parsing, session bootstrap, and command dispatch
//! - `commands/`: command handlers grouped by page
//! - `client.rs`: application context, CLI errors, and exit codes
//! - `output.rs`: table and JSON renderers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod output;

pub use cli::run;
