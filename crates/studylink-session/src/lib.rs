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
#![allow(clippy::module_name_repetitions)]

//! Client-side session handling for the StudyLink REST API.
//!
//! Layout (leaf first):
//! - `store.rs`: durable credential persistence (`TokenStore`)
//! - `credential.rs`: bearer credential newtype and non-authoritative token hints
//! - `pipeline.rs`: `ApiClient`, which attaches the credential and reports 401s
//! - `events.rs` / `epoch.rs`: the channel between the pipeline and the session
//! - `session.rs`: the session controller and its state machine
//! - `guard.rs` / `navigation.rs`: route gating and the in-app navigation primitive
//! - `services/`: typed data functions, one per backend endpoint

pub mod clock;
pub mod config;
pub mod credential;
pub mod epoch;
pub mod error;
pub mod events;
pub mod guard;
pub mod navigation;
pub mod pipeline;
pub mod services;
pub mod session;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ClientConfig;
pub use credential::{Credential, HintError, TokenHint};
pub use epoch::SessionEpoch;
pub use error::{ApiError, ApiResult, ConfigError, SessionError, SessionResult, StoreError};
pub use events::{AuthEvent, AuthEvents, AuthListener};
pub use guard::{GuardDecision, guard, guard_route};
pub use navigation::{HistoryNavigator, Navigator, Route};
pub use pipeline::ApiClient;
pub use session::{IdentityClaims, Session, SessionState};
pub use store::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore};
