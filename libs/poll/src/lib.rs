//! Polling primitives for asynchronous provider operations.
//!
//! Cloud APIs answer most state-changing calls (create, power on/off,
//! snapshot) with an *action* handle instead of the final resource. This
//! crate turns such handles into synchronous results:
//!
//! ```text
//! mutating call ──▶ ActionRef ──▶ poll_until(check_action) ──▶ final action
//!                                   │   ▲
//!                                   ▼   │ sleep(backoff)
//!                                 fetch_action
//! ```
//!
//! ## Modules
//!
//! - `config`: per-wait timeouts and poll periods
//! - `backoff`: capped exponential poll intervals
//! - `retry`: the generic `poll_until` loop
//! - `action`: action status classification and waiting
//! - `termination`: waiting for a resource to disappear

pub mod action;
pub mod backoff;
pub mod config;
pub mod error;
pub mod retry;
pub mod termination;

pub use action::{await_action, check_action, ActionFetcher, ActionRef, ActionStatus, TrackedAction};
pub use backoff::PollBackoff;
pub use config::{PollConfig, PollPeriod, PollSettings, Timeouts, WaitKind};
pub use error::{ConfigError, WaitError};
pub use retry::{poll_until, Attempt, PollOutcome};
pub use termination::{await_termination, check_terminated, ResourceLookup};
