//! DigitalOcean compute bindings.
//!
//! Maps the DigitalOcean v2 REST API onto typed records and exposes
//! lifecycle operations that wait for the provider's asynchronous actions
//! before returning.
//!
//! ## Architecture
//!
//! ```text
//! ComputeAdapter ──▶ ComputeApi (trait) ──▶ DigitalOceanClient (reqwest)
//!      │
//!      └──▶ nimbus_poll::{await_action, await_termination}
//! ```
//!
//! ## Modules
//!
//! - `client`: REST client for actions, droplets, images, sizes, regions, keys
//! - `compute`: the `ComputeApi` seam, `ComputeAdapter` and `ImageExtension`
//! - `config`: API endpoint, token and poll timing from the environment
//! - `domain`: DigitalOcean records

pub mod client;
pub mod compute;
pub mod config;
pub mod domain;
pub mod error;

// Re-export commonly used types
pub use client::DigitalOceanClient;
pub use compute::{ComputeAdapter, ComputeApi, ImageExtension, ImageTemplate};
pub use config::Config;
pub use error::{ApiError, ComputeError, Operation};
