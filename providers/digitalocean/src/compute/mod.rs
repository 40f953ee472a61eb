//! Lifecycle operations that wait for provider actions.
//!
//! Every mutating operation follows the same template:
//!
//! 1. issue the call and take the action reference from its response
//! 2. poll the action with the wait's [`PollConfig`](nimbus_poll::PollConfig)
//! 3. re-fetch the resource by id and return it
//!
//! State embedded in action or create responses is never returned: it
//! describes the resource as it was when the call was accepted.

mod adapter;
mod api;
mod image_extension;
mod lookup;

pub use adapter::ComputeAdapter;
pub use api::ComputeApi;
pub use image_extension::{ImageExtension, ImageTemplate};
pub use lookup::{Actions, Droplets};
