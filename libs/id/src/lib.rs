//! # nimbus-id
//!
//! Typed ID types and parsing for cloud provider resources.
//!
//! ## Design Principles
//!
//! - IDs are assigned by the provider; slugs are stable human-readable labels
//! - IDs are typed to prevent mixing different resource types
//! - A reference given by a user is either an ID or a slug, never both
//!
//! ## ID Format
//!
//! Provider IDs are unsigned integers and serialize as JSON numbers:
//!
//! - droplet `3164444`
//! - action `36804636`
//! - image `6918990`
//!
//! Some resources (images, regions, sizes) can also be addressed by slug,
//! e.g. `ubuntu-24-04-x64` or `nyc3`. See [`ResourceRef`].

mod error;
mod macros;
mod reference;
mod types;

pub use error::IdError;
pub use reference::ResourceRef;
pub use types::*;
