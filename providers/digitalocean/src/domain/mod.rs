//! DigitalOcean API records.
//!
//! Field names follow the provider's JSON. Only `Action::status` is
//! interpreted by the polling code; everything else is carried through.

mod action;
mod droplet;
mod image;
mod key;
mod region;
mod size;

pub use action::{Action, DropletActionRequest};
pub use droplet::{
    ActionLink, CreateLinks, Droplet, DropletCreated, DropletSpec, DropletStatus, NetworkAddress,
    NetworkType, Networks,
};
pub use image::Image;
pub use key::{Key, NewKey};
pub use region::Region;
pub use size::Size;
