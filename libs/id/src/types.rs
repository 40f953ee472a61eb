//! Typed ID definitions for provider resources.

use crate::define_id;

// =============================================================================
// Compute
// =============================================================================

define_id!(DropletId, "droplet");
define_id!(ImageId, "image");

// =============================================================================
// Asynchronous Operations
// =============================================================================

define_id!(ActionId, "action");

// =============================================================================
// Account
// =============================================================================

define_id!(KeyId, "key");

// =============================================================================
// Tests
// =============================================================================
