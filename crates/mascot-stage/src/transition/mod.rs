//! Eased transitions
//!
//! Provides the mirror-scale flip played when the mascot turns around.

mod easing;
mod flip;

pub use easing::ease_in_out_quad;
pub use flip::Flip;
