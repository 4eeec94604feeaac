//! cf-channel: open-channel geometry and Saint-Venant discretization.
//!
//! Provides:
//! - trapezoidal cross-section geometry with dry-channel guards
//! - `Reach`: a channel segment discretized into computational points,
//!   producing linearized continuity/momentum equations per point pair
//!   (Preissmann 4-point implicit scheme)

pub mod error;
pub mod reach;
pub mod section;

// Re-exports
pub use error::{ChannelError, ChannelResult};
pub use reach::{Reach, SegmentEquations};
pub use section::TrapezoidSection;
