//! Derived signals and playback for radar and rain gauge animations.
//!
//! Hourly rainfall totals are computed over a trailing window and normalized
//! across a run; the [`animation::FrameSequencer`] then pulls one frame
//! artifact per scheduled timestamp from a radar or rainfall animator.

pub mod aggregate;
pub mod animation;
pub mod projection;
pub mod radar_animator;
pub mod rainfall_animator;
