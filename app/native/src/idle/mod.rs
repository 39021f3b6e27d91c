//! Idle page state: clock strings and build information.

pub mod build_info;
pub mod clock;

pub use build_info::BuildInfo;
pub use clock::{ClockStrings, IdleClock};
