//! Time abstraction
//!
//! Token expiry and rate-limit waits read time through [`Clock`] so tests
//! can drive them with a mock instead of sleeping.

mod clock;

pub use clock::{Clock, SystemClock};
