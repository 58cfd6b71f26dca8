//! Testing utilities
//!
//! ```rust
//! use std::time::Duration;
//!
//! use playlist_bridge_common::testing::MockClock;
//! use playlist_bridge_common::time::Clock;
//!
//! let clock = MockClock::new();
//! let start = clock.now();
//! clock.advance(Duration::from_secs(5));
//! assert_eq!((clock.now() - start).num_seconds(), 5);
//! ```

pub mod clock;

pub use clock::MockClock;
