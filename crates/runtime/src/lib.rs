//! Cooperative timing primitives: the per-frame animation clock and the
//! trailing-edge debounce timers.
//!
//! Both are pure and parameterized on caller-supplied time so they are
//! deterministic under test and free of latent background work.

pub mod clock;
pub mod debounce;

pub use clock::*;
pub use debounce::*;
