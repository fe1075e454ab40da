//! State reconciliation for the traffic stream.
//!
//! `StateMerger` folds heterogeneous, possibly-stale inbound messages
//! into one coherent, render-ready snapshot. Supporting pieces:
//! - `PinningCache`: write-once-per-key position store for identity
//!   stabilization
//! - `LayerSlot`: the toggle-scoped keep-or-drop policy shared by all
//!   optional overlay layers
//! - `DiagnosticLog`: bounded newest-first message ring

pub mod log;
pub mod merger;
pub mod pinning;
pub mod slot;
pub mod toggles;

pub use log::*;
pub use merger::*;
pub use pinning::*;
pub use slot::*;
pub use toggles::*;
