//! Layer composition: turns one merged snapshot plus the toggle set and
//! the animation clock into the ordered, back-to-front layer stack the
//! mapping library draws.

pub mod compositor;
pub mod layers;

pub use compositor::*;
pub use layers::*;
