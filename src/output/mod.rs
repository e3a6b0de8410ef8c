//! Output module
//!
//! Bridges from the try-on core to the external rendering engine.

pub mod wire;

pub use wire::WireScene;
