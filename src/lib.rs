//! FaceFrame - Virtual Eyewear Try-On Core
//!
//! Overlays a virtual glasses model on a tracked face by:
//! - Converting detector-space landmarks to renderer world space
//! - Deriving a rigid transform (translation, tilt, uniform scale) from the
//!   eye corners each frame
//! - Managing the frame model lifecycle: style swaps, lazy load-and-cache
//!   of the glTF variant, and procedural fallback when a load fails
//!
//! The renderer, landmark detector, and video pipeline are external
//! processes reached over narrow interfaces (`Scene` trait, JSON-over-UDP
//! landmark packets).

pub mod config;
pub mod error;
pub mod eyewear;
pub mod output;
pub mod pose;
pub mod projection;
pub mod scene;
pub mod session;
pub mod tracking;

pub use config::Config;
pub use error::{FaceframeError, Result};
pub use session::TryOnSession;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
