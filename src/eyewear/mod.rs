//! Eyewear model management module
//!
//! Frame variants, procedural geometry, asset loading, and the
//! active-instance lifecycle.

pub mod geometry;
pub mod lifecycle;
pub mod loader;
pub mod variant;

pub use geometry::{build_frame, Material, NodeGeometry, Template, TemplateNode};
pub use lifecycle::{EyewearManager, LifecycleState};
pub use loader::{AssetLoader, GltfLoader};
pub use variant::FrameVariant;
