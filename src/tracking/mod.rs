//! Tracking module
//!
//! Landmark intake from the external face detector (JSON over UDP).

pub mod detector;

pub use detector::{DetectorReceiver, FaceAnchors, LandmarkPacket, LandmarkScheme};
