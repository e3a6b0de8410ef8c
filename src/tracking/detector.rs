//! Face landmark detector intake
//!
//! Receives JSON-over-UDP packets from the detector helper process. Each
//! packet carries the full per-frame landmark array; this core only reads
//! the three anchor landmarks selected by [`LandmarkScheme`].

use serde::Deserialize;
use std::net::UdpSocket;

use crate::config::DetectorConfig;
use crate::error::{FaceframeError, TrackingError};
use crate::projection::Landmark;

/// A single JSON packet from the landmark detector
#[derive(Debug, Clone, Deserialize)]
pub struct LandmarkPacket {
    /// Whether a face was detected this frame
    pub face_detected: bool,
    /// Full landmark array: `[x, y, z]` with x/y as image fractions
    #[serde(default)]
    pub landmarks: Vec<[f32; 3]>,
}

/// Which indices of the detector's anatomical numbering hold the three
/// anchor landmarks. Detector-scheme configuration, not hardcoded magic:
/// defaults follow the MediaPipe FaceMesh numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandmarkScheme {
    pub left_eye: usize,
    pub right_eye: usize,
    pub nose_bridge: usize,
}

impl Default for LandmarkScheme {
    fn default() -> Self {
        Self {
            left_eye: 33,
            right_eye: 263,
            nose_bridge: 9,
        }
    }
}

impl From<&DetectorConfig> for LandmarkScheme {
    fn from(config: &DetectorConfig) -> Self {
        Self {
            left_eye: config.left_eye_index,
            right_eye: config.right_eye_index,
            nose_bridge: config.nose_bridge_index,
        }
    }
}

/// The three named anchor landmarks the pose estimator consumes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceAnchors {
    pub left_eye: Landmark,
    pub right_eye: Landmark,
    pub nose_bridge: Landmark,
}

impl LandmarkPacket {
    /// Pick the anchor landmarks out of the packet. Returns `None` when no
    /// face was detected or any required index is absent; the caller skips
    /// the pose update for that frame.
    pub fn anchors(&self, scheme: &LandmarkScheme) -> Option<FaceAnchors> {
        if !self.face_detected {
            return None;
        }

        Some(FaceAnchors {
            left_eye: (*self.landmarks.get(scheme.left_eye)?).into(),
            right_eye: (*self.landmarks.get(scheme.right_eye)?).into(),
            nose_bridge: (*self.landmarks.get(scheme.nose_bridge)?).into(),
        })
    }
}

/// Detector JSON-over-UDP receiver
pub struct DetectorReceiver {
    config: DetectorConfig,
    socket: Option<UdpSocket>,
}

impl DetectorReceiver {
    /// Create a new receiver (does not bind yet)
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            config: config.clone(),
            socket: None,
        }
    }

    /// Bind the UDP socket and start receiving
    pub fn start(&mut self) -> Result<(), FaceframeError> {
        let addr = format!("{}:{}", self.config.listen_address, self.config.port);

        let socket = UdpSocket::bind(&addr)
            .map_err(|e| TrackingError::Bind(format!("{addr}: {e}")))?;

        socket
            .set_nonblocking(true)
            .map_err(|e| TrackingError::Bind(format!("Failed to set non-blocking: {e}")))?;

        tracing::info!("Detector receiver listening on {addr}");
        self.socket = Some(socket);

        Ok(())
    }

    /// Read the next pending packet, if any (non-blocking)
    pub fn process(&self) -> Result<Option<LandmarkPacket>, FaceframeError> {
        let socket = match &self.socket {
            Some(s) => s,
            None => return Ok(None),
        };

        let mut buf = [0u8; 65536];

        match socket.recv(&mut buf) {
            Ok(size) if size > 0 => {
                let packet: LandmarkPacket = serde_json::from_slice(&buf[..size])
                    .map_err(|e| TrackingError::Parse(format!("JSON parse error: {e}")))?;
                Ok(Some(packet))
            }
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(TrackingError::Receive(e.to_string()).into()),
        }
    }

    /// Stop the receiver
    pub fn stop(&mut self) {
        self.socket = None;
        tracing::info!("Detector receiver stopped");
    }
}
