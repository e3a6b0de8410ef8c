//! Per-frame try-on pipeline.
//!
//! Glues the three core pieces together once per detector frame: anchor
//! extraction, world-space normalization, pose estimation, and applying
//! the result to the active eyewear instance. Also owns the viewport and
//! the user-tunable fit settings.

use crate::config::FitSettings;
use crate::eyewear::{AssetLoader, EyewearManager, FrameVariant};
use crate::pose::{self, FitModifiers, Pose};
use crate::projection::{self, Viewport};
use crate::scene::Scene;
use crate::tracking::{LandmarkPacket, LandmarkScheme};

/// A try-on session: one scene, one active eyewear instance, one face.
pub struct TryOnSession<S: Scene, L: AssetLoader> {
    scene: S,
    manager: EyewearManager<L>,
    viewport: Viewport,
    fit: FitSettings,
    scheme: LandmarkScheme,
    /// Last applied pose; re-applied when the active instance is swapped
    /// so a freshly loaded model appears where the previous one was
    last_pose: Option<Pose>,
}

impl<S: Scene, L: AssetLoader> TryOnSession<S, L> {
    /// Create a session and activate the configured initial variant.
    pub fn new(
        scene: S,
        manager: EyewearManager<L>,
        viewport: Viewport,
        fit: FitSettings,
        scheme: LandmarkScheme,
    ) -> Self {
        let mut session = Self {
            scene,
            manager,
            viewport,
            fit,
            scheme,
            last_pose: None,
        };
        let variant = session.fit.variant;
        session.manager.activate(&mut session.scene, variant);
        session
    }

    /// Process one detector frame.
    ///
    /// Returns the applied pose, or `None` when the update was skipped:
    /// no face, missing anchor landmarks, or a degenerate zero eye
    /// distance. Skipped frames leave the previous pose untouched so the
    /// overlay does not flicker on transient detection loss.
    pub fn on_frame(&mut self, packet: &LandmarkPacket) -> Option<Pose> {
        self.tick();

        let anchors = packet.anchors(&self.scheme)?;

        let left_eye = projection::normalize(anchors.left_eye, self.viewport);
        let right_eye = projection::normalize(anchors.right_eye, self.viewport);
        let nose_bridge = projection::normalize(anchors.nose_bridge, self.viewport);

        let pose = pose::estimate(left_eye, right_eye, nose_bridge, &self.modifiers());
        if pose.scale <= 0.0 {
            tracing::debug!("Degenerate eye distance, keeping previous pose");
            return None;
        }

        self.manager.apply_pose(&mut self.scene, &pose);
        self.last_pose = Some(pose);
        Some(pose)
    }

    /// Drain asset load completions. Call every animation tick, including
    /// ticks without a detector packet, so finished loads swap in promptly.
    pub fn tick(&mut self) {
        if self.manager.poll(&mut self.scene) {
            self.reapply_last_pose();
        }
    }

    /// Switch the active frame style.
    pub fn set_variant(&mut self, variant: FrameVariant) {
        self.fit.variant = variant;
        self.manager.activate(&mut self.scene, variant);
        // Immediate swaps (cached or procedural) inherit the last pose;
        // async loads get it from tick() on completion
        self.reapply_last_pose();
    }

    /// Set the uniform size multiplier. Non-positive values are ignored.
    pub fn set_scale(&mut self, scale: f32) {
        if scale <= 0.0 || !scale.is_finite() {
            tracing::warn!("Ignoring invalid scale: {scale}");
            return;
        }
        self.fit.scale = scale;
    }

    /// Set the width multiplier. Non-positive values are ignored.
    pub fn set_width(&mut self, width: f32) {
        if width <= 0.0 || !width.is_finite() {
            tracing::warn!("Ignoring invalid width: {width}");
            return;
        }
        self.fit.width = width;
    }

    /// Set the vertical nudge, in detector-normalized units.
    pub fn set_height_offset(&mut self, offset: f32) {
        if !offset.is_finite() {
            tracing::warn!("Ignoring non-finite height offset: {offset}");
            return;
        }
        self.fit.height_offset = offset;
    }

    /// Handle a viewport resize. Idempotent; does not disturb the last
    /// applied pose (subsequent frames are normalized against the new
    /// aspect ratio).
    pub fn resize(&mut self, width: u32, height: u32) {
        match Viewport::new(width, height) {
            Some(viewport) => self.viewport = viewport,
            None => tracing::warn!("Ignoring resize to {width}x{height}"),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn fit(&self) -> &FitSettings {
        &self.fit
    }

    pub fn last_pose(&self) -> Option<Pose> {
        self.last_pose
    }

    pub fn manager(&self) -> &EyewearManager<L> {
        &self.manager
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    fn modifiers(&self) -> FitModifiers {
        FitModifiers {
            scale: self.fit.scale,
            width: self.fit.width,
            height_offset: self.fit.height_offset,
        }
    }

    fn reapply_last_pose(&mut self) {
        if let Some(pose) = self.last_pose {
            self.manager.apply_pose(&mut self.scene, &pose);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssetError;
    use crate::eyewear::Template;
    use crate::scene::MockScene;
    use std::path::{Path, PathBuf};

    struct StubLoader;

    impl AssetLoader for StubLoader {
        fn load(&self, path: &Path) -> Result<Template, AssetError> {
            Err(AssetError::Open(path.display().to_string()))
        }
    }

    fn session() -> TryOnSession<MockScene, StubLoader> {
        TryOnSession::new(
            MockScene::new(),
            EyewearManager::new(StubLoader, PathBuf::from("frames.gltf")),
            Viewport::new(640, 480).unwrap(),
            FitSettings::default(),
            LandmarkScheme::default(),
        )
    }

    fn packet_with_eyes(left: [f32; 3], right: [f32; 3]) -> LandmarkPacket {
        let mut landmarks = vec![[0.5f32, 0.5, 0.0]; 478];
        landmarks[33] = left;
        landmarks[263] = right;
        landmarks[9] = [0.5, 0.45, 0.0];
        LandmarkPacket {
            face_detected: true,
            landmarks,
        }
    }

    #[tokio::test]
    async fn test_frame_applies_pose_and_shows_instance() {
        let mut s = session();
        let pose = s
            .on_frame(&packet_with_eyes([0.4, 0.5, 0.0], [0.6, 0.5, 0.0]))
            .unwrap();

        assert!(pose.scale > 0.0);
        let node = s.scene().sole_node().unwrap();
        assert!(node.visible);
        assert_eq!(
            node.transform,
            Some((pose.translation, pose.rotation_z, pose.scale))
        );
    }

    #[tokio::test]
    async fn test_no_face_retains_previous_pose() {
        let mut s = session();
        let pose = s
            .on_frame(&packet_with_eyes([0.4, 0.5, 0.0], [0.6, 0.5, 0.0]))
            .unwrap();

        let lost = LandmarkPacket {
            face_detected: false,
            landmarks: Vec::new(),
        };
        assert!(s.on_frame(&lost).is_none());

        // Instance keeps its last transform and stays visible (no flicker)
        let node = s.scene().sole_node().unwrap();
        assert!(node.visible);
        assert_eq!(
            node.transform,
            Some((pose.translation, pose.rotation_z, pose.scale))
        );
        assert_eq!(s.last_pose(), Some(pose));
    }

    #[tokio::test]
    async fn test_missing_anchor_landmarks_skip_update() {
        let mut s = session();
        s.on_frame(&packet_with_eyes([0.4, 0.5, 0.0], [0.6, 0.5, 0.0]))
            .unwrap();
        let before = s.scene().sole_node().unwrap().transform;

        // Truncated landmark array: anchors out of range
        let truncated = LandmarkPacket {
            face_detected: true,
            landmarks: vec![[0.5, 0.5, 0.0]; 10],
        };
        assert!(s.on_frame(&truncated).is_none());
        assert_eq!(s.scene().sole_node().unwrap().transform, before);
    }

    #[tokio::test]
    async fn test_zero_eye_distance_skips_update() {
        let mut s = session();
        s.on_frame(&packet_with_eyes([0.4, 0.5, 0.0], [0.6, 0.5, 0.0]))
            .unwrap();
        let before = s.scene().sole_node().unwrap().transform;

        // Both eyes at the same point normalize to zero distance
        assert!(s
            .on_frame(&packet_with_eyes([0.5, 0.5, 0.0], [0.5, 0.5, 0.0]))
            .is_none());
        assert_eq!(s.scene().sole_node().unwrap().transform, before);
    }

    #[tokio::test]
    async fn test_variant_switch_inherits_last_pose() {
        let mut s = session();
        let pose = s
            .on_frame(&packet_with_eyes([0.4, 0.5, 0.0], [0.6, 0.5, 0.0]))
            .unwrap();

        s.set_variant(FrameVariant::Vintage);

        let node = s.scene().sole_node().unwrap();
        assert_eq!(
            node.transform,
            Some((pose.translation, pose.rotation_z, pose.scale))
        );
        assert!(node.visible);
    }

    #[tokio::test]
    async fn test_resize_is_idempotent_and_keeps_pose() {
        let mut s = session();
        s.on_frame(&packet_with_eyes([0.4, 0.5, 0.0], [0.6, 0.5, 0.0]))
            .unwrap();
        let before = s.scene().sole_node().unwrap().transform;

        s.resize(1280, 720);
        s.resize(1280, 720);
        assert_eq!(s.viewport(), Viewport::new(1280, 720).unwrap());
        assert_eq!(s.scene().sole_node().unwrap().transform, before);

        // Invalid dimensions are ignored
        s.resize(0, 720);
        assert_eq!(s.viewport(), Viewport::new(1280, 720).unwrap());
    }

    #[tokio::test]
    async fn test_invalid_fit_values_are_ignored() {
        let mut s = session();
        s.set_scale(-2.0);
        s.set_width(0.0);
        s.set_height_offset(f32::NAN);

        assert_eq!(s.fit().scale, 1.0);
        assert_eq!(s.fit().width, 1.0);
        assert_eq!(s.fit().height_offset, 0.0);

        s.set_scale(1.5);
        s.set_height_offset(-4.0);
        assert_eq!(s.fit().scale, 1.5);
        assert_eq!(s.fit().height_offset, -4.0);
    }
}
