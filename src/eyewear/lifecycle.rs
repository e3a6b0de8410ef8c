//! Eyewear model lifecycle: swap-on-style-change, lazy load-and-cache,
//! and fallback to procedural geometry.
//!
//! At most one eyewear instance exists in the scene at any time. Asset
//! loads run on blocking tasks and report back through a channel drained
//! once per frame, so the render loop never waits on disk or parsing.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::geometry::{build_frame, Template};
use super::loader::AssetLoader;
use super::FrameVariant;
use crate::error::AssetError;
use crate::pose::Pose;
use crate::scene::{NodeId, Scene};

/// Lifecycle state for the currently requested variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No instance and nothing in flight
    Empty,
    /// Asset load in flight, nothing active yet
    Loading(FrameVariant),
    /// Variant active with its real representation
    Active(FrameVariant),
    /// Variant active with the procedural fallback after a failed load
    ActiveFallback(FrameVariant),
}

#[derive(Debug)]
struct ActiveInstance {
    variant: FrameVariant,
    node: NodeId,
    fallback: bool,
}

struct LoadOutcome {
    variant: FrameVariant,
    result: Result<Template, AssetError>,
}

/// Owns the active eyewear instance and the template cache.
pub struct EyewearManager<L: AssetLoader> {
    loader: Arc<L>,
    model_path: PathBuf,
    /// Variant -> canonical template; populated entries are only ever cloned
    cache: HashMap<FrameVariant, Template>,
    active: Option<ActiveInstance>,
    /// Most recently requested variant; load completions for anything else
    /// are stale and must not clobber a newer activation
    requested: Option<FrameVariant>,
    /// Variants with a load request in flight (dedupes repeat activations)
    in_flight: HashSet<FrameVariant>,
    outcome_tx: mpsc::UnboundedSender<LoadOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<LoadOutcome>,
}

impl<L: AssetLoader> EyewearManager<L> {
    pub fn new(loader: L, model_path: PathBuf) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            loader: Arc::new(loader),
            model_path,
            cache: HashMap::new(),
            active: None,
            requested: None,
            in_flight: HashSet::new(),
            outcome_tx,
            outcome_rx,
        }
    }

    /// Make `variant` the active style.
    ///
    /// Already-active variants are a no-op (a fallback-active variant is
    /// not "active" for this purpose: activating it again retries the
    /// asset load). Cached templates swap in immediately; uncached asset
    /// variants issue a single load request and leave the previous
    /// instance rendering until completion.
    pub fn activate(&mut self, scene: &mut impl Scene, variant: FrameVariant) {
        if let Some(active) = &self.active {
            if active.variant == variant && !active.fallback {
                self.requested = Some(variant);
                return;
            }
        }

        self.requested = Some(variant);

        if let Some(template) = self.cache.get(&variant).cloned() {
            self.swap_in(scene, variant, &template, false);
            return;
        }

        if !variant.requires_asset() {
            let template = build_frame(variant);
            self.cache.insert(variant, template.clone());
            self.swap_in(scene, variant, &template, false);
            return;
        }

        if self.in_flight.contains(&variant) {
            tracing::debug!("Load already in flight for {variant}, not re-requesting");
            return;
        }

        tracing::info!("Loading model for {variant} from {}", self.model_path.display());
        self.in_flight.insert(variant);

        let loader = Arc::clone(&self.loader);
        let path = self.model_path.clone();
        let tx = self.outcome_tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = loader.load(&path);
            let _ = tx.send(LoadOutcome { variant, result });
        });
    }

    /// Drain finished load requests and apply the ones that still match
    /// the requested variant. Returns true when the active instance was
    /// swapped. Call once per frame; never blocks.
    pub fn poll(&mut self, scene: &mut impl Scene) -> bool {
        let mut swapped = false;

        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.in_flight.remove(&outcome.variant);

            match outcome.result {
                Ok(template) => {
                    // Cache even a stale success: the template is valid and a
                    // later activation can reuse it without reloading
                    self.cache.insert(outcome.variant, template.clone());

                    if self.requested == Some(outcome.variant) {
                        tracing::info!("Model loaded for {}", outcome.variant);
                        self.swap_in(scene, outcome.variant, &template, false);
                        swapped = true;
                    } else {
                        tracing::debug!(
                            "Ignoring stale load completion for {}",
                            outcome.variant
                        );
                    }
                }
                Err(e) => {
                    if self.requested == Some(outcome.variant) {
                        tracing::warn!(
                            "Failed to load model for {}: {e}; using procedural fallback",
                            outcome.variant
                        );
                        let fallback = build_frame(outcome.variant);
                        self.swap_in(scene, outcome.variant, &fallback, true);
                        swapped = true;
                    } else {
                        tracing::debug!(
                            "Ignoring stale load failure for {}: {e}",
                            outcome.variant
                        );
                    }
                }
            }
        }

        swapped
    }

    /// Apply the per-frame pose to the active instance and make it
    /// visible. No-op without an active instance. Non-positive scale is
    /// rejected so the previous transform persists.
    pub fn apply_pose(&mut self, scene: &mut impl Scene, pose: &Pose) {
        let Some(active) = &self.active else {
            return;
        };

        if pose.scale <= 0.0 {
            tracing::debug!("Skipping zero-scale pose");
            return;
        }

        scene.set_transform(active.node, pose.translation, pose.rotation_z, pose.scale);
        scene.set_visible(active.node, true);
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        match &self.active {
            Some(a) if a.fallback => LifecycleState::ActiveFallback(a.variant),
            Some(a) => LifecycleState::Active(a.variant),
            None => match self.requested {
                Some(v) if self.in_flight.contains(&v) => LifecycleState::Loading(v),
                _ => LifecycleState::Empty,
            },
        }
    }

    /// Variant of the active instance, if any
    pub fn active_variant(&self) -> Option<FrameVariant> {
        self.active.as_ref().map(|a| a.variant)
    }

    /// Whether any load request is in flight
    pub fn has_in_flight(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Whether `variant` has a populated cache entry
    pub fn is_cached(&self, variant: FrameVariant) -> bool {
        self.cache.contains_key(&variant)
    }

    fn swap_in(
        &mut self,
        scene: &mut impl Scene,
        variant: FrameVariant,
        template: &Template,
        fallback: bool,
    ) {
        if let Some(previous) = self.active.take() {
            scene.remove(previous.node);
        }

        let node = scene.insert(template);
        self.active = Some(ActiveInstance {
            variant,
            node,
            fallback,
        });
    }
}
