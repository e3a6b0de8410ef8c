//! Scene-graph interface to the external rendering engine.
//!
//! The core never talks to the renderer directly; it issues the four
//! mutations below through this trait. Production uses the wire bridge in
//! [`crate::output::wire`]; tests use [`MockScene`].

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::eyewear::Template;

/// Handle to an inserted eyewear subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// The scene-graph mutations the try-on core needs from a renderer.
pub trait Scene {
    /// Insert a subtree built from `template`, initially hidden, at the
    /// template's initial scale. Returns a handle for later mutations.
    fn insert(&mut self, template: &Template) -> NodeId;

    /// Remove a previously inserted subtree
    fn remove(&mut self, id: NodeId);

    /// Set the subtree's local transform: translation, z-rotation, uniform
    /// scale
    fn set_transform(&mut self, id: NodeId, translation: Vec3, rotation_z: f32, scale: f32);

    /// Show or hide the subtree
    fn set_visible(&mut self, id: NodeId, visible: bool);
}

/// In-memory scene double that records every mutation, for tests.
#[derive(Debug, Default)]
pub struct MockScene {
    next_id: u64,
    nodes: HashMap<NodeId, MockNode>,
    removed: Vec<NodeId>,
    inserts: u64,
}

/// State of one mock subtree
#[derive(Debug, Clone)]
pub struct MockNode {
    pub template: Template,
    pub transform: Option<(Vec3, f32, f32)>,
    pub visible: bool,
}

impl MockScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently present subtrees
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of inserts ever issued
    pub fn insert_count(&self) -> u64 {
        self.inserts
    }

    pub fn node(&self, id: NodeId) -> Option<&MockNode> {
        self.nodes.get(&id)
    }

    /// The single live node, when exactly one exists
    pub fn sole_node(&self) -> Option<&MockNode> {
        if self.nodes.len() == 1 {
            self.nodes.values().next()
        } else {
            None
        }
    }

    pub fn removed(&self) -> &[NodeId] {
        &self.removed
    }
}

impl Scene for MockScene {
    fn insert(&mut self, template: &Template) -> NodeId {
        self.next_id += 1;
        self.inserts += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(
            id,
            MockNode {
                template: template.clone(),
                transform: None,
                visible: false,
            },
        );
        id
    }

    fn remove(&mut self, id: NodeId) {
        self.nodes.remove(&id);
        self.removed.push(id);
    }

    fn set_transform(&mut self, id: NodeId, translation: Vec3, rotation_z: f32, scale: f32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.transform = Some((translation, rotation_z, scale));
        }
    }

    fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.visible = visible;
        }
    }
}
