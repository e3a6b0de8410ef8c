//! Eyewear templates and the procedural fallback geometry.
//!
//! A [`Template`] is the cached, canonical representation of a variant.
//! Activation always clones it into the scene; templates themselves are
//! never mutated once built, so a cached template can outlive any number
//! of active instances.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use super::FrameVariant;

/// Overall frame width in template units
pub const FRAME_WIDTH: f32 = 0.25;
/// Rim height in template units
pub const FRAME_HEIGHT: f32 = 0.15;
/// Gap between the two rims
pub const BRIDGE_WIDTH: f32 = 0.05;

/// Nominal base scale applied to asset-backed templates when first inserted
/// (overridden by the tracked pose from the first detected frame onward).
pub const ASSET_BASE_SCALE: f32 = 0.15;

/// Surface appearance of a template node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: [f32; 3],
    pub opacity: f32,
}

impl Material {
    fn opaque(color: [f32; 3]) -> Self {
        Self {
            color,
            opacity: 1.0,
        }
    }
}

/// Shape of a single template node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeGeometry {
    /// Ring with the given major and tube radii
    Torus { radius: f32, tube_radius: f32 },
    /// Upright cylinder (rotated via the node's `rotation_z`)
    Cylinder { radius: f32, height: f32 },
    /// Flat disc
    Circle { radius: f32 },
    /// Triangle mesh extracted from a loaded asset
    Mesh {
        positions: Vec<[f32; 3]>,
        indices: Vec<u32>,
    },
}

/// One node of an eyewear subtree, positioned relative to the subtree origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateNode {
    pub name: String,
    pub translation: Vec3,
    pub rotation_z: f32,
    pub geometry: NodeGeometry,
    pub material: Material,
}

/// Canonical representation of a variant, cloned into the scene on each
/// activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub nodes: Vec<TemplateNode>,
    /// Uniform scale applied when the subtree is first inserted, before any
    /// tracked pose has been applied
    pub initial_scale: f32,
}

/// Build the procedural frame geometry for a variant: two torus rims, a
/// cylinder bridge, and two translucent lenses. Deterministic; the variant
/// affects only the frame color. This is what the system degrades to when
/// the richer asset is unavailable.
pub fn build_frame(variant: FrameVariant) -> Template {
    let frame = Material::opaque(variant.frame_color());
    let lens = Material {
        // Sky blue tint
        color: [0.529, 0.808, 0.922],
        opacity: 0.15,
    };

    let rim_offset = FRAME_WIDTH / 2.0 + BRIDGE_WIDTH / 2.0;
    let rim = NodeGeometry::Torus {
        radius: FRAME_HEIGHT * 0.5,
        tube_radius: 0.01,
    };
    let lens_disc = NodeGeometry::Circle {
        radius: FRAME_HEIGHT * 0.4,
    };

    Template {
        nodes: vec![
            TemplateNode {
                name: "left_rim".to_string(),
                translation: Vec3::new(-rim_offset, 0.0, 0.0),
                rotation_z: 0.0,
                geometry: rim.clone(),
                material: frame,
            },
            TemplateNode {
                name: "right_rim".to_string(),
                translation: Vec3::new(rim_offset, 0.0, 0.0),
                rotation_z: 0.0,
                geometry: rim,
                material: frame,
            },
            TemplateNode {
                name: "bridge".to_string(),
                translation: Vec3::ZERO,
                rotation_z: FRAC_PI_2,
                geometry: NodeGeometry::Cylinder {
                    radius: 0.005,
                    height: BRIDGE_WIDTH,
                },
                material: frame,
            },
            TemplateNode {
                name: "left_lens".to_string(),
                translation: Vec3::new(-rim_offset, 0.0, 0.01),
                rotation_z: 0.0,
                geometry: lens_disc.clone(),
                material: lens,
            },
            TemplateNode {
                name: "right_lens".to_string(),
                translation: Vec3::new(rim_offset, 0.0, 0.01),
                rotation_z: 0.0,
                geometry: lens_disc,
                material: lens,
            },
        ],
        initial_scale: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_composite_layout() {
        let t = build_frame(FrameVariant::Classic);
        let names: Vec<&str> = t.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(
            names,
            ["left_rim", "right_rim", "bridge", "left_lens", "right_lens"]
        );

        // Rims are mirrored about the bridge
        assert_eq!(t.nodes[0].translation.x, -t.nodes[1].translation.x);
        assert_eq!(t.nodes[2].translation, Vec3::ZERO);

        // Lenses sit slightly in front of the rims
        assert!(t.nodes[3].translation.z > 0.0);
    }

    #[test]
    fn test_variant_affects_only_color() {
        let classic = build_frame(FrameVariant::Classic);
        let vintage = build_frame(FrameVariant::Vintage);

        assert_eq!(classic.nodes.len(), vintage.nodes.len());
        for (a, b) in classic.nodes.iter().zip(&vintage.nodes) {
            assert_eq!(a.geometry, b.geometry);
            assert_eq!(a.translation, b.translation);
            assert_eq!(a.rotation_z, b.rotation_z);
        }
        assert_ne!(classic.nodes[0].material.color, vintage.nodes[0].material.color);
        // Lens tint is shared
        assert_eq!(classic.nodes[3].material, vintage.nodes[3].material);
    }

    #[test]
    fn test_build_is_deterministic() {
        assert_eq!(
            build_frame(FrameVariant::Modern),
            build_frame(FrameVariant::Modern)
        );
    }
}
