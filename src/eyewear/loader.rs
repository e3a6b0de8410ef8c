//! glTF model loading for the asset-backed frame variant.
//!
//! Extracts mesh geometry with the `gltf` crate, flattens node transforms,
//! and re-centers the model at its own bounding-box center so the pose
//! translation lands on the eye midpoint rather than wherever the artist
//! left the origin.

use glam::{Mat4, Vec3, Vec4};
use std::path::Path;

use super::geometry::{Material, NodeGeometry, Template, TemplateNode, ASSET_BASE_SCALE};
use crate::error::AssetError;

/// Source of asset-backed templates. Loads are blocking; the lifecycle
/// manager runs them on a blocking task so the frame loop never waits.
pub trait AssetLoader: Send + Sync + 'static {
    fn load(&self, path: &Path) -> Result<Template, AssetError>;
}

/// Loads eyewear models from glTF files on disk.
#[derive(Debug, Default)]
pub struct GltfLoader;

impl GltfLoader {
    pub fn new() -> Self {
        Self
    }
}

impl AssetLoader for GltfLoader {
    fn load(&self, path: &Path) -> Result<Template, AssetError> {
        let (document, buffers, _images) = gltf::import(path).map_err(|e| match e {
            gltf::Error::Io(source) => AssetError::Open(format!("{}: {}", path.display(), source)),
            other => AssetError::Parse(format!("{}: {}", path.display(), other)),
        })?;

        let mut nodes = Vec::new();
        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or_else(|| AssetError::EmptyModel(path.display().to_string()))?;

        for node in scene.nodes() {
            collect_meshes(&node, Mat4::IDENTITY, &buffers, &mut nodes);
        }

        if nodes.is_empty() || nodes.iter().all(|n| mesh_len(n) == 0) {
            return Err(AssetError::EmptyModel(path.display().to_string()));
        }

        recenter(&mut nodes);

        Ok(Template {
            nodes,
            initial_scale: ASSET_BASE_SCALE,
        })
    }
}

fn mesh_len(node: &TemplateNode) -> usize {
    match &node.geometry {
        NodeGeometry::Mesh { positions, .. } => positions.len(),
        _ => 0,
    }
}

/// Walk the node hierarchy, baking each node's world transform into its
/// vertex positions so the template is a flat list of origin-relative meshes.
fn collect_meshes(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<TemplateNode>,
) {
    let local = Mat4::from_cols_array_2d(&node.transform().matrix());
    let world = parent * local;

    if let Some(mesh) = node.mesh() {
        for (prim_idx, primitive) in mesh.primitives().enumerate() {
            let reader = primitive.reader(|buffer| {
                buffers.get(buffer.index()).map(|data| data.0.as_slice())
            });

            let positions: Vec<[f32; 3]> = match reader.read_positions() {
                Some(iter) => iter
                    .map(|p| {
                        let v = world * Vec4::new(p[0], p[1], p[2], 1.0);
                        [v.x, v.y, v.z]
                    })
                    .collect(),
                None => continue,
            };

            let indices: Vec<u32> = match reader.read_indices() {
                Some(idx) => idx.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };

            let base_color = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor();

            out.push(TemplateNode {
                name: format!(
                    "{}_{}",
                    mesh.name().unwrap_or("mesh"),
                    prim_idx
                ),
                translation: Vec3::ZERO,
                rotation_z: 0.0,
                geometry: NodeGeometry::Mesh { positions, indices },
                material: Material {
                    color: [base_color[0], base_color[1], base_color[2]],
                    opacity: base_color[3],
                },
            });
        }
    }

    for child in node.children() {
        collect_meshes(&child, world, buffers, out);
    }
}

/// Shift all vertex positions so the model's bounding-box center sits at
/// the template origin.
fn recenter(nodes: &mut [TemplateNode]) {
    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);

    for node in nodes.iter() {
        if let NodeGeometry::Mesh { positions, .. } = &node.geometry {
            for p in positions {
                let v = Vec3::from(*p);
                min = min.min(v);
                max = max.max(v);
            }
        }
    }

    if !min.is_finite() || !max.is_finite() {
        return;
    }

    let center = (min + max) / 2.0;
    for node in nodes.iter_mut() {
        if let NodeGeometry::Mesh { positions, .. } = &mut node.geometry {
            for p in positions.iter_mut() {
                let v = Vec3::from(*p) - center;
                *p = [v.x, v.y, v.z];
            }
        }
    }
}
