//! Scene bridge to the external renderer process.
//!
//! Serializes scene-graph mutations as JSON datagrams. The renderer owns
//! the actual scene graph, camera, and draw calls; this side only tells it
//! what changed. Transform/visibility sends that fail are logged and
//! dropped (the next frame resends them anyway); inserts carry mesh data
//! that can exceed a single datagram, so oversized templates are streamed
//! in bounded chunks the renderer reassembles. Only failing to set up the
//! socket at startup is fatal.

use glam::Vec3;
use serde::Serialize;
use std::net::UdpSocket;

use crate::error::SceneError;
use crate::eyewear::Template;
use crate::scene::{NodeId, Scene};

/// Largest single op we put on the wire, safely under the 65 507-byte
/// UDP payload limit.
const MAX_DATAGRAM: usize = 60 * 1024;

/// Template JSON bytes carried per chunk when an insert is oversized.
const CHUNK_BYTES: usize = 32 * 1024;

/// One scene mutation on the wire
#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum SceneOp<'a> {
    Insert {
        id: NodeId,
        template: &'a Template,
    },
    /// One bounded piece of an oversized insert; `data` fields concatenate
    /// in `seq` order to the template JSON
    InsertChunk {
        id: NodeId,
        seq: u32,
        total: u32,
        data: &'a str,
    },
    Remove {
        id: NodeId,
    },
    SetTransform {
        id: NodeId,
        translation: [f32; 3],
        rotation_z: f32,
        scale: f32,
    },
    SetVisible {
        id: NodeId,
        visible: bool,
    },
}

/// [`Scene`] implementation that forwards mutations to the renderer over UDP.
pub struct WireScene {
    socket: UdpSocket,
    next_id: u64,
}

impl WireScene {
    /// Bind an outbound socket aimed at the renderer address.
    pub fn new(renderer_addr: &str) -> Result<Self, SceneError> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| SceneError::Init(format!("Failed to bind outbound socket: {e}")))?;
        socket
            .connect(renderer_addr)
            .map_err(|e| SceneError::Init(format!("{renderer_addr}: {e}")))?;

        tracing::info!("Renderer bridge sending to {renderer_addr}");
        Ok(Self { socket, next_id: 0 })
    }

    /// Serialize and send one op
    fn send(&self, op: &SceneOp<'_>) -> Result<(), SceneError> {
        let payload = serde_json::to_vec(op)
            .map_err(|e| SceneError::Send(format!("encode: {e}")))?;
        self.socket
            .send(&payload)
            .map_err(|e| SceneError::Send(e.to_string()))?;
        Ok(())
    }

    /// Send an op whose loss the next frame repairs; failure only warns
    fn send_lossy(&self, op: &SceneOp<'_>) {
        if let Err(e) = self.send(op) {
            tracing::warn!("{e}");
        }
    }

    /// Stream a template too large for one datagram as a chunk sequence
    /// the renderer reassembles by node id.
    fn send_chunked(&self, id: NodeId, template: &Template) {
        let body = match serde_json::to_string(template) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!("Failed to encode template: {e}");
                return;
            }
        };

        let chunks = split_chunks(&body, CHUNK_BYTES);
        let total = chunks.len() as u32;
        tracing::debug!("Streaming oversized insert in {total} chunks");

        for (seq, data) in chunks.into_iter().enumerate() {
            self.send_lossy(&SceneOp::InsertChunk {
                id,
                seq: seq as u32,
                total,
                data,
            });
        }
    }
}

/// Split a string into pieces of at most `max` bytes on char boundaries.
fn split_chunks(mut s: &str, max: usize) -> Vec<&str> {
    let mut out = Vec::new();
    while s.len() > max {
        let mut cut = max;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        let (head, tail) = s.split_at(cut);
        out.push(head);
        s = tail;
    }
    out.push(s);
    out
}

impl Scene for WireScene {
    fn insert(&mut self, template: &Template) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);

        match serde_json::to_vec(&SceneOp::Insert { id, template }) {
            Ok(payload) if payload.len() > MAX_DATAGRAM => {
                // Mesh-bearing templates do not fit one datagram; a dropped
                // insert is never resent, so stream it instead
                self.send_chunked(id, template);
            }
            Ok(payload) => {
                if let Err(e) = self.socket.send(&payload) {
                    tracing::warn!("{}", SceneError::Send(e.to_string()));
                }
            }
            Err(e) => tracing::warn!("Failed to encode scene op: {e}"),
        }

        id
    }

    fn remove(&mut self, id: NodeId) {
        self.send_lossy(&SceneOp::Remove { id });
    }

    fn set_transform(&mut self, id: NodeId, translation: Vec3, rotation_z: f32, scale: f32) {
        self.send_lossy(&SceneOp::SetTransform {
            id,
            translation: translation.to_array(),
            rotation_z,
            scale,
        });
    }

    fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.send_lossy(&SceneOp::SetVisible { id, visible });
    }
}
