//! Frame variants: the named alternative looks of the eyewear model.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A named frame style. Exactly one variant is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameVariant {
    /// Procedural dark gray frame
    Classic,
    /// Procedural black frame
    Modern,
    /// Procedural saddle-brown frame
    Vintage,
    /// Asset-backed look loaded from the configured glTF model
    Realistic,
}

impl Default for FrameVariant {
    fn default() -> Self {
        Self::Classic
    }
}

impl FrameVariant {
    /// Whether activating this variant requires an external asset load
    pub fn requires_asset(&self) -> bool {
        matches!(self, Self::Realistic)
    }

    /// Frame color for the procedural geometry. For the asset-backed
    /// variant this is the color its fallback frame uses.
    pub fn frame_color(&self) -> [f32; 3] {
        match self {
            Self::Classic => [0.2, 0.2, 0.2],
            Self::Modern => [0.0, 0.0, 0.0],
            Self::Vintage => [0.545, 0.271, 0.075],
            // Fallback for the asset variant degrades to the classic look
            Self::Realistic => [0.2, 0.2, 0.2],
        }
    }
}

impl std::fmt::Display for FrameVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Classic => write!(f, "classic"),
            Self::Modern => write!(f, "modern"),
            Self::Vintage => write!(f, "vintage"),
            Self::Realistic => write!(f, "realistic"),
        }
    }
}

impl FromStr for FrameVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "modern" => Ok(Self::Modern),
            "vintage" => Ok(Self::Vintage),
            "realistic" => Ok(Self::Realistic),
            other => Err(format!("unknown frame variant: {other}")),
        }
    }
}
