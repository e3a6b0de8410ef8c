//! Error types for FaceFrame

use thiserror::Error;

/// Main error type for FaceFrame
#[derive(Error, Debug)]
pub enum FaceframeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Tracking error: {0}")]
    Tracking(#[from] TrackingError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

/// Frame model asset errors
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Failed to open model file: {0}")]
    Open(String),

    #[error("Failed to parse model: {0}")]
    Parse(String),

    #[error("Model contains no mesh geometry: {0}")]
    EmptyModel(String),

    #[error("Load task aborted: {0}")]
    TaskFailed(String),
}

/// Landmark detector intake errors
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Failed to bind detector socket: {0}")]
    Bind(String),

    #[error("Detector receive error: {0}")]
    Receive(String),

    #[error("Landmark packet parse error: {0}")]
    Parse(String),
}

/// Renderer scene bridge errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// Failing to reach the renderer at startup is fatal: without a scene
    /// there is nothing to pose.
    #[error("Renderer bridge initialization failed: {0}")]
    Init(String),

    #[error("Failed to send scene mutation: {0}")]
    Send(String),
}

/// Result type alias for FaceFrame operations
pub type Result<T> = std::result::Result<T, FaceframeError>;
