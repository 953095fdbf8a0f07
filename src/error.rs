//! Error types shared across the crate.

use thiserror::Error;

/// Everything that can go wrong while capturing or reading audio.
///
/// All variants are recoverable: the caller decides whether to retry.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("audio device not ready")]
    NotReady,

    #[error("capture already running")]
    AlreadyRunning,

    #[error("capture not running")]
    NotRunning,

    #[error("audio device error: {0}")]
    Device(String),

    #[error("audio stream error: {0}")]
    Stream(String),
}

pub type Result<T> = std::result::Result<T, CaptureError>;
