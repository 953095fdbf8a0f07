//! Capture Core — live audio with a sliding sample window.
//!
//! Captures audio from the system input via cpal and keeps the most recent
//! N milliseconds of interleaved f32 samples in a thread-safe window buffer,
//! for a downstream (e.g. speech) pipeline to read on demand.

pub mod audio;
pub mod config;
pub mod error;

pub use audio::{list_devices, AudioWindow, CaptureStream};
pub use config::CaptureConfig;
pub use error::{CaptureError, Result};
