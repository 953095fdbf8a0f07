//! Configuration reading and data directory paths.

pub mod paths;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use paths::get_data_dir;

/// capture_config.json shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Input device name; `None` uses the system default input.
    pub device: Option<String>,
    /// Trailing window length the buffer retains, in milliseconds.
    pub window_ms: u32,
    /// Meter poll interval for the demo binary, in milliseconds.
    pub step_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device: None,
            window_ms: 10_000,
            step_ms: 100,
        }
    }
}

/// Read capture_config.json from the data directory. Missing or malformed
/// files fall back to defaults.
pub fn read_capture_config() -> CaptureConfig {
    read_json_file(&get_config_path()).unwrap_or_default()
}

/// Path to capture_config.json.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("capture_config.json")
}

/// Generic helper: read a JSON file and deserialize it.
fn read_json_file<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Option<T> {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(val) => Some(val),
            Err(e) => {
                warn!("Failed to parse {}: {}", path.display(), e);
                None
            }
        },
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to read {}: {}", path.display(), e);
            }
            None
        }
    }
}
