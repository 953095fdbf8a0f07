//! Audio capture and the sliding-window sample buffer.

pub mod capture;
pub mod window;

pub use capture::{list_devices, CaptureStream};
pub use window::AudioWindow;
