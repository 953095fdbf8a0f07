//! Audio capture via cpal.
//!
//! Opens the default (or named) input device at its native format and feeds
//! every delivered chunk of interleaved f32 samples into a shared
//! [`AudioWindow`]. The rate and channel count negotiated with the device
//! are authoritative: the window is sized from them, and nothing is
//! resampled or remixed here.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};
use tracing::{error, info, trace};

use super::window::AudioWindow;
use crate::error::{CaptureError, Result};

/// List available input device names.
pub fn list_devices() -> Vec<String> {
    let host = cpal::default_host();
    let mut names = Vec::new();
    if let Ok(devices) = host.input_devices() {
        for dev in devices {
            if let Ok(name) = dev.name() {
                names.push(name);
            }
        }
    }
    names
}

/// Resolved info about the audio input we will use.
struct ResolvedDevice {
    device: cpal::Device,
    stream_config: StreamConfig,
    sample_rate: u32,
    channels: u16,
}

/// Find and configure the input device.
fn resolve_device(device_name: Option<&str>) -> Result<ResolvedDevice> {
    let host = cpal::default_host();

    let device = if let Some(name) = device_name {
        host.input_devices()
            .map_err(|e| {
                CaptureError::Device(format!("failed to enumerate input devices: {e}"))
            })?
            .find(|d| d.name().map(|n| n == name).unwrap_or(false))
            .ok_or_else(|| CaptureError::Device(format!("input device not found: {name}")))?
    } else {
        host.default_input_device().ok_or(CaptureError::NotReady)?
    };

    let dev_name = device.name().unwrap_or_else(|_| "unknown".into());
    info!(device = %dev_name, "selected input device");

    let default_config = device
        .default_input_config()
        .map_err(|e| CaptureError::Device(format!("failed to get default input config: {e}")))?;

    let sample_rate = default_config.sample_rate().0;
    let channels = default_config.channels();

    // f32 at the device's native rate; the window is sized from this below.
    let stream_config = StreamConfig {
        channels,
        sample_rate: cpal::SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    info!(sample_rate, channels, "negotiated capture format");

    Ok(ResolvedDevice {
        device,
        stream_config,
        sample_rate,
        channels,
    })
}

/// A live capture session: the cpal stream plus the window it feeds.
///
/// The stream delivers samples for as long as this struct is alive;
/// dropping it tears the stream down. The window handle obtained from
/// [`window`](CaptureStream::window) stays valid independently.
pub struct CaptureStream {
    window: Arc<AudioWindow>,
    stream: Stream,
}

impl CaptureStream {
    /// Open the input device, size a window for `window_ms` of audio at the
    /// negotiated format, and start delivering samples into it.
    pub fn open(device_name: Option<&str>, window_ms: u32) -> Result<Self> {
        let resolved = resolve_device(device_name)?;
        let window = Arc::new(AudioWindow::new(
            resolved.sample_rate,
            resolved.channels,
            window_ms,
        ));
        window.start()?;

        let producer = Arc::clone(&window);
        let stream = resolved
            .device
            .build_input_stream(
                &resolved.stream_config,
                move |data: &[f32], _info: &cpal::InputCallbackInfo| {
                    // Writes are rejected while paused; not worth more than
                    // a trace from the audio thread.
                    if let Err(e) = producer.write(data) {
                        trace!("dropping captured chunk: {e}");
                    }
                },
                move |err| {
                    error!("audio input stream error: {err}");
                },
                None, // no timeout
            )
            .map_err(|e| CaptureError::Stream(format!("failed to build input stream: {e}")))?;

        stream
            .play()
            .map_err(|e| CaptureError::Stream(format!("failed to start input stream: {e}")))?;

        info!(window_ms, "audio capture started");

        Ok(Self { window, stream })
    }

    /// The shared window this stream writes into.
    pub fn window(&self) -> Arc<AudioWindow> {
        Arc::clone(&self.window)
    }

    /// Pause capture: stop the window and the device stream. Fails with
    /// `NotRunning` if already paused.
    pub fn pause(&self) -> Result<()> {
        self.window.stop()?;
        self.stream
            .pause()
            .map_err(|e| CaptureError::Stream(format!("failed to pause input stream: {e}")))?;
        info!("audio capture paused");
        Ok(())
    }

    /// Resume capture after [`pause`](CaptureStream::pause). Fails with
    /// `AlreadyRunning` if capture was never paused.
    pub fn resume(&self) -> Result<()> {
        self.window.start()?;
        self.stream
            .play()
            .map_err(|e| CaptureError::Stream(format!("failed to resume input stream: {e}")))?;
        info!("audio capture resumed");
        Ok(())
    }
}
