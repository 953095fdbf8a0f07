//! Live capture demo.
//!
//! Opens the default (or configured) input device, keeps a trailing window
//! of audio, and prints a per-channel peak meter until Ctrl-C.

use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use capture_core::audio::CaptureStream;
use capture_core::config::read_capture_config;
use capture_core::list_devices;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (respects RUST_LOG env, defaults to info)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = read_capture_config();
    info!(?config, "configuration loaded");

    let devices = list_devices();
    info!(count = devices.len(), ?devices, "input devices");

    let capture = CaptureStream::open(config.device.as_deref(), config.window_ms)
        .context("failed to open capture stream")?;
    let window = capture.window();

    let mut ticker = tokio::time::interval(Duration::from_millis(config.step_ms));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let samples = window.read(config.step_ms as u32)?;
                print_meters(&samples, window.channels());
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, shutting down");
                break;
            }
        }
    }

    capture.pause()?;
    Ok(())
}

/// Per-channel peak meter, one line per channel.
fn print_meters(samples: &[f32], channels: u16) {
    let ch = channels.max(1) as usize;
    println!("captured {} frames", samples.len() / ch);
    for c in 0..ch {
        let max = samples
            .iter()
            .skip(c)
            .step_by(ch)
            .fold(0.0f32, |m, s| m.max(s.abs()));
        let peak = ((max * 30.0) as usize).min(39);
        let bar = "*".repeat(peak + 1);
        println!("channel {c}: |{bar:<40}| peak:{max:.3}");
    }
}
