//! Sliding-window buffer for interleaved f32 audio samples.
//!
//! One producer (the capture callback) appends chunks; any number of
//! consumers ask for the most recent M milliseconds without consuming them.
//! Storage, write cursor and valid length form one unit guarded by a single
//! mutex that is held only for the duration of the copy, so the real-time
//! producer is never blocked on I/O. Overwriting the oldest samples once the
//! window is full is normal operation, not an error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{CaptureError, Result};

/// Cursor and storage state guarded by the window mutex.
struct WindowState {
    /// Interleaved samples, allocated once at construction.
    storage: Vec<f32>,
    /// Next slot to write, always in `[0, capacity)`.
    write_cursor: usize,
    /// Valid sample count, always in `[0, capacity]`. Grows toward capacity
    /// and only shrinks on `clear`.
    valid_len: usize,
}

/// Thread-safe window over the most recent audio samples.
///
/// Reads and writes are gated by a running flag toggled with
/// [`start`](AudioWindow::start) / [`stop`](AudioWindow::stop).
pub struct AudioWindow {
    state: Mutex<WindowState>,
    running: AtomicBool,
    capacity: usize,
    sample_rate: u32,
    channels: u16,
    window_ms: u32,
}

impl AudioWindow {
    /// Allocate a window holding `window_ms` of audio at the negotiated
    /// `sample_rate` and `channels`. The capacity is fixed for the window's
    /// lifetime.
    pub fn new(sample_rate: u32, channels: u16, window_ms: u32) -> Self {
        let capacity = (sample_rate as usize * window_ms as usize / 1000)
            * channels.max(1) as usize;
        let capacity = capacity.max(1);
        Self {
            state: Mutex::new(WindowState {
                storage: vec![0.0; capacity],
                write_cursor: 0,
                valid_len: 0,
            }),
            running: AtomicBool::new(false),
            capacity,
            sample_rate,
            channels,
            window_ms,
        }
    }

    /// Capacity in samples (frames × channels).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sample rate the window was sized for.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Interleaved channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Configured window length in milliseconds.
    pub fn window_ms(&self) -> u32 {
        self.window_ms
    }

    /// Number of valid samples currently held.
    pub fn len(&self) -> usize {
        self.lock_state().valid_len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Begin accepting writes and reads. Double-start is an error.
    pub fn start(&self) -> Result<()> {
        if self.running.swap(true, Ordering::AcqRel) {
            return Err(CaptureError::AlreadyRunning);
        }
        Ok(())
    }

    /// Stop accepting writes and reads. Double-stop is an error. In-flight
    /// operations run to completion; nothing is preempted.
    pub fn stop(&self) -> Result<()> {
        if !self.running.swap(false, Ordering::AcqRel) {
            return Err(CaptureError::NotRunning);
        }
        Ok(())
    }

    /// Append `samples` at the tail, overwriting the oldest data once the
    /// window is full. A chunk longer than the whole capacity keeps only its
    /// trailing `capacity` samples; the cursor still advances by the full
    /// chunk length modulo capacity so the timeline stays consistent.
    ///
    /// Intended for a single producer; concurrent readers are fine.
    pub fn write(&self, samples: &[f32]) -> Result<()> {
        if !self.is_running() {
            return Err(CaptureError::NotRunning);
        }
        if samples.is_empty() {
            return Ok(());
        }

        let cap = self.capacity;
        let total = samples.len();
        let tail = if total > cap {
            &samples[total - cap..]
        } else {
            samples
        };
        let n = tail.len();

        let mut state = self.lock_state();
        // Samples skipped by an oversize chunk still advance the start slot.
        let start = (state.write_cursor + (total - n)) % cap;
        let first = n.min(cap - start);
        state.storage[start..start + first].copy_from_slice(&tail[..first]);
        state.storage[..n - first].copy_from_slice(&tail[first..]);
        state.write_cursor = (state.write_cursor + total) % cap;
        state.valid_len = (state.valid_len + total).min(cap);
        Ok(())
    }

    /// The most recent `duration_ms` of audio, oldest-first, as a fresh
    /// `Vec`. `0` means the full configured window. Returns fewer samples
    /// when less audio has accumulated. Does not consume anything; safe to
    /// call concurrently with `write` and other reads.
    pub fn read(&self, duration_ms: u32) -> Result<Vec<f32>> {
        if !self.is_running() {
            return Err(CaptureError::NotRunning);
        }

        let ms = if duration_ms == 0 {
            self.window_ms
        } else {
            duration_ms
        };
        let want = (self.sample_rate as usize * ms as usize / 1000)
            * self.channels.max(1) as usize;

        let state = self.lock_state();
        let n = want.min(state.valid_len);
        let cap = self.capacity;
        let start = (state.write_cursor + cap - n) % cap;
        let first = n.min(cap - start);

        let mut out = Vec::with_capacity(n);
        out.extend_from_slice(&state.storage[start..start + first]);
        out.extend_from_slice(&state.storage[..n - first]);
        Ok(out)
    }

    /// Convenience for reading the full configured window.
    pub fn read_window(&self) -> Result<Vec<f32>> {
        self.read(0)
    }

    /// Logically empty the window without touching the allocation.
    pub fn clear(&self) -> Result<()> {
        if !self.is_running() {
            return Err(CaptureError::NotRunning);
        }
        let mut state = self.lock_state();
        state.write_cursor = 0;
        state.valid_len = 0;
        Ok(())
    }

    // The state is plain cursors and samples, so recover from a poisoned
    // lock instead of propagating a panic from another thread.
    fn lock_state(&self) -> MutexGuard<'_, WindowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn running_window(sample_rate: u32, window_ms: u32) -> AudioWindow {
        let w = AudioWindow::new(sample_rate, 1, window_ms);
        w.start().unwrap();
        w
    }

    #[test]
    fn writes_below_capacity_read_back_in_order() {
        let w = running_window(1000, 1000);
        w.write(&[1.0, 2.0, 3.0]).unwrap();
        w.write(&[4.0, 5.0]).unwrap();
        assert_eq!(w.read(0).unwrap(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn overwrite_keeps_most_recent_capacity() {
        // 1000 ms at 16 kHz mono: writing 20_000 indexed samples must leave
        // [4000, 20000) in ascending order.
        let w = running_window(16_000, 1000);
        assert_eq!(w.capacity(), 16_000);

        let samples: Vec<f32> = (0..20_000).map(|i| i as f32).collect();
        w.write(&samples).unwrap();

        let out = w.read(1000).unwrap();
        assert_eq!(out.len(), 16_000);
        assert_eq!(out[0], 4000.0);
        assert_eq!(out[15_999], 19_999.0);
        assert!(out.windows(2).all(|p| p[1] == p[0] + 1.0));
    }

    #[test]
    fn incremental_writes_wrap_correctly() {
        let w = running_window(1000, 8); // capacity 8
        for i in 0..5 {
            w.write(&[(i * 2) as f32, (i * 2 + 1) as f32]).unwrap();
        }
        // Wrote 0..10; the window keeps 2..10.
        let expected: Vec<f32> = (2..10).map(|i| i as f32).collect();
        assert_eq!(w.read(0).unwrap(), expected);
    }

    #[test]
    fn oversize_chunk_after_partial_fill() {
        let w = running_window(1000, 10); // capacity 10
        w.write(&[100.0, 101.0, 102.0]).unwrap();
        let big: Vec<f32> = (0..25).map(|i| i as f32).collect();
        w.write(&big).unwrap();
        let expected: Vec<f32> = (15..25).map(|i| i as f32).collect();
        assert_eq!(w.read(0).unwrap(), expected);
    }

    #[test]
    fn read_zero_equals_full_window_read() {
        let w = running_window(1000, 1000);
        let samples: Vec<f32> = (0..300).map(|i| i as f32).collect();
        w.write(&samples).unwrap();
        assert_eq!(w.read(0).unwrap(), w.read(1000).unwrap());
        assert_eq!(w.read(0).unwrap(), w.read_window().unwrap());
    }

    #[test]
    fn short_read_returns_most_recent_tail() {
        let w = running_window(1000, 1000);
        let samples: Vec<f32> = (0..100).map(|i| i as f32).collect();
        w.write(&samples).unwrap();
        // 10 ms at 1 kHz mono = 10 samples.
        let expected: Vec<f32> = (90..100).map(|i| i as f32).collect();
        assert_eq!(w.read(10).unwrap(), expected);
    }

    #[test]
    fn stereo_read_counts_interleaved_samples() {
        let w = AudioWindow::new(1000, 2, 1000);
        w.start().unwrap();
        assert_eq!(w.capacity(), 2000);
        w.write(&[1.0, -1.0, 2.0, -2.0]).unwrap();
        // 1 ms at 1 kHz stereo = one frame = two samples.
        assert_eq!(w.read(1).unwrap(), vec![2.0, -2.0]);
    }

    #[test]
    fn clear_empties_without_losing_capacity() {
        let w = running_window(1000, 1000);
        w.write(&[1.0; 500]).unwrap();
        assert_eq!(w.len(), 500);

        w.clear().unwrap();
        assert!(w.is_empty());
        assert!(w.read(0).unwrap().is_empty());

        w.write(&[7.0, 8.0]).unwrap();
        assert_eq!(w.read(0).unwrap(), vec![7.0, 8.0]);
    }

    #[test]
    fn double_start_and_double_stop_are_errors() {
        let w = AudioWindow::new(1000, 1, 100);
        assert!(w.start().is_ok());
        assert!(matches!(w.start(), Err(CaptureError::AlreadyRunning)));
        assert!(w.stop().is_ok());
        assert!(matches!(w.stop(), Err(CaptureError::NotRunning)));
        // stop() then start() recovers.
        assert!(w.start().is_ok());
    }

    #[test]
    fn operations_require_running() {
        let w = AudioWindow::new(1000, 1, 100);
        assert!(matches!(w.write(&[0.0]), Err(CaptureError::NotRunning)));
        assert!(matches!(w.read(0), Err(CaptureError::NotRunning)));
        assert!(matches!(w.clear(), Err(CaptureError::NotRunning)));
    }

    #[test]
    fn concurrent_writer_and_reader_never_tear() {
        let w = Arc::new(AudioWindow::new(1000, 1, 64)); // capacity 64
        w.start().unwrap();

        // The writer appends 8-sample chunks of a single repeated value.
        // Chunk size divides the capacity, so every full-window read starts
        // on a chunk boundary: a torn or reordered read would surface as a
        // mixed block or a gap in the block values.
        let writer = {
            let w = Arc::clone(&w);
            thread::spawn(move || {
                for v in 0..2000u32 {
                    w.write(&[v as f32; 8]).unwrap();
                }
            })
        };

        let reader = {
            let w = Arc::clone(&w);
            thread::spawn(move || {
                for _ in 0..2000 {
                    let out = w.read(0).unwrap();
                    assert!(out.len() <= 64);
                    assert_eq!(out.len() % 8, 0);
                    for block in out.chunks(8) {
                        assert!(block.iter().all(|s| *s == block[0]));
                    }
                    let values: Vec<f32> = out.chunks(8).map(|b| b[0]).collect();
                    assert!(values.windows(2).all(|p| p[1] == p[0] + 1.0));
                }
            })
        };

        writer.join().unwrap();
        reader.join().unwrap();
    }
}
