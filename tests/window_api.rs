//! Window behavior through the public crate API.

use capture_core::{AudioWindow, CaptureError};

#[test]
fn lifecycle_write_read_clear() {
    let window = AudioWindow::new(16_000, 1, 500);
    assert_eq!(window.capacity(), 8000);

    // Nothing works before start.
    assert!(matches!(window.read(0), Err(CaptureError::NotRunning)));

    window.start().unwrap();
    window.write(&[0.25; 1600]).unwrap();

    // 100 ms at 16 kHz mono.
    let recent = window.read(100).unwrap();
    assert_eq!(recent.len(), 1600);
    assert!(recent.iter().all(|s| *s == 0.25));

    window.clear().unwrap();
    assert!(window.read_window().unwrap().is_empty());

    window.stop().unwrap();
    assert!(matches!(window.write(&[0.0]), Err(CaptureError::NotRunning)));
}

#[test]
fn window_survives_many_overwrites() {
    let window = AudioWindow::new(1000, 1, 100); // capacity 100
    window.start().unwrap();

    for round in 0..50u32 {
        let chunk: Vec<f32> = (0..30).map(|i| (round * 30 + i) as f32).collect();
        window.write(&chunk).unwrap();
    }

    // 50 * 30 = 1500 samples written; the last 100 survive.
    let out = window.read_window().unwrap();
    assert_eq!(out.len(), 100);
    assert_eq!(out[0], 1400.0);
    assert_eq!(out[99], 1499.0);
    assert!(out.windows(2).all(|p| p[1] == p[0] + 1.0));
}
