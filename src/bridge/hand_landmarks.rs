//! Hand landmark storage and geometry features
//!
//! Receives MediaPipe hand landmarks from JavaScript each frame and
//! derives the scalar features the analyzers consume:
//! - normalized thumb-index distance ratio (bradykinesia tasks)
//! - relative vertical index-tip displacement (tremor task)
//!
//! Also tracks a camera-shake flag and a trailing waveform window for
//! the live UI.

use std::cell::RefCell;
use std::collections::VecDeque;
use wasm_bindgen::prelude::*;

// ============================================================================
// HAND LANDMARK INDICES (MediaPipe Hand - 21 total)
// ============================================================================

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;

/// Landmarks per hand in the MediaPipe hand model
pub const LANDMARK_COUNT: usize = 21;

/// Floats per frame (21 landmarks x 3 coordinates)
const FLAT_LEN: usize = LANDMARK_COUNT * 3;

/// Wrist travel (normalized units) above which the camera or arm is
/// considered unstable for measurement
const SHAKE_THRESHOLD: f32 = 0.08;

/// Trailing tap-ratio samples kept for the live waveform display
const WAVEFORM_LEN: usize = 60;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A single 3D landmark point (normalized image coordinates)
#[derive(Clone, Copy, Default)]
pub struct HandLandmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Flags frames where the whole hand jumps, which makes the geometry
/// features unreliable (camera bump, arm movement).
pub struct ShakeMonitor {
    last_wrist: Option<(f32, f32)>,
    threshold: f32,
}

impl ShakeMonitor {
    pub fn new(threshold: f32) -> Self {
        Self {
            last_wrist: None,
            threshold,
        }
    }

    /// Update with this frame's wrist position; true if the travel
    /// since the previous frame exceeds the threshold.
    pub fn update(&mut self, wrist: (f32, f32)) -> bool {
        let shaking = match self.last_wrist {
            Some((lx, ly)) => {
                let dx = wrist.0 - lx;
                let dy = wrist.1 - ly;
                (dx * dx + dy * dy).sqrt() > self.threshold
            }
            None => false,
        };
        self.last_wrist = Some(wrist);
        shaking
    }

    pub fn reset(&mut self) {
        self.last_wrist = None;
    }
}

/// Current frame's landmarks plus the per-frame UI signals
struct HandFrame {
    landmarks: [HandLandmark; LANDMARK_COUNT],
    has_data: bool,
    shake: ShakeMonitor,
    shaking: bool,
    waveform: VecDeque<f32>,
}

impl Default for HandFrame {
    fn default() -> Self {
        Self {
            landmarks: [HandLandmark::default(); LANDMARK_COUNT],
            has_data: false,
            shake: ShakeMonitor::new(SHAKE_THRESHOLD),
            shaking: false,
            waveform: VecDeque::with_capacity(WAVEFORM_LEN + 1),
        }
    }
}

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static HAND_FRAME: RefCell<HandFrame> = RefCell::new(HandFrame::default());
}

// ============================================================================
// GEOMETRY FEATURES
// ============================================================================

fn dist2d(a: HandLandmark, b: HandLandmark) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Thumb-index distance normalized by palm size.
///
/// Palm size is the wrist to middle-MCP distance; a degenerate palm
/// falls back to 1 so the ratio stays finite.
pub fn tap_ratio(landmarks: &[HandLandmark; LANDMARK_COUNT]) -> f32 {
    let palm_size = dist2d(landmarks[WRIST], landmarks[MIDDLE_MCP]);
    let palm_size = if palm_size > 0.0 { palm_size } else { 1.0 };
    dist2d(landmarks[THUMB_TIP], landmarks[INDEX_TIP]) / palm_size
}

/// Vertical index-tip displacement relative to the wrist, in percent
/// of the image height. Drives the tremor analyzer.
pub fn tremor_displacement(landmarks: &[HandLandmark; LANDMARK_COUNT]) -> f32 {
    (landmarks[INDEX_TIP].y - landmarks[WRIST].y) * 100.0
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Called from JavaScript with a flat Float32Array of 63 values
/// (21 landmarks x 3 coordinates: x, y, z)
#[wasm_bindgen]
pub fn update_hand_landmarks(data: &[f32]) {
    if data.len() != FLAT_LEN {
        web_sys::console::warn_1(
            &format!(
                "Invalid hand landmark data length: {} (expected {})",
                data.len(),
                FLAT_LEN
            )
            .into(),
        );
        return;
    }

    HAND_FRAME.with(|frame_cell| {
        let mut frame = frame_cell.borrow_mut();

        for i in 0..LANDMARK_COUNT {
            frame.landmarks[i] = HandLandmark {
                x: data[i * 3],
                y: data[i * 3 + 1],
                z: data[i * 3 + 2],
            };
        }
        frame.has_data = true;

        let wrist = (frame.landmarks[WRIST].x, frame.landmarks[WRIST].y);
        frame.shaking = frame.shake.update(wrist);

        let ratio = tap_ratio(&frame.landmarks);
        frame.waveform.push_back(ratio);
        if frame.waveform.len() > WAVEFORM_LEN {
            frame.waveform.pop_front();
        }
    });
}

/// Whether the latest frame showed large whole-hand travel
#[wasm_bindgen]
pub fn is_environment_shaking() -> bool {
    HAND_FRAME.with(|frame_cell| frame_cell.borrow().shaking)
}

/// Trailing tap-ratio samples for the live waveform canvas
#[wasm_bindgen]
pub fn get_waveform() -> Vec<f32> {
    HAND_FRAME.with(|frame_cell| frame_cell.borrow().waveform.iter().copied().collect())
}

// ============================================================================
// INTERNAL API (no wasm_bindgen)
// ============================================================================

/// Get the current frame's landmarks (for the session loop)
pub fn get_hand_frame() -> Option<[HandLandmark; LANDMARK_COUNT]> {
    HAND_FRAME.with(|frame_cell| {
        let frame = frame_cell.borrow();
        if frame.has_data {
            Some(frame.landmarks)
        } else {
            None
        }
    })
}

/// Drop the stored frame and shake history (new test attempt)
pub fn clear_hand_frame() {
    HAND_FRAME.with(|frame_cell| {
        let mut frame = frame_cell.borrow_mut();
        frame.has_data = false;
        frame.shaking = false;
        frame.shake.reset();
        frame.waveform.clear();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landmarks_with(points: &[(usize, f32, f32)]) -> [HandLandmark; LANDMARK_COUNT] {
        let mut landmarks = [HandLandmark::default(); LANDMARK_COUNT];
        for &(index, x, y) in points {
            landmarks[index] = HandLandmark { x, y, z: 0.0 };
        }
        landmarks
    }

    #[test]
    fn test_tap_ratio_normalizes_by_palm_size() {
        let landmarks = landmarks_with(&[
            (WRIST, 0.0, 0.0),
            (MIDDLE_MCP, 0.0, 0.5),
            (THUMB_TIP, 0.1, 0.0),
            (INDEX_TIP, 0.4, 0.0),
        ]);
        // Fingertip gap 0.3 over palm 0.5
        assert!((tap_ratio(&landmarks) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_tap_ratio_guards_degenerate_palm() {
        let landmarks = landmarks_with(&[(THUMB_TIP, 0.0, 0.0), (INDEX_TIP, 0.25, 0.0)]);
        // Wrist and middle MCP coincide at the origin
        assert!((tap_ratio(&landmarks) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_tremor_displacement_is_percent_of_height() {
        let landmarks = landmarks_with(&[(WRIST, 0.5, 0.8), (INDEX_TIP, 0.5, 0.6)]);
        assert!((tremor_displacement(&landmarks) + 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_shake_monitor_needs_a_previous_frame() {
        let mut monitor = ShakeMonitor::new(SHAKE_THRESHOLD);
        assert!(!monitor.update((0.5, 0.5)));
    }

    #[test]
    fn test_shake_monitor_flags_large_travel() {
        let mut monitor = ShakeMonitor::new(SHAKE_THRESHOLD);
        monitor.update((0.5, 0.5));
        assert!(!monitor.update((0.52, 0.5)));
        assert!(monitor.update((0.7, 0.5)));
        // Settling again clears the flag
        assert!(!monitor.update((0.71, 0.5)));
    }

    #[test]
    fn test_shake_monitor_reset_forgets_history() {
        let mut monitor = ShakeMonitor::new(SHAKE_THRESHOLD);
        monitor.update((0.0, 0.0));
        monitor.reset();
        assert!(!monitor.update((1.0, 1.0)));
    }
}
