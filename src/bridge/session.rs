//! Test session - connects landmark features with the analyzers
//!
//! Owns one analyzer per path for the active test attempt, routes the
//! per-frame scalar feature to the right one, and exports the metric
//! record to JS as a flat array.

use std::cell::RefCell;
use wasm_bindgen::prelude::*;

use super::hand_landmarks::{clear_hand_frame, get_hand_frame, tap_ratio, tremor_displacement};
use crate::analysis::{BradykinesiaAnalyzer, MotorMetric};
use crate::spectral::TremorAnalyzer;

/// The three hand-motor screening tasks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestKind {
    FingerTapping,
    HandOpenClose,
    StaticTremor,
}

impl TestKind {
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => TestKind::FingerTapping,
            1 => TestKind::HandOpenClose,
            _ => TestKind::StaticTremor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TestKind::FingerTapping => "finger_tapping",
            TestKind::HandOpenClose => "hand_open_close",
            TestKind::StaticTremor => "static_tremor",
        }
    }

    /// Bradykinesia tasks share the tap-cycle path
    pub fn uses_tap_cycles(&self) -> bool {
        !matches!(self, TestKind::StaticTremor)
    }
}

/// Session state for one test attempt
struct SessionState {
    kind: TestKind,
    active: bool,
    bradykinesia: BradykinesiaAnalyzer,
    tremor: TremorAnalyzer,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            kind: TestKind::FingerTapping,
            active: false,
            bradykinesia: BradykinesiaAnalyzer::new(),
            tremor: TremorAnalyzer::new(),
        }
    }
}

impl SessionState {
    fn metric(&self) -> MotorMetric {
        if self.kind.uses_tap_cycles() {
            self.bradykinesia.metrics()
        } else {
            self.tremor.analyze()
        }
    }

    fn reset(&mut self) {
        self.bradykinesia.reset();
        self.tremor.reset();
    }
}

thread_local! {
    static SESSION: RefCell<SessionState> = RefCell::new(SessionState::default());
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Begin a test attempt: 0 = finger tapping, 1 = hand open/close,
/// 2 = static tremor. Resets both analyzers and the frame state.
#[wasm_bindgen]
pub fn start_test(kind_index: usize) {
    let kind = TestKind::from_index(kind_index);
    SESSION.with(|session_cell| {
        let mut session = session_cell.borrow_mut();
        session.kind = kind;
        session.active = true;
        session.reset();
    });
    clear_hand_frame();
    web_sys::console::log_1(&format!("▶️ Motor test started: {}", kind.as_str()).into());
}

/// Feed the current landmark frame to the active analyzer.
///
/// Call once per animation frame after `update_hand_landmarks`. Frames
/// with no hand data are skipped (lost tracking is not an error).
/// Returns the live tap count so the UI can click on each new tap.
#[wasm_bindgen]
pub fn process_frame() -> usize {
    let now = js_sys::Date::now();
    SESSION.with(|session_cell| {
        let mut session = session_cell.borrow_mut();
        if !session.active {
            return 0;
        }
        if let Some(landmarks) = get_hand_frame() {
            if session.kind.uses_tap_cycles() {
                session.bradykinesia.add_sample(tap_ratio(&landmarks), now);
            } else {
                session.tremor.add_data_point(tremor_displacement(&landmarks));
            }
        }
        session.bradykinesia.tap_count()
    })
}

/// Completed tap cycles in the current attempt (live progress)
#[wasm_bindgen]
pub fn live_tap_count() -> usize {
    SESSION.with(|session_cell| session_cell.borrow().bradykinesia.tap_count())
}

/// Metric record for the active task, as a flat array (live feedback)
#[wasm_bindgen]
pub fn current_metrics() -> Vec<f64> {
    SESSION.with(|session_cell| metric_to_flat(&session_cell.borrow().metric()))
}

/// Finish the attempt: returns the final metric record and stops
/// ingesting frames. The analyzers keep their data until the next
/// `start_test` or `reset_test`.
#[wasm_bindgen]
pub fn finish_test() -> Vec<f64> {
    SESSION.with(|session_cell| {
        let mut session = session_cell.borrow_mut();
        session.active = false;
        metric_to_flat(&session.metric())
    })
}

/// Abort and clear the current attempt (recalibration path)
#[wasm_bindgen]
pub fn reset_test() {
    SESSION.with(|session_cell| {
        let mut session = session_cell.borrow_mut();
        session.active = false;
        session.reset();
    });
    clear_hand_frame();
    web_sys::console::log_1(&"🔄 Motor test reset".into());
}

// ============================================================================
// METRIC EXPORT
// ============================================================================

/// Flatten a metric record for JS consumption.
///
/// Layout:
/// - 0: speed code (0 normal, 1 slow, 2 fast)
/// - 1: consistency code (0 consistent, 1 inconsistent, 2 hesitant)
/// - 2: amplitude code (0 normal, 1 decreasing, 2 variable)
/// - 3: fatigue code (0 none, 1 present)
/// - 4: frequency_hz
/// - 5: amplitude_decrement_percent
/// - 6: rhythm_variability_cv
/// - 7: hesitation_count
/// - 8: tap_count
/// - 9: tremor_frequency_hz
/// - 10: tremor_amplitude
pub fn metric_to_flat(metric: &MotorMetric) -> Vec<f64> {
    vec![
        metric.speed.code() as f64,
        metric.consistency.code() as f64,
        metric.amplitude.code() as f64,
        metric.fatigue.code() as f64,
        metric.frequency_hz,
        metric.amplitude_decrement_percent,
        metric.rhythm_variability_cv,
        metric.hesitation_count as f64,
        metric.tap_count as f64,
        metric.tremor_frequency_hz,
        metric.tremor_amplitude,
    ]
}
