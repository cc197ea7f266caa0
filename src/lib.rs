//! Neuromotor Web - Real-time Motor-Sign Feature Engine
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen setup that delegates to submodules
//!
//! The engine turns a per-frame hand-geometry scalar into clinically
//! interpretable motor metrics: tap rate, amplitude decrement, rhythm
//! variability, hesitations, and dominant resting-tremor frequency.

mod analysis;
mod bridge;
mod spectral;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{
    current_metrics, finish_test, get_waveform, is_environment_shaking, live_tap_count,
    process_frame, reset_test, start_test, update_hand_landmarks,
};

// Re-export the analyzer API for native (rlib) embedding
pub use analysis::{
    Amplitude, BradykinesiaAnalyzer, BradykinesiaConfig, Consistency, Fatigue, MotorMetric,
    Speed, TapCycle, TapCycleConfig, TapCycleDetector, TapPhase,
};
pub use bridge::TestKind;
pub use spectral::{LowPassFilter, SampleBuffer, TremorAnalyzer, TremorConfig, WINDOW_SIZE};

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}
