//! Bridge module - JS <-> Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod hand_landmarks;
mod session;

pub use hand_landmarks::{
    // WASM entry points
    update_hand_landmarks,
    is_environment_shaking,
    get_waveform,
    // Internal API
    get_hand_frame,
    clear_hand_frame,
    tap_ratio,
    tremor_displacement,
    HandLandmark,
    ShakeMonitor,
    // Constants
    WRIST, THUMB_TIP, INDEX_TIP, MIDDLE_MCP,
    LANDMARK_COUNT,
};

pub use session::{
    // WASM entry points
    start_test,
    process_frame,
    live_tap_count,
    current_metrics,
    finish_test,
    reset_test,
    // Internal API
    metric_to_flat,
    TestKind,
};
