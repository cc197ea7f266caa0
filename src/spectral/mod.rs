//! Spectral module - signal conditioning and FFT tremor analysis
//!
//! Re-exports only. All logic in submodules.

mod buffer;
mod low_pass;
mod tremor;

pub use buffer::{SampleBuffer, WINDOW_SIZE};
pub use low_pass::LowPassFilter;
pub use tremor::{TremorAnalyzer, TremorConfig};
