//! Analysis module - bradykinesia tap-cycle detection and metrics
//!
//! Re-exports only. All logic in submodules.

mod bradykinesia;
mod metric;
mod tap_cycle;

pub use bradykinesia::{BradykinesiaAnalyzer, BradykinesiaConfig};
pub use metric::{Amplitude, Consistency, Fatigue, MotorMetric, Speed};
pub use tap_cycle::{TapCycle, TapCycleConfig, TapCycleDetector, TapPhase};

pub(crate) use metric::{round1, round2};
