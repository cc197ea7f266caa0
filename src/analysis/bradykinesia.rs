//! Bradykinesia metrics from accumulated tap cycles
//!
//! Owns a tap-cycle detector and turns its cycle list into the summary
//! metric: tap rate, rhythm variability, hesitations, and the
//! first-third vs last-third amplitude decrement (sequence effect).

use crate::analysis::metric::{round1, round2, Amplitude, Consistency, Fatigue, MotorMetric, Speed};
use crate::analysis::tap_cycle::{TapCycle, TapCycleConfig, TapCycleDetector, TapPhase};

/// Clinical cutoffs for the bradykinesia summary
#[derive(Debug, Clone)]
pub struct BradykinesiaConfig {
    /// Cycles required before a full metric is computed. Typical: 5.
    pub min_cycles: usize,
    /// Tap rates below this are reported as slow. Typical: 2.5 Hz.
    pub slow_below_hz: f64,
    /// Tap rates above this are reported as fast. Typical: 6.0 Hz.
    pub fast_above_hz: f64,
    /// Duration CV above this is inconsistent rhythm. Typical: 0.25.
    pub cv_inconsistent_above: f64,
    /// A cycle longer than this multiple of the mean is a hesitation.
    /// Typical: 2.0.
    pub hesitation_factor: f64,
    /// Amplitude decrement above this percentage marks a sequence
    /// effect (decreasing amplitude, fatigue present). Typical: 15.0.
    pub decrement_cutoff_percent: f64,
}

impl Default for BradykinesiaConfig {
    fn default() -> Self {
        Self {
            min_cycles: 5,
            slow_below_hz: 2.5,
            fast_above_hz: 6.0,
            cv_inconsistent_above: 0.25,
            hesitation_factor: 2.0,
            decrement_cutoff_percent: 15.0,
        }
    }
}

/// Analyzer for the finger-tapping and hand open/close tasks
///
/// One instance per test attempt: feed it every frame, query it for
/// live feedback, call `reset` before the next attempt.
pub struct BradykinesiaAnalyzer {
    detector: TapCycleDetector,
    config: BradykinesiaConfig,
}

impl BradykinesiaAnalyzer {
    pub fn new() -> Self {
        Self::with_config(TapCycleConfig::default(), BradykinesiaConfig::default())
    }

    pub fn with_config(tap_config: TapCycleConfig, config: BradykinesiaConfig) -> Self {
        Self {
            detector: TapCycleDetector::new(tap_config),
            config,
        }
    }

    /// Feed one normalized distance sample. O(1); may complete a cycle.
    pub fn add_sample(&mut self, distance: f32, timestamp_ms: f64) {
        self.detector.add_sample(distance, timestamp_ms);
    }

    /// Completed tap cycles so far (live progress display)
    pub fn tap_count(&self) -> usize {
        self.detector.tap_count()
    }

    /// Current state-machine phase (debug overlay)
    pub fn phase(&self) -> TapPhase {
        self.detector.phase()
    }

    /// Summary metric over everything accumulated so far.
    ///
    /// Idempotent read: repeated calls without new samples return the
    /// same record. Below `min_cycles` only `tap_count` is populated.
    pub fn metrics(&self) -> MotorMetric {
        derive_metrics(self.detector.cycles(), &self.config)
    }

    /// Clear detector and cycle history for the next attempt
    pub fn reset(&mut self) {
        self.detector.reset();
    }
}

impl Default for BradykinesiaAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the summary metric from a cycle list.
fn derive_metrics(cycles: &[TapCycle], config: &BradykinesiaConfig) -> MotorMetric {
    if cycles.len() < config.min_cycles {
        let mut metric = MotorMetric::benign();
        metric.tap_count = cycles.len();
        return metric;
    }

    let durations: Vec<f64> = cycles.iter().map(|c| c.duration_ms).collect();
    let avg_duration = mean(&durations);
    let frequency_hz = 1000.0 / avg_duration;

    let speed = if frequency_hz < config.slow_below_hz {
        Speed::Slow
    } else if frequency_hz > config.fast_above_hz {
        Speed::Fast
    } else {
        Speed::Normal
    };

    let cv = std_dev(&durations, avg_duration) / avg_duration;
    let hesitation_count = durations
        .iter()
        .filter(|&&d| d > avg_duration * config.hesitation_factor)
        .count();

    let consistency = if hesitation_count > 1 {
        Consistency::Hesitant
    } else if cv > config.cv_inconsistent_above {
        Consistency::Inconsistent
    } else {
        Consistency::Consistent
    };

    // Sequence effect: first third vs last third of peak amplitudes
    let third = cycles.len() / 3;
    let first_mean = mean_peak(&cycles[..third]);
    let last_mean = mean_peak(&cycles[cycles.len() - third..]);
    let decrement_percent = if first_mean > 0.0 {
        (first_mean - last_mean) / first_mean * 100.0
    } else {
        0.0
    };

    let decrementing = decrement_percent > config.decrement_cutoff_percent;

    MotorMetric {
        speed,
        consistency,
        amplitude: if decrementing {
            Amplitude::Decreasing
        } else {
            Amplitude::Normal
        },
        fatigue: if decrementing {
            Fatigue::Present
        } else {
            Fatigue::None
        },
        frequency_hz: round1(frequency_hz),
        amplitude_decrement_percent: round1(decrement_percent),
        rhythm_variability_cv: round2(cv),
        hesitation_count,
        tap_count: cycles.len(),
        tremor_frequency_hz: 0.0,
        tremor_amplitude: 0.0,
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation around a precomputed mean
fn std_dev(values: &[f64], mean: f64) -> f64 {
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn mean_peak(cycles: &[TapCycle]) -> f64 {
    cycles.iter().map(|c| c.peak_amplitude as f64).sum::<f64>() / cycles.len() as f64
}
