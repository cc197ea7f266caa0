//! Tap-cycle state machine for the bradykinesia tasks
//!
//! Classifies a continuous opening/closing distance signal into discrete
//! tap cycles. One cycle = one full pass through
//! Open → Closing → Closed → Opening → Open.

/// Phase of the hand within one open/close cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapPhase {
    Open,
    Closing,
    Closed,
    Opening,
}

/// One completed tap cycle
///
/// Appended exactly once, on the Closing → Closed transition, and never
/// mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapCycle {
    /// Largest distance seen since the previous closure
    pub peak_amplitude: f32,
    /// Time between this closure and the previous one
    pub duration_ms: f64,
}

/// Thresholds for the tap-cycle state machine
///
/// The distance signal is a normalized geometry ratio, so thresholds are
/// unitless. Defaults match the clinically tuned values from the
/// screening protocol.
#[derive(Debug, Clone)]
pub struct TapCycleConfig {
    /// Distance below which the hand counts as closed. Typical: 0.3.
    pub close_threshold: f32,
    /// Distance above which the hand counts as fully open. Typical: 0.6.
    pub open_threshold: f32,
    /// Fraction of `open_threshold` that starts a Closing phase.
    /// Typical: 0.8 (hysteresis against jitter at the open position).
    pub closing_entry_ratio: f32,
    /// Multiple of `close_threshold` that starts an Opening phase.
    /// Typical: 1.2 (hysteresis against jitter at the closed position).
    pub opening_exit_ratio: f32,
}

impl Default for TapCycleConfig {
    fn default() -> Self {
        Self {
            close_threshold: 0.3,
            open_threshold: 0.6,
            closing_entry_ratio: 0.8,
            opening_exit_ratio: 1.2,
        }
    }
}

/// Finite-state detector that turns distance samples into tap cycles
pub struct TapCycleDetector {
    config: TapCycleConfig,
    phase: TapPhase,
    cycles: Vec<TapCycle>,
    /// Running peak for the in-flight cycle
    current_peak: f32,
    /// Timestamp of the previous closure; None before the first one
    last_closure_ms: Option<f64>,
}

impl TapCycleDetector {
    pub fn new(config: TapCycleConfig) -> Self {
        Self {
            config,
            phase: TapPhase::Open,
            cycles: Vec::new(),
            current_peak: 0.0,
            last_closure_ms: None,
        }
    }

    /// Feed one distance sample with its timestamp in milliseconds.
    ///
    /// Timestamps must be non-decreasing across calls; a closure whose
    /// computed duration would be zero or negative records no cycle.
    pub fn add_sample(&mut self, distance: f32, timestamp_ms: f64) {
        // Peak tracks the maximum regardless of phase
        if distance > self.current_peak {
            self.current_peak = distance;
        }

        match self.phase {
            TapPhase::Open => {
                if distance < self.config.closing_entry_ratio * self.config.open_threshold {
                    self.phase = TapPhase::Closing;
                }
            }
            TapPhase::Closing => {
                if distance < self.config.close_threshold {
                    self.phase = TapPhase::Closed;
                    self.finish_cycle(distance, timestamp_ms);
                }
            }
            TapPhase::Closed => {
                if distance > self.config.opening_exit_ratio * self.config.close_threshold {
                    self.phase = TapPhase::Opening;
                }
            }
            TapPhase::Opening => {
                if distance > self.config.open_threshold {
                    self.phase = TapPhase::Open;
                }
            }
        }
    }

    /// Close out the in-flight cycle at a Closing → Closed transition.
    ///
    /// The very first closure has no predecessor and records nothing.
    fn finish_cycle(&mut self, distance: f32, timestamp_ms: f64) {
        if let Some(last) = self.last_closure_ms {
            let duration_ms = timestamp_ms - last;
            if duration_ms > 0.0 && self.current_peak > 0.0 {
                self.cycles.push(TapCycle {
                    peak_amplitude: self.current_peak,
                    duration_ms,
                });
            }
        }
        self.last_closure_ms = Some(timestamp_ms);
        // Next cycle's peak starts from the closed position
        self.current_peak = distance;
    }

    /// Current phase (for debugging and live display)
    pub fn phase(&self) -> TapPhase {
        self.phase
    }

    /// Completed cycles, in order of completion
    pub fn cycles(&self) -> &[TapCycle] {
        &self.cycles
    }

    /// Number of completed cycles
    pub fn tap_count(&self) -> usize {
        self.cycles.len()
    }

    /// Clear all state back to a fresh detector
    pub fn reset(&mut self) {
        self.phase = TapPhase::Open;
        self.cycles.clear();
        self.current_peak = 0.0;
        self.last_closure_ms = None;
    }
}

impl Default for TapCycleDetector {
    fn default() -> Self {
        Self::new(TapCycleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive one full open→closed→open pass, 100ms apart per sample
    fn drive_cycle(detector: &mut TapCycleDetector, t: &mut f64) {
        for d in [1.0, 0.4, 0.2, 0.5, 1.0] {
            detector.add_sample(d, *t);
            *t += 100.0;
        }
    }

    #[test]
    fn test_first_closure_records_no_cycle() {
        let mut detector = TapCycleDetector::default();
        let mut t = 0.0;
        drive_cycle(&mut detector, &mut t);
        assert_eq!(detector.tap_count(), 0);
        assert_eq!(detector.phase(), TapPhase::Open);
    }

    #[test]
    fn test_one_cycle_per_closure_after_the_first() {
        let mut detector = TapCycleDetector::default();
        let mut t = 0.0;
        for _ in 0..6 {
            drive_cycle(&mut detector, &mut t);
        }
        // 6 closures, the first records nothing
        assert_eq!(detector.tap_count(), 5);
    }

    #[test]
    fn test_cycle_duration_is_closure_to_closure() {
        let mut detector = TapCycleDetector::default();
        let mut t = 0.0;
        drive_cycle(&mut detector, &mut t); // closure at t=200
        drive_cycle(&mut detector, &mut t); // closure at t=700
        let cycles = detector.cycles();
        assert_eq!(cycles.len(), 1);
        assert!((cycles[0].duration_ms - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_peak_amplitude_spans_the_cycle() {
        let mut detector = TapCycleDetector::default();
        detector.add_sample(1.0, 0.0);
        detector.add_sample(0.2, 100.0); // first closure
        detector.add_sample(0.5, 200.0);
        detector.add_sample(0.9, 300.0); // peak of second cycle
        detector.add_sample(0.4, 400.0);
        detector.add_sample(0.2, 500.0); // second closure
        let cycles = detector.cycles();
        assert_eq!(cycles.len(), 1);
        assert!((cycles[0].peak_amplitude - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_partial_close_does_not_count() {
        let mut detector = TapCycleDetector::default();
        let mut t = 0.0;
        drive_cycle(&mut detector, &mut t);
        // Dips to 0.35 never cross the 0.3 close threshold
        for d in [1.0, 0.4, 0.35, 0.5, 1.0, 0.4, 0.35, 0.5, 1.0] {
            detector.add_sample(d, t);
            t += 100.0;
        }
        assert_eq!(detector.tap_count(), 0);
    }

    #[test]
    fn test_non_positive_duration_records_nothing() {
        let mut detector = TapCycleDetector::default();
        let mut t = 0.0;
        drive_cycle(&mut detector, &mut t); // first closure lands at t=200
        // Second closure at the same timestamp as the first
        for d in [1.0, 0.4, 0.2, 0.5, 1.0] {
            detector.add_sample(d, 200.0);
        }
        assert_eq!(detector.tap_count(), 0);
    }

    #[test]
    fn test_reset_returns_to_initial_state() {
        let mut detector = TapCycleDetector::default();
        let mut t = 0.0;
        drive_cycle(&mut detector, &mut t);
        drive_cycle(&mut detector, &mut t);
        assert_eq!(detector.tap_count(), 1);

        detector.reset();
        assert_eq!(detector.phase(), TapPhase::Open);
        assert_eq!(detector.tap_count(), 0);

        // A fresh run behaves like a new detector
        let mut t2 = 0.0;
        drive_cycle(&mut detector, &mut t2);
        assert_eq!(detector.tap_count(), 0);
    }

    #[test]
    fn test_hysteresis_entry_and_exit() {
        let mut detector = TapCycleDetector::default();
        // 0.5 is above the closing entry point (0.8 * 0.6 = 0.48)
        detector.add_sample(0.5, 0.0);
        assert_eq!(detector.phase(), TapPhase::Open);
        detector.add_sample(0.45, 100.0);
        assert_eq!(detector.phase(), TapPhase::Closing);
        detector.add_sample(0.2, 200.0);
        assert_eq!(detector.phase(), TapPhase::Closed);
        // 0.35 is below 1.2 * 0.3 = 0.36, still Closed
        detector.add_sample(0.35, 300.0);
        assert_eq!(detector.phase(), TapPhase::Closed);
        detector.add_sample(0.4, 400.0);
        assert_eq!(detector.phase(), TapPhase::Opening);
        // 0.55 below the open threshold, still Opening
        detector.add_sample(0.55, 500.0);
        assert_eq!(detector.phase(), TapPhase::Opening);
        detector.add_sample(0.7, 600.0);
        assert_eq!(detector.phase(), TapPhase::Open);
    }
}
