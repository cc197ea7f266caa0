//! Spectral resting-tremor analyzer
//!
//! Buffers conditioned displacement samples and runs an FFT over the
//! window to find the dominant oscillation. A peak/trough detector
//! cannot reliably separate 4-6 Hz resting tremor from noise or
//! voluntary micro-movement; the spectrum can.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::analysis::{round1, round2, Amplitude, MotorMetric};
use crate::spectral::buffer::{SampleBuffer, WINDOW_SIZE};
use crate::spectral::low_pass::LowPassFilter;

/// Parameters for the tremor path
///
/// The sampling rate is assumed fixed at the nominal camera frame rate;
/// actual frame-timing jitter is a known accuracy gap that stays
/// unchanged pending clinical validation.
#[derive(Debug, Clone)]
pub struct TremorConfig {
    /// Low-pass smoothing factor. Typical: 0.4.
    pub alpha: f32,
    /// Assumed sampling rate of the landmark stream. Typical: 30 Hz.
    pub sample_rate_hz: f32,
    /// Lower edge of the clinical resting-tremor band. Typical: 4 Hz.
    pub band_low_hz: f32,
    /// Upper edge of the clinical resting-tremor band. Typical: 6 Hz.
    pub band_high_hz: f32,
}

impl Default for TremorConfig {
    fn default() -> Self {
        Self {
            alpha: 0.4,
            sample_rate_hz: 30.0,
            band_low_hz: 4.0,
            band_high_hz: 6.0,
        }
    }
}

/// Analyzer for the static-tremor task
///
/// Feed it the relative vertical displacement each frame; once the
/// window fills, `analyze` reports the dominant frequency and the RMS
/// amplitude of the conditioned signal.
pub struct TremorAnalyzer {
    filter: LowPassFilter,
    buffer: SampleBuffer,
    config: TremorConfig,
}

impl TremorAnalyzer {
    pub fn new() -> Self {
        Self::with_config(TremorConfig::default())
    }

    pub fn with_config(config: TremorConfig) -> Self {
        Self {
            filter: LowPassFilter::new(config.alpha),
            buffer: SampleBuffer::new(),
            config,
        }
    }

    /// Condition and buffer one displacement sample. O(1).
    pub fn add_data_point(&mut self, value: f32) {
        let filtered = self.filter.filter(value);
        self.buffer.push(filtered);
    }

    /// Whether a full spectral window is available
    pub fn is_ready(&self) -> bool {
        self.buffer.is_full()
    }

    /// Analyze the current window.
    ///
    /// Idempotent read: no state changes, repeated calls return the
    /// same record. Until the window is full this returns the benign
    /// default with zeroed tremor fields.
    pub fn analyze(&self) -> MotorMetric {
        if !self.buffer.is_full() {
            return MotorMetric::benign();
        }

        let window = self.buffer.as_chronological();
        let dominant_hz = dominant_frequency(&window, self.config.sample_rate_hz);

        let rms = (window.iter().map(|v| v * v).sum::<f32>() / WINDOW_SIZE as f32).sqrt();

        let in_band =
            dominant_hz >= self.config.band_low_hz && dominant_hz <= self.config.band_high_hz;

        let mut metric = MotorMetric::benign();
        metric.amplitude = if in_band {
            Amplitude::Variable
        } else {
            Amplitude::Normal
        };
        metric.tremor_frequency_hz = round1(dominant_hz as f64);
        metric.tremor_amplitude = round2(rms as f64);
        metric
    }

    /// Clear buffer and filter memory for the next attempt
    pub fn reset(&mut self) {
        self.filter.reset();
        self.buffer.clear();
    }
}

impl Default for TremorAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Dominant frequency of the window: the non-DC bin with the largest
/// magnitude over the non-negative half of the spectrum, mapped through
/// bin * sample_rate / N.
fn dominant_frequency(window: &[f32; WINDOW_SIZE], sample_rate_hz: f32) -> f32 {
    let mut spectrum: Vec<Complex<f32>> =
        window.iter().map(|&v| Complex::new(v, 0.0)).collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(WINDOW_SIZE);
    fft.process(&mut spectrum);

    // Real input: bins above N/2 mirror the lower half
    let mut peak_bin = 0;
    let mut peak_magnitude = 0.0f32;
    for (bin, value) in spectrum.iter().take(WINDOW_SIZE / 2).enumerate().skip(1) {
        let magnitude = value.norm();
        if magnitude > peak_magnitude {
            peak_magnitude = magnitude;
            peak_bin = bin;
        }
    }

    peak_bin as f32 * (sample_rate_hz / WINDOW_SIZE as f32)
}
