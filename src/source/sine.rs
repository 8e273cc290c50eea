use std::f64::consts::PI;

use super::SampleSource;

/// Periodic sine generator: `amplitude * sin(2 * pi * frequency * t)`
#[derive(Debug, Clone)]
pub struct SineWave {
    /// Signal frequency in Hz
    frequency: f64,
    /// Samples per second
    sample_rate: f64,
    /// Peak amplitude
    amplitude: f64,
    /// Index of the last sample produced
    index: u64,
}

impl SineWave {
    /// Creates a new sine generator
    pub fn new(frequency: f64, sample_rate: f64, amplitude: f64) -> Self {
        SineWave {
            frequency,
            sample_rate,
            amplitude,
            index: 0,
        }
    }
}

impl SampleSource for SineWave {
    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn next_sample(&mut self) -> f32 {
        // Time advances before the first sample, so it is taken at t = 1/rate
        self.index += 1;
        let t = self.index as f64 / self.sample_rate;
        (self.amplitude * (2.0 * PI * self.frequency * t).sin()) as f32
    }
}
