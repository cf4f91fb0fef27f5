/// Latency statistics over the passing repetitions of one performance-suite
/// endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyStats {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
    pub samples: usize,
}

impl LatencyStats {
    /// None when every repetition failed (no samples to aggregate).
    pub fn from_samples(samples: &[f64]) -> Option<LatencyStats> {
        if samples.is_empty() {
            return None;
        }
        let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let avg = samples.iter().sum::<f64>() / samples.len() as f64;
        Some(LatencyStats {
            min,
            avg,
            max,
            samples: samples.len(),
        })
    }

    /// Advisory slow-endpoint flag; never fails the run.
    pub fn is_slow(&self, threshold_ms: f64) -> bool {
        self.avg > threshold_ms
    }
}
