// src/analysis.rs
//
// Descriptive statistics over the UNDECODED byte domain. These exist so a
// human comparing probe candidates can spot near-constant streams and
// obviously-wrong decode hypotheses without listening first.

use crate::codec::DecodedAudioBuffer;

/// Fixed-shape statistics record, recomputed on demand and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalStatistics {
    pub count: usize,
    pub min: u8,
    pub max: u8,
    pub mean: f64,
    /// Population standard deviation of the raw bytes.
    pub std_dev: f64,
    /// How many distinct byte values occur (1 means a constant stream).
    pub unique_values: usize,
    /// `std_dev` below the configured threshold. Only meaningful for
    /// unsigned 8-bit input; do not apply it to 16-bit domains.
    pub is_silence: bool,
    /// First bytes of the capture, kept verbatim for log output.
    pub snapshot: Vec<u8>,
}

/// Single pass over the raw bytes. An empty buffer reports zeroed statistics
/// and counts as silence.
pub fn analyze(data: &[u8], silence_stddev_threshold: f64, snapshot_len: usize) -> SignalStatistics {
    let count = data.len();
    let snapshot = data[..snapshot_len.min(count)].to_vec();

    if count == 0 {
        return SignalStatistics {
            count: 0,
            min: 0,
            max: 0,
            mean: 0.0,
            std_dev: 0.0,
            unique_values: 0,
            is_silence: true,
            snapshot,
        };
    }

    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum: u64 = 0;
    let mut sum_sq: u64 = 0;
    let mut seen = [false; 256];

    for &b in data {
        min = min.min(b);
        max = max.max(b);
        sum += u64::from(b);
        sum_sq += u64::from(b) * u64::from(b);
        seen[usize::from(b)] = true;
    }

    let n = count as f64;
    let mean = sum as f64 / n;
    let variance = (sum_sq as f64 / n - mean * mean).max(0.0);
    let std_dev = variance.sqrt();

    SignalStatistics {
        count,
        min,
        max,
        mean,
        std_dev,
        unique_values: seen.iter().filter(|&&s| s).count(),
        is_silence: std_dev < silence_stddev_threshold,
        snapshot,
    }
}

/// Playback length of a decoded buffer, in seconds.
pub fn duration_seconds(buffer: &DecodedAudioBuffer) -> f64 {
    buffer.duration_seconds()
}
