// src/config.rs
use std::env;
use std::path::PathBuf;
use anyhow::{bail, Context, Result};

/// Runtime knobs of the diagnostic pipeline, loaded from the environment.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Directory the pipeline emits candidate containers into.
    pub output_dir: PathBuf,
    /// Silence heuristic cutoff over raw byte standard deviation. Tuned for
    /// near-constant unsigned 8-bit streams; not validated for companded or
    /// 16-bit domains, which is why it is a knob and not a constant.
    pub silence_stddev_threshold: f64,
    /// How many leading bytes of a capture to keep as a diagnostic snapshot.
    pub snapshot_len: usize,
    /// Sample rate assumed for captures that carry no rate metadata.
    pub default_sample_rate_hz: u32,
    pub rust_log: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("probe-output"),
            silence_stddev_threshold: 5.0,
            snapshot_len: 16,
            default_sample_rate_hz: 8000,
            rust_log: "info".to_string(),
        }
    }
}

impl ProbeConfig {
    pub fn load_from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = ProbeConfig::default();

        let output_dir = PathBuf::from(
            env::var("PROBE_OUTPUT_DIR").unwrap_or_else(|_| "probe-output".to_string()),
        );

        let silence_stddev_threshold: f64 = env::var("PROBE_SILENCE_STDDEV_THRESHOLD")
            .unwrap_or_else(|_| defaults.silence_stddev_threshold.to_string())
            .parse()
            .context("PROBE_SILENCE_STDDEV_THRESHOLD geçerli bir sayı değil")?;

        if silence_stddev_threshold < 0.0 {
            bail!("PROBE_SILENCE_STDDEV_THRESHOLD negatif olamaz.");
        }

        let snapshot_len: usize = env::var("PROBE_SNAPSHOT_LEN")
            .unwrap_or_else(|_| defaults.snapshot_len.to_string())
            .parse()
            .context("PROBE_SNAPSHOT_LEN geçerli bir uzunluk değil")?;

        let default_sample_rate_hz: u32 = env::var("PROBE_DEFAULT_SAMPLE_RATE_HZ")
            .unwrap_or_else(|_| defaults.default_sample_rate_hz.to_string())
            .parse()
            .context("PROBE_DEFAULT_SAMPLE_RATE_HZ geçerli bir örnekleme hızı değil")?;

        if default_sample_rate_hz == 0 {
            bail!("PROBE_DEFAULT_SAMPLE_RATE_HZ sıfır olamaz.");
        }

        Ok(ProbeConfig {
            output_dir,
            silence_stddev_threshold,
            snapshot_len,
            default_sample_rate_hz,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
