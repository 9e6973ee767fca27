// demos/blind_probe.rs
//
// End-to-end blind probe over a raw capture file. Everything is driven by
// the environment, no argument parsing:
//
//   PROBE_CAPTURE_PATH=call-leg.raw \
//   PROBE_DEFAULT_SAMPLE_RATE_HZ=8000 \
//   PROBE_OUTPUT_DIR=probe-output \
//   cargo run --example blind_probe
//
// One container per decode hypothesis lands in the output directory; pick
// the one that sounds like speech.

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use g711_probe::{
    emit_containers, load_capture, probe_parallel, DirectorySink, ProbeConfig, ProbeError,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Arc::new(ProbeConfig::load_from_env().context("Konfigürasyon yüklenemedi")?);
    g711_probe::init_logging(&config.rust_log, false)?;

    let capture_path =
        env::var("PROBE_CAPTURE_PATH").context("PROBE_CAPTURE_PATH ortam değişkeni eksik")?;

    let raw = match load_capture(&capture_path).await {
        Ok(bytes) => bytes,
        Err(ProbeError::NotFound { path }) => {
            warn!(path = %path, "Yakalama dosyası bulunamadı, bu sonda atlanıyor.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    info!(
        path = %capture_path,
        bytes = raw.len(),
        sample_rate_hz = config.default_sample_rate_hz,
        "Kör sondalama başlıyor."
    );

    let report = probe_parallel(
        Arc::new(raw),
        config.default_sample_rate_hz,
        config.clone(),
    )
    .await;

    for (variant, result) in &report.results {
        match result {
            Ok(outcome) => {
                let stats = &outcome.statistics;
                info!(
                    variant = variant.label(),
                    duration_seconds = outcome.duration_seconds,
                    min = stats.min,
                    max = stats.max,
                    mean = %format!("{:.2}", stats.mean),
                    std_dev = %format!("{:.2}", stats.std_dev),
                    unique_values = stats.unique_values,
                    is_silence = stats.is_silence,
                    snapshot = ?stats.snapshot,
                    "Aday hazır."
                );
            }
            Err(e) => warn!(variant = variant.label(), error = %e, "Aday başarısız."),
        }
    }

    let sink = DirectorySink::new(&config.output_dir);
    let written = emit_containers(&report, &sink, "probe").await;
    info!(count = written.len(), dir = %config.output_dir.display(), "Konteynerler yazıldı.");

    Ok(())
}
