// src/pipeline.rs
//
// Blind probing: run a capture of unknown companding through every decode
// hypothesis, hand back statistics plus a playable container per candidate.
// The pipeline never picks a winner; without ground truth about the sender's
// encoding that decision belongs to whoever listens to the candidates.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use tokio::task::spawn_blocking;
use tracing::{debug, instrument, warn};

use crate::analysis::{analyze, SignalStatistics};
use crate::codec::{self, CodecVariant, RawAudioBuffer};
use crate::config::ProbeConfig;
use crate::container::write_container;
use crate::error::ProbeError;
use crate::writers::ContainerSink;

/// Fixed candidate order; reports iterate in this order regardless of how
/// the per-variant work was scheduled.
pub const CANDIDATE_VARIANTS: [CodecVariant; 4] = [
    CodecVariant::MuLaw,
    CodecVariant::ALaw,
    CodecVariant::LinearU8,
    CodecVariant::LinearS16,
];

/// One successful decode hypothesis: raw-domain statistics, the duration the
/// hypothesis implies, and a serialized container ready for playback.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub statistics: SignalStatistics,
    pub duration_seconds: f64,
    pub container: Vec<u8>,
}

/// All candidates of one probe run, keyed by variant. A failed candidate
/// (odd-length buffer under the 16-bit hypothesis) stays in the map as its
/// error; siblings are unaffected.
#[derive(Debug)]
pub struct ProbeReport {
    pub sample_rate_hz: u32,
    pub results: BTreeMap<CodecVariant, Result<ProbeOutcome, ProbeError>>,
}

impl ProbeReport {
    pub fn outcome(&self, variant: CodecVariant) -> Option<&ProbeOutcome> {
        match self.results.get(&variant) {
            Some(Ok(outcome)) => Some(outcome),
            _ => None,
        }
    }
}

fn probe_variant(
    raw: &[u8],
    sample_rate_hz: u32,
    variant: CodecVariant,
    config: &ProbeConfig,
) -> Result<ProbeOutcome, ProbeError> {
    let buffer = RawAudioBuffer::new(raw.to_vec(), sample_rate_hz, variant);
    let decoded = codec::decode(&buffer)?;
    let statistics = analyze(raw, config.silence_stddev_threshold, config.snapshot_len);
    let duration_seconds = decoded.duration_seconds();
    let container = write_container(&decoded, 16)?;
    debug!(
        variant = variant.label(),
        samples = decoded.samples.len(),
        duration_seconds,
        "Aday çözümleme tamamlandı."
    );
    Ok(ProbeOutcome {
        statistics,
        duration_seconds,
        container,
    })
}

/// Synchronous single-pass probe over all candidate variants.
#[instrument(skip_all, fields(bytes = raw.len(), sample_rate_hz))]
pub fn probe(raw: &[u8], sample_rate_hz: u32, config: &ProbeConfig) -> ProbeReport {
    let mut results = BTreeMap::new();
    for variant in CANDIDATE_VARIANTS {
        let result = probe_variant(raw, sample_rate_hz, variant, config);
        if let Err(err) = &result {
            warn!(variant = variant.label(), error = %err, "Aday çözümleme başarısız.");
        }
        results.insert(variant, result);
    }
    ProbeReport {
        sample_rate_hz,
        results,
    }
}

/// Same report as [`probe`], with each candidate offloaded to its own
/// blocking task. Candidates are independent, so completion order carries no
/// meaning; the map is keyed by variant and therefore deterministic.
#[instrument(skip_all, fields(bytes = raw.len(), sample_rate_hz))]
pub async fn probe_parallel(
    raw: Arc<Vec<u8>>,
    sample_rate_hz: u32,
    config: Arc<ProbeConfig>,
) -> ProbeReport {
    let tasks = CANDIDATE_VARIANTS.map(|variant| {
        let raw = raw.clone();
        let config = config.clone();
        spawn_blocking(move || {
            (
                variant,
                probe_variant(&raw, sample_rate_hz, variant, &config),
            )
        })
    });

    let mut results = BTreeMap::new();
    for joined in join_all(tasks).await {
        match joined {
            Ok((variant, result)) => {
                if let Err(err) = &result {
                    warn!(variant = variant.label(), error = %err, "Aday çözümleme başarısız.");
                }
                results.insert(variant, result);
            }
            Err(join_err) => {
                warn!(error = %join_err, "Aday çözümleme görevi düştü.");
            }
        }
    }
    ProbeReport {
        sample_rate_hz,
        results,
    }
}

/// Reads a raw capture from disk. A missing file is `NotFound` so the caller
/// can skip that probe; any other I/O error is an `IoFailure`.
pub async fn load_capture(path: impl AsRef<Path>) -> Result<Vec<u8>, ProbeError> {
    let path = path.as_ref();
    tokio::fs::read(path)
        .await
        .map_err(|e| ProbeError::from_io(e, "reading capture", path))
}

/// Writes one container per successful candidate as `<stem>_<label>.wav`,
/// returning the written paths. A failed write is reported and skipped; the
/// remaining candidates are still emitted.
pub async fn emit_containers(
    report: &ProbeReport,
    sink: &dyn ContainerSink,
    stem: &str,
) -> Vec<PathBuf> {
    let mut written = Vec::new();
    for (variant, result) in &report.results {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(_) => continue,
        };
        let file_name = format!("{}_{}.wav", stem, variant.label());
        match sink.write(&file_name, outcome.container.clone()).await {
            Ok(path) => written.push(path),
            Err(err) => {
                warn!(variant = variant.label(), error = %err, "Konteyner yazılamadı.");
            }
        }
    }
    written
}
