// tests/pipeline_test.rs
//
// End-to-end coverage of the blind-probe pipeline: capture in, candidate
// containers out, with files on a real (temporary) filesystem.

use std::sync::Arc;

use g711_probe::{
    decode, emit_containers, encode, load_capture, probe, probe_parallel, read_container,
    ByteOrder, CodecVariant, DecodedAudioBuffer, DirectorySink, ProbeConfig, ProbeError,
    RawAudioBuffer, CANDIDATE_VARIANTS,
};
use rand::{Rng, SeedableRng};

fn speech_like_samples(len: usize) -> Vec<i16> {
    // Deterministic pseudo-speech: a coarse sine with random jitter.
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    (0..len)
        .map(|i| {
            let base = (f64::sin(i as f64 / 23.0) * 9000.0) as i32;
            (base + rng.gen_range(-500..=500)).clamp(-32000, 32000) as i16
        })
        .collect()
}

#[test]
fn probe_recovers_mulaw_capture() {
    let config = ProbeConfig::default();
    let original = DecodedAudioBuffer::mono(speech_like_samples(800), 8000);
    let capture = encode(&original, CodecVariant::MuLaw, ByteOrder::Little);

    let report = probe(capture.data(), 8000, &config);
    let outcome = report.outcome(CodecVariant::MuLaw).expect("mulaw candidate");

    // The μ-law candidate's container holds exactly the table expansion of
    // the capture bytes.
    let expected = decode(&capture).unwrap();
    let container = read_container(&outcome.container).unwrap();
    assert_eq!(container, expected);
    assert_eq!(outcome.duration_seconds, 0.1);
    assert!(!outcome.statistics.is_silence);

    // Every candidate is present; none of them failed on this even-length
    // capture, and no candidate was ranked above another.
    assert_eq!(report.results.len(), CANDIDATE_VARIANTS.len());
    assert!(report.results.values().all(Result::is_ok));
}

#[tokio::test]
async fn parallel_probe_matches_sync_probe() {
    let config = Arc::new(ProbeConfig::default());
    let raw: Vec<u8> = (0..1600u32).map(|i| (i % 251) as u8).collect();

    let sync_report = probe(&raw, 8000, &config);
    let parallel_report = probe_parallel(Arc::new(raw), 8000, config).await;

    assert_eq!(
        sync_report.results.len(),
        parallel_report.results.len()
    );
    for variant in CANDIDATE_VARIANTS {
        let a = sync_report.outcome(variant).expect("sync outcome");
        let b = parallel_report.outcome(variant).expect("parallel outcome");
        assert_eq!(a.container, b.container, "{:?}", variant);
        assert_eq!(a.duration_seconds, b.duration_seconds);
        assert_eq!(a.statistics, b.statistics);
    }
}

#[tokio::test]
async fn emitted_containers_are_playable_files() {
    let config = ProbeConfig::default();
    let dir = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(dir.path());

    let report = probe(&[0x80u8; 8000], 8000, &config);
    let written = emit_containers(&report, &sink, "leg_a").await;
    assert_eq!(written.len(), CANDIDATE_VARIANTS.len());

    for path in &written {
        let bytes = tokio::fs::read(path).await.unwrap();
        let parsed = read_container(&bytes).unwrap();
        assert_eq!(parsed.sample_rate_hz, 8000);
        assert_eq!(parsed.channels, 1);
        // hound agrees our emitted files are valid WAV.
        let reader = hound::WavReader::open(path).unwrap();
        assert_eq!(reader.spec().sample_rate, 8000);
    }

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert!(names.contains(&"leg_a_mulaw.wav".to_string()));
    assert!(names.contains(&"leg_a_linear_s16.wav".to_string()));
}

#[tokio::test]
async fn failed_candidates_are_not_emitted() {
    let config = ProbeConfig::default();
    let dir = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(dir.path());

    // Odd length: the 16-bit hypothesis fails, the other three still emit.
    let report = probe(&[0x55u8; 161], 8000, &config);
    let written = emit_containers(&report, &sink, "leg_b").await;
    assert_eq!(written.len(), CANDIDATE_VARIANTS.len() - 1);
    assert!(written
        .iter()
        .all(|p| !p.to_string_lossy().contains("linear_s16")));
}

#[tokio::test]
async fn capture_loading_distinguishes_missing_from_broken() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("no-such-capture.raw");
    let err = load_capture(&missing).await.unwrap_err();
    assert!(matches!(err, ProbeError::NotFound { .. }));

    let present = dir.path().join("capture.raw");
    tokio::fs::write(&present, [1u8, 2, 3, 4]).await.unwrap();
    assert_eq!(load_capture(&present).await.unwrap(), vec![1, 2, 3, 4]);
}

#[test]
fn ai_leg_linear_pcm_passes_through() {
    // The AI-service leg delivers 16 kHz linear PCM; only the LinearS16
    // path touches it and the samples survive bit-exactly.
    let samples = speech_like_samples(1600);
    let buffer = DecodedAudioBuffer::mono(samples.clone(), 16000);
    let wire = encode(&buffer, CodecVariant::LinearS16, ByteOrder::Little);
    let raw = RawAudioBuffer::new(wire.data().to_vec(), 16000, CodecVariant::LinearS16);
    let decoded = decode(&raw).unwrap();
    assert_eq!(decoded.samples, samples);
    assert_eq!(decoded.duration_seconds(), 0.1);
}
