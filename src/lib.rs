pub mod analysis;
pub mod codec;
pub mod config;
pub mod container;
pub mod error;
pub mod pipeline;
pub mod writers;

pub use analysis::{analyze, SignalStatistics};
pub use codec::{
    decode, encode, ByteOrder, CodecVariant, DecodedAudioBuffer, RawAudioBuffer,
};
pub use config::ProbeConfig;
pub use container::{read_container, write_container};
pub use error::ProbeError;
pub use pipeline::{
    emit_containers, load_capture, probe, probe_parallel, ProbeOutcome, ProbeReport,
    CANDIDATE_VARIANTS,
};
pub use writers::{ContainerSink, DirectorySink};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber: text output for interactive
/// debugging sessions, JSON when the probe runs unattended.
pub fn init_logging(rust_log: &str, json: bool) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(rust_log))?;

    let subscriber_builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    if json {
        subscriber_builder.json().with_current_span(true).init();
    } else {
        subscriber_builder.with_target(true).with_line_number(true).init();
    }
    Ok(())
}
