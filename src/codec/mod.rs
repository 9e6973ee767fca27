// src/codec/mod.rs

pub mod tables;

use crate::error::ProbeError;
use tables::{alaw_table, linear_to_alaw, linear_to_mulaw, mulaw_table};

/// Byte order of 16-bit linear input. The telephony captures seen so far are
/// little-endian, but the assumption is explicit instead of inherited from
/// the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

/// The closed set of decode hypotheses the probing pipeline considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CodecVariant {
    /// G.711 μ-law (North America / Japan carrier legs).
    MuLaw,
    /// G.711 A-law (European carrier legs).
    ALaw,
    /// Uncompanded centered 8-bit linear PCM. Some transports deliver this;
    /// misreading it as companded is exactly the garbage the pipeline exists
    /// to catch.
    LinearU8,
    /// Plain 16-bit linear PCM (the AI-service leg at 16/24 kHz).
    LinearS16,
}

impl CodecVariant {
    pub fn bits_per_codeword(&self) -> u16 {
        match self {
            CodecVariant::LinearS16 => 16,
            _ => 8,
        }
    }

    /// Whether decode goes through a companding lookup table, as opposed to
    /// direct reinterpretation of the bytes.
    pub fn is_table_driven(&self) -> bool {
        matches!(self, CodecVariant::MuLaw | CodecVariant::ALaw)
    }

    /// Stable lowercase label, used in emitted file names and log fields.
    pub fn label(&self) -> &'static str {
        match self {
            CodecVariant::MuLaw => "mulaw",
            CodecVariant::ALaw => "alaw",
            CodecVariant::LinearU8 => "linear_u8",
            CodecVariant::LinearS16 => "linear_s16",
        }
    }
}

/// A captured byte buffer plus the metadata the capture came with. The
/// sample rate is caller-supplied, never inferred from the payload.
#[derive(Debug, Clone)]
pub struct RawAudioBuffer {
    data: Vec<u8>,
    sample_rate_hz: u32,
    variant: CodecVariant,
    byte_order: ByteOrder,
}

impl RawAudioBuffer {
    pub fn new(data: Vec<u8>, sample_rate_hz: u32, variant: CodecVariant) -> Self {
        Self {
            data,
            sample_rate_hz,
            variant,
            byte_order: ByteOrder::Little,
        }
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    pub fn variant(&self) -> CodecVariant {
        self.variant
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }
}

/// Linear 16-bit mono PCM, the common currency every consumer works in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAudioBuffer {
    pub samples: Vec<i16>,
    pub sample_rate_hz: u32,
    pub channels: u16,
}

impl DecodedAudioBuffer {
    pub fn mono(samples: Vec<i16>, sample_rate_hz: u32) -> Self {
        Self {
            samples,
            sample_rate_hz,
            channels: 1,
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate_hz)
    }
}

/// Expands a raw buffer into linear PCM under the buffer's assumed variant.
///
/// Companded and 8-bit linear input decode totally (every byte is a valid
/// codeword); 16-bit linear input must be even-length.
pub fn decode(raw: &RawAudioBuffer) -> Result<DecodedAudioBuffer, ProbeError> {
    let samples = match raw.variant() {
        CodecVariant::MuLaw => {
            let table = mulaw_table();
            raw.data().iter().map(|&b| table.get(b)).collect()
        }
        CodecVariant::ALaw => {
            let table = alaw_table();
            raw.data().iter().map(|&b| table.get(b)).collect()
        }
        CodecVariant::LinearU8 => raw
            .data()
            .iter()
            .map(|&b| (i16::from(b) - 128) * 256)
            .collect(),
        CodecVariant::LinearS16 => {
            if raw.data().len() % 2 != 0 {
                return Err(ProbeError::MalformedInput {
                    detail: format!(
                        "16-bit linear decode needs an even byte count, got {}",
                        raw.data().len()
                    ),
                });
            }
            let pairs = raw.data().chunks_exact(2);
            match raw.byte_order() {
                ByteOrder::Little => pairs.map(|c| i16::from_le_bytes([c[0], c[1]])).collect(),
                ByteOrder::Big => pairs.map(|c| i16::from_be_bytes([c[0], c[1]])).collect(),
            }
        }
    };
    Ok(DecodedAudioBuffer::mono(samples, raw.sample_rate_hz()))
}

/// Inverse of [`decode`]: compresses linear PCM back into the codeword
/// domain of `variant`. Total for every variant; companding is lossy by one
/// quantization step, LinearU8 by the discarded low byte.
pub fn encode(
    buffer: &DecodedAudioBuffer,
    variant: CodecVariant,
    byte_order: ByteOrder,
) -> RawAudioBuffer {
    let data: Vec<u8> = match variant {
        CodecVariant::MuLaw => buffer.samples.iter().map(|&s| linear_to_mulaw(s)).collect(),
        CodecVariant::ALaw => buffer.samples.iter().map(|&s| linear_to_alaw(s)).collect(),
        CodecVariant::LinearU8 => buffer
            .samples
            .iter()
            .map(|&s| ((i32::from(s) >> 8) + 128) as u8)
            .collect(),
        CodecVariant::LinearS16 => buffer
            .samples
            .iter()
            .flat_map(|&s| match byte_order {
                ByteOrder::Little => s.to_le_bytes(),
                ByteOrder::Big => s.to_be_bytes(),
            })
            .collect(),
    };
    RawAudioBuffer::new(data, buffer.sample_rate_hz, variant).with_byte_order(byte_order)
}
