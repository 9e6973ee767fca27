// src/container.rs
//
// Canonical uncompressed RIFF/WAVE container, little-endian throughout.
// Mono PCM only, 8 or 16 bits per sample, 44-byte header. The layout is the
// contract the external reporting surface plays candidates back from.

use bytes::{Buf, BufMut, BytesMut};
use crate::codec::DecodedAudioBuffer;
use crate::error::ProbeError;

pub const HEADER_LEN: usize = 44;
const FMT_CHUNK_LEN: u32 = 16;
const FORMAT_PCM: u16 = 1;
const CHANNELS: u16 = 1;

/// Serializes a decoded buffer at the requested bit depth.
///
/// 16-bit depth stores the samples verbatim (little-endian); 8-bit depth
/// keeps only the high byte, re-centered into the unsigned range, which is
/// lossy for anything finer than the byte grid.
pub fn write_container(
    buffer: &DecodedAudioBuffer,
    bits_per_sample: u16,
) -> Result<Vec<u8>, ProbeError> {
    if bits_per_sample != 8 && bits_per_sample != 16 {
        return Err(ProbeError::MalformedInput {
            detail: format!("unsupported bit depth {}", bits_per_sample),
        });
    }

    let bytes_per_sample = u32::from(bits_per_sample / 8);
    let data_size = buffer.samples.len() as u32 * bytes_per_sample;
    let byte_rate = buffer.sample_rate_hz * u32::from(CHANNELS) * bytes_per_sample;
    let block_align = CHANNELS * (bits_per_sample / 8);

    let mut out = BytesMut::with_capacity(HEADER_LEN + data_size as usize);
    out.put_slice(b"RIFF");
    out.put_u32_le(36 + data_size);
    out.put_slice(b"WAVE");
    out.put_slice(b"fmt ");
    out.put_u32_le(FMT_CHUNK_LEN);
    out.put_u16_le(FORMAT_PCM);
    out.put_u16_le(CHANNELS);
    out.put_u32_le(buffer.sample_rate_hz);
    out.put_u32_le(byte_rate);
    out.put_u16_le(block_align);
    out.put_u16_le(bits_per_sample);
    out.put_slice(b"data");
    out.put_u32_le(data_size);

    match bits_per_sample {
        8 => {
            for &s in &buffer.samples {
                out.put_u8(((i32::from(s) >> 8) + 128) as u8);
            }
        }
        _ => {
            for &s in &buffer.samples {
                out.put_i16_le(s);
            }
        }
    }

    Ok(out.to_vec())
}

fn malformed(detail: impl Into<String>) -> ProbeError {
    ProbeError::MalformedContainer {
        detail: detail.into(),
    }
}

fn expect_tag(cursor: &mut &[u8], tag: &[u8; 4], name: &str) -> Result<(), ProbeError> {
    let mut found = [0u8; 4];
    cursor.copy_to_slice(&mut found);
    if &found != tag {
        return Err(malformed(format!(
            "{} tag mismatch: expected {:?}, found {:?}",
            name, tag, found
        )));
    }
    Ok(())
}

/// Parses container bytes back into a decoded buffer, validating every
/// header field against the canonical layout. 8-bit payloads are re-expanded
/// through the centered-byte rule so a matching-depth round trip is exact.
pub fn read_container(data: &[u8]) -> Result<DecodedAudioBuffer, ProbeError> {
    if data.len() < HEADER_LEN {
        return Err(malformed(format!(
            "container too short: {} bytes, need at least {}",
            data.len(),
            HEADER_LEN
        )));
    }

    let mut cursor = data;
    expect_tag(&mut cursor, b"RIFF", "ChunkID")?;
    let chunk_size = cursor.get_u32_le();
    expect_tag(&mut cursor, b"WAVE", "Format")?;
    expect_tag(&mut cursor, b"fmt ", "Subchunk1ID")?;

    let fmt_len = cursor.get_u32_le();
    if fmt_len != FMT_CHUNK_LEN {
        return Err(malformed(format!("unexpected fmt chunk size {}", fmt_len)));
    }
    let format_tag = cursor.get_u16_le();
    if format_tag != FORMAT_PCM {
        return Err(malformed(format!("unsupported format tag {}", format_tag)));
    }
    let channels = cursor.get_u16_le();
    if channels != CHANNELS {
        return Err(malformed(format!("unsupported channel count {}", channels)));
    }
    let sample_rate_hz = cursor.get_u32_le();
    let byte_rate = cursor.get_u32_le();
    let block_align = cursor.get_u16_le();
    let bits_per_sample = cursor.get_u16_le();
    if bits_per_sample != 8 && bits_per_sample != 16 {
        return Err(malformed(format!("unsupported bit depth {}", bits_per_sample)));
    }

    let bytes_per_sample = u32::from(bits_per_sample / 8);
    if byte_rate != sample_rate_hz * u32::from(channels) * bytes_per_sample {
        return Err(malformed(format!("inconsistent byte rate {}", byte_rate)));
    }
    if block_align != channels * (bits_per_sample / 8) {
        return Err(malformed(format!("inconsistent block align {}", block_align)));
    }

    expect_tag(&mut cursor, b"data", "Subchunk2ID")?;
    let data_size = cursor.get_u32_le();
    if data_size as usize != cursor.remaining() {
        return Err(malformed(format!(
            "data size {} does not match {} payload bytes",
            data_size,
            cursor.remaining()
        )));
    }
    if chunk_size != 36 + data_size {
        return Err(malformed(format!("inconsistent chunk size {}", chunk_size)));
    }

    let samples: Vec<i16> = match bits_per_sample {
        8 => cursor.iter().map(|&b| (i16::from(b) - 128) * 256).collect(),
        _ => {
            if cursor.remaining() % 2 != 0 {
                return Err(malformed("odd 16-bit payload length"));
            }
            cursor
                .chunks_exact(2)
                .map(|c| i16::from_le_bytes([c[0], c[1]]))
                .collect()
        }
    };

    Ok(DecodedAudioBuffer {
        samples,
        sample_rate_hz,
        channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_buffer() -> DecodedAudioBuffer {
        let samples: Vec<i16> = (0..1000).map(|i| (i * 37 - 16000) as i16).collect();
        DecodedAudioBuffer::mono(samples, 8000)
    }

    #[test]
    fn test_header_layout() {
        let buffer = DecodedAudioBuffer::mono(vec![0i16; 4], 8000);
        let bytes = write_container(&buffer, 16).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 36 + 8);
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(u32::from_le_bytes(bytes[16..20].try_into().unwrap()), 16);
        assert_eq!(u16::from_le_bytes(bytes[20..22].try_into().unwrap()), 1);
        assert_eq!(u16::from_le_bytes(bytes[22..24].try_into().unwrap()), 1);
        assert_eq!(u32::from_le_bytes(bytes[24..28].try_into().unwrap()), 8000);
        assert_eq!(u32::from_le_bytes(bytes[28..32].try_into().unwrap()), 16000);
        assert_eq!(u16::from_le_bytes(bytes[32..34].try_into().unwrap()), 2);
        assert_eq!(u16::from_le_bytes(bytes[34..36].try_into().unwrap()), 16);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32::from_le_bytes(bytes[40..44].try_into().unwrap()), 8);
    }

    #[test]
    fn test_one_second_container_size() {
        let buffer = DecodedAudioBuffer::mono(vec![0i16; 8000], 8000);
        let bytes = write_container(&buffer, 16).unwrap();
        assert_eq!(bytes.len(), 44 + 16000);
    }

    #[test]
    fn test_round_trip_16_bit() {
        let buffer = ramp_buffer();
        let bytes = write_container(&buffer, 16).unwrap();
        assert_eq!(read_container(&bytes).unwrap(), buffer);
    }

    #[test]
    fn test_round_trip_8_bit_on_byte_grid() {
        // Samples born from the centered-byte expansion survive the 8-bit
        // depth exactly.
        let samples: Vec<i16> = (0..=255).map(|b| (b - 128) * 256).collect();
        let buffer = DecodedAudioBuffer::mono(samples, 8000);
        let bytes = write_container(&buffer, 8).unwrap();
        assert_eq!(read_container(&bytes).unwrap(), buffer);
    }

    #[test]
    fn test_rejects_unsupported_depth() {
        let err = write_container(&ramp_buffer(), 24).unwrap_err();
        assert!(matches!(err, ProbeError::MalformedInput { .. }));
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = write_container(&ramp_buffer(), 16).unwrap();
        bytes[0] = b'X';
        assert!(matches!(
            read_container(&bytes).unwrap_err(),
            ProbeError::MalformedContainer { .. }
        ));
    }

    #[test]
    fn test_rejects_truncated_payload() {
        let bytes = write_container(&ramp_buffer(), 16).unwrap();
        let truncated = &bytes[..bytes.len() - 10];
        assert!(matches!(
            read_container(truncated).unwrap_err(),
            ProbeError::MalformedContainer { .. }
        ));
    }

    #[test]
    fn test_rejects_non_pcm_format_tag() {
        let mut bytes = write_container(&ramp_buffer(), 16).unwrap();
        bytes[20] = 3; // IEEE float
        assert!(matches!(
            read_container(&bytes).unwrap_err(),
            ProbeError::MalformedContainer { .. }
        ));
    }

    #[test]
    fn test_rejects_short_input() {
        assert!(matches!(
            read_container(&[0u8; 20]).unwrap_err(),
            ProbeError::MalformedContainer { .. }
        ));
    }

    #[test]
    fn test_hound_reads_our_bytes() {
        let buffer = ramp_buffer();
        let bytes = write_container(&buffer, 16).unwrap();
        let mut reader = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 8000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);
        let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(samples, buffer.samples);
    }

    #[test]
    fn test_we_read_hound_bytes() {
        let buffer = ramp_buffer();
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &s in &buffer.samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        assert_eq!(read_container(&cursor.into_inner()).unwrap(), buffer);
    }
}
