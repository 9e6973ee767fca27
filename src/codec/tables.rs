// src/codec/tables.rs
//
// Canonical G.711 companding math. The decode formulas below are the single
// source of truth for both laws; every other component goes through the
// cached tables instead of re-deriving the bit layout.

use once_cell::sync::Lazy;

/// Decode lookup table for one companding law: codeword byte -> linear i16.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompandingTable([i16; 256]);

impl CompandingTable {
    #[inline]
    pub fn get(&self, codeword: u8) -> i16 {
        self.0[usize::from(codeword)]
    }

    pub fn as_slice(&self) -> &[i16] {
        &self.0
    }
}

const MULAW_BIAS: i32 = 0x84;
const MULAW_CLIP: i32 = 32635;
const ALAW_CLIP: i32 = 32256;

// Exponent (segment) per biased-magnitude high byte. Indexed by
// (magnitude + BIAS) >> 7.
static MULAW_EXPONENT: [u8; 256] = [
    0, 0, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4,
    5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5,
    6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6,
    6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
];

/// Closed-form μ-law codeword expansion (ITU-T G.711 bit layout, bias 0x84).
#[inline]
pub fn mulaw_to_linear(codeword: u8) -> i16 {
    let val = !codeword;
    let sign = val & 0x80;
    let exponent = i32::from((val >> 4) & 0x07);
    let mantissa = i32::from(val & 0x0f);
    let magnitude = (((mantissa << 3) + MULAW_BIAS) << exponent) - MULAW_BIAS;
    if sign != 0 {
        -magnitude as i16
    } else {
        magnitude as i16
    }
}

/// A-law codeword expansion (XOR 0x55 transform, segment 0 un-shifted).
#[inline]
pub fn alaw_to_linear(codeword: u8) -> i16 {
    let val = codeword ^ 0x55;
    let sign = val & 0x80;
    let exponent = i32::from((val >> 4) & 0x07);
    let mantissa = i32::from(val & 0x0f);
    let magnitude = if exponent == 0 {
        (mantissa << 4) + 8
    } else {
        ((mantissa << 4) + 0x108) << (exponent - 1)
    };
    if sign != 0 {
        -magnitude as i16
    } else {
        magnitude as i16
    }
}

/// Encodes one linear PCM sample as a μ-law codeword.
///
/// Bias method: clip, add 0x84, pick the segment from the high byte, keep the
/// top four mantissa bits of that segment, then apply the bitwise-NOT
/// transform. Arithmetic is widened to i32 so `i16::MIN` negates safely.
#[inline]
pub fn linear_to_mulaw(sample: i16) -> u8 {
    let mut pcm = i32::from(sample);
    let sign: u8 = if pcm < 0 {
        pcm = -pcm;
        0x80
    } else {
        0
    };
    if pcm > MULAW_CLIP {
        pcm = MULAW_CLIP;
    }
    pcm += MULAW_BIAS;
    let exponent = MULAW_EXPONENT[((pcm >> 7) & 0xff) as usize];
    let mantissa = ((pcm >> (i32::from(exponent) + 3)) & 0x0f) as u8;
    !(sign | (exponent << 4) | mantissa)
}

/// Encodes one linear PCM sample as an A-law codeword.
///
/// Exact inverse of [`alaw_to_linear`]: segment 0 covers magnitudes below
/// 256, higher segments are located by the bit length of `magnitude >> 8`.
#[inline]
pub fn linear_to_alaw(sample: i16) -> u8 {
    let mut pcm = i32::from(sample);
    let sign: u8 = if pcm < 0 {
        pcm = -pcm;
        0x80
    } else {
        0
    };
    if pcm > ALAW_CLIP {
        pcm = ALAW_CLIP;
    }
    let (exponent, mantissa) = if pcm < 256 {
        (0u8, ((pcm >> 4) & 0x0f) as u8)
    } else {
        let exponent = (32 - ((pcm >> 8) as u32).leading_zeros()) as u8;
        let mantissa = ((pcm >> (i32::from(exponent) + 3)) & 0x0f) as u8;
        (exponent, mantissa)
    };
    (sign | (exponent << 4) | mantissa) ^ 0x55
}

fn build_table(expand: fn(u8) -> i16) -> CompandingTable {
    let mut entries = [0i16; 256];
    for (i, entry) in entries.iter_mut().enumerate() {
        *entry = expand(i as u8);
    }
    CompandingTable(entries)
}

pub fn build_mulaw_table() -> CompandingTable {
    build_table(mulaw_to_linear)
}

pub fn build_alaw_table() -> CompandingTable {
    build_table(alaw_to_linear)
}

// Built on first use, shared read-only for the process lifetime.
static MULAW_TABLE: Lazy<CompandingTable> = Lazy::new(build_mulaw_table);
static ALAW_TABLE: Lazy<CompandingTable> = Lazy::new(build_alaw_table);

pub fn mulaw_table() -> &'static CompandingTable {
    &MULAW_TABLE
}

pub fn alaw_table() -> &'static CompandingTable {
    &ALAW_TABLE
}

/// Width of one quantization step in the segment the codeword sits in.
/// Grows geometrically with the exponent; this is the non-uniform error
/// bound companding guarantees on round trips.
pub fn quantization_step(variant_is_alaw: bool, codeword: u8) -> i32 {
    if variant_is_alaw {
        let exponent = i32::from(((codeword ^ 0x55) >> 4) & 0x07);
        if exponent == 0 {
            16
        } else {
            16 << (exponent - 1)
        }
    } else {
        let exponent = i32::from(((!codeword) >> 4) & 0x07);
        8 << exponent
    }
}
