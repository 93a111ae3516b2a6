//! Base64 PCM codec.
//!
//! Payloads are headerless signed 16-bit little-endian mono PCM, base64
//! encoded with the standard alphabet. The sample rate travels out of band.
//! Decoding ignores ASCII whitespace anywhere in the payload (MIME-style
//! line breaks) and accepts missing padding; encoding always pads.
//!
//! Decoding divides by 32768, so normalized samples land in
//! `[-1.0, 32767/32768]`. [`encode_pcm_base64`] applies the exact inverse
//! (`* 32768`, saturated), which reproduces decoded payloads byte for byte.
//! Export uses a different, sign-split rule; see `monovox_export`.

use crate::buffer::SampleBuffer;
use crate::{Error, Result};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;

/// Standard alphabet, padding optional on decode.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Normalization divisor for decode and its inverse.
pub const PCM_SCALE: f32 = 32768.0;

/// Decode a base64 PCM payload into a sample buffer.
///
/// An odd trailing byte is dropped. A payload that decodes to zero bytes is
/// [`Error::EmptyAudio`]; malformed base64 is [`Error::DecodeFailure`].
pub fn decode(payload: &str, sample_rate: u32) -> Result<SampleBuffer> {
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = PAYLOAD_ENGINE.decode(compact)?;
    decode_pcm_bytes(&bytes, sample_rate)
}

/// Decode raw little-endian i16 bytes into a sample buffer.
pub fn decode_pcm_bytes(bytes: &[u8], sample_rate: u32) -> Result<SampleBuffer> {
    if bytes.is_empty() {
        return Err(Error::EmptyAudio);
    }

    let even_len = bytes.len() & !1;
    if even_len != bytes.len() {
        tracing::warn!(
            "PCM payload has odd length {}, dropping trailing byte",
            bytes.len()
        );
    }
    if even_len == 0 {
        // A single dangling byte carries no sample
        return Err(Error::EmptyAudio);
    }

    let samples: Vec<f32> = bytes[..even_len]
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / PCM_SCALE)
        .collect();

    let buffer = SampleBuffer::new(samples, sample_rate)?;
    tracing::debug!(
        "Decoded {} samples at {} Hz ({:.3}s)",
        buffer.len(),
        buffer.sample_rate(),
        buffer.duration()
    );
    Ok(buffer)
}

/// Inverse of [`decode`]: re-quantize with the codec's own scale and
/// base64 encode the little-endian bytes.
pub fn encode_pcm_base64(buffer: &SampleBuffer) -> String {
    STANDARD.encode(encode_pcm_bytes(buffer))
}

/// Raw little-endian i16 bytes for a buffer, using the codec's scale.
pub fn encode_pcm_bytes(buffer: &SampleBuffer) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(buffer.len() * 2);
    for &sample in buffer.samples() {
        bytes.extend_from_slice(&normalized_to_pcm(sample).to_le_bytes());
    }
    bytes
}

/// `round(x * 32768)` saturated to the i16 range.
#[inline]
pub fn normalized_to_pcm(sample: f32) -> i16 {
    // `as` saturates and maps NaN to 0
    (sample * PCM_SCALE).round() as i16
}
