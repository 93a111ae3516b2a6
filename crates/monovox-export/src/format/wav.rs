//! WAV format encoder using hound
//!
//! Writes 16-bit PCM mono: a 44-byte RIFF/WAVE header (plain `WAVEFORMAT`
//! `fmt ` chunk, tag 1) followed by little-endian samples.

use crate::error::Result;
use hound::{SampleFormat, WavSpec, WavWriter};
use monovox_core::SampleBuffer;
use std::io::{Seek, Write};
use std::path::Path;

/// Size of the header hound writes for 16-bit mono PCM.
pub const WAV_HEADER_LEN: usize = 44;

const BITS_PER_SAMPLE: u16 = 16;

/// Encode a sample buffer to WAV in memory
///
/// # Returns
/// WAV file bytes: 44-byte header plus two bytes per sample
pub fn encode_wav(buffer: &SampleBuffer) -> Result<Vec<u8>> {
    let spec = wav_spec(buffer);

    let mut bytes = Vec::with_capacity(WAV_HEADER_LEN + buffer.len() * 2);
    {
        let cursor = std::io::Cursor::new(&mut bytes);
        let mut writer = WavWriter::new(cursor, spec)?;

        write_samples(&mut writer, buffer.samples())?;

        // Finalize patches the RIFF and data sizes
        writer.finalize()?;
    }

    log::debug!(
        "Encoded {} samples at {} Hz into {} WAV bytes",
        buffer.len(),
        buffer.sample_rate(),
        bytes.len()
    );
    Ok(bytes)
}

/// Encode a sample buffer to a WAV file on disk
pub fn export_wav_file(buffer: &SampleBuffer, path: &Path) -> Result<()> {
    let spec = wav_spec(buffer);
    let mut writer = WavWriter::create(path, spec)?;

    write_samples(&mut writer, buffer.samples())?;

    writer.finalize()?;

    log::info!(
        "Exported {:.2}s of audio to {}",
        buffer.duration(),
        path.display()
    );
    Ok(())
}

fn wav_spec(buffer: &SampleBuffer) -> WavSpec {
    WavSpec {
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

fn write_samples<W: Write + Seek>(writer: &mut WavWriter<W>, samples: &[f32]) -> Result<()> {
    for &sample in samples {
        writer.write_sample(float_to_i16(sample))?;
    }
    Ok(())
}

/// Convert float sample to 16-bit integer with clipping.
///
/// Negative values scale by 32768 and non-negative by 32767, so both ends
/// of [-1, 1] land exactly on the i16 limits. Fractions truncate toward
/// zero. NaN becomes 0.
#[inline]
pub fn float_to_i16(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped < 0.0 {
        (clamped * 32768.0) as i16
    } else {
        (clamped * 32767.0) as i16
    }
}
