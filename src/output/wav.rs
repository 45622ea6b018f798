// syn-kick -- a 909-style kick drum synthesizer
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Writing mono 24 bit linear PCM WAV files.
//!
//! The header carries the total size of the sample data, so the writer needs all
//! samples up front. It does not support patching the header afterwards.

use std::convert::TryFrom;
use std::io;

use log::trace;
use snafu::{OptionExt, ResultExt, Snafu};

use crate::wave::SampleBuffer;

/// Size of the RIFF/WAVE header in bytes.
pub const HEADER_LEN: usize = 44;
/// Bytes per encoded sample.
pub const BYTES_PER_SAMPLE: usize = 3;
/// Largest 24 bit sample value, also the scale factor for `1.0`.
pub const MAX_SAMPLE: i32 = 8_388_607;
/// Smallest 24 bit sample value.
pub const MIN_SAMPLE: i32 = -8_388_608;

/// Number of samples encoded at once before handing them to the sink.
const CHUNK_SAMPLES: usize = 4096;

const AUDIO_FORMAT_PCM: u16 = 1;
const FMT_CHUNK_LEN: u32 = 16;
/// Bytes of the RIFF chunk preceding the sample data, not counting "RIFF" and the size itself.
const RIFF_OVERHEAD: u32 = 36;

#[derive(Debug, Snafu)]
pub enum WavError {
    #[snafu(display("{} samples do not fit into a WAV file", sample_count))]
    TooManySamples { sample_count: usize },
    #[snafu(display("Sample rate {} Hz is too high for a WAV header", sample_rate))]
    SampleRateTooHigh { sample_rate: u32 },
    #[snafu(display("Failed to write WAV header: {}", source))]
    WriteHeader { source: io::Error },
    #[snafu(display("Failed to write samples starting at {}: {}", offset, source))]
    WriteSamples { offset: usize, source: io::Error },
    #[snafu(display("Failed to flush WAV data: {}", source))]
    Flush { source: io::Error },
}

/// The fields of a canonical 44 byte PCM WAV header.
///
/// ```
/// use syn_kick::output::wav::WavHeader;
///
/// let header = WavHeader::mono_24bit(48000, 48000).unwrap();
/// assert_eq!(header.data_len, 144000);
/// assert_eq!(header.byte_rate(), 144000);
/// assert_eq!(header.riff_len(), 144036);
///
/// let bytes = header.to_bytes();
/// assert_eq!(&bytes[0..4], b"RIFF");
/// assert_eq!(&bytes[36..40], b"data");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// Size of the sample data in bytes.
    pub data_len: u32,
}

impl WavHeader {
    /// Header for `sample_count` mono samples of 24 bits each.
    pub fn mono_24bit(sample_rate: u32, sample_count: usize) -> Result<Self, WavError> {
        let data_len = sample_count
            .checked_mul(BYTES_PER_SAMPLE)
            .and_then(|len| u32::try_from(len).ok())
            .filter(|len| len.checked_add(RIFF_OVERHEAD).is_some())
            .context(TooManySamples { sample_count })?;
        let header = WavHeader {
            channels: 1,
            sample_rate,
            bits_per_sample: 24,
            data_len,
        };
        sample_rate
            .checked_mul(u32::from(header.block_align()))
            .context(SampleRateTooHigh { sample_rate })?;
        Ok(header)
    }

    /// Bytes per sample frame across all channels.
    pub fn block_align(&self) -> u16 {
        self.channels * (self.bits_per_sample / 8)
    }

    /// Bytes per second of audio.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate.wrapping_mul(u32::from(self.block_align()))
    }

    /// Size of the RIFF chunk as stored in the header.
    pub fn riff_len(&self) -> u32 {
        RIFF_OVERHEAD.wrapping_add(self.data_len)
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(b"RIFF");
        bytes[4..8].copy_from_slice(&self.riff_len().to_le_bytes());
        bytes[8..12].copy_from_slice(b"WAVE");

        bytes[12..16].copy_from_slice(b"fmt ");
        bytes[16..20].copy_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
        bytes[20..22].copy_from_slice(&AUDIO_FORMAT_PCM.to_le_bytes());
        bytes[22..24].copy_from_slice(&self.channels.to_le_bytes());
        bytes[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        bytes[28..32].copy_from_slice(&self.byte_rate().to_le_bytes());
        bytes[32..34].copy_from_slice(&self.block_align().to_le_bytes());
        bytes[34..36].copy_from_slice(&self.bits_per_sample.to_le_bytes());

        bytes[36..40].copy_from_slice(b"data");
        bytes[40..44].copy_from_slice(&self.data_len.to_le_bytes());
        bytes
    }
}

/// Convert a floating point sample to a signed 24 bit value.
///
/// The value is clipped to `[-1.0, 1.0]`, scaled by [`MAX_SAMPLE`], rounded half
/// away from zero and clipped once more to the 24 bit range. NaN becomes 0.
///
/// ```
/// use syn_kick::output::wav::*;
///
/// assert_eq!(encode_sample(1.0), MAX_SAMPLE);
/// assert_eq!(encode_sample(-1.0), -MAX_SAMPLE);
/// assert_eq!(encode_sample(3.5), MAX_SAMPLE);
/// assert_eq!(encode_sample(0.0), 0);
/// ```
pub fn encode_sample(value: f64) -> i32 {
    let scaled = value.clamp(-1.0, 1.0) * f64::from(MAX_SAMPLE);
    // `as` maps NaN to 0
    (scaled.round() as i32).clamp(MIN_SAMPLE, MAX_SAMPLE)
}

/// Little endian two's complement representation of a 24 bit sample.
///
/// ```
/// use syn_kick::output::wav::*;
///
/// assert_eq!(sample_to_bytes(MAX_SAMPLE), [0xFF, 0xFF, 0x7F]);
/// assert_eq!(sample_to_bytes(MIN_SAMPLE), [0x00, 0x00, 0x80]);
/// assert_eq!(sample_to_bytes(-1), [0xFF, 0xFF, 0xFF]);
/// ```
pub fn sample_to_bytes(sample: i32) -> [u8; BYTES_PER_SAMPLE] {
    let bytes = sample.to_le_bytes();
    [bytes[0], bytes[1], bytes[2]]
}

/// Encode the samples as consecutive 24 bit values.
///
/// Returns the number of samples that were actually encoded.
/// Might be less than the number of input samples if the output buffer was not large enough.
fn encode_samples(samples: &[f64], bytes: &mut [u8]) -> usize {
    let mut processed = 0;
    for (sample, target) in samples.iter().zip(bytes.chunks_exact_mut(BYTES_PER_SAMPLE)) {
        target.copy_from_slice(&sample_to_bytes(encode_sample(*sample)));
        processed += 1;
    }
    processed
}

/// Write `buffer` as a mono 24 bit WAV file to `sink`.
///
/// Stops at the first failing write. Whatever was written before stays in the sink.
pub fn write_wav<W: io::Write + ?Sized>(
    sink: &mut W,
    buffer: &SampleBuffer,
    sample_rate: u32,
) -> Result<(), WavError> {
    let header = WavHeader::mono_24bit(sample_rate, buffer.len())?;
    sink.write_all(&header.to_bytes()).context(WriteHeader)?;

    let mut bytes = vec![0u8; CHUNK_SAMPLES * BYTES_PER_SAMPLE];
    for (index, chunk) in buffer.samples().chunks(CHUNK_SAMPLES).enumerate() {
        let offset = index * CHUNK_SAMPLES;
        let n = encode_samples(chunk, &mut bytes);
        sink.write_all(&bytes[..n * BYTES_PER_SAMPLE])
            .context(WriteSamples { offset })?;
        trace!("wrote samples {}..{}", offset, offset + n);
    }

    sink.flush().context(Flush)
}
