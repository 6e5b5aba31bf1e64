//! Telephony audio helpers
//!
//! Converts the 16-bit PCM returned by the TTS provider into what Vapi plays
//! on the phone line: G.711 mu-law at 8 kHz, or raw PCM at the requested rate.

use crate::config::OutputEncoding;

/// Sample rate of the PCM produced by the TTS provider
pub const TTS_SOURCE_SAMPLE_RATE: u32 = 24_000;

/// Sample rate of a G.711 telephone channel
pub const TELEPHONY_SAMPLE_RATE: u32 = 8_000;

const MULAW_BIAS: i32 = 0x84;
const MULAW_CLIP: i32 = 32_635;
const SEGMENT_THRESHOLDS: [i32; 8] = [0x4000, 0x2000, 0x1000, 0x800, 0x400, 0x200, 0x100, 0x80];

/// Encode one 16-bit linear sample as G.711 mu-law
pub fn linear_to_mulaw(sample: i16) -> u8 {
    let sample = i32::from(sample);
    let sign: u8 = if sample < 0 { 0x80 } else { 0x00 };
    let magnitude = sample.abs().min(MULAW_CLIP) + MULAW_BIAS;

    // magnitude >= 0x84 here, so the last threshold always matches
    let exponent = SEGMENT_THRESHOLDS
        .iter()
        .position(|&threshold| magnitude >= threshold)
        .map(|index| 7 - index as u8)
        .unwrap_or(0);

    let mantissa = ((magnitude >> (exponent + 3)) & 0x0F) as u8;

    !(sign | (exponent << 4) | mantissa)
}

/// Encode a block of samples as mu-law
pub fn encode_mulaw(samples: &[i16]) -> Vec<u8> {
    samples.iter().map(|&s| linear_to_mulaw(s)).collect()
}

/// Nearest-neighbour resampling
pub fn resample_nearest(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }

    let from = u64::from(from_rate);
    let to = u64::from(to_rate);
    let output_len = (samples.len() as u64 * to / from) as usize;

    (0..output_len as u64)
        .filter_map(|i| samples.get((i * from / to) as usize).copied())
        .collect()
}

/// Decode signed 16-bit little-endian PCM; a trailing odd byte is dropped
pub fn pcm_from_le_bytes(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Encode samples as signed 16-bit little-endian PCM
pub fn pcm_to_le_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Turn provider PCM into the bytes Vapi expects for a call
pub fn encode_for_call(
    pcm: &[u8],
    source_rate: u32,
    encoding: OutputEncoding,
    requested_rate: u32,
) -> Vec<u8> {
    let samples = pcm_from_le_bytes(pcm);

    match encoding {
        OutputEncoding::Mulaw => {
            let resampled = resample_nearest(&samples, source_rate, TELEPHONY_SAMPLE_RATE);
            encode_mulaw(&resampled)
        }
        OutputEncoding::Pcm => {
            let resampled = resample_nearest(&samples, source_rate, requested_rate);
            pcm_to_le_bytes(&resampled)
        }
    }
}
