// Capture-side audio utilities: silence gating and WAV encoding for the
// transcription service.

/// Peak absolute amplitude below which a recording counts as silent.
pub const SILENCE_THRESHOLD: f32 = 0.01;

/// Fixed capture sample rate; the WAV header advertises exactly this.
pub const SAMPLE_RATE: u32 = 44_100;

/// Size of the RIFF/WAVE/fmt/data header in bytes.
pub const WAV_HEADER_LEN: usize = 44;

pub fn peak_volume(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()))
}

/// Reassembles little-endian f32 PCM samples from a raw binary frame.
/// A trailing partial sample is dropped.
pub fn samples_from_le_bytes(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Encodes f32 PCM samples as a 16-bit mono 44100 Hz WAV container.
///
/// The transcription service consumes the standard 44-byte header; the
/// layout below must stay bit-exact.
pub fn encode_wav(samples: &[f32]) -> Vec<u8> {
    let data_len = (samples.len() * 2) as u32;
    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + samples.len() * 2);

    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16_u32.to_le_bytes()); // fmt chunk size
    wav.extend_from_slice(&1_u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1_u16.to_le_bytes()); // mono
    wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    wav.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes()); // byte rate
    wav.extend_from_slice(&2_u16.to_le_bytes()); // block align
    wav.extend_from_slice(&16_u16.to_le_bytes()); // bits per sample
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());

    for s in samples {
        let v = (s * 32767.0) as i16;
        wav.extend_from_slice(&v.to_le_bytes());
    }

    wav
}
