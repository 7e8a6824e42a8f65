// The WAV container shipped to the transcription service must stay
// bit-exact, and silent recordings must never reach the network.

use battle_server::interface_adapters::audio::{
    SAMPLE_RATE, SILENCE_THRESHOLD, WAV_HEADER_LEN, encode_wav, peak_volume, samples_from_le_bytes,
};
use battle_server::interface_adapters::clients::speech::{SpeechClient, TranscribeError};
use std::time::Duration;

#[test]
fn header_is_bit_exact() {
    let wav = encode_wav(&[0.0; 4]);
    assert_eq!(wav.len(), WAV_HEADER_LEN + 8);

    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(&wav[4..8], &(36u32 + 8).to_le_bytes());
    assert_eq!(&wav[8..12], b"WAVE");
    assert_eq!(&wav[12..16], b"fmt ");
    assert_eq!(&wav[16..20], &16u32.to_le_bytes());
    assert_eq!(&wav[20..22], &1u16.to_le_bytes()); // PCM
    assert_eq!(&wav[22..24], &1u16.to_le_bytes()); // mono
    assert_eq!(&wav[24..28], &SAMPLE_RATE.to_le_bytes());
    assert_eq!(&wav[28..32], &(SAMPLE_RATE * 2).to_le_bytes());
    assert_eq!(&wav[32..34], &2u16.to_le_bytes()); // block align
    assert_eq!(&wav[34..36], &16u16.to_le_bytes()); // bits per sample
    assert_eq!(&wav[36..40], b"data");
    assert_eq!(&wav[40..44], &8u32.to_le_bytes());
}

#[test]
fn samples_scale_to_pcm16() {
    let wav = encode_wav(&[1.0, -1.0, 0.5]);
    let data = &wav[WAV_HEADER_LEN..];

    let decoded: Vec<i16> = data
        .chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]))
        .collect();
    assert_eq!(decoded, vec![32767, -32767, 16383]);
}

#[test]
fn binary_frames_decode_to_samples() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0.25f32.to_le_bytes());
    bytes.extend_from_slice(&(-0.75f32).to_le_bytes());

    assert_eq!(samples_from_le_bytes(&bytes), vec![0.25, -0.75]);

    // A trailing partial sample is dropped.
    bytes.push(0xFF);
    assert_eq!(samples_from_le_bytes(&bytes), vec![0.25, -0.75]);
}

#[test]
fn peak_volume_tracks_the_loudest_sample() {
    assert_eq!(peak_volume(&[]), 0.0);
    assert_eq!(peak_volume(&[0.0, 0.005, -0.009]), 0.009);
    assert!(peak_volume(&[0.0, 0.005, -0.009]) < SILENCE_THRESHOLD);
    assert!(peak_volume(&[0.5, -0.2]) >= SILENCE_THRESHOLD);
}

#[tokio::test]
async fn silent_recording_short_circuits_before_the_network() {
    // Nothing listens here; the silence gate must answer first.
    let client = SpeechClient::new("http://127.0.0.1:9", "key", Duration::from_millis(200))
        .expect("client");

    let result = client.recognize(&[0.0; 64]).await;
    assert!(matches!(result, Err(TranscribeError::SilentRecording)));
}

#[tokio::test]
async fn unreachable_service_reports_upstream_failure() {
    let client = SpeechClient::new("http://127.0.0.1:9", "key", Duration::from_millis(200))
        .expect("client");

    let result = client.recognize(&[0.5; 64]).await;
    assert!(matches!(result, Err(TranscribeError::UpstreamUnavailable)));
}
