use crate::interface_adapters::audio;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug)]
pub enum TranscribeError {
    /// The recording never rose above the silence threshold; no remote call
    /// was made.
    SilentRecording,
    UpstreamUnavailable,
    MalformedResponse,
}

impl TranscribeError {
    pub fn kind(&self) -> &'static str {
        match self {
            TranscribeError::SilentRecording => "silence",
            TranscribeError::UpstreamUnavailable => "upstream",
            TranscribeError::MalformedResponse => "malformed",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            TranscribeError::SilentRecording => "Error: No audio detected",
            TranscribeError::UpstreamUnavailable => "Error in speech recognition",
            TranscribeError::MalformedResponse => "Error parsing response",
        }
    }
}

// The service answers `[{"text": "..."}]`.
#[derive(Debug, Deserialize)]
struct TranscriptionSegment {
    text: String,
}

// Thin reqwest client for the speech-transcription endpoint.
#[derive(Clone)]
pub struct SpeechClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl SpeechClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    /// Full capture-to-text path: silence gate, WAV encoding, remote call.
    pub async fn recognize(&self, samples: &[f32]) -> Result<String, TranscribeError> {
        if audio::peak_volume(samples) < audio::SILENCE_THRESHOLD {
            return Err(TranscribeError::SilentRecording);
        }
        self.transcribe(audio::encode_wav(samples)).await
    }

    /// Ships an encoded WAV buffer to the transcription service.
    pub async fn transcribe(&self, wav: Vec<u8>) -> Result<String, TranscribeError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "audio/wav")
            .body(wav)
            .send()
            .await
            .map_err(|_| TranscribeError::UpstreamUnavailable)?;

        if !response.status().is_success() {
            return Err(TranscribeError::UpstreamUnavailable);
        }

        let segments = response
            .json::<Vec<TranscriptionSegment>>()
            .await
            .map_err(|_| TranscribeError::MalformedResponse)?;
        segments
            .into_iter()
            .next()
            .map(|segment| segment.text)
            .ok_or(TranscribeError::MalformedResponse)
    }
}
