use std::{env, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const WORLD_BROADCAST_CAPACITY: usize = 128;

pub const TICK_INTERVAL: Duration = Duration::from_millis(1000 / 60);

pub fn http_port() -> u16 {
    env::var("BATTLE_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001)
}

pub fn llm_service_url() -> String {
    env::var("LLM_SERVICE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
}

pub fn llm_timeout() -> Duration {
    let millis = env::var("LLM_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(10_000);
    Duration::from_millis(millis)
}

pub fn speech_service_url() -> String {
    env::var("SPEECH_SERVICE_URL").unwrap_or_else(|_| {
        "https://api-inference.huggingface.co/models/openai/whisper-large-v3".to_string()
    })
}

pub fn speech_api_key() -> String {
    // Missing key degrades to unauthenticated calls; the service rejects
    // them and the player sees the speech-recognition error.
    env::var("SPEECH_API_KEY").unwrap_or_default()
}

pub fn speech_timeout() -> Duration {
    let millis = env::var("SPEECH_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(30_000);
    Duration::from_millis(millis)
}
