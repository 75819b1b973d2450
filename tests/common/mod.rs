use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use learnify::config::Config;
use learnify::error::{LearnifyError, Result};
use learnify::providers::create_provider;
use learnify::session::InMemorySessionStore;
use learnify::speech::{AudioPipeline, SpeechSynthesizer};
use learnify::TutorService;

/// Synthesizer that returns a fixed list of chunk locations
#[allow(dead_code)]
pub struct FixedSynthesizer {
    pub locations: Vec<String>,
}

#[async_trait]
impl SpeechSynthesizer for FixedSynthesizer {
    async fn audio_urls(&self, _text: &str, _language_code: &str) -> Result<Vec<String>> {
        Ok(self.locations.clone())
    }

    async fn audio_url(&self, _text: &str, _language_code: &str) -> Result<String> {
        Err(LearnifyError::Speech("single span resolution not scripted".to_string()).into())
    }
}

/// Configuration pointing the provider at `api_base` and audio into `dir`
#[allow(dead_code)]
pub fn config_for(api_base: &str, api_key: Option<&str>, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.provider.openrouter.api_base = api_base.to_string();
    config.provider.openrouter.api_key = api_key.map(str::to_string);
    config.audio.output_dir = dir.path().join("audio");
    config.speech.allowed_hosts.push("127.0.0.1".to_string());
    config.speech.fetch_timeout_seconds = 5;
    config
}

/// Tutor service with the real OpenRouter client and a fixed synthesizer
#[allow(dead_code)]
pub fn service_for(config: &Config, locations: Vec<String>) -> Arc<TutorService> {
    let provider = create_provider(&config.provider).expect("provider");
    let audio = AudioPipeline::with_synthesizer(config, Arc::new(FixedSynthesizer { locations }))
        .expect("audio pipeline");
    Arc::new(TutorService::new(
        config,
        provider,
        Arc::new(InMemorySessionStore::new()),
        audio,
    ))
}

/// OpenAI-style completion body
#[allow(dead_code)]
pub fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "gen-1",
        "choices": [{ "message": { "role": "assistant", "content": content } }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
    })
}

/// Mount completions answered in order: the first body once, then the next
#[allow(dead_code)]
pub async fn mount_completions(server: &MockServer, bodies: &[&str]) {
    for (i, body) in bodies.iter().enumerate() {
        let mock = Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(body)));
        let mock = if i + 1 < bodies.len() {
            mock.up_to_n_times(1)
        } else {
            mock
        };
        mock.mount(server).await;
    }
}

/// Mount an audio chunk served at `route`
#[allow(dead_code)]
pub async fn mount_chunk(server: &MockServer, route: &str, bytes: &'static [u8]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
        .mount(server)
        .await;
}

/// Write a config file into a fresh temporary directory
#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    std::fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
