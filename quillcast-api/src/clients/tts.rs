//! Speech synthesis client.
//!
//! Narration uses the public Google Translate TTS endpoint. The endpoint
//! caps input at roughly 200 characters per request, so longer texts are
//! split into chunks at whitespace boundaries, synthesized one request at a
//! time, and the MP3 responses concatenated in order into a single buffer.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Upper bound on characters per synthesis request.
const MAX_CHUNK_CHARS: usize = 200;

/// Error type for speech synthesis operations
#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    /// Nothing to synthesize
    #[error("No text to synthesize")]
    EmptyText,

    /// Synthesis request failed to complete
    #[error("Synthesis request failed: {0}")]
    Request(String),

    /// Endpoint answered with a non-success status
    #[error("Synthesis rejected with status {0}")]
    Rejected(u16),
}

/// Speech synthesis: `synthesize(text, language) -> audio bytes`.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Converts `text` to a single MP3 byte buffer.
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, TtsError>;
}

/// Google Translate TTS client.
pub struct TranslateTts {
    client: Client,
    endpoint: String,
}

impl TranslateTts {
    pub fn new(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for TranslateTts {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, TtsError> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(TtsError::EmptyText);
        }

        debug!(chunks = chunks.len(), language, "Synthesizing narration");

        let total = chunks.len();
        let mut audio = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            let response = self
                .client
                .get(&self.endpoint)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", language),
                    ("q", chunk.as_str()),
                    ("total", &total.to_string()),
                    ("idx", &idx.to_string()),
                    ("textlen", &chunk.chars().count().to_string()),
                ])
                .send()
                .await
                .map_err(|e| TtsError::Request(e.to_string()))?;

            if !response.status().is_success() {
                return Err(TtsError::Rejected(response.status().as_u16()));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| TtsError::Request(e.to_string()))?;
            audio.extend_from_slice(&bytes);
        }

        Ok(audio)
    }
}

/// Mock synthesizer for tests: returns a deterministic payload derived from
/// the input length.
pub struct MockSynthesizer;

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str, _language: &str) -> Result<Vec<u8>, TtsError> {
        if text.trim().is_empty() {
            return Err(TtsError::EmptyText);
        }
        Ok(vec![0u8; text.chars().count().min(64)])
    }
}

/// Splits `text` into chunks of at most `max_chars` characters, breaking at
/// whitespace. A single word longer than `max_chars` becomes its own chunk
/// rather than being split mid-word.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", 200).is_empty());
        assert!(chunk_text("   \n\t ", 200).is_empty());
    }

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = chunk_text("a short sentence", 200);
        assert_eq!(chunks, vec!["a short sentence"]);
    }

    #[test]
    fn chunks_respect_the_character_limit() {
        let text = "word ".repeat(100);
        let chunks = chunk_text(&text, 20);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 20, "chunk too long: {chunk:?}");
        }
    }

    #[test]
    fn chunks_break_at_whitespace() {
        let chunks = chunk_text("alpha beta gamma delta", 11);
        assert_eq!(chunks, vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn oversized_word_becomes_its_own_chunk() {
        let chunks = chunk_text("tiny supercalifragilistic tiny", 10);
        assert_eq!(chunks, vec!["tiny", "supercalifragilistic", "tiny"]);
    }

    #[tokio::test]
    async fn mock_synthesizer_rejects_empty_text() {
        let result = MockSynthesizer.synthesize("  ", "en").await;
        assert!(matches!(result, Err(TtsError::EmptyText)));
    }

    #[tokio::test]
    async fn mock_synthesizer_produces_audio_bytes() {
        let audio = MockSynthesizer.synthesize("hello world", "en").await.unwrap();
        assert!(!audio.is_empty());
    }
}
