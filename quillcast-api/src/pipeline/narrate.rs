//! Narration synthesis: extracted text to a stored MP3.
//!
//! Produces audio only when a document was supplied; the whole audio stream
//! is buffered in memory and uploaded under a timestamp-derived filename,
//! and the resulting URL lands on the manuscript row.

use bytes::Bytes;
use chrono::Utc;
use tracing::debug;

use crate::clients::storage::ObjectStorage;
use crate::clients::tts::SpeechSynthesizer;
use crate::error::ApiError;

/// Synthesizes `text` and uploads the MP3; returns the stored audio URL.
pub async fn narrate_to_storage(
    tts: &dyn SpeechSynthesizer,
    storage: &dyn ObjectStorage,
    text: &str,
    language: &str,
) -> Result<String, ApiError> {
    let audio = tts.synthesize(text, language).await?;
    debug!(bytes = audio.len(), "Narration synthesized");

    let key = audio_object_key(Utc::now().timestamp_millis());
    let url = storage.store(&key, "audio/mpeg", Bytes::from(audio)).await?;

    Ok(url)
}

/// Object key for a narration upload: `audioUrl/audio_<unix-millis>.mp3`.
pub fn audio_object_key(timestamp_millis: i64) -> String {
    format!("audioUrl/audio_{timestamp_millis}.mp3")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::storage::MemoryStorage;
    use crate::clients::tts::MockSynthesizer;

    #[test]
    fn audio_key_is_timestamp_derived() {
        assert_eq!(audio_object_key(1700000000000), "audioUrl/audio_1700000000000.mp3");
    }

    #[tokio::test]
    async fn narration_uploads_one_audio_object() {
        let storage = MemoryStorage::new();

        let url = narrate_to_storage(&MockSynthesizer, &storage, "a short passage", "en")
            .await
            .unwrap();

        assert!(url.starts_with("memory://audioUrl/audio_"));
        assert!(url.ends_with(".mp3"));
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn empty_text_fails_without_uploading() {
        let storage = MemoryStorage::new();

        let result = narrate_to_storage(&MockSynthesizer, &storage, "   ", "en").await;
        assert!(result.is_err());
        assert!(storage.is_empty());
    }
}
