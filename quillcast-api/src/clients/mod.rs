//! External collaborators consumed by the API server.
//!
//! Each collaborator is a trait constructed once in `main` and injected
//! through the application state, so handlers never touch a global client:
//!
//! - `storage`: object storage (`store(bytes, path) -> url`)
//! - `tts`: speech synthesis (`synthesize(text, lang) -> mp3 bytes`)
//! - `payments`: payment gateway (`create_intent(amount, currency)`)
//!
//! Every trait ships a mock implementation used by the integration tests.

pub mod payments;
pub mod storage;
pub mod tts;
