//! API route handlers, organized by resource.
//!
//! - `health`: Health check endpoint
//! - `auth`: Login and token refresh
//! - `users`: Registration, profile, and account management
//! - `manuscripts`: Ingestion pipeline, search, analytics, recent searches
//! - `payments`: Payment intents and payment history
//! - `reviews`: Manuscript reviews
//! - `notifications`: Per-user notification listing

pub mod auth;
pub mod health;
pub mod manuscripts;
pub mod notifications;
pub mod payments;
pub mod reviews;
pub mod users;
