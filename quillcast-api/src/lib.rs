//! # Quillcast API Server Library
//!
//! Core functionality for the Quillcast API server: a REST backend for a
//! manuscript-publishing marketplace.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `response`: The uniform response envelope
//! - `clients`: External collaborators (object storage, speech synthesis, payments)
//! - `pipeline`: Manuscript ingestion and analytics (extract → narrate → score)
//! - `routes`: API route handlers
//! - `middleware`: Cross-cutting HTTP middleware

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod middleware;
pub mod pipeline;
pub mod response;
pub mod routes;
