//! Cross-cutting HTTP middleware.

pub mod security;
