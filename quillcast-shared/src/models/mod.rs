//! Database models and their CRUD operations.
//!
//! # Models
//!
//! - `user`: accounts, public handles, and profile data
//! - `manuscript`: submitted works with media URLs and the sold counter
//! - `payment`: purchase records tied to a gateway payment intent
//! - `review`: per-manuscript ratings and comments
//! - `recent_search`: the deduplicated log of search terms
//! - `notification`: per-user notifications (read-only listing)

pub mod manuscript;
pub mod notification;
pub mod payment;
pub mod recent_search;
pub mod review;
pub mod user;
