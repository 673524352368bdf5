//! Manuscript ingestion and analytics pipeline.
//!
//! The pipeline runs entirely within one request:
//!
//! ```text
//! multipart intake ──► object storage (uploads for distinct fields run concurrently)
//!        │
//!        ▼
//! text extraction (PDF truncated to 5000 chars, DOCX in full)
//!        │
//!        ▼
//! narration synthesis ──► audio upload
//!        │
//!        ▼
//! keyword analytics (genre fit, audience insight, marketability)
//! ```
//!
//! Extraction, narration, and persistence are sequential because each step
//! consumes the previous step's output. There is no retry and no
//! compensation: a failure anywhere aborts the request, and blobs uploaded
//! by earlier steps are left in place.

pub mod analytics;
pub mod extract;
pub mod intake;
pub mod narrate;
