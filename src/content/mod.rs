//! Presentation metadata derivation and related-post ranking.
//!
//! Everything in this module is a pure function over in-memory records:
//! no I/O, no shared state, safe to call concurrently. The repository layer
//! applies [`meta::enrich`] to every post it reads, so enriched metadata is
//! never persisted and never goes stale.

pub mod markdown;
pub mod meta;
pub mod related;
pub mod text;
