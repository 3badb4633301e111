//! Context indexing for GroundCrew.
//!
//! Splits extracted document text into overlapping windows, embeds them,
//! and builds a request-scoped similarity index. The index is a value: it
//! is returned from `build`, threaded through `query`, and dropped when the
//! request completes. Nothing here outlives a request.

pub mod indexer;
pub mod similarity;
pub mod split;

pub use indexer::{BuiltIndex, ContextIndex, ContextIndexer};
pub use similarity::cosine_similarity;
pub use split::split_text;
