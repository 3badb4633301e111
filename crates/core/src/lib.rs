//! # GroundCrew Core
//!
//! Domain types, traits, and error definitions for the GroundCrew chat backend.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every subsystem is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod chunk;
pub mod error;
pub mod file;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use chunk::TextChunk;
pub use error::{Error, IndexError, IngestError, ProviderError, Result};
pub use file::FileRecord;
pub use message::{Message, Role};
pub use provider::{Embedder, Provider};
