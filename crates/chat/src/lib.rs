//! Chat orchestration for GroundCrew.
//!
//! Wires the pipeline together: ingest uploaded files, build the ephemeral
//! context index, retrieve passages for the question, assemble the message
//! sequence, and dispatch to the selected provider.

pub mod assembler;
pub mod service;

pub use assembler::{DEFAULT_SYSTEM_PROMPT, assemble};
pub use service::{
    ChatError, ChatRequest, ChatResponse, ChatService, SourceDocument, UploadResponse,
};
