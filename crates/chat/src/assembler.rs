//! Message assembly.
//!
//! Every request renders to the same shape: the fixed instruction, an
//! optional retrieved-context block, and the verbatim question last. The
//! framing is deliberately not configurable per request, so a given
//! (question, context) pair always produces the same prompt.

use groundcrew_core::{Message, TextChunk};

/// The fixed instructional system prompt.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant. \
Analyze all provided content and context to give clear, accurate, and concise responses.";

/// Assemble the provider-agnostic message sequence.
///
/// Emits: System(instruction), then — when context is non-empty — a second
/// System message with every chunk's text joined by a blank line, then
/// exactly one terminal User message carrying the question.
pub fn assemble(question: &str, context: &[TextChunk]) -> Vec<Message> {
    let mut messages = vec![Message::system(DEFAULT_SYSTEM_PROMPT)];

    if !context.is_empty() {
        let joined = context
            .iter()
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        messages.push(Message::system(format!(
            "Context:\n{joined}\n\nUse this context to help answer the question."
        )));
    }

    messages.push(Message::user(question));
    messages
}
