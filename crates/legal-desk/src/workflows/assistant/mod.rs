//! Scripted legal assistant: keyword responder plus the append-only chat transcript.

mod responder;
mod transcript;

pub use responder::{respond, DEFAULT_RESPONSE, RESPONSES};
pub use transcript::{ChatExchange, ChatMessage, ChatSender, ChatTranscript};
