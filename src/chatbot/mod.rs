//! Farmer chat assistant: a rule-based knowledge base with an optional
//! LLM-backed mode that keeps per-user conversation history

pub mod assistant;
pub mod knowledge;

pub use assistant::{AiChatbot, ChatReply, FarmerContext};
pub use knowledge::{respond, LANGUAGES, TOPICS};
