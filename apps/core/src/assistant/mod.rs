//! # Assistant Module
//!
//! Scripted help assistant for the student portal.
//! Matches user text against a fixed knowledge base; no language model involved.
//!
//! ## Components
//! - `knowledge`: ordered phrase, keyword and fallback tables
//! - `matcher`: substring intent matcher (pure)
//! - `session`: conversation log with a cancellable typing delay

pub mod knowledge;
pub mod matcher;
pub mod session;

pub use knowledge::{KnowledgeBase, KnowledgeBaseBuilder, Rule};
pub use matcher::{IntentMatcher, RandomSource, Reply, ReplySource, ThreadRandom};
pub use session::{ChatSession, TypingDelay};
