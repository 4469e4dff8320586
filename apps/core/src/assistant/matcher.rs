//! Intent matching by substring containment.
//!
//! Case-insensitive, first match wins: phrase table, then keyword table, then a
//! random generic fallback. No tokenization, no ranking by length.

use crate::assistant::knowledge::KnowledgeBase;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Source of randomness for the fallback branch.
pub trait RandomSource: Send {
    /// Returns an index in `0..len`. `len` is never zero.
    fn index(&mut self, len: usize) -> usize;
}

/// [`RandomSource`] backed by the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn index(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Which pass produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Phrase,
    Keyword,
    Fallback,
}

/// Result of matching a user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
    /// The phrase or keyword that matched, if any.
    pub matched: Option<String>,
}

/// Maps free text to a canned response.
#[derive(Debug, Clone, Default)]
pub struct IntentMatcher {
    knowledge: Arc<KnowledgeBase>,
}

impl IntentMatcher {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Returns the response text for `text`. Total: every input gets an answer.
    pub fn respond(&self, text: &str, rng: &mut dyn RandomSource) -> String {
        self.resolve(text, rng).text
    }

    /// Like [`respond`](Self::respond) but reports which rule matched.
    pub fn resolve(&self, text: &str, rng: &mut dyn RandomSource) -> Reply {
        resolve(text, &self.knowledge, rng)
    }
}

/// Runs the phrase pass, the keyword pass, then the fallback pass.
pub fn resolve(text: &str, knowledge: &KnowledgeBase, rng: &mut dyn RandomSource) -> Reply {
    let input = text.trim().to_lowercase();

    let matched = knowledge
        .phrases()
        .iter()
        .find(|rule| input.contains(rule.pattern.as_str()))
        .map(|rule| (rule, ReplySource::Phrase))
        .or_else(|| {
            knowledge
                .keywords()
                .iter()
                .find(|rule| input.contains(rule.pattern.as_str()))
                .map(|rule| (rule, ReplySource::Keyword))
        });

    if let Some((rule, source)) = matched {
        return Reply {
            text: rule.response.clone(),
            source,
            matched: Some(rule.pattern.clone()),
        };
    }

    let fallbacks = knowledge.fallbacks();
    let text = if fallbacks.is_empty() {
        String::new()
    } else {
        fallbacks[rng.index(fallbacks.len()).min(fallbacks.len() - 1)].clone()
    };
    Reply {
        text,
        source: ReplySource::Fallback,
        matched: None,
    }
}

/// Free-function form of [`IntentMatcher::respond`].
pub fn respond(text: &str, knowledge: &KnowledgeBase, rng: &mut dyn RandomSource) -> String {
    resolve(text, knowledge, rng).text
}
