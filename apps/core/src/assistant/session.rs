//! Conversation session with a simulated typing delay.
//!
//! User messages are appended immediately. The assistant reply is appended by a
//! deferred task once the typing delay elapses. Resetting or dropping the
//! session cancels every pending reply; a cancelled reply is never appended.

use crate::assistant::matcher::{IntentMatcher, RandomSource, ReplySource, ThreadRandom};
use crate::models::ChatMessage;
use chrono::Utc;
use rand::Rng;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// Delay before the assistant reply shows up: `base` plus uniform `0..=jitter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingDelay {
    pub base: Duration,
    pub jitter: Duration,
}

impl Default for TypingDelay {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(1000),
            jitter: Duration::from_millis(1000),
        }
    }
}

impl TypingDelay {
    pub const fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    /// No delay at all; replies land on the next scheduler tick.
    pub const fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn sample(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.base;
        }
        self.base + Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
    }
}

/// Shared conversation state. `epoch` changes on every reset.
#[derive(Debug)]
struct Conversation {
    epoch: u64,
    next_id: u64,
    pending: usize,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    fn new(greeting: &str) -> Self {
        let mut conversation = Self {
            epoch: 0,
            next_id: 1,
            pending: 0,
            messages: Vec::new(),
        };
        conversation.push(greeting.to_string(), true);
        conversation
    }

    fn push(&mut self, text: String, is_bot: bool) -> ChatMessage {
        let message = ChatMessage {
            id: self.next_id,
            text,
            is_bot,
            timestamp: Utc::now(),
        };
        self.next_id += 1;
        self.messages.push(message.clone());
        message
    }
}

fn lock(state: &Mutex<Conversation>) -> MutexGuard<'_, Conversation> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A help-assistant conversation. Must be used inside a Tokio runtime.
pub struct ChatSession {
    matcher: IntentMatcher,
    delay: TypingDelay,
    rng: Box<dyn RandomSource>,
    state: Arc<Mutex<Conversation>>,
    tasks: Vec<JoinHandle<()>>,
}

impl ChatSession {
    /// Starts a conversation seeded with the knowledge base greeting.
    pub fn new(matcher: IntentMatcher, delay: TypingDelay) -> Self {
        let state = Conversation::new(matcher.knowledge().greeting());
        Self {
            matcher,
            delay,
            rng: Box::new(ThreadRandom),
            state: Arc::new(Mutex::new(state)),
            tasks: Vec::new(),
        }
    }

    /// Replaces the random source used for fallback replies.
    pub fn with_random(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    /// Appends the user message and schedules the assistant reply.
    ///
    /// Whitespace-only input is rejected and returns `None`.
    #[instrument(skip(self, text))]
    pub fn send(&mut self, text: &str) -> Option<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring empty chat message");
            return None;
        }

        let reply = self.matcher.resolve(text, self.rng.as_mut());
        if reply.source == ReplySource::Fallback {
            debug!("No rule matched, using a fallback reply");
        }

        let (message, epoch) = {
            let mut conversation = lock(&self.state);
            conversation.pending += 1;
            (conversation.push(text.to_string(), false), conversation.epoch)
        };

        let delay = self.delay.sample();
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut conversation = lock(&state);
            if conversation.epoch != epoch {
                debug!("Discarding reply scheduled before reset");
                return;
            }
            conversation.pending = conversation.pending.saturating_sub(1);
            conversation.push(reply.text, true);
        });

        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(handle);
        Some(message)
    }

    /// `true` while at least one reply is still pending.
    pub fn is_typing(&self) -> bool {
        lock(&self.state).pending > 0
    }

    /// Snapshot of the message log.
    pub fn messages(&self) -> Vec<ChatMessage> {
        lock(&self.state).messages.clone()
    }

    /// Suggested prompts to show under the conversation.
    pub fn quick_replies(&self, count: usize) -> &[String] {
        self.matcher.knowledge().quick_replies(count)
    }

    /// Cancels pending replies and restores the greeting-only log.
    pub fn reset(&mut self) {
        let cancelled = self.cancel_pending();
        let mut conversation = lock(&self.state);
        let epoch = conversation.epoch;
        *conversation = Conversation::new(self.matcher.knowledge().greeting());
        conversation.epoch = epoch;
        info!(cancelled, "Chat session reset");
    }

    /// Waits until every scheduled reply has been appended.
    pub async fn flush(&mut self) {
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                debug!("Reply task ended early: {}", e);
            }
        }
    }

    fn cancel_pending(&mut self) -> usize {
        let pending = self.tasks.iter().filter(|task| !task.is_finished()).count();
        for task in self.tasks.drain(..) {
            task.abort();
        }
        lock(&self.state).epoch += 1;
        pending
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
