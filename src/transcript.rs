use anyhow::Result;
use chrono::{DateTime, Local};
use tracing::{debug, error, info, warn};

use crate::llm::AnswerProvider;

/// Shown when the reply service answers with nothing.
pub const NO_REPLY_TEXT: &str = "Sorry, no reply available.";

/// Shown in place of any reply service failure.
pub const FAILURE_TEXT: &str = "Oops, something went wrong with the reply service.";

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

/// Identifier of a message, increasing within one transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

impl MessageId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A single transcript entry. Immutable once appended.
#[derive(Debug, Clone)]
pub struct Message {
    id: MessageId,
    role: Role,
    text: String,
    created_at: DateTime<Local>,
}

impl Message {
    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }
}

/// An outstanding request to the reply service.
///
/// Returned by [`TranscriptController::submit`] and handed back to
/// [`TranscriptController::settle`] once the provider call finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending reply must be settled or the transcript stays pending"]
pub struct PendingReply {
    prompt: String,
    request_for: MessageId,
}

impl PendingReply {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The user message this reply answers
    pub fn request_for(&self) -> MessageId {
        self.request_for
    }
}

/// Owns the ordered transcript, the input buffer and the pending flag.
///
/// A submission is split in two halves around the provider call: [`submit`]
/// records the user entry and marks the transcript pending, [`settle`] records
/// the bot entry and clears the flag. Nothing else mutates the transcript
/// except [`clear`].
///
/// [`submit`]: TranscriptController::submit
/// [`settle`]: TranscriptController::settle
/// [`clear`]: TranscriptController::clear
#[derive(Debug, Default)]
pub struct TranscriptController {
    messages: Vec<Message>,
    input: String,
    pending: bool,
    next_id: u64,
}

impl TranscriptController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// True while a reply is outstanding
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Replace the input buffer verbatim
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Drop every message. The pending flag is left alone, so a reply that
    /// is still in flight lands in the emptied transcript.
    pub fn clear(&mut self) {
        if !self.messages.is_empty() {
            info!(dropped = self.messages.len(), "transcript cleared");
        }
        self.messages.clear();
    }

    /// Record a user message and mark the transcript pending.
    ///
    /// Blank text is ignored. So is any submission made while another reply
    /// is still outstanding, which keeps replies in submission order; the
    /// input buffer is left untouched in that case so the text can be resent.
    pub fn submit(&mut self, text: &str) -> Option<PendingReply> {
        if text.trim().is_empty() {
            return None;
        }

        if self.pending {
            debug!("reply still pending, submission ignored");
            return None;
        }

        let request_for = self.append(Role::User, text.to_string());
        self.input.clear();
        self.pending = true;

        debug!(message = request_for.get(), "submitted message");

        Some(PendingReply {
            prompt: text.to_string(),
            request_for,
        })
    }

    /// Submit whatever is in the input buffer
    pub fn submit_input(&mut self) -> Option<PendingReply> {
        let text = self.input.clone();
        self.submit(&text)
    }

    /// Record the outcome of a provider call and clear the pending flag.
    pub fn settle(&mut self, pending: PendingReply, outcome: Result<String>) -> MessageId {
        let request = pending.request_for.get();

        let text = match outcome {
            Ok(reply) if reply.is_empty() => {
                warn!(request, "reply service returned an empty reply");
                NO_REPLY_TEXT.to_string()
            }
            Ok(reply) => reply,
            Err(err) => {
                error!(request, "reply service failed: {err:#}");
                FAILURE_TEXT.to_string()
            }
        };

        let id = self.append(Role::Bot, text);
        self.pending = false;
        id
    }

    /// Run one full exchange: submit, wait for the provider, settle.
    ///
    /// Returns the id of the bot message, or `None` when the submission was
    /// ignored and no provider call was made.
    pub async fn exchange(&mut self, provider: &dyn AnswerProvider, text: &str) -> Option<MessageId> {
        let pending = self.submit(text)?;
        let outcome = provider.ask(pending.prompt()).await;
        Some(self.settle(pending, outcome))
    }

    fn append(&mut self, role: Role, text: String) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;

        self.messages.push(Message {
            id,
            role,
            text,
            created_at: Local::now(),
        });

        id
    }
}
