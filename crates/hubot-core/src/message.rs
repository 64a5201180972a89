use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix every user slug carries (e.g. `user-jane`).
pub const USER_SLUG_PREFIX: &str = "user-";

/// Kind of timeline event that can trigger an action.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Message,
    Whisper,
}

/// A message or whisper posted to a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    #[serde(default)]
    pub kind: MessageKind,
    /// ID of the user who posted the message.
    pub actor: String,
    /// ID of the thread the message is attached to.
    pub thread: String,
    /// Message text content.
    pub text: String,
}

impl ChatMessage {
    /// Build a plain message posted by `actor` in `thread`.
    pub fn new(actor: &str, thread: &str, text: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: MessageKind::Message,
            actor: actor.to_string(),
            thread: thread.to_string(),
            text: text.to_string(),
        }
    }
}

/// A user contract as seen by Hubot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Stable identifier, always prefixed with `user-`.
    pub slug: String,
    /// Email addresses, most relevant first.
    #[serde(default)]
    pub emails: Vec<String>,
    /// Slugs of the orgs this user is a member of.
    #[serde(default)]
    pub orgs: Vec<String>,
}

impl User {
    /// The slug without its `user-` prefix, used as a display name in chat.
    pub fn handle(&self) -> &str {
        slug_to_handle(&self.slug)
    }

    /// First email address, if any.
    pub fn primary_email(&self) -> Option<&str> {
        self.emails.first().map(String::as_str)
    }
}

/// Strip the `user-` prefix from a slug.
pub fn slug_to_handle(slug: &str) -> &str {
    slug.strip_prefix(USER_SLUG_PREFIX).unwrap_or(slug)
}

/// A whisper posted back into a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Whisper {
    pub thread: String,
    /// ID of the user the whisper is attributed to.
    pub actor: String,
    pub message: String,
}
