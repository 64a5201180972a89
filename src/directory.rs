//! In-process stand-in for the host worker, backed by the `[[users]]` config.

use async_trait::async_trait;
use hubot_core::{
    error::HubotError,
    message::{User, Whisper},
    traits::{UserQuery, WorkerContext},
};
use tokio::sync::Mutex;
use tracing::debug;

/// Users from config, plus every whisper posted so far.
pub struct StaticDirectory {
    users: Vec<User>,
    whispers: Mutex<Vec<Whisper>>,
}

impl StaticDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users,
            whispers: Mutex::new(Vec::new()),
        }
    }

    /// Add a bot user for `slug` unless one is configured already.
    pub fn with_bot(mut self, slug: &str) -> Self {
        if !self.users.iter().any(|u| u.slug == slug) {
            self.users.push(User {
                id: slug.to_string(),
                slug: slug.to_string(),
                emails: Vec::new(),
                orgs: Vec::new(),
            });
        }
        self
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Whispers posted so far, oldest first.
    pub async fn whispers(&self) -> Vec<Whisper> {
        self.whispers.lock().await.clone()
    }
}

#[async_trait]
impl WorkerContext for StaticDirectory {
    async fn get_user(&self, id: &str) -> Result<Option<User>, HubotError> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_slug(&self, slug: &str) -> Result<Option<User>, HubotError> {
        Ok(self.users.iter().find(|u| u.slug == slug).cloned())
    }

    async fn query_users(&self, query: &UserQuery) -> Result<Vec<User>, HubotError> {
        Ok(self
            .users
            .iter()
            .filter(|u| query.matches(u))
            .cloned()
            .collect())
    }

    async fn create_whisper(&self, whisper: Whisper) -> Result<(), HubotError> {
        debug!(thread = %whisper.thread, actor = %whisper.actor, "whisper posted");
        self.whispers.lock().await.push(whisper);
        Ok(())
    }
}
