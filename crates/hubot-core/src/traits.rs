use crate::{
    error::HubotError,
    message::{User, Whisper},
};
use async_trait::async_trait;

/// Criteria for a user lookup against the host worker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    /// Only users that are members of this org slug.
    pub org: Option<String>,
    /// Only users with at least one email ending in `@{domain}`.
    pub email_domain: Option<String>,
    /// Only users whose slug is in this list. `None` = no restriction.
    pub slugs: Option<Vec<String>>,
    /// Users whose slug is in this list are never returned.
    pub exclude_slugs: Vec<String>,
}

impl UserQuery {
    /// Whether `user` satisfies every criterion of this query.
    pub fn matches(&self, user: &User) -> bool {
        if let Some(ref org) = self.org {
            if !user.orgs.iter().any(|o| o == org) {
                return false;
            }
        }
        if let Some(ref domain) = self.email_domain {
            let suffix = format!("@{domain}");
            if !user.emails.iter().any(|e| e.ends_with(&suffix)) {
                return false;
            }
        }
        if let Some(ref slugs) = self.slugs {
            if !slugs.iter().any(|s| s == &user.slug) {
                return false;
            }
        }
        !self.exclude_slugs.iter().any(|s| s == &user.slug)
    }
}

/// Host worker trait: the capabilities the platform lends to every action.
///
/// The worker runtime owns persistence and event delivery; Hubot only reads
/// users and posts whispers through it.
#[async_trait]
pub trait WorkerContext: Send + Sync {
    /// Fetch a single user by ID, e.g. the actor of a message.
    async fn get_user(&self, id: &str) -> Result<Option<User>, HubotError>;

    /// Fetch a single user by slug.
    async fn get_user_by_slug(&self, slug: &str) -> Result<Option<User>, HubotError>;

    /// Query users matching the given criteria.
    async fn query_users(&self, query: &UserQuery) -> Result<Vec<User>, HubotError>;

    /// Post a whisper into a thread. Once this returns, the whisper is visible
    /// in the thread's timeline.
    async fn create_whisper(&self, whisper: Whisper) -> Result<(), HubotError>;
}
