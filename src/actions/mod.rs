//! Chat actions: what Hubot does with a message posted to a thread.

mod echo;
mod help;
mod leave;

#[cfg(test)]
mod tests;

pub use leave::{is_list_request, mentions_to_slugs};

use chrono::NaiveDate;
use hubot_calamari::Calamari;
use hubot_core::{
    config::{Config, OrgConfig},
    error::HubotError,
    message::{ChatMessage, User, Whisper},
    traits::{UserQuery, WorkerContext},
};
use tracing::{debug, info};

/// Everything an action needs to answer one message.
pub struct ActionContext<'a> {
    pub worker: &'a dyn WorkerContext,
    pub calamari: &'a Calamari,
    pub config: &'a Config,
    /// Day the answer is computed for.
    pub today: NaiveDate,
}

/// Known actions. Each one fires on its own trigger pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Echo,
    Help,
    Leave,
}

impl Action {
    /// Every action `text` triggers, in reply order. Empty when Hubot should stay quiet.
    pub fn triggered(text: &str) -> Vec<Self> {
        let mut actions = Vec::new();
        if echo::is_triggered(text) {
            actions.push(Self::Echo);
        }
        if help::is_triggered(text) {
            actions.push(Self::Help);
        }
        if leave::is_triggered(text) {
            actions.push(Self::Leave);
        }
        actions
    }
}

/// Run every action `message` triggers, whispering each non-empty reply back
/// into its thread. Messages and whispers both trigger actions, except those
/// posted by the bot itself.
///
/// Returns the whispers that were posted, in order.
pub async fn handle(
    ctx: &ActionContext<'_>,
    message: &ChatMessage,
) -> Result<Vec<Whisper>, HubotError> {
    let actions = Action::triggered(&message.text);
    if actions.is_empty() {
        return Ok(Vec::new());
    }

    let bot_slug = &ctx.config.hubot.bot_slug;
    let bot = ctx
        .worker
        .get_user_by_slug(bot_slug)
        .await?
        .ok_or_else(|| HubotError::Worker(format!("{bot_slug} not found")))?;
    if message.actor == bot.id {
        debug!(thread = %message.thread, "ignoring message posted by the bot");
        return Ok(Vec::new());
    }

    let mut whispers = Vec::new();
    for action in actions {
        info!(?action, kind = ?message.kind, thread = %message.thread, "handling message");
        let reply = match action {
            Action::Echo => echo::reply(&message.text),
            Action::Help => help::reply(&ctx.config.hubot.name),
            Action::Leave => {
                if !is_org_member(ctx, &message.actor).await? {
                    debug!(actor = %message.actor, "leave lookup requested by non-member");
                    continue;
                }
                leave::reply(ctx, &message.text).await?
            }
        };
        if reply.is_empty() {
            debug!(?action, "nothing to say");
            continue;
        }

        let whisper = Whisper {
            thread: message.thread.clone(),
            actor: bot.id.clone(),
            message: reply,
        };
        ctx.worker.create_whisper(whisper.clone()).await?;
        whispers.push(whisper);
    }
    Ok(whispers)
}

/// Whether the user with ID `actor` is a member of the configured org.
async fn is_org_member(ctx: &ActionContext<'_>, actor: &str) -> Result<bool, HubotError> {
    let org = &ctx.config.org.slug;
    Ok(ctx
        .worker
        .get_user(actor)
        .await?
        .is_some_and(|user| user.orgs.iter().any(|o| o == org)))
}

/// Members of the configured org with an address on its email domain, minus
/// the bot. Each user's emails are narrowed to their first address on that
/// domain. `slugs` further restricts the result when given.
pub async fn org_users(
    worker: &dyn WorkerContext,
    org: &OrgConfig,
    bot_slug: &str,
    slugs: Option<Vec<String>>,
) -> Result<Vec<User>, HubotError> {
    let query = UserQuery {
        org: Some(org.slug.clone()),
        email_domain: Some(org.email_domain.clone()),
        slugs,
        exclude_slugs: vec![bot_slug.to_string()],
    };
    let suffix = format!("@{}", org.email_domain);
    let users = worker.query_users(&query).await?;
    Ok(users
        .into_iter()
        .map(|mut user| {
            if let Some(email) = user.emails.iter().find(|e| e.ends_with(&suffix)).cloned() {
                user.emails = vec![email];
            }
            user
        })
        .collect())
}
