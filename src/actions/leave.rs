use hubot_calamari::query::{leave_list, mentioned_user_leaves};
use hubot_core::{error::HubotError, message::USER_SLUG_PREFIX};
use regex::Regex;
use std::sync::LazyLock;

use super::{org_users, ActionContext};

#[allow(clippy::expect_used)]
static LIST_REQUEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)on\s+leave|off\s+today").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static LIST_TRIGGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^@hubot\s+who'?s\s+(?:on\s+leave|off\s+today)")
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\s@|^@)([a-z0-9-]+)").expect("constant regex pattern is valid")
});

/// Mentions that never name a person.
const IGNORED_MENTIONS: [&str; 4] = ["t", "thread", "people", "hubot"];

/// Whether `text` asks for everyone on leave.
pub fn is_list_request(text: &str) -> bool {
    LIST_REQUEST.is_match(text)
}

/// User slugs for every person mentioned in `text`, in order, without repeats.
pub fn mentions_to_slugs(text: &str) -> Vec<String> {
    let mut slugs: Vec<String> = Vec::new();
    for caps in MENTION.captures_iter(text) {
        let handle = caps[1].to_lowercase();
        if IGNORED_MENTIONS.contains(&handle.as_str()) {
            continue;
        }
        let slug = format!("{USER_SLUG_PREFIX}{handle}");
        if !slugs.contains(&slug) {
            slugs.push(slug);
        }
    }
    slugs
}

pub(super) fn is_triggered(text: &str) -> bool {
    LIST_TRIGGER.is_match(text) || !mentions_to_slugs(text).is_empty()
}

pub(super) async fn reply(ctx: &ActionContext<'_>, text: &str) -> Result<String, HubotError> {
    let org = &ctx.config.org;
    let bot_slug = &ctx.config.hubot.bot_slug;

    if is_list_request(text) {
        let users = org_users(ctx.worker, org, bot_slug, None).await?;
        return Ok(leave_list(ctx.calamari, &users, ctx.today).await);
    }

    let slugs = mentions_to_slugs(text);
    let users = org_users(ctx.worker, org, bot_slug, Some(slugs)).await?;
    Ok(mentioned_user_leaves(ctx.calamari, &users, ctx.today).await)
}
