//! Cache-backed leave lookups.

use chrono::{Months, NaiveDate};
use hubot_core::config::LeaveConfig;
use hubot_core::message::User;
use indexmap::IndexMap;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::cache::SharedLeaveCache;
use crate::client::CalamariClient;
use crate::leave::Leave;

/// A chat identity leave can be attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// User slug, the leave cache key.
    pub slug: String,
    /// Name used in chat replies (slug without `user-`).
    pub name: String,
}

/// Email → chat identity, in the order users were given.
#[derive(Debug, Clone, Default)]
pub struct TargetMap {
    targets: IndexMap<String, Target>,
}

impl TargetMap {
    /// Map each user's first email to their identity. Users without an email are skipped.
    pub fn from_users(users: &[User]) -> Self {
        let mut targets = IndexMap::new();
        for user in users {
            if let Some(email) = user.primary_email() {
                targets.insert(
                    email.to_string(),
                    Target {
                        slug: user.slug.clone(),
                        name: user.handle().to_string(),
                    },
                );
            }
        }
        Self { targets }
    }

    pub fn get(&self, email: &str) -> Option<&Target> {
        self.targets.get(email)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Target)> {
        self.targets.iter().map(|(email, target)| (email.as_str(), target))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Leave intervals of one user that overlap a query range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnLeave {
    pub target: Target,
    pub leaves: Vec<Leave>,
}

/// Leave lookups backed by the shared cache, filled lazily from Calamari.
///
/// A failed fetch is logged and cached as "no leave", so callers cannot tell
/// an empty answer from an unavailable API.
pub struct Calamari {
    client: CalamariClient,
    cache: SharedLeaveCache,
    fetch_spacing: Duration,
    warm_horizon: Months,
}

impl Calamari {
    pub fn new(client: CalamariClient, cache: SharedLeaveCache) -> Self {
        Self {
            client,
            cache,
            fetch_spacing: Duration::from_millis(100),
            warm_horizon: Months::new(3),
        }
    }

    /// Create from config values, sharing `cache` with other holders.
    pub fn from_config(config: &LeaveConfig, cache: SharedLeaveCache) -> Self {
        Self {
            fetch_spacing: Duration::from_millis(config.fetch_spacing_ms),
            warm_horizon: Months::new(config.warm_horizon_months),
            ..Self::new(CalamariClient::from_config(config), cache)
        }
    }

    /// Pause between consecutive fetches while filling the cache.
    pub fn with_fetch_spacing(mut self, spacing: Duration) -> Self {
        self.fetch_spacing = spacing;
        self
    }

    pub fn cache(&self) -> &SharedLeaveCache {
        &self.cache
    }

    /// Fetch leave for `email`, degrading any failure to an empty list.
    pub async fn fetch_or_empty(&self, email: &str, from: NaiveDate, to: NaiveDate) -> Vec<Leave> {
        match self.client.fetch_leave(email, from, to).await {
            Ok(leave) => leave,
            Err(e) => {
                error!(email, status = ?e.status(), "failed to get leave details: {e}");
                Vec::new()
            }
        }
    }

    async fn is_cached(&self, slug: &str) -> bool {
        self.cache.lock().await.has(slug)
    }

    /// Fetch and cache leave for one user. The cache lock is not held while fetching.
    async fn fill(&self, slug: &str, email: &str, from: NaiveDate, to: NaiveDate) {
        let leave = self.fetch_or_empty(email, from, to).await;
        self.cache.lock().await.set(slug, leave);
    }

    /// Cache every target not cached yet, pausing between fetches.
    async fn fill_missing<'a, I>(&self, targets: I, from: NaiveDate, to: NaiveDate)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (email, slug) in targets {
            if self.is_cached(slug).await {
                continue;
            }
            self.fill(slug, email, from, to).await;
            tokio::time::sleep(self.fetch_spacing).await;
        }
    }

    /// Leave overlapping `[from, to]` for each target, filling the cache for
    /// targets not seen yet. Targets with no overlapping leave are omitted.
    pub async fn get_leave(&self, targets: &TargetMap, from: NaiveDate, to: NaiveDate) -> Vec<OnLeave> {
        info!("Requesting leave details for {} users", targets.len());
        self.fill_missing(
            targets.iter().map(|(email, t)| (email, t.slug.as_str())),
            from,
            to,
        )
        .await;

        let mut cache = self.cache.lock().await;
        let mut on_leave = Vec::new();
        for (_, target) in targets.iter() {
            let Some(leave) = cache.get(&target.slug) else {
                continue;
            };
            let matches: Vec<Leave> = leave
                .iter()
                .filter(|l| l.overlaps(from, to))
                .cloned()
                .collect();
            if !matches.is_empty() {
                on_leave.push(OnLeave {
                    target: target.clone(),
                    leaves: matches,
                });
            }
        }
        on_leave
    }

    /// The leave `user` is on at `today`, if any.
    pub async fn get_current_leave(&self, user: &User, today: NaiveDate) -> Option<Leave> {
        if !self.is_cached(&user.slug).await {
            let Some(email) = user.primary_email() else {
                warn!(slug = %user.slug, "user has no email, cannot look up leave");
                return None;
            };
            self.fill(&user.slug, email, today, today).await;
        }
        self.cache
            .lock()
            .await
            .get(&user.slug)?
            .iter()
            .find(|l| l.covers(today))
            .cloned()
    }

    /// Every cached leave interval for `slug`, sorted by start date.
    pub async fn get_all_vacations(&self, slug: &str) -> Vec<Leave> {
        self.cache
            .lock()
            .await
            .get(slug)
            .map(<[Leave]>::to_vec)
            .unwrap_or_default()
    }

    /// Prefetch upcoming leave for every user not cached yet.
    pub async fn update_leave(&self, users: &[User], today: NaiveDate) {
        info!("[leave] Updating leave cache");
        let until = today.checked_add_months(self.warm_horizon).unwrap_or(today);
        let targets = TargetMap::from_users(users);
        self.fill_missing(
            targets.iter().map(|(email, t)| (email, t.slug.as_str())),
            today,
            until,
        )
        .await;
        info!("[leave] Updated leave cache");
    }
}
