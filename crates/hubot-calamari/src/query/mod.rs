//! Leave questions Hubot answers in chat.
//!
//! Two questions, two ways of finding the return-to-work date:
//! - "who's off today" jumps from the end of a leave to the next working day,
//!   following any leave that starts exactly on that day;
//! - "is @jane around" walks forward from today, one day at a time, past
//!   weekends and every cached leave day.
//!
//! The two can disagree (e.g. overlapping leave); both are kept as they are.

pub mod format;


use chrono::{Days, NaiveDate};
use hubot_core::message::User;
use tracing::debug;

use crate::leave::Leave;
use crate::service::{Calamari, TargetMap};
use crate::workday::{is_weekend, next_working_day};
use format::{join_list_results, join_mention_results, list_sentence, mention_sentence};

/// Return date after `leave`, chaining through leave that starts exactly on
/// each computed return date. `all` must be sorted by start date.
pub fn chained_return_date(leave: &Leave, all: &[Leave]) -> NaiveDate {
    let mut back = next_working_day(leave.to);
    for next in all {
        if next.from == back {
            back = next_working_day(next.to);
        }
    }
    back
}

/// First day from `today` on that is neither a weekend nor covered by `all`.
pub fn walked_return_date(today: NaiveDate, all: &[Leave]) -> NaiveDate {
    let mut day = today;
    while is_weekend(day) || all.iter().any(|l| l.covers(day)) {
        day = day + Days::new(1);
    }
    day
}

/// Answer "who's on leave today" for `users`.
pub async fn leave_list(calamari: &Calamari, users: &[User], today: NaiveDate) -> String {
    let targets = TargetMap::from_users(users);
    let on_leave = calamari.get_leave(&targets, today, today).await;

    let mut results = Vec::new();
    for entry in on_leave {
        let all = calamari.get_all_vacations(&entry.target.slug).await;
        for leave in &entry.leaves {
            let back = chained_return_date(leave, &all);
            debug!(user = %entry.target.slug, %back, "computed return date");
            results.push(list_sentence(&entry.target.name, leave, back, today));
        }
    }
    join_list_results(&results)
}

/// Answer for each mentioned user that is on leave today. Empty when none are.
pub async fn mentioned_user_leaves(calamari: &Calamari, users: &[User], today: NaiveDate) -> String {
    let mut current = Vec::new();
    for user in users {
        if let Some(leave) = calamari.get_current_leave(user, today).await {
            current.push((user, leave));
        }
    }

    let mut results = Vec::new();
    for (user, leave) in current {
        let all = calamari.get_all_vacations(&user.slug).await;
        let back = walked_return_date(today, &all);
        results.push(mention_sentence(
            user.handle(),
            leave.is_partial_on(today),
            back,
            today,
        ));
    }
    join_mention_results(&results)
}
