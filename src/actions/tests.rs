use super::*;
use crate::directory::StaticDirectory;
use hubot_calamari::{shared_cache, CalamariClient, Leave, RetryPolicy, DATE_FORMAT};
use hubot_core::message::MessageKind;
use std::time::Duration;

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
}

/// Tuesday.
fn today() -> NaiveDate {
    day("2022-10-04")
}

fn user(handle: &str) -> User {
    User {
        id: format!("id-{handle}"),
        slug: format!("user-{handle}"),
        emails: vec![format!("{handle}@balena.io")],
        orgs: vec!["org-balena".to_string()],
    }
}

fn leave(handle: &str, from: &str, to: &str) -> Leave {
    Leave {
        email: format!("{handle}@balena.io"),
        from: day(from),
        to: day(to),
        status: "ACCEPTED".to_string(),
        first_day_half: false,
        last_day_half: false,
    }
}

/// A service whose API is unreachable, so only seeded cache entries count.
fn offline_calamari() -> Calamari {
    let client = CalamariClient::new(
        "http://127.0.0.1:9",
        "secret",
        RetryPolicy {
            max_retries: 0,
            delay: Duration::ZERO,
        },
    );
    Calamari::new(client, shared_cache(200)).with_fetch_spacing(Duration::ZERO)
}

fn directory() -> StaticDirectory {
    StaticDirectory::new(vec![user("jane"), user("john")]).with_bot("user-hubot")
}

async fn run_as(
    worker: &StaticDirectory,
    calamari: &Calamari,
    message: ChatMessage,
) -> Result<Vec<Whisper>, HubotError> {
    let config = Config::default();
    let ctx = ActionContext {
        worker,
        calamari,
        config: &config,
        today: today(),
    };
    handle(&ctx, &message).await
}

/// Post `text` as jane, an org member.
async fn run(
    worker: &StaticDirectory,
    calamari: &Calamari,
    text: &str,
) -> Result<Vec<Whisper>, HubotError> {
    run_as(worker, calamari, ChatMessage::new("id-jane", "thread-1", text)).await
}

fn messages(whispers: &[Whisper]) -> Vec<&str> {
    whispers.iter().map(|w| w.message.as_str()).collect()
}

// --- parsing ---

#[test]
fn test_is_list_request() {
    assert!(is_list_request("@hubot whos on leave"));
    assert!(is_list_request("@hubot who's on leave"));
    assert!(is_list_request("@hubot whos on leave?"));
    assert!(is_list_request("@hubot who's on leave?"));
    assert!(is_list_request("@hubot whos off today"));
    assert!(is_list_request("@hubot who's off today?"));
    assert!(is_list_request("@hubot Who's ON   LEAVE"));
    assert!(!is_list_request("@hubot echo test"));
}

#[test]
fn test_mentions_to_slugs() {
    assert_eq!(mentions_to_slugs("@foo test @bar"), vec!["user-foo", "user-bar"]);
}

#[test]
fn test_mentions_to_slugs_ignores_group_mentions() {
    assert_eq!(
        mentions_to_slugs("@foo test @bar @@buz test"),
        vec!["user-foo", "user-bar"]
    );
}

#[test]
fn test_mentions_to_slugs_ignores_reserved_names() {
    assert_eq!(
        mentions_to_slugs("@people test @bar @thread @t @hubot test"),
        vec!["user-bar"]
    );
}

#[test]
fn test_mentions_to_slugs_needs_leading_space() {
    assert!(mentions_to_slugs("mail jane@balena.io").is_empty());
    assert_eq!(mentions_to_slugs("@Jane and @jane"), vec!["user-jane"]);
}

#[test]
fn test_triggered_echo() {
    assert_eq!(Action::triggered("@hubot echo hi"), vec![Action::Echo]);
    assert_eq!(
        Action::triggered("@hubot echo who's on leave"),
        vec![Action::Echo]
    );
}

#[test]
fn test_triggered_help() {
    assert_eq!(Action::triggered("@hubot help"), vec![Action::Help]);
    assert_eq!(Action::triggered("@hubot   help me"), vec![Action::Help]);
    assert!(Action::triggered("@hubot helpful").is_empty());
}

#[test]
fn test_triggered_leave() {
    assert_eq!(Action::triggered("@hubot who's on leave?"), vec![Action::Leave]);
    assert_eq!(Action::triggered("@hubot whos off today"), vec![Action::Leave]);
    assert_eq!(Action::triggered("is @jane around?"), vec![Action::Leave]);
    assert!(Action::triggered("hello there").is_empty());
    assert!(Action::triggered("@hubot hi").is_empty());
}

#[test]
fn test_triggered_several_actions() {
    assert_eq!(
        Action::triggered("@hubot echo ping @john"),
        vec![Action::Echo, Action::Leave]
    );
    assert_eq!(
        Action::triggered("@hubot help @john"),
        vec![Action::Help, Action::Leave]
    );
}

// --- handling ---

#[tokio::test]
async fn test_echo_whispers_as_bot() {
    let worker = directory();
    let calamari = offline_calamari();
    let whispers = run(&worker, &calamari, "@hubot echo hello world").await.unwrap();
    assert_eq!(whispers.len(), 1);
    assert_eq!(whispers[0].message, "hello world");
    assert_eq!(whispers[0].actor, "user-hubot");
    assert_eq!(whispers[0].thread, "thread-1");
    assert_eq!(worker.whispers().await, whispers);
}

#[tokio::test]
async fn test_help_lists_commands() {
    let worker = directory();
    let calamari = offline_calamari();
    let whispers = run(&worker, &calamari, "@hubot help").await.unwrap();
    assert_eq!(whispers.len(), 1);
    assert!(whispers[0].message.contains("who's on leave"));
    assert!(whispers[0].message.contains("echo"));
}

#[tokio::test]
async fn test_echo_and_leave_both_reply() {
    let worker = directory();
    let calamari = offline_calamari();
    calamari
        .cache()
        .lock()
        .await
        .set("user-john", vec![leave("john", "2022-10-04", "2022-10-04")]);

    let whispers = run(&worker, &calamari, "@hubot echo ping @john").await.unwrap();
    assert_eq!(
        messages(&whispers),
        vec![
            "ping @john",
            "john is on leave today, returning to work tomorrow, the 5th."
        ]
    );
    assert_eq!(worker.whispers().await.len(), 2);
}

#[tokio::test]
async fn test_leave_list_whisper() {
    let worker = directory();
    let calamari = offline_calamari();
    {
        let mut cache = calamari.cache().lock().await;
        cache.set("user-jane", vec![leave("jane", "2022-10-03", "2022-10-04")]);
        cache.set("user-john", vec![]);
    }

    let whispers = run(&worker, &calamari, "@hubot who's on leave?").await.unwrap();
    assert_eq!(
        messages(&whispers),
        vec!["jane is on leave, returning to work tomorrow, the 5th."]
    );
}

#[tokio::test]
async fn test_leave_list_nobody_still_replies() {
    let worker = directory();
    let calamari = offline_calamari();

    let whispers = run(&worker, &calamari, "@hubot whos off today").await.unwrap();
    assert_eq!(messages(&whispers), vec!["No one is on leave."]);
}

#[tokio::test]
async fn test_mention_on_leave_whispers() {
    let worker = directory();
    let calamari = offline_calamari();
    calamari
        .cache()
        .lock()
        .await
        .set("user-john", vec![leave("john", "2022-10-04", "2022-10-04")]);

    let whispers = run(&worker, &calamari, "can @john review this?").await.unwrap();
    assert_eq!(
        messages(&whispers),
        vec!["john is on leave today, returning to work tomorrow, the 5th."]
    );
}

#[tokio::test]
async fn test_mention_not_on_leave_is_silent() {
    let worker = directory();
    let calamari = offline_calamari();
    calamari.cache().lock().await.set("user-john", vec![]);

    assert!(run(&worker, &calamari, "thanks @john").await.unwrap().is_empty());
    assert!(worker.whispers().await.is_empty());
}

#[tokio::test]
async fn test_mention_of_unknown_user_is_silent() {
    let worker = directory();
    let calamari = offline_calamari();
    assert!(run(&worker, &calamari, "ask @stranger").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_whispers_trigger_actions() {
    let worker = directory();
    let calamari = offline_calamari();
    calamari
        .cache()
        .lock()
        .await
        .set("user-john", vec![leave("john", "2022-10-04", "2022-10-04")]);
    let mut message = ChatMessage::new("id-jane", "thread-1", "is @john around?");
    message.kind = MessageKind::Whisper;

    let whispers = run_as(&worker, &calamari, message).await.unwrap();
    assert_eq!(
        messages(&whispers),
        vec!["john is on leave today, returning to work tomorrow, the 5th."]
    );
}

#[tokio::test]
async fn test_leave_lookup_needs_org_member() {
    let mut outsider = user("outsider");
    outsider.orgs = vec!["org-other".to_string()];
    let worker = StaticDirectory::new(vec![user("jane"), outsider]).with_bot("user-hubot");
    let calamari = offline_calamari();
    calamari
        .cache()
        .lock()
        .await
        .set("user-jane", vec![leave("jane", "2022-10-04", "2022-10-04")]);

    for actor in ["id-outsider", "id-unknown"] {
        let message = ChatMessage::new(actor, "thread-1", "is @jane around?");
        assert!(run_as(&worker, &calamari, message).await.unwrap().is_empty());
    }
    // Echo has no membership requirement.
    let message = ChatMessage::new("id-outsider", "thread-1", "@hubot echo ping @jane");
    let whispers = run_as(&worker, &calamari, message).await.unwrap();
    assert_eq!(messages(&whispers), vec!["ping @jane"]);
}

#[tokio::test]
async fn test_messages_from_the_bot_are_ignored() {
    let worker = directory();
    let calamari = offline_calamari();
    let message = ChatMessage::new("user-hubot", "thread-1", "@hubot echo hi");
    assert!(run_as(&worker, &calamari, message).await.unwrap().is_empty());
    assert!(worker.whispers().await.is_empty());
}

#[tokio::test]
async fn test_missing_bot_user_is_an_error() {
    let worker = StaticDirectory::new(vec![user("jane")]);
    let calamari = offline_calamari();
    let err = run(&worker, &calamari, "@hubot echo hi").await.unwrap_err();
    assert!(matches!(err, HubotError::Worker(ref m) if m == "user-hubot not found"));
}

#[tokio::test]
async fn test_missing_bot_user_fails_even_for_silent_replies() {
    let worker = StaticDirectory::new(vec![user("jane"), user("john")]);
    let calamari = offline_calamari();
    calamari.cache().lock().await.set("user-john", vec![]);

    let err = run(&worker, &calamari, "thanks @john").await.unwrap_err();
    assert!(matches!(err, HubotError::Worker(_)));
    // Untriggered messages never touch the worker.
    assert!(run(&worker, &calamari, "hello").await.unwrap().is_empty());
}

// --- organisation users ---

#[tokio::test]
async fn test_org_users_filters_and_narrows_emails() {
    let mut jane = user("jane");
    jane.emails = vec![
        "jane@gmail.com".to_string(),
        "jane@balena.io".to_string(),
        "jane.doe@balena.io".to_string(),
    ];
    let mut outsider = user("outsider");
    outsider.orgs = vec!["org-other".to_string()];
    let mut gmail = user("gmail");
    gmail.emails = vec!["gmail@gmail.com".to_string()];
    let mut bot = user("hubot");
    bot.emails = vec!["hubot@balena.io".to_string()];
    let worker = StaticDirectory::new(vec![jane, outsider, gmail, bot, user("john")]);

    let config = Config::default();
    let users = org_users(&worker, &config.org, &config.hubot.bot_slug, None)
        .await
        .unwrap();
    let slugs: Vec<&str> = users.iter().map(|u| u.slug.as_str()).collect();
    assert_eq!(slugs, vec!["user-jane", "user-john"]);
    assert_eq!(users[0].emails, vec!["jane@balena.io"]);

    let only_john = org_users(
        &worker,
        &config.org,
        &config.hubot.bot_slug,
        Some(vec!["user-john".to_string()]),
    )
    .await
    .unwrap();
    assert_eq!(only_john.len(), 1);
    assert_eq!(only_john[0].slug, "user-john");
}
