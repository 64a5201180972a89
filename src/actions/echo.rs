const TRIGGER: &str = "@hubot echo";

pub(super) fn is_triggered(text: &str) -> bool {
    text.contains(TRIGGER)
}

/// The message with the first `@hubot echo ` removed.
pub(super) fn reply(text: &str) -> String {
    text.replacen("@hubot echo ", "", 1)
}
