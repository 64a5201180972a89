use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static HELP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^@hubot\s+help\b").expect("constant regex pattern is valid"));

pub(super) fn is_triggered(text: &str) -> bool {
    HELP_PATTERN.is_match(text)
}

pub(super) fn reply(name: &str) -> String {
    format!(
        "\
*{name}* Commands\n\n\
@hubot who's on leave    Everyone on leave today\n\
@hubot who's off today   Same as above\n\
@jane                    Tells you if jane is on leave today\n\
@hubot echo <text>       Repeats <text>\n\
@hubot help              This message"
    )
}
