pub(super) fn default_name() -> String {
    "Hubot".to_string()
}
pub(super) fn default_bot_slug() -> String {
    "user-hubot".to_string()
}
pub(super) fn default_log_level() -> String {
    "info".to_string()
}
pub(super) fn default_org_slug() -> String {
    "org-balena".to_string()
}
pub(super) fn default_email_domain() -> String {
    "balena.io".to_string()
}
pub(super) fn default_max_retries() -> u32 {
    8
}
pub(super) fn default_retry_delay_ms() -> u64 {
    1000
}
pub(super) fn default_cache_capacity() -> usize {
    200
}
pub(super) fn default_fetch_spacing_ms() -> u64 {
    100
}
pub(super) fn default_warm_horizon_months() -> u32 {
    3
}
