//! # hubot-calamari
//!
//! Leave lookups for Hubot. Fetches approved absences from Calamari, keeps
//! them in a bounded per-user cache, and turns them into chat sentences
//! ("jane is on leave, returning to work tomorrow, the 19th.").

mod cache;
mod client;
mod leave;
pub mod query;
mod service;
mod workday;

// Re-export public API; consumers use `hubot_calamari::*` paths.
pub use cache::{shared_cache, LeaveCache, SharedLeaveCache};
pub use client::{is_transient, retry_transient, CalamariClient, LeaveFetchError, RetryPolicy};
pub use leave::{Leave, DATE_FORMAT};
pub use service::{Calamari, OnLeave, Target, TargetMap};
pub use workday::{is_weekend, next_working_day};
