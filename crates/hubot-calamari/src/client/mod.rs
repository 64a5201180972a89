//! Calamari leave API client.
//!
//! Wraps `POST /api/leave/request/v1/find`, which returns the approved
//! absences of one employee over a date range.

mod retry;


pub use retry::{is_transient, retry_transient, RetryPolicy};

use chrono::NaiveDate;
use hubot_core::config::LeaveConfig;
use reqwest::{header, StatusCode};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::leave::{AbsenceRecord, Leave, DATE_FORMAT};

const FIND_LEAVE_PATH: &str = "/api/leave/request/v1/find";

/// Why a leave lookup produced no data.
#[derive(Debug, Error)]
pub enum LeaveFetchError {
    /// The request never got a response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Calamari answered with something other than 200.
    #[error("unexpected status {status}")]
    Status { status: u16 },

    /// The 200 response body was not a list of absences.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Every attempt hit a transient failure.
    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<LeaveFetchError>,
    },
}

impl LeaveFetchError {
    /// HTTP status behind this error, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Status { status } => Some(*status),
            Self::Decode(_) => None,
            Self::RetriesExhausted { last, .. } => last.status(),
        }
    }

    /// Whether another attempt might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RetriesExhausted { .. } => false,
            _ => self.status().is_some_and(is_transient),
        }
    }
}

#[derive(Serialize)]
struct FindLeaveRequest<'a> {
    employee: &'a str,
    from: String,
    to: String,
}

/// HTTP client for one Calamari tenant.
pub struct CalamariClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    policy: RetryPolicy,
}

impl CalamariClient {
    /// Create a client for `base_url` (e.g. `https://acme.calamari.io`).
    pub fn new(base_url: &str, token: &str, policy: RetryPolicy) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            policy,
        }
    }

    /// Create from config values.
    pub fn from_config(config: &LeaveConfig) -> Self {
        Self::new(
            &config.api_base_url(),
            &config.token,
            RetryPolicy {
                max_retries: config.max_retries,
                delay: Duration::from_millis(config.retry_delay_ms),
            },
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the leave of `email` between `from` and `to`, both inclusive.
    ///
    /// Transient failures (429, 5xx) are retried with a fixed delay; anything
    /// else is returned as an error straight away.
    pub async fn fetch_leave(
        &self,
        email: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Leave>, LeaveFetchError> {
        info!(email, %from, %to, "requesting leave for user");
        retry_transient(&self.policy, |attempt| {
            self.request_leave(email, from, to, attempt)
        })
        .await
    }

    async fn request_leave(
        &self,
        email: &str,
        from: NaiveDate,
        to: NaiveDate,
        attempt: u32,
    ) -> Result<Vec<Leave>, LeaveFetchError> {
        let url = format!("{}{FIND_LEAVE_PATH}", self.base_url);
        let body = FindLeaveRequest {
            employee: email,
            from: from.format(DATE_FORMAT).to_string(),
            to: to.format(DATE_FORMAT).to_string(),
        };

        let resp = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .basic_auth("", Some(&self.token))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        debug!(email, attempt, status = status.as_u16(), "leave API responded");
        if status != StatusCode::OK {
            return Err(LeaveFetchError::Status {
                status: status.as_u16(),
            });
        }

        let records: Vec<AbsenceRecord> = resp
            .json()
            .await
            .map_err(|e| LeaveFetchError::Decode(e.to_string()))?;

        Ok(records
            .into_iter()
            .filter_map(|record| record.into_leave(email))
            .collect())
    }
}
