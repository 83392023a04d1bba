//! User-facing error list shown after a failed submission.

use chrono::{DateTime, Duration, Utc};

/// Shown when the backend cannot be reached.
pub const NETWORK_FAILURE_MESSAGE: &str =
    "Failed to submit case. Please check your connection and try again.";

/// Shown for any failure without field details.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Something went wrong while submitting the case. Please try again.";

/// Default time before the report fades out.
pub const DEFAULT_FADE_SECS: i64 = 8;

/// One batch of messages displayed together, fading after a delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub messages: Vec<String>,
    pub raised_at: DateTime<Utc>,
    pub fade_after: Duration,
    dismissed: bool,
}

impl ErrorReport {
    pub fn new(messages: Vec<String>) -> Self {
        Self {
            messages,
            raised_at: Utc::now(),
            fade_after: Duration::seconds(DEFAULT_FADE_SECS),
            dismissed: false,
        }
    }

    pub fn single(message: impl Into<String>) -> Self {
        Self::new(vec![message.into()])
    }

    pub fn network_failure() -> Self {
        Self::single(NETWORK_FAILURE_MESSAGE)
    }

    pub fn generic_failure() -> Self {
        Self::single(GENERIC_FAILURE_MESSAGE)
    }

    pub fn with_fade_after(mut self, fade_after: Duration) -> Self {
        self.fade_after = fade_after;
        self
    }

    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        !self.dismissed && !self.messages.is_empty() && now < self.raised_at + self.fade_after
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible_at(Utc::now())
    }

    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }
}
