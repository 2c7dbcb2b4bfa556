use std::time::Duration;

use salesdesk_core::{AppError, AppResult};

/// Default lifetime of submit status messages, in milliseconds.
pub const DEFAULT_NOTICE_DELAY_MS: u64 = 3000;

/// Timing configuration for submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionConfig {
    notice_delay: Duration,
}

impl SubmissionConfig {
    /// Creates a configuration with a custom notice delay.
    pub fn new(notice_delay: Duration) -> AppResult<Self> {
        if notice_delay.is_zero() {
            return Err(AppError::Validation(
                "notice delay must be greater than zero".to_owned(),
            ));
        }

        Ok(Self { notice_delay })
    }

    /// Returns how long a status message stays up before the controller goes idle.
    #[must_use]
    pub fn notice_delay(&self) -> Duration {
        self.notice_delay
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            notice_delay: Duration::from_millis(DEFAULT_NOTICE_DELAY_MS),
        }
    }
}
