use crate::config::PacingConfig;
use std::time::Duration;

/// Fixed politeness delays between requests
///
/// These are unconditional sleeps, not adaptive backoff. Zero durations
/// skip the sleep entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    /// After each server-link resolution
    pub per_link: Duration,

    /// After each movie that made a request
    pub per_movie: Duration,

    /// After each category
    pub per_category: Duration,
}

impl PacingPolicy {
    pub fn new(per_link: Duration, per_movie: Duration, per_category: Duration) -> Self {
        Self {
            per_link,
            per_movie,
            per_category,
        }
    }

    /// No delays at all
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    pub async fn after_link(&self) {
        pause(self.per_link).await;
    }

    pub async fn after_movie(&self) {
        pause(self.per_movie).await;
    }

    pub async fn after_category(&self) {
        pause(self.per_category).await;
    }
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self::from(&PacingConfig::default())
    }
}

impl From<&PacingConfig> for PacingPolicy {
    fn from(config: &PacingConfig) -> Self {
        Self::new(
            Duration::from_millis(config.link_delay_ms),
            Duration::from_millis(config.movie_delay_ms),
            Duration::from_millis(config.category_delay_ms),
        )
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
