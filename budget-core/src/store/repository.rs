use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Number of days values live when no other policy is given.
pub const DEFAULT_TTL_DAYS: u32 = 365;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// How long a stored value stays readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    Days(u32),
    Never,
}

impl Default for Ttl {
    fn default() -> Self {
        Self::Days(DEFAULT_TTL_DAYS)
    }
}

impl Ttl {
    /// Expiry instant for a value written at `now`. `None` never expires,
    /// which also covers a lifetime past the last representable instant.
    pub fn expires_at(
        &self,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match self {
            Self::Days(days) => now.checked_add_signed(Duration::days(i64::from(*days))),
            Self::Never => None,
        }
    }
}

/// Returns true when a value with `expires_at` can no longer be read at `now`.
pub fn is_expired(
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    expires_at.is_some_and(|at| at <= now)
}

/// String key-value storage with per-entry expiry.
///
/// Each key is written independently; there are no transactions. Expired
/// entries read as absent.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Ttl,
    ) -> Result<(), StoreError>;

    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError>;

    async fn remove(
        &self,
        key: &str,
    ) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_ttl_is_one_year() {
        assert_eq!(Ttl::default(), Ttl::Days(365));
    }

    #[test]
    fn days_ttl_expires_after_duration() {
        let now = Utc::now();
        let expires_at = Ttl::Days(2).expires_at(now);

        assert_eq!(expires_at, Some(now + Duration::days(2)));
        assert!(!is_expired(expires_at, now + Duration::days(1)));
        assert!(is_expired(expires_at, now + Duration::days(2)));
    }

    #[test]
    fn never_ttl_does_not_expire() {
        let now = Utc::now();

        assert_eq!(Ttl::Never.expires_at(now), None);
        assert!(!is_expired(None, now + Duration::days(10_000)));
    }

    #[test]
    fn zero_day_ttl_is_expired_immediately() {
        let now = Utc::now();

        assert!(is_expired(Ttl::Days(0).expires_at(now), now));
    }

    #[test]
    fn days_ttl_past_calendar_range_never_expires() {
        let now = Utc::now();

        assert_eq!(Ttl::Days(u32::MAX).expires_at(now), None);
        assert!(!is_expired(Ttl::Days(u32::MAX).expires_at(now), now));
    }
}
