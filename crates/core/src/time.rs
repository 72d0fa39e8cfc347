use chrono::{DateTime, Duration, Utc};

/// Source of "now" for seeding and fixtures.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Timestamp `minutes` before [`Clock::now`].
    ///
    /// Used to lay out interview creation times in a stable newest-first order.
    #[must_use]
    pub fn minutes_ago(&self, minutes: i64) -> DateTime<Utc> {
        self.now() - Duration::minutes(minutes)
    }
}

/// Deterministic timestamp for tests and fixtures (2024-01-01T00:00:00Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_704_067_200;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_ago_counts_back_from_fixed_now() {
        let clock = Clock::fixed(fixed_now());
        assert_eq!(clock.minutes_ago(0), fixed_now());
        assert_eq!(clock.minutes_ago(90), fixed_now() - Duration::minutes(90));
    }
}
