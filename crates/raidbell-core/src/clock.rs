use chrono::{DateTime, FixedOffset, Utc};

use crate::error::{CoreError, Result};

/// Process-wide wall clock pinned to a single fixed UTC offset.
///
/// Every scheduling decision reads this one offset; per-event timezones
/// are out of scope.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    offset: FixedOffset,
}

impl Clock {
    /// Build a clock `hours` east of UTC (negative for west).
    pub fn from_offset_hours(hours: i32) -> Result<Self> {
        let offset =
            FixedOffset::east_opt(hours * 3600).ok_or(CoreError::InvalidOffset { hours })?;
        Ok(Self { offset })
    }

    /// Current local time at the configured offset.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_applied() {
        let clock = Clock::from_offset_hours(3).unwrap();
        assert_eq!(clock.offset().local_minus_utc(), 3 * 3600);
        assert_eq!(clock.now().offset().local_minus_utc(), 3 * 3600);
    }

    #[test]
    fn negative_offset_accepted() {
        let clock = Clock::from_offset_hours(-5).unwrap();
        assert_eq!(clock.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn out_of_range_offset_rejected() {
        assert!(Clock::from_offset_hours(30).is_err());
        assert!(Clock::from_offset_hours(-30).is_err());
    }
}
