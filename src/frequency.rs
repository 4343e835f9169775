//! The frequency filter: a day-count window used to bound which transactions
//! a query considers.

use std::ops::RangeInclusive;

use time::{Date, Duration, OffsetDateTime};

/// The day-count window for transaction queries and analytics.
///
/// Clients send one of the enumerated tokens (`"7"`, `"30"`, `"365"`,
/// `"all"`). Anything unrecognized fails closed to [Frequency::All]: the UI
/// only ever supplies known tokens, but skew between client and server option
/// sets must not cause a hard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frequency {
    /// Only consider transactions from the last `n` days (inclusive).
    Days(u16),
    /// No lower bound; consider all transactions.
    #[default]
    All,
}

impl Frequency {
    /// Parse a frequency token from a query string.
    ///
    /// `None`, `"all"` and unrecognized tokens all map to [Frequency::All].
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            Some(text) => match text.trim().parse::<u16>() {
                Ok(days) => Frequency::Days(days),
                Err(_) => Frequency::All,
            },
            None => Frequency::All,
        }
    }

    /// The number of days the window spans, if bounded.
    pub fn since_days(&self) -> Option<u16> {
        match self {
            Frequency::Days(days) => Some(*days),
            Frequency::All => None,
        }
    }

    /// The inclusive date range the window covers, ending today.
    ///
    /// Returns `None` for [Frequency::All], meaning the query should not
    /// apply a date filter at all.
    pub fn date_range(&self) -> Option<RangeInclusive<Date>> {
        let today = OffsetDateTime::now_utc().date();

        self.since_days().map(|days| {
            let start = today
                .checked_sub(Duration::days(i64::from(days)))
                .unwrap_or(Date::MIN);

            start..=today
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Frequency;

    #[test]
    fn parses_enumerated_tokens() {
        assert_eq!(Frequency::parse(Some("7")), Frequency::Days(7));
        assert_eq!(Frequency::parse(Some("30")), Frequency::Days(30));
        assert_eq!(Frequency::parse(Some("365")), Frequency::Days(365));
        assert_eq!(Frequency::parse(Some("all")), Frequency::All);
    }

    #[test]
    fn unrecognized_tokens_fail_closed_to_all() {
        assert_eq!(Frequency::parse(Some("fortnight")), Frequency::All);
        assert_eq!(Frequency::parse(Some("-3")), Frequency::All);
        assert_eq!(Frequency::parse(Some("")), Frequency::All);
        assert_eq!(Frequency::parse(None), Frequency::All);
    }

    #[test]
    fn since_days_maps_the_window() {
        assert_eq!(Frequency::Days(7).since_days(), Some(7));
        assert_eq!(Frequency::All.since_days(), None);
    }

    #[test]
    fn all_has_no_date_range() {
        assert!(Frequency::All.date_range().is_none());
    }

    #[test]
    fn days_range_ends_today_and_spans_the_window() {
        let range = Frequency::Days(30).date_range().unwrap();

        assert_eq!(*range.end() - *range.start(), time::Duration::days(30));
    }
}
