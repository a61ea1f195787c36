use chrono::NaiveDate;
use thiserror::Error;

use crate::model::constants::{DAYS_PER_WEEK, FIRST_WEEK_WEIGHT};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeasonError {
    #[error("season end {end} must fall after season start {start}")]
    EmptyWindow { start: NaiveDate, end: NaiveDate },

    #[error("season window must span whole weeks, got {days} days")]
    RaggedWindow { days: i64 },

    #[error("season window must span at least two weeks, got {days} days")]
    TooShort { days: i64 },

    #[error("game date {date} lands on the weekly boundary of the season window")]
    BoundaryDate { date: NaiveDate }
}

/// The scoring window of a season, split into whole 7-day buckets.
///
/// Games inside the window decay exponentially from half weight in the first
/// week up to full weight in the last. Games outside carry no weight at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonWindow {
    start: NaiveDate,
    end: NaiveDate
}

impl SeasonWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<SeasonWindow, SeasonError> {
        let days = (end - start).num_days();
        if days <= 0 {
            return Err(SeasonError::EmptyWindow { start, end });
        }
        if days % DAYS_PER_WEEK != 0 {
            return Err(SeasonError::RaggedWindow { days });
        }
        if days / DAYS_PER_WEEK < 2 {
            return Err(SeasonError::TooShort { days });
        }

        Ok(SeasonWindow { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn num_weeks(&self) -> i64 {
        (self.end - self.start).num_days() / DAYS_PER_WEEK
    }

    /// Week bucket for a date, `None` when the date falls outside the window.
    fn week_of(&self, date: NaiveDate) -> Option<i64> {
        let day = (date - self.start).num_days();
        if day < 0 {
            return None;
        }

        let week = day / DAYS_PER_WEEK;
        if week >= self.num_weeks() {
            return None;
        }

        Some(week)
    }

    /// Rejects dates on the window's 7-day grid. Such a date sits on the edge
    /// between two weight buckets and cannot be assigned to either. Dates
    /// before the window are exempt since they carry no weight regardless.
    pub fn validate_date(&self, date: NaiveDate) -> Result<(), SeasonError> {
        let day = (date - self.start).num_days();
        if day >= 0 && day % DAYS_PER_WEEK == 0 {
            return Err(SeasonError::BoundaryDate { date });
        }

        Ok(())
    }

    /// Time-decay weight of a game played on `date`.
    ///
    /// The weight of an in-window game is c * k^w for week number w. Week 0
    /// needs a weight of 0.5, so c = 0.5. The last week needs a weight of
    /// 1.0, so 0.5 * k^(num_weeks - 1) = 1.0.
    pub fn weight(&self, date: NaiveDate) -> f64 {
        match self.week_of(date) {
            Some(week) => {
                let k = 2.0_f64.powf(1.0 / (self.num_weeks() - 1) as f64);
                FIRST_WEEK_WEIGHT * k.powi(week as i32)
            }
            None => 0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::Duration;

    fn window() -> SeasonWindow {
        // 13 whole weeks, Wednesday to Wednesday
        let start = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 9, 4).unwrap();
        SeasonWindow::new(start, end).unwrap()
    }

    #[test]
    fn test_whole_weeks() {
        assert_eq!(window().num_weeks(), 13);
    }

    #[test]
    fn test_rejects_empty_window() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        assert_eq!(
            SeasonWindow::new(start, start),
            Err(SeasonError::EmptyWindow { start, end: start })
        );
    }

    #[test]
    fn test_rejects_ragged_window() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        let end = start + Duration::days(30);
        assert_eq!(SeasonWindow::new(start, end), Err(SeasonError::RaggedWindow { days: 30 }));
    }

    #[test]
    fn test_rejects_single_week_window() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        let end = start + Duration::days(7);
        assert_eq!(SeasonWindow::new(start, end), Err(SeasonError::TooShort { days: 7 }));
    }

    #[test]
    fn test_weight_zero_before_window() {
        let w = window();
        assert_eq!(w.weight(w.start() - Duration::days(3)), 0.0);
    }

    #[test]
    fn test_weight_zero_after_window() {
        let w = window();
        assert_eq!(w.weight(w.end() + Duration::days(3)), 0.0);
    }

    #[test]
    fn test_weight_first_week_is_half() {
        let w = window();
        assert_abs_diff_eq!(w.weight(w.start() + Duration::days(3)), 0.5);
    }

    #[test]
    fn test_weight_last_week_is_full() {
        let w = window();
        let last_week_date = w.start() + Duration::days(12 * 7 + 3);
        assert_abs_diff_eq!(w.weight(last_week_date), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_weight_monotone_across_weeks() {
        let w = window();
        let mut previous = 0.0;
        for week in 0..w.num_weeks() {
            let weight = w.weight(w.start() + Duration::days(week * 7 + 3));
            assert!(weight > previous, "week {} weight {} not above {}", week, weight, previous);
            previous = weight;
        }
    }

    #[test]
    fn test_boundary_date_rejected() {
        let w = window();
        assert!(w.validate_date(w.start()).is_err());
        assert!(w.validate_date(w.start() + Duration::days(7)).is_err());
        assert!(w.validate_date(w.end()).is_err());
        assert!(w.validate_date(w.end() + Duration::days(14)).is_err());
    }

    #[test]
    fn test_off_grid_dates_accepted() {
        let w = window();
        assert!(w.validate_date(w.start() + Duration::days(1)).is_ok());
        assert!(w.validate_date(w.start() + Duration::days(6)).is_ok());
    }

    #[test]
    fn test_pre_window_grid_date_accepted() {
        // A game a week before the start is stale, not ambiguous
        let w = window();
        assert!(w.validate_date(w.start() - Duration::days(7)).is_ok());
        assert_eq!(w.weight(w.start() - Duration::days(7)), 0.0);
    }
}
