//! Deterministic mapping of study sessions onto calendar dates.

use chrono::NaiveDate;

use crate::model::{StudySession, ViewMode};

/// Dates on which sessions take place between `start` and `end` inclusive.
///
/// - `Daily`: every date in the range.
/// - `Weekly`: the range is cut into 7-day windows anchored at `start` (the
///   last one may be shorter) and the first `sessions_per_week` days of each
///   window are picked.
///
/// An inverted range yields no dates.
#[must_use]
pub fn session_dates(start: NaiveDate, end: NaiveDate, view: ViewMode) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let range = start.iter_days().take_while(|day| *day <= end);
    match view {
        ViewMode::Daily => range.collect(),
        ViewMode::Weekly { sessions_per_week } => {
            let per_window = usize::from(sessions_per_week).min(7);
            range
                .enumerate()
                .filter(|(offset, _)| offset % 7 < per_window)
                .map(|(_, day)| day)
                .collect()
        }
    }
}

/// Pair sessions with dates by position.
///
/// Sessions past the end of `dates` are left without a date.
pub fn assign_dates(sessions: &mut [StudySession], dates: &[NaiveDate]) {
    for (index, session) in sessions.iter_mut().enumerate() {
        session.set_date(dates.get(index).copied());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_covers_every_day() {
        let dates = session_dates(day(2025, 1, 1), day(2025, 1, 3), ViewMode::Daily);
        assert_eq!(dates, vec![day(2025, 1, 1), day(2025, 1, 2), day(2025, 1, 3)]);
    }

    #[test]
    fn weekly_picks_earliest_days_per_window() {
        let dates = session_dates(
            day(2025, 1, 1),
            day(2025, 1, 14),
            ViewMode::Weekly {
                sessions_per_week: 2,
            },
        );
        assert_eq!(
            dates,
            vec![day(2025, 1, 1), day(2025, 1, 2), day(2025, 1, 8), day(2025, 1, 9)]
        );
    }

    #[test]
    fn weekly_last_window_is_capped_by_its_length() {
        // Window 2 is only 2025-01-08..=2025-01-09.
        let dates = session_dates(
            day(2025, 1, 1),
            day(2025, 1, 9),
            ViewMode::Weekly {
                sessions_per_week: 5,
            },
        );
        assert_eq!(dates.len(), 7);
        assert_eq!(dates.last(), Some(&day(2025, 1, 9)));
    }

    #[test]
    fn seven_per_week_equals_daily() {
        let start = day(2024, 2, 20);
        let end = day(2024, 3, 10);
        assert_eq!(
            session_dates(
                start,
                end,
                ViewMode::Weekly {
                    sessions_per_week: 7
                }
            ),
            session_dates(start, end, ViewMode::Daily)
        );
    }

    #[test]
    fn inverted_range_is_empty() {
        assert!(session_dates(day(2025, 1, 5), day(2025, 1, 1), ViewMode::Daily).is_empty());
    }

    #[test]
    fn mapping_is_deterministic() {
        let view = ViewMode::Weekly {
            sessions_per_week: 3,
        };
        let first = session_dates(day(2025, 3, 1), day(2025, 4, 30), view);
        let second = session_dates(day(2025, 3, 1), day(2025, 4, 30), view);
        assert_eq!(first, second);
    }

    #[test]
    fn extra_sessions_get_no_date() {
        let mut sessions: Vec<StudySession> = (1..=3)
            .map(|n| StudySession::new(n, format!("S{n}"), "", Vec::new(), 30).unwrap())
            .collect();
        assign_dates(&mut sessions, &[day(2025, 1, 1), day(2025, 1, 2)]);
        assert_eq!(sessions[0].date(), Some(day(2025, 1, 1)));
        assert_eq!(sessions[1].date(), Some(day(2025, 1, 2)));
        assert_eq!(sessions[2].date(), None);
    }
}
