use chrono::{Days, NaiveDate};

/// Days ahead of today that still count as "due soon".
pub const DUE_SOON_WINDOW_DAYS: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Overdue,
    DueSoon,
    Upcoming,
}

impl DueStatus {
    /// A due date is the start of that day, so a card due today is already
    /// overdue.
    pub fn of(due: NaiveDate, today: NaiveDate) -> Self {
        let soon_until = today
            .checked_add_days(Days::new(DUE_SOON_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MAX);
        if due <= today {
            DueStatus::Overdue
        } else if due <= soon_until {
            DueStatus::DueSoon
        } else {
            DueStatus::Upcoming
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DueStatus::Overdue => "overdue",
            DueStatus::DueSoon => "due soon",
            DueStatus::Upcoming => "upcoming",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    #[test]
    fn classifies_relative_to_today() {
        let today = date(2024, 12, 20);
        assert_eq!(DueStatus::of(date(2024, 12, 19), today), DueStatus::Overdue);
        assert_eq!(DueStatus::of(today, today), DueStatus::Overdue);
        assert_eq!(DueStatus::of(date(2024, 12, 21), today), DueStatus::DueSoon);
        assert_eq!(DueStatus::of(date(2024, 12, 22), today), DueStatus::DueSoon);
        assert_eq!(DueStatus::of(date(2024, 12, 23), today), DueStatus::Upcoming);
    }

    #[test]
    fn window_crosses_year_end() {
        let today = date(2024, 12, 31);
        assert_eq!(DueStatus::of(date(2025, 1, 2), today), DueStatus::DueSoon);
    }
}
