//! Data types for the Tritius scraper
//!
//! All types implement Serialize and Deserialize so they can be published
//! as entity state and attributes without conversion.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Borrowings due within this many days raise the borrowing alert.
pub const ALERT_WINDOW_DAYS: u64 = 2;

/// Patron profile scraped from the personal-data page.
///
/// Rebuilt on every login. Missing form inputs come through as empty
/// strings, never as missing fields, so entity rendering stays stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Library reader number
    pub reader_id: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// End of the library registration, if the account has one
    pub registration_expiration: Option<NaiveDate>,
}

impl UserProfile {
    /// Display name in "first last" form.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One borrowed item from the current-borrowings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borrowing {
    /// Author text from the table row
    pub author: String,
    /// Title text from the anchor inside the title cell
    pub title: String,
    /// Numeric renewal id scraped from the row's renewal form
    pub id: u32,
    /// Due date of the loan
    pub due_date: NaiveDate,
}

/// Sort borrowings ascending by (due date, title).
///
/// The first element after sorting is the nearest due date, which the
/// coordinator publishes as the borrowing-expiration value. The sort is
/// stable so equal-key rows keep their page order.
pub fn sort_borrowings(borrowings: &mut [Borrowing]) {
    borrowings.sort_by(|a, b| {
        a.due_date
            .cmp(&b.due_date)
            .then_with(|| a.title.cmp(&b.title))
    });
}

/// Immutable aggregate of one full poll cycle.
///
/// Either fully populated by a successful cycle or the cycle failed as a
/// whole; there are no partial snapshots. Entities read it, never write it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Patron profile, when the profile page parsed
    pub user: Option<UserProfile>,
    /// Current borrowings sorted by (due date, title)
    pub borrowings: Option<Vec<Borrowing>>,
    /// Nearest due date, absent when there are no borrowings
    pub borrowing_expiration: Option<NaiveDate>,
}

impl Snapshot {
    /// Whether the nearest due date falls within the alert window.
    pub fn has_borrowing_alert(&self, today: NaiveDate) -> bool {
        match self.borrowing_expiration {
            Some(expiration) => expiration <= today + Days::new(ALERT_WINDOW_DAYS),
            None => false,
        }
    }

    /// Number of current borrowings, zero when none were fetched.
    pub fn borrowing_count(&self) -> usize {
        self.borrowings.as_ref().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn borrowing(title: &str, due: NaiveDate) -> Borrowing {
        Borrowing {
            author: "Author".to_string(),
            title: title.to_string(),
            id: 1,
            due_date: due,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sort_by_due_date_then_title() {
        let mut borrowings = vec![
            borrowing("Zeta", date(2025, 1, 10)),
            borrowing("Alpha", date(2025, 1, 10)),
            borrowing("Beta", date(2025, 2, 1)),
        ];
        sort_borrowings(&mut borrowings);

        let titles: Vec<&str> = borrowings.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Zeta", "Beta"]);
        assert_eq!(borrowings[0].due_date, date(2025, 1, 10));
    }

    #[test]
    fn test_borrowing_alert_window() {
        let snapshot = Snapshot {
            user: None,
            borrowings: None,
            borrowing_expiration: Some(date(2025, 3, 7)),
        };
        assert!(snapshot.has_borrowing_alert(date(2025, 3, 5)));
        assert!(snapshot.has_borrowing_alert(date(2025, 3, 7)));
        assert!(!snapshot.has_borrowing_alert(date(2025, 3, 4)));
    }

    #[test]
    fn test_no_alert_without_borrowings() {
        let snapshot = Snapshot {
            user: None,
            borrowings: Some(Vec::new()),
            borrowing_expiration: None,
        };
        assert!(!snapshot.has_borrowing_alert(date(2025, 3, 5)));
    }

    #[test]
    fn test_borrowing_count() {
        let snapshot = Snapshot {
            user: None,
            borrowings: Some(vec![borrowing("A", date(2025, 1, 1))]),
            borrowing_expiration: Some(date(2025, 1, 1)),
        };
        assert_eq!(snapshot.borrowing_count(), 1);

        let empty = Snapshot {
            user: None,
            borrowings: None,
            borrowing_expiration: None,
        };
        assert_eq!(empty.borrowing_count(), 0);
    }

    #[test]
    fn test_user_profile_display_name() {
        let user = UserProfile {
            reader_id: "1234".to_string(),
            first_name: "Jan".to_string(),
            last_name: "Novák".to_string(),
            registration_expiration: None,
        };
        assert_eq!(user.display_name(), "Jan Novák");
    }

    #[test]
    fn test_borrowing_serialization_round_trip() {
        let b = borrowing("Dune", date(2025, 3, 5));
        let json = serde_json::to_string(&b).unwrap();
        let back: Borrowing = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }

    proptest! {
        #[test]
        fn prop_sorted_ascending_by_due_date_and_title(
            rows in prop::collection::vec((0u64..365, "[a-z]{1,8}"), 0..32)
        ) {
            let base = date(2025, 1, 1);
            let mut borrowings: Vec<Borrowing> = rows
                .into_iter()
                .map(|(offset, title)| borrowing(&title, base + Days::new(offset)))
                .collect();
            sort_borrowings(&mut borrowings);

            for pair in borrowings.windows(2) {
                let key_a = (pair[0].due_date, pair[0].title.as_str());
                let key_b = (pair[1].due_date, pair[1].title.as_str());
                prop_assert!(key_a <= key_b);
            }
        }
    }
}
