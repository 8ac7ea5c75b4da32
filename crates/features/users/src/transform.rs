//! Active-user projections.

use cwatch_domain::user::{Dataset, User};

/// Deep-copies the whole dataset, then filters and maps the copy.
///
/// Every record, active or not, is cloned (names included) before the filter
/// runs, so each call allocates proportionally to the full dataset.
#[must_use]
pub fn cloning(dataset: &Dataset) -> Vec<User> {
    let copy: Vec<User> = dataset.to_vec();

    let active: Vec<User> = copy.into_iter().filter(|user| user.is_active).collect();

    active.iter().map(User::with_upper_name).collect()
}

/// Filters and maps the shared records in one pass.
///
/// Only the output records are allocated.
#[must_use]
pub fn streaming(dataset: &Dataset) -> Vec<User> {
    dataset.iter().filter(|user| user.is_active).map(User::with_upper_name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        [
            User { id: 7, name: "ada Lovelace".to_owned(), is_active: true },
            User { id: 3, name: "Grace".to_owned(), is_active: false },
            User { id: 1, name: "straße".to_owned(), is_active: true },
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn cloning_keeps_source_order_and_upper_cases() {
        let users = cloning(&sample());
        let names: Vec<_> = users.iter().map(|u| (u.id, u.name.as_str())).collect();
        assert_eq!(names, [(7, "ADA LOVELACE"), (1, "STRASSE")]);
    }

    #[test]
    fn streaming_matches_cloning() {
        let dataset = sample();
        assert_eq!(streaming(&dataset), cloning(&dataset));
    }

    #[test]
    fn source_records_are_untouched() {
        let dataset = sample();
        let _ = cloning(&dataset);
        let _ = streaming(&dataset);
        assert_eq!(dataset.as_slice(), sample().as_slice());
    }

    #[test]
    fn empty_dataset_yields_empty_view() {
        assert!(cloning(&Dataset::default()).is_empty());
        assert!(streaming(&Dataset::default()).is_empty());
    }
}
