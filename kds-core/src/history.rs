//! History date filter

use chrono::{Local, NaiveDate};

use crate::reconcile::MergedOrderView;

/// Filter cached history views by local calendar date.
///
/// No selection returns the full list unchanged.
pub fn filter_by_date(views: &[MergedOrderView], date: Option<NaiveDate>) -> Vec<MergedOrderView> {
    match date {
        None => views.to_vec(),
        Some(selected) => views
            .iter()
            .filter(|view| {
                view.order
                    .created_at
                    .with_timezone(&Local)
                    .date_naive()
                    == selected
            })
            .cloned()
            .collect(),
    }
}
