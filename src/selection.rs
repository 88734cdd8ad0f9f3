use tracing::debug;

use crate::collection::contains;
use crate::domain::Day;

/// The day currently open in the editor.
///
/// Non-empty day list implies `Selected` with an id from that list; an empty
/// list implies `Empty`. Every transition takes the live day list so the
/// reference can be repaired in the same step that changes membership.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveSelection {
    #[default]
    Empty,
    Selected(String),
}

impl ActiveSelection {
    pub fn from_days(days: &[Day]) -> Self {
        days.first()
            .map(|day| ActiveSelection::Selected(day.id.clone()))
            .unwrap_or(ActiveSelection::Empty)
    }

    pub fn day_id(&self) -> Option<&str> {
        match self {
            ActiveSelection::Selected(id) => Some(id),
            ActiveSelection::Empty => None,
        }
    }

    pub fn is_selected(&self, day_id: &str) -> bool {
        self.day_id() == Some(day_id)
    }

    /// Adding a day only takes focus when nothing was selected.
    pub fn on_insert(&mut self, inserted: &Day) {
        if *self == ActiveSelection::Empty {
            debug!(day_id = %inserted.id, "selecting first day");
            *self = ActiveSelection::Selected(inserted.id.clone());
        }
    }

    pub fn on_remove(&mut self, removed_id: &str, remaining: &[Day]) {
        if !self.is_selected(removed_id) {
            return;
        }

        *self = Self::from_days(remaining);
        debug!(removed = removed_id, selected = ?self.day_id(), "active day removed");
    }

    pub fn switch_to(&mut self, day_id: &str, days: &[Day]) {
        assert!(contains(days, day_id), "cannot select unknown day: {day_id}");
        *self = ActiveSelection::Selected(day_id.to_string());
    }

    /// Re-selects `day_id` if it is still present, falling back to the first day.
    pub fn restore(&mut self, day_id: &str, days: &[Day]) {
        if contains(days, day_id) {
            *self = ActiveSelection::Selected(day_id.to_string());
        } else if !self.day_id().is_some_and(|id| contains(days, id)) {
            *self = Self::from_days(days);
        }
    }

    pub fn is_consistent_with(&self, days: &[Day]) -> bool {
        match self {
            ActiveSelection::Empty => days.is_empty(),
            ActiveSelection::Selected(id) => contains(days, id),
        }
    }
}
