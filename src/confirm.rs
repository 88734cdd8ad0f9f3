use tracing::debug;

use crate::domain::EntityKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Day { day_id: String },
    Item { day_id: String, item_id: String },
}

impl DeleteTarget {
    pub fn kind(&self) -> EntityKind {
        match self {
            DeleteTarget::Day { .. } => EntityKind::Day,
            DeleteTarget::Item { .. } => EntityKind::Item,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            DeleteTarget::Day { day_id } => day_id,
            DeleteTarget::Item { item_id, .. } => item_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion {
    pub target: DeleteTarget,
    pub label: String,
}

impl PendingDeletion {
    pub fn prompt(&self) -> String {
        match self.target.kind() {
            EntityKind::Day => format!("Delete day {} and all of its items?", self.label),
            EntityKind::Item => format!("Delete {}?", self.label),
        }
    }
}

/// Holds a destructive action until it is explicitly confirmed or dismissed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeleteConfirmation {
    #[default]
    Idle,
    Pending(PendingDeletion),
}

impl DeleteConfirmation {
    pub fn is_idle(&self) -> bool {
        matches!(self, DeleteConfirmation::Idle)
    }

    pub fn pending(&self) -> Option<&PendingDeletion> {
        match self {
            DeleteConfirmation::Pending(pending) => Some(pending),
            DeleteConfirmation::Idle => None,
        }
    }

    pub fn request(&mut self, target: DeleteTarget, label: impl Into<String>) {
        let pending = PendingDeletion {
            target,
            label: label.into(),
        };
        debug!(kind = %pending.target.kind(), id = pending.target.id(), "delete requested");
        *self = DeleteConfirmation::Pending(pending);
    }

    pub fn dismiss(&mut self) {
        if let DeleteConfirmation::Pending(pending) = &*self {
            debug!(id = pending.target.id(), "delete dismissed");
        }
        *self = DeleteConfirmation::Idle;
    }

    /// Leaves the pending state, handing back the target to remove.
    pub fn take(&mut self) -> Option<PendingDeletion> {
        match std::mem::take(self) {
            DeleteConfirmation::Pending(pending) => Some(pending),
            DeleteConfirmation::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DeleteConfirmation, DeleteTarget};

    #[test]
    fn request_then_dismiss_returns_to_idle() {
        let mut confirmation = DeleteConfirmation::default();
        confirmation.request(
            DeleteTarget::Day {
                day_id: "d1".to_string(),
            },
            "Day 1 (Mon)",
        );
        let pending = confirmation.pending().expect("delete should be pending");
        assert_eq!(pending.prompt(), "Delete day Day 1 (Mon) and all of its items?");

        confirmation.dismiss();
        assert!(confirmation.is_idle());
        assert_eq!(confirmation.take(), None);
    }

    #[test]
    fn take_hands_over_target_once() {
        let mut confirmation = DeleteConfirmation::default();
        confirmation.request(
            DeleteTarget::Item {
                day_id: "d1".to_string(),
                item_id: "i1".to_string(),
            },
            "09:00 Opening",
        );
        let pending = confirmation.take().expect("pending target");
        assert_eq!(pending.target.id(), "i1");
        assert_eq!(pending.prompt(), "Delete 09:00 Opening?");
        assert!(confirmation.is_idle());
        assert_eq!(confirmation.take(), None);
    }
}
