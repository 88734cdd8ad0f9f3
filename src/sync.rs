use tracing::warn;

use crate::domain::{Day, EntityKind};
use crate::editor::{AgendaEditor, Change};
use crate::error::StorageError;
use crate::store::{AgendaStore, Entity};

/// Forwards `change` to the store. Reorders and day edits save the whole day
/// as it currently stands in `editor`.
pub fn persist_change<S: AgendaStore + ?Sized>(
    store: &mut S,
    editor: &AgendaEditor,
    change: &Change,
) -> Result<(), StorageError> {
    match change {
        Change::ItemCreated { day_id, item } => {
            store.create(&Entity::Item {
                day_id: day_id.clone(),
                item: item.clone(),
            })?;
        }
        Change::ItemUpdated { day_id, after, .. } => {
            store.update(&Entity::Item {
                day_id: day_id.clone(),
                item: after.clone(),
            })?;
        }
        Change::ItemsReordered { day_id, .. } => {
            store.update(&Entity::Day(current_day(editor, day_id)?))?;
        }
        Change::ItemRemoved { item, .. } => {
            store.delete(EntityKind::Item, &item.id)?;
        }
        Change::DayCreated { day } => {
            store.create(&Entity::Day(day.clone()))?;
        }
        Change::DayUpdated { after, .. } => {
            store.update(&Entity::Day(current_day(editor, &after.id)?))?;
        }
        Change::DayRemoved { day, .. } => {
            store.delete(EntityKind::Day, &day.id)?;
        }
    }
    Ok(())
}

/// Persists `change`, reverting it in `editor` when the store rejects it.
pub fn commit_change<S: AgendaStore + ?Sized>(
    store: &mut S,
    editor: &mut AgendaEditor,
    change: Change,
) -> Result<Change, StorageError> {
    match persist_change(store, editor, &change) {
        Ok(()) => Ok(change),
        Err(err) => {
            warn!(error = %err, change = %change.describe(), "failed to save change");
            editor.revert(change);
            Err(err)
        }
    }
}

fn current_day(editor: &AgendaEditor, day_id: &str) -> Result<Day, StorageError> {
    editor
        .day(day_id)
        .cloned()
        .ok_or_else(|| StorageError::MissingEntity {
            kind: EntityKind::Day,
            id: day_id.to_string(),
        })
}
