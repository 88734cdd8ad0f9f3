//! The persistence collaborator the editor's host talks to.

use crate::collection::{contains, insert, position, remove_by_id, replace};
use crate::domain::{Day, EntityKind, Item};
use crate::error::StorageError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Day(Day),
    Item { day_id: String, item: Item },
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Day(_) => EntityKind::Day,
            Entity::Item { .. } => EntityKind::Item,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Entity::Day(day) => &day.id,
            Entity::Item { item, .. } => &item.id,
        }
    }
}

pub trait AgendaStore {
    fn create(&mut self, entity: &Entity) -> Result<String, StorageError>;

    /// Replaces the stored record with the same id. Day updates carry the
    /// day's items, which is how item order is saved.
    fn update(&mut self, entity: &Entity) -> Result<(), StorageError>;

    fn delete(&mut self, kind: EntityKind, id: &str) -> Result<(), StorageError>;

    fn list(&self, kind: EntityKind) -> Result<Vec<Entity>, StorageError>;
}

pub(crate) fn create_in(days: &mut Vec<Day>, entity: &Entity) -> Result<String, StorageError> {
    match entity {
        Entity::Day(day) => {
            if contains(days, &day.id) {
                return Err(duplicate(EntityKind::Day, &day.id));
            }
            *days = insert(days, day.clone());
        }
        Entity::Item { day_id, item } => {
            let index = day_index(days, day_id)?;
            if contains(&days[index].items, &item.id) {
                return Err(duplicate(EntityKind::Item, &item.id));
            }
            days[index].items = insert(&days[index].items, item.clone());
        }
    }
    Ok(entity.id().to_string())
}

pub(crate) fn update_in(days: &mut Vec<Day>, entity: &Entity) -> Result<(), StorageError> {
    match entity {
        Entity::Day(day) => {
            day_index(days, &day.id)?;
            *days = replace(days, day.clone());
        }
        Entity::Item { day_id, item } => {
            let index = day_index(days, day_id)?;
            if !contains(&days[index].items, &item.id) {
                return Err(missing(EntityKind::Item, &item.id));
            }
            days[index].items = replace(&days[index].items, item.clone());
        }
    }
    Ok(())
}

pub(crate) fn delete_in(days: &mut Vec<Day>, kind: EntityKind, id: &str) -> Result<(), StorageError> {
    match kind {
        EntityKind::Day => {
            day_index(days, id)?;
            *days = remove_by_id(days, id);
        }
        EntityKind::Item => {
            let index = days
                .iter()
                .position(|day| contains(&day.items, id))
                .ok_or_else(|| missing(EntityKind::Item, id))?;
            days[index].items = remove_by_id(&days[index].items, id);
        }
    }
    Ok(())
}

pub(crate) fn list_in(days: &[Day], kind: EntityKind) -> Vec<Entity> {
    match kind {
        EntityKind::Day => days.iter().cloned().map(Entity::Day).collect(),
        EntityKind::Item => days
            .iter()
            .flat_map(|day| {
                day.items.iter().map(|item| Entity::Item {
                    day_id: day.id.clone(),
                    item: item.clone(),
                })
            })
            .collect(),
    }
}

fn day_index(days: &[Day], day_id: &str) -> Result<usize, StorageError> {
    position(days, day_id).ok_or_else(|| missing(EntityKind::Day, day_id))
}

fn missing(kind: EntityKind, id: &str) -> StorageError {
    StorageError::MissingEntity {
        kind,
        id: id.to_string(),
    }
}

fn duplicate(kind: EntityKind, id: &str) -> StorageError {
    StorageError::DuplicateEntity {
        kind,
        id: id.to_string(),
    }
}

/// In-memory collaborator for host tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    pub days: Vec<Day>,
    pub fail_writes: bool,
}

#[cfg(test)]
impl MemoryStore {
    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Io(std::io::Error::other("store is read-only")));
        }
        Ok(())
    }
}

#[cfg(test)]
impl AgendaStore for MemoryStore {
    fn create(&mut self, entity: &Entity) -> Result<String, StorageError> {
        self.check_writable()?;
        create_in(&mut self.days, entity)
    }

    fn update(&mut self, entity: &Entity) -> Result<(), StorageError> {
        self.check_writable()?;
        update_in(&mut self.days, entity)
    }

    fn delete(&mut self, kind: EntityKind, id: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        delete_in(&mut self.days, kind, id)
    }

    fn list(&self, kind: EntityKind) -> Result<Vec<Entity>, StorageError> {
        Ok(list_in(&self.days, kind))
    }
}
