use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::collection::contains;
use crate::domain::{Day, EntityKind};
use crate::error::StorageError;
use crate::store::{AgendaStore, Entity, create_in, delete_in, list_in, update_in};

const DAYS_MARKER: &str = "\n=== DAYS ===\n";
const DEFAULT_SYMPOSIUM_TITLE: &str = "Symposium";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgendaHeader {
    pub schema_version: u32,
    #[serde(default = "default_symposium_title")]
    pub symposium: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AgendaHeader {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            schema_version: 1,
            symposium: default_symposium_title(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for AgendaHeader {
    fn default() -> Self {
        Self::new()
    }
}

fn default_symposium_title() -> String {
    DEFAULT_SYMPOSIUM_TITLE.to_string()
}

#[derive(Debug, Clone, Default)]
pub struct AgendaDocument {
    pub header: AgendaHeader,
    pub days: Vec<Day>,
}

pub fn load_document(path: &Path) -> Result<AgendaDocument, StorageError> {
    let raw = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(AgendaDocument::default()),
        Err(err) => return Err(StorageError::Io(err)),
    };

    if raw.trim().is_empty() {
        return Ok(AgendaDocument::default());
    }

    let (header_blob, days_blob) = if let Some((header, days)) = raw.split_once(DAYS_MARKER) {
        (header, days)
    } else {
        (raw.as_str(), "")
    };

    let header: AgendaHeader = toml::from_str(header_blob)?;
    let mut days = Vec::new();
    for (index, line) in days_blob.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let day = serde_json::from_str(line).map_err(|source| StorageError::JsonDecode {
            line: index + 1,
            source,
        })?;
        check_day(&day, &days).map_err(|reason| StorageError::InvalidRecord {
            line: index + 1,
            reason,
        })?;
        days.push(day);
    }

    debug!(path = %path.display(), days = days.len(), "agenda loaded");
    Ok(AgendaDocument { header, days })
}

/// Rejects records the editor cannot address unambiguously.
fn check_day(day: &Day, loaded: &[Day]) -> Result<(), String> {
    if day.id.trim().is_empty() {
        return Err("day id is blank".to_string());
    }
    if contains(loaded, &day.id) {
        return Err(format!("duplicate day id {}", day.id));
    }
    if day.title.trim().is_empty() {
        return Err(format!("day {} has a blank title", day.id));
    }
    if day.date.trim().is_empty() {
        return Err(format!("day {} has a blank date", day.id));
    }

    for (index, item) in day.items.iter().enumerate() {
        if item.id.trim().is_empty() {
            return Err(format!("item {index} of day {} has a blank id", day.id));
        }
        if contains(&day.items[..index], &item.id) {
            return Err(format!("duplicate item id {} in day {}", item.id, day.id));
        }
        if item.time.trim().is_empty() {
            return Err(format!("item {} has a blank time", item.id));
        }
        if item.title.trim().is_empty() {
            return Err(format!("item {} has a blank title", item.id));
        }
    }

    Ok(())
}

pub fn save_document(path: &Path, document: &AgendaDocument) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let header = toml::to_string_pretty(&document.header)?;
    let mut file = fs::File::create(path)?;
    file.write_all(header.as_bytes())?;
    file.write_all(DAYS_MARKER.as_bytes())?;

    for day in &document.days {
        let line = serde_json::to_string(day).map_err(StorageError::JsonEncode)?;
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
    }

    debug!(path = %path.display(), days = document.days.len(), "agenda saved");
    Ok(())
}

/// Agenda document on disk, rewritten after every mutation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    document: AgendaDocument,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let document = load_document(&path)?;
        Ok(Self { path, document })
    }

    pub fn document(&self) -> &AgendaDocument {
        &self.document
    }

    pub fn days(&self) -> &[Day] {
        &self.document.days
    }

    pub fn set_symposium(&mut self, title: impl Into<String>) -> Result<(), StorageError> {
        self.document.header.symposium = title.into();
        self.flush()
    }

    pub fn flush(&mut self) -> Result<(), StorageError> {
        self.document.header.updated_at = Utc::now();
        save_document(&self.path, &self.document)
    }

    /// Runs `mutate` against a scratch copy and only keeps it once saved.
    fn write<T>(
        &mut self,
        mutate: impl FnOnce(&mut Vec<Day>) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let mut next = self.document.clone();
        let value = mutate(&mut next.days)?;
        next.header.updated_at = Utc::now();
        save_document(&self.path, &next)?;
        self.document = next;
        Ok(value)
    }
}

impl AgendaStore for FileStore {
    fn create(&mut self, entity: &Entity) -> Result<String, StorageError> {
        let id = self.write(|days| create_in(days, entity))?;
        info!(kind = %entity.kind(), id = %id, "created");
        Ok(id)
    }

    fn update(&mut self, entity: &Entity) -> Result<(), StorageError> {
        self.write(|days| update_in(days, entity))?;
        info!(kind = %entity.kind(), id = entity.id(), "updated");
        Ok(())
    }

    fn delete(&mut self, kind: EntityKind, id: &str) -> Result<(), StorageError> {
        self.write(|days| delete_in(days, kind, id))?;
        info!(kind = %kind, id, "deleted");
        Ok(())
    }

    fn list(&self, kind: EntityKind) -> Result<Vec<Entity>, StorageError> {
        Ok(list_in(&self.document.days, kind))
    }
}
