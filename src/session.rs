//! Create/edit dialogs as an explicit state machine.
//!
//! The session only remembers *what* is being edited. Field input lives in the
//! host's dialog and arrives as an [`ItemForm`] or [`DayForm`] on commit.

use tracing::debug;

use crate::domain::{Day, EntityKind, Item, ItemKind};
use crate::error::{CommitError, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemTarget {
    New { day_id: String },
    Existing { day_id: String, item: Item },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayTarget {
    New,
    Existing(Day),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditSession {
    #[default]
    Idle,
    EditingItem(ItemTarget),
    EditingDay(DayTarget),
}

impl EditSession {
    pub fn is_idle(&self) -> bool {
        matches!(self, EditSession::Idle)
    }

    pub fn open_new_item(&mut self, day_id: impl Into<String>) {
        self.open(EditSession::EditingItem(ItemTarget::New {
            day_id: day_id.into(),
        }));
    }

    pub fn open_edit_item(&mut self, day_id: impl Into<String>, item: Item) {
        self.open(EditSession::EditingItem(ItemTarget::Existing {
            day_id: day_id.into(),
            item,
        }));
    }

    pub fn open_new_day(&mut self) {
        self.open(EditSession::EditingDay(DayTarget::New));
    }

    pub fn open_edit_day(&mut self, day: Day) {
        self.open(EditSession::EditingDay(DayTarget::Existing(day)));
    }

    pub fn cancel(&mut self) {
        if !self.is_idle() {
            debug!("edit cancelled");
        }
        *self = EditSession::Idle;
    }

    /// Validates `form` against the open target without leaving the editing state.
    pub fn prepare(&self, form: FormValues) -> Result<Submission, CommitError> {
        match (self, form) {
            (EditSession::Idle, _) => Err(CommitError::NotEditing),
            (EditSession::EditingItem(target), FormValues::Item(form)) => {
                let fields = form.validate()?;
                Ok(Submission::Item {
                    target: target.clone(),
                    fields,
                })
            }
            (EditSession::EditingDay(target), FormValues::Day(form)) => {
                let fields = form.validate()?;
                Ok(Submission::Day {
                    target: target.clone(),
                    fields,
                })
            }
            (EditSession::EditingItem(_), FormValues::Day(_)) => Err(CommitError::FormMismatch {
                expected: EntityKind::Item,
            }),
            (EditSession::EditingDay(_), FormValues::Item(_)) => Err(CommitError::FormMismatch {
                expected: EntityKind::Day,
            }),
        }
    }

    fn open(&mut self, next: EditSession) {
        if !self.is_idle() {
            debug!(previous = ?self, "replacing open editor");
        }
        debug!(session = ?next, "editor opened");
        *self = next;
    }
}

/// A validated form paired with the target it was opened for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Item { target: ItemTarget, fields: ItemFields },
    Day { target: DayTarget, fields: DayFields },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    pub time: String,
    pub title: String,
    pub speaker: Option<String>,
    pub kind: ItemKind,
}

impl ItemFields {
    pub fn into_item(self, id: String) -> Item {
        Item {
            id,
            time: self.time,
            title: self.title,
            speaker: self.speaker,
            kind: self.kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayFields {
    pub title: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValues {
    Item(ItemForm),
    Day(DayForm),
}

impl From<ItemForm> for FormValues {
    fn from(form: ItemForm) -> Self {
        FormValues::Item(form)
    }
}

impl From<DayForm> for FormValues {
    fn from(form: DayForm) -> Self {
        FormValues::Day(form)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemForm {
    pub time: String,
    pub title: String,
    pub speaker: String,
    pub kind: ItemKind,
}

impl ItemForm {
    pub fn validate(self) -> Result<ItemFields, ValidationError> {
        let mut missing = Vec::new();
        let time = required_text(&self.time, "time", &mut missing);
        let title = required_text(&self.title, "title", &mut missing);
        if !missing.is_empty() {
            return Err(ValidationError { fields: missing });
        }

        Ok(ItemFields {
            time,
            title,
            speaker: optional_text(&self.speaker),
            kind: self.kind,
        })
    }
}

impl From<&Item> for ItemForm {
    fn from(item: &Item) -> Self {
        Self {
            time: item.time.clone(),
            title: item.title.clone(),
            speaker: item.speaker.clone().unwrap_or_default(),
            kind: item.kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DayForm {
    pub title: String,
    pub date: String,
}

impl DayForm {
    pub fn validate(self) -> Result<DayFields, ValidationError> {
        let mut missing = Vec::new();
        let title = required_text(&self.title, "title", &mut missing);
        let date = required_text(&self.date, "date", &mut missing);
        if !missing.is_empty() {
            return Err(ValidationError { fields: missing });
        }

        Ok(DayFields { title, date })
    }
}

impl From<&Day> for DayForm {
    fn from(day: &Day) -> Self {
        Self {
            title: day.title.clone(),
            date: day.date.clone(),
        }
    }
}

fn required_text(input: &str, field_name: &'static str, missing: &mut Vec<&'static str>) -> String {
    let value = input.trim();
    if value.is_empty() {
        missing.push(field_name);
    }
    value.to_string()
}

fn optional_text(input: &str) -> Option<String> {
    let value = input.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
