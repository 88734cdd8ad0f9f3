use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rand::{Rng, distributions::Alphanumeric, thread_rng};
use serde::{Deserialize, Serialize};

const ID_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    #[default]
    Talk,
    Break,
    Other,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Talk, ItemKind::Break, ItemKind::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Talk => "talk",
            ItemKind::Break => "break",
            ItemKind::Other => "other",
        }
    }

    /// Next kind in display order, wrapping around.
    pub fn cycle(self, delta: i32) -> Self {
        let len = Self::ALL.len() as i32;
        let index = Self::ALL.iter().position(|kind| *kind == self).unwrap_or(0) as i32;
        Self::ALL[(index + delta).rem_euclid(len) as usize]
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "talk" => Ok(ItemKind::Talk),
            "break" => Ok(ItemKind::Break),
            "other" => Ok(ItemKind::Other),
            other => Err(format!("unknown item type: {other} (expected talk, break or other)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub time: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
}

impl Item {
    pub fn label(&self) -> String {
        format!("{} {}", self.time, self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Day {
    pub fn new(id: impl Into<String>, title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            date: date.into(),
            items: Vec::new(),
        }
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn label(&self) -> String {
        format!("{} ({})", self.title, self.date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Day,
    Item,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Day => f.write_str("day"),
            EntityKind::Item => f.write_str("item"),
        }
    }
}

pub fn generate_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}

/// Draws ids until one is not taken.
pub fn generate_unique_id(is_taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = generate_id();
        if !is_taken(&id) {
            return id;
        }
    }
}
