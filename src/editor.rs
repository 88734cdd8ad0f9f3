//! The agenda editor: days, their items, and the controllers that gate every
//! mutation.
//!
//! Hosts drive it with user gestures (`open_*`, `commit`, `request_delete_*`,
//! `confirm_delete`, `on_drag_end`, `select_day`) and read back the state to
//! render. Nothing in here performs I/O; each successful mutation returns a
//! [`Change`] the host can hand to a persistence collaborator, and
//! [`AgendaEditor::revert`] undoes one if saving it failed.

use tracing::{debug, warn};

use crate::collection::{contains, insert, insert_at, position, remove_by_id, reorder, replace};
use crate::confirm::{DeleteConfirmation, DeleteTarget, PendingDeletion};
use crate::domain::{Day, Item, generate_unique_id};
use crate::error::CommitError;
use crate::selection::ActiveSelection;
use crate::session::{DayTarget, EditSession, FormValues, ItemTarget, Submission};

/// Where a dragged item was dropped. `destination` is `None` when the drop
/// landed outside any item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragResult {
    pub source_index: usize,
    pub destination: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    ItemCreated {
        day_id: String,
        item: Item,
    },
    ItemUpdated {
        day_id: String,
        before: Item,
        after: Item,
    },
    ItemsReordered {
        day_id: String,
        source: usize,
        destination: usize,
    },
    ItemRemoved {
        day_id: String,
        item: Item,
        index: usize,
    },
    DayCreated {
        day: Day,
    },
    DayUpdated {
        before: Day,
        after: Day,
    },
    DayRemoved {
        day: Day,
        index: usize,
        was_active: bool,
    },
}

impl Change {
    pub fn describe(&self) -> String {
        match self {
            Change::ItemCreated { item, .. } => format!("added {}", item.label()),
            Change::ItemUpdated { after, .. } => format!("updated {}", after.label()),
            Change::ItemsReordered { .. } => "moved item".to_string(),
            Change::ItemRemoved { item, .. } => format!("deleted {}", item.label()),
            Change::DayCreated { day } => format!("added {}", day.label()),
            Change::DayUpdated { after, .. } => format!("updated {}", after.label()),
            Change::DayRemoved { day, .. } => format!("deleted {}", day.label()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AgendaEditor {
    days: Vec<Day>,
    selection: ActiveSelection,
    session: EditSession,
    deletion: DeleteConfirmation,
}

impl AgendaEditor {
    pub fn new(days: Vec<Day>) -> Self {
        let selection = ActiveSelection::from_days(&days);
        Self {
            days,
            selection,
            session: EditSession::Idle,
            deletion: DeleteConfirmation::Idle,
        }
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn day(&self, day_id: &str) -> Option<&Day> {
        self.days.iter().find(|day| day.id == day_id)
    }

    pub fn selection(&self) -> &ActiveSelection {
        &self.selection
    }

    pub fn active_day(&self) -> Option<&Day> {
        self.selection.day_id().and_then(|id| self.day(id))
    }

    pub fn edit_session(&self) -> &EditSession {
        &self.session
    }

    pub fn pending_deletion(&self) -> Option<&PendingDeletion> {
        self.deletion.pending()
    }

    pub fn select_day(&mut self, day_id: &str) {
        self.selection.switch_to(day_id, &self.days);
        debug!(day_id, "active day switched");
    }

    pub fn open_new_item(&mut self, day_id: &str) {
        self.expect_day_index(day_id);
        self.deletion.dismiss();
        self.session.open_new_item(day_id);
    }

    pub fn open_edit_item(&mut self, day_id: &str, item_id: &str) {
        let item = self.expect_item(day_id, item_id).clone();
        self.deletion.dismiss();
        self.session.open_edit_item(day_id, item);
    }

    pub fn open_new_day(&mut self) {
        self.deletion.dismiss();
        self.session.open_new_day();
    }

    pub fn open_edit_day(&mut self, day_id: &str) {
        let day = self.days[self.expect_day_index(day_id)].clone();
        self.deletion.dismiss();
        self.session.open_edit_day(day);
    }

    pub fn cancel_edit(&mut self) {
        self.session.cancel();
    }

    /// Applies the open editor's form. On error nothing changes and the editor
    /// stays open.
    pub fn commit(&mut self, form: impl Into<FormValues>) -> Result<Change, CommitError> {
        let submission = self.session.prepare(form.into())?;
        let change = match submission {
            Submission::Item {
                target: ItemTarget::New { day_id },
                fields,
            } => {
                let index = self.expect_day_index(&day_id);
                let item = fields.into_item(self.new_item_id());
                self.days[index].items = insert(&self.days[index].items, item.clone());
                Change::ItemCreated { day_id, item }
            }
            Submission::Item {
                target: ItemTarget::Existing { day_id, item: before },
                fields,
            } => {
                let index = self.expect_day_index(&day_id);
                let after = fields.into_item(before.id.clone());
                self.days[index].items = replace(&self.days[index].items, after.clone());
                Change::ItemUpdated {
                    day_id,
                    before,
                    after,
                }
            }
            Submission::Day {
                target: DayTarget::New,
                fields,
            } => {
                let id = generate_unique_id(|candidate| contains(&self.days, candidate));
                let day = Day::new(id, fields.title, fields.date);
                self.days = insert(&self.days, day.clone());
                self.selection.on_insert(&day);
                Change::DayCreated { day }
            }
            Submission::Day {
                target: DayTarget::Existing(snapshot),
                fields,
            } => {
                let index = self.expect_day_index(&snapshot.id);
                let before = self.days[index].clone();
                let after = Day {
                    title: fields.title,
                    date: fields.date,
                    ..before.clone()
                };
                self.days = replace(&self.days, after.clone());
                Change::DayUpdated { before, after }
            }
        };

        self.session = EditSession::Idle;
        debug_assert!(self.selection.is_consistent_with(&self.days));
        debug!(change = %change.describe(), "edit committed");
        Ok(change)
    }

    pub fn request_delete_item(&mut self, day_id: &str, item_id: &str) {
        let label = self.expect_item(day_id, item_id).label();
        self.session.cancel();
        self.deletion.request(
            DeleteTarget::Item {
                day_id: day_id.to_string(),
                item_id: item_id.to_string(),
            },
            label,
        );
    }

    pub fn request_delete_day(&mut self, day_id: &str) {
        let label = self.days[self.expect_day_index(day_id)].label();
        self.session.cancel();
        self.deletion.request(
            DeleteTarget::Day {
                day_id: day_id.to_string(),
            },
            label,
        );
    }

    pub fn dismiss_delete(&mut self) {
        self.deletion.dismiss();
    }

    /// Removes the pending target. Deleting the active day re-derives the
    /// selection before returning.
    pub fn confirm_delete(&mut self) -> Option<Change> {
        let pending = self.deletion.take()?;
        let change = match pending.target {
            DeleteTarget::Day { day_id } => {
                let index = position(&self.days, &day_id)?;
                let day = self.days[index].clone();
                let was_active = self.selection.is_selected(&day_id);
                self.days = remove_by_id(&self.days, &day_id);
                self.selection.on_remove(&day_id, &self.days);
                Change::DayRemoved {
                    day,
                    index,
                    was_active,
                }
            }
            DeleteTarget::Item { day_id, item_id } => {
                let day_index = position(&self.days, &day_id)?;
                let items = &self.days[day_index].items;
                let index = position(items, &item_id)?;
                let item = items[index].clone();
                self.days[day_index].items = remove_by_id(items, &item_id);
                Change::ItemRemoved {
                    day_id,
                    item,
                    index,
                }
            }
        };

        debug_assert!(self.selection.is_consistent_with(&self.days));
        debug!(change = %change.describe(), "delete confirmed");
        Some(change)
    }

    pub fn on_drag_end(&mut self, day_id: &str, drag: DragResult) -> Option<Change> {
        let destination = drag.destination?;
        let index = self.expect_day_index(day_id);
        let items = &self.days[index].items;
        let source = drag.source_index;
        if source == destination || source >= items.len() || destination >= items.len() {
            return None;
        }

        self.days[index].items = reorder(items, source, destination);
        debug!(day_id, source, destination, "item moved");
        Some(Change::ItemsReordered {
            day_id: day_id.to_string(),
            source,
            destination,
        })
    }

    /// Undoes `change`, typically after the host failed to persist it.
    pub fn revert(&mut self, change: Change) {
        warn!(change = %change.describe(), "reverting change");
        match change {
            Change::ItemCreated { day_id, item } => {
                if let Some(index) = position(&self.days, &day_id) {
                    self.days[index].items = remove_by_id(&self.days[index].items, &item.id);
                }
            }
            Change::ItemUpdated { day_id, before, .. } => {
                if let Some(index) = self.day_index_with_item(&day_id, &before.id) {
                    self.days[index].items = replace(&self.days[index].items, before);
                }
            }
            Change::ItemsReordered {
                day_id,
                source,
                destination,
            } => {
                if let Some(index) = position(&self.days, &day_id) {
                    self.days[index].items = reorder(&self.days[index].items, destination, source);
                }
            }
            Change::ItemRemoved {
                day_id,
                item,
                index,
            } => {
                if let Some(day_index) = position(&self.days, &day_id) {
                    let items = &self.days[day_index].items;
                    if !contains(items, &item.id) {
                        self.days[day_index].items = insert_at(items, index, item);
                    }
                }
            }
            Change::DayCreated { day } => {
                self.days = remove_by_id(&self.days, &day.id);
                self.selection.on_remove(&day.id, &self.days);
            }
            Change::DayUpdated { before, .. } => {
                if let Some(index) = position(&self.days, &before.id) {
                    let current = self.days[index].clone();
                    self.days = replace(
                        &self.days,
                        Day {
                            title: before.title,
                            date: before.date,
                            ..current
                        },
                    );
                }
            }
            Change::DayRemoved {
                day,
                index,
                was_active,
            } => {
                if contains(&self.days, &day.id) {
                    return;
                }
                self.days = insert_at(&self.days, index, day.clone());
                if was_active {
                    self.selection.restore(&day.id, &self.days);
                } else {
                    self.selection.on_insert(&day);
                }
            }
        }
    }

    fn new_item_id(&self) -> String {
        generate_unique_id(|candidate| {
            self.days
                .iter()
                .any(|day| day.items.iter().any(|item| item.id == candidate))
        })
    }

    fn day_index_with_item(&self, day_id: &str, item_id: &str) -> Option<usize> {
        let index = position(&self.days, day_id)?;
        contains(&self.days[index].items, item_id).then_some(index)
    }

    fn expect_day_index(&self, day_id: &str) -> usize {
        match position(&self.days, day_id) {
            Some(index) => index,
            None => panic!("unknown day: {day_id}"),
        }
    }

    fn expect_item(&self, day_id: &str, item_id: &str) -> &Item {
        let day = &self.days[self.expect_day_index(day_id)];
        match day.item(item_id) {
            Some(item) => item,
            None => panic!("unknown item {item_id} in day {day_id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::domain::{Day, Item, ItemKind};
    use crate::error::CommitError;
    use crate::selection::ActiveSelection;
    use crate::session::{DayForm, EditSession, ItemForm, ItemTarget};

    use super::{AgendaEditor, Change, DragResult};

    fn opening_form() -> ItemForm {
        ItemForm {
            time: "09:00".to_string(),
            title: "Opening".to_string(),
            speaker: String::new(),
            kind: ItemKind::Talk,
        }
    }

    fn day_form(title: &str, date: &str) -> DayForm {
        DayForm {
            title: title.to_string(),
            date: date.to_string(),
        }
    }

    /// Day d1 holding the "Opening" item.
    fn editor_with_opening() -> (AgendaEditor, String) {
        let mut editor = AgendaEditor::new(vec![Day::new("d1", "Day 1", "Mon")]);
        editor.open_new_item("d1");
        match editor.commit(opening_form()).expect("item should be created") {
            Change::ItemCreated { item, .. } => (editor, item.id),
            other => panic!("unexpected change: {other:?}"),
        }
    }

    fn add_day(editor: &mut AgendaEditor, title: &str, date: &str) -> String {
        editor.open_new_day();
        match editor.commit(day_form(title, date)).expect("day should be created") {
            Change::DayCreated { day } => day.id,
            other => panic!("unexpected change: {other:?}"),
        }
    }

    #[test]
    fn adding_an_item_keeps_the_active_day() {
        let (editor, item_id) = editor_with_opening();
        let day = editor.day("d1").expect("day d1");
        assert_eq!(day.items.len(), 1);
        assert_eq!(day.items[0].id, item_id);
        assert_eq!(day.items[0].title, "Opening");
        assert_eq!(day.items[0].speaker, None);
        assert_eq!(editor.selection().day_id(), Some("d1"));
        assert!(editor.edit_session().is_idle());
    }

    #[test]
    fn dragging_onto_own_position_changes_nothing() {
        let (mut editor, _) = editor_with_opening();
        let before = editor.days().to_vec();
        let change = editor.on_drag_end(
            "d1",
            DragResult {
                source_index: 0,
                destination: Some(0),
            },
        );
        assert_eq!(change, None);
        assert_eq!(editor.days(), before.as_slice());
    }

    #[test]
    fn dropping_outside_a_list_changes_nothing() {
        let (mut editor, _) = editor_with_opening();
        let change = editor.on_drag_end(
            "d1",
            DragResult {
                source_index: 0,
                destination: None,
            },
        );
        assert_eq!(change, None);
    }

    #[test]
    fn delete_flow_across_days() {
        let (mut editor, _) = editor_with_opening();
        let d2 = add_day(&mut editor, "Day 2", "Tue");
        assert_eq!(editor.selection().day_id(), Some("d1"));

        editor.request_delete_day("d1");
        assert!(editor.pending_deletion().is_some());
        editor.dismiss_delete();
        assert_eq!(editor.days().len(), 2);
        assert_eq!(editor.selection().day_id(), Some("d1"));
        assert!(editor.pending_deletion().is_none());

        editor.request_delete_day("d1");
        let change = editor.confirm_delete().expect("day should be removed");
        assert!(matches!(change, Change::DayRemoved { was_active: true, index: 0, .. }));
        assert_eq!(editor.days().len(), 1);
        assert_eq!(editor.days()[0].id, d2);
        assert_eq!(editor.selection().day_id(), Some(d2.as_str()));
        assert!(editor.days().iter().all(|day| day.items.is_empty()));
    }

    #[test]
    fn blank_title_keeps_editor_open_and_item_unchanged() {
        let (mut editor, item_id) = editor_with_opening();
        let before = editor.days().to_vec();
        editor.open_edit_item("d1", &item_id);

        let mut form = ItemForm::from(editor.day("d1").and_then(|day| day.item(&item_id)).expect("item"));
        form.title = "  ".to_string();
        let err = editor.commit(form).expect_err("blank title should fail");
        assert!(matches!(&err, CommitError::Invalid(invalid) if invalid.fields == vec!["title"]));

        assert_eq!(editor.days(), before.as_slice());
        assert!(matches!(
            editor.edit_session(),
            EditSession::EditingItem(ItemTarget::Existing { item, .. }) if item.id == item_id
        ));
    }

    #[test]
    fn editing_an_item_keeps_its_id_and_position() {
        let (mut editor, first) = editor_with_opening();
        editor.open_new_item("d1");
        editor
            .commit(ItemForm {
                time: "10:00".to_string(),
                title: "Coffee".to_string(),
                speaker: String::new(),
                kind: ItemKind::Break,
            })
            .expect("second item");

        editor.open_edit_item("d1", &first);
        let change = editor
            .commit(ItemForm {
                speaker: "Ada".to_string(),
                title: "Welcome".to_string(),
                ..opening_form()
            })
            .expect("edit should commit");
        assert!(matches!(change, Change::ItemUpdated { ref before, .. } if before.title == "Opening"));

        let items = &editor.day("d1").expect("day").items;
        assert_eq!(items[0].id, first);
        assert_eq!(items[0].title, "Welcome");
        assert_eq!(items[0].speaker.as_deref(), Some("Ada"));
        assert_eq!(items[1].title, "Coffee");
    }

    #[test]
    fn editing_a_day_leaves_items_untouched() {
        let (mut editor, item_id) = editor_with_opening();
        editor.open_edit_day("d1");
        editor
            .commit(day_form("Opening Day", "Monday, August 8"))
            .expect("day edit");
        let day = editor.day("d1").expect("day");
        assert_eq!(day.title, "Opening Day");
        assert_eq!(day.date, "Monday, August 8");
        assert_eq!(day.items[0].id, item_id);
    }

    #[test]
    fn first_day_added_to_empty_agenda_becomes_active() {
        let mut editor = AgendaEditor::default();
        assert_eq!(*editor.selection(), ActiveSelection::Empty);
        let first = add_day(&mut editor, "Day 1", "Mon");
        add_day(&mut editor, "Day 2", "Tue");
        assert_eq!(editor.selection().day_id(), Some(first.as_str()));
        assert_ne!(editor.days()[0].id, editor.days()[1].id);
    }

    #[test]
    fn deleting_last_day_empties_selection() {
        let mut editor = AgendaEditor::new(vec![Day::new("d1", "Day 1", "Mon")]);
        editor.request_delete_day("d1");
        editor.confirm_delete().expect("removed");
        assert!(editor.days().is_empty());
        assert_eq!(*editor.selection(), ActiveSelection::Empty);
    }

    #[test]
    fn deleting_inactive_day_keeps_selection() {
        let mut editor = AgendaEditor::new(vec![
            Day::new("d1", "Day 1", "Mon"),
            Day::new("d2", "Day 2", "Tue"),
        ]);
        editor.select_day("d2");
        editor.request_delete_day("d1");
        editor.confirm_delete().expect("removed");
        assert_eq!(editor.selection().day_id(), Some("d2"));
    }

    #[test]
    fn item_delete_requires_confirmation() {
        let (mut editor, item_id) = editor_with_opening();
        editor.request_delete_item("d1", &item_id);
        assert_eq!(editor.day("d1").expect("day").items.len(), 1);
        let change = editor.confirm_delete().expect("item removed");
        assert!(matches!(change, Change::ItemRemoved { index: 0, .. }));
        assert!(editor.day("d1").expect("day").items.is_empty());
        assert_eq!(editor.confirm_delete(), None);
    }

    #[test]
    fn edit_and_delete_are_never_open_together() {
        let (mut editor, item_id) = editor_with_opening();
        editor.open_edit_item("d1", &item_id);
        editor.request_delete_item("d1", &item_id);
        assert!(editor.edit_session().is_idle());
        assert!(editor.pending_deletion().is_some());

        editor.open_new_day();
        assert!(editor.pending_deletion().is_none());
        assert!(!editor.edit_session().is_idle());
    }

    #[test]
    fn commit_without_editor_is_rejected() {
        let (mut editor, _) = editor_with_opening();
        let before = editor.days().to_vec();
        assert_eq!(editor.commit(opening_form()), Err(CommitError::NotEditing));
        assert_eq!(editor.days(), before.as_slice());
    }

    #[test]
    fn cancel_discards_the_form() {
        let (mut editor, _) = editor_with_opening();
        let before = editor.days().to_vec();
        editor.open_new_item("d1");
        editor.cancel_edit();
        assert!(editor.edit_session().is_idle());
        assert_eq!(editor.days(), before.as_slice());
    }

    #[test]
    fn revert_restores_each_kind_of_change() {
        let (mut editor, first) = editor_with_opening();
        editor.open_new_item("d1");
        editor
            .commit(ItemForm {
                time: "10:00".to_string(),
                title: "Panel".to_string(),
                ..opening_form()
            })
            .expect("second item");
        let d2 = add_day(&mut editor, "Day 2", "Tue");
        let snapshot = editor.days().to_vec();

        let moved = editor
            .on_drag_end(
                "d1",
                DragResult {
                    source_index: 0,
                    destination: Some(1),
                },
            )
            .expect("moved");
        editor.revert(moved);
        assert_eq!(editor.days(), snapshot.as_slice());

        editor.open_edit_item("d1", &first);
        let updated = editor
            .commit(ItemForm {
                title: "Renamed".to_string(),
                ..opening_form()
            })
            .expect("updated");
        editor.revert(updated);
        assert_eq!(editor.days(), snapshot.as_slice());

        editor.request_delete_item("d1", &first);
        let removed = editor.confirm_delete().expect("removed");
        editor.revert(removed);
        assert_eq!(editor.days(), snapshot.as_slice());

        editor.request_delete_day("d1");
        let removed = editor.confirm_delete().expect("removed");
        assert_eq!(editor.selection().day_id(), Some(d2.as_str()));
        editor.revert(removed);
        assert_eq!(editor.days(), snapshot.as_slice());
        assert_eq!(editor.selection().day_id(), Some("d1"));

        editor.open_edit_day(&d2);
        let updated = editor.commit(day_form("Closing", "Wed")).expect("updated");
        editor.revert(updated);
        assert_eq!(editor.days(), snapshot.as_slice());

        let created = Change::DayCreated {
            day: editor.day(&d2).expect("d2").clone(),
        };
        editor.revert(created);
        assert_eq!(editor.days().len(), 1);
        assert_eq!(editor.selection().day_id(), Some("d1"));
    }

    #[test]
    fn item_ids_are_unique_across_days() {
        let mut editor = AgendaEditor::new(vec![
            Day::new("d1", "Day 1", "Mon"),
            Day::new("d2", "Day 2", "Tue"),
        ]);
        for day_id in ["d1", "d2", "d1", "d2"] {
            editor.open_new_item(day_id);
            editor.commit(opening_form()).expect("item");
        }
        let mut ids: Vec<&Item> = editor.days().iter().flat_map(|day| &day.items).collect();
        ids.sort_by(|left, right| left.id.cmp(&right.id));
        ids.dedup_by(|left, right| left.id == right.id);
        assert_eq!(ids.len(), 4);
    }

    #[test]
    #[should_panic(expected = "unknown item ghost in day d1")]
    fn editing_missing_item_panics() {
        let (mut editor, _) = editor_with_opening();
        editor.open_edit_item("d1", "ghost");
    }

    #[test]
    #[should_panic(expected = "unknown day: ghost")]
    fn adding_item_to_missing_day_panics() {
        let mut editor = AgendaEditor::default();
        editor.open_new_item("ghost");
    }

    #[test]
    fn selection_stays_valid_across_random_editor_traces() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut editor = AgendaEditor::default();
        let mut history: Vec<Change> = Vec::new();

        for step in 0..600 {
            let day_ids: Vec<String> = editor.days().iter().map(|day| day.id.clone()).collect();
            let pick = |rng: &mut StdRng| day_ids[rng.gen_range(0..day_ids.len())].clone();

            match rng.gen_range(0..6) {
                0 => {
                    editor.open_new_day();
                    let created = editor
                        .commit(day_form(&format!("Day {step}"), "Mon"))
                        .expect("day form is valid");
                    history.push(created);
                }
                1 if !day_ids.is_empty() => {
                    editor.request_delete_day(&pick(&mut rng));
                    history.push(editor.confirm_delete().expect("pending day removed"));
                }
                2 if !day_ids.is_empty() => {
                    editor.request_delete_day(&pick(&mut rng));
                    editor.dismiss_delete();
                    assert_eq!(editor.days().len(), day_ids.len());
                }
                3 if !day_ids.is_empty() => {
                    let chosen = pick(&mut rng);
                    editor.select_day(&chosen);
                    assert!(editor.selection().is_selected(&chosen));
                }
                4 => {
                    if let Some(change) = history.pop() {
                        editor.revert(change);
                    }
                }
                5 if !day_ids.is_empty() => {
                    editor.open_edit_day(&pick(&mut rng));
                    let updated = editor
                        .commit(day_form(&format!("Renamed {step}"), "Tue"))
                        .expect("day form is valid");
                    history.push(updated);
                }
                _ => {}
            }

            assert!(
                editor.selection().is_consistent_with(editor.days()),
                "step {step}: {:?} vs {:?}",
                editor.selection(),
                editor.days()
            );
            assert!(editor.edit_session().is_idle());
            assert!(editor.pending_deletion().is_none());
        }
    }
}
