use std::error::Error;
use std::io;
use std::time::Duration as StdDuration;

use crossterm::event::{self, Event as CEvent, KeyCode, KeyEventKind};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use crossterm::{ExecutableCommand, execute};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs};
use ratatui::{Frame, Terminal};
use symposium_agenda::domain::{Day, Item, ItemKind};
use symposium_agenda::session::{DayForm, DayTarget, EditSession, FormValues, ItemForm, ItemTarget};
use symposium_agenda::storage::FileStore;
use symposium_agenda::store::AgendaStore;
use symposium_agenda::sync::commit_change;
use symposium_agenda::{AgendaEditor, Change, CommitError, DragResult};
use tracing::info;

const FOCUSED_BORDER_COLOR: Color = Color::Yellow;
const INACTIVE_BORDER_COLOR: Color = Color::DarkGray;
const HIGHLIGHT_BACKGROUND_COLOR: Color = Color::Rgb(42, 45, 52);

pub fn run_editor(store: &mut FileStore, editor: &mut AgendaEditor) -> Result<(), Box<dyn Error>> {
	enable_raw_mode()?;
	let mut stdout = io::stdout();
	stdout.execute(EnterAlternateScreen)?;
	let backend = CrosstermBackend::new(stdout);
	let mut terminal = Terminal::new(backend)?;

	let symposium = store.document().header.symposium.clone();
	info!(days = editor.days().len(), "editor started");
	let result = run_event_loop(&mut terminal, store, editor, &symposium);

	disable_raw_mode()?;
	execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
	terminal.show_cursor()?;

	result
}

fn run_event_loop<S: AgendaStore>(
	terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
	store: &mut S,
	editor: &mut AgendaEditor,
	symposium: &str,
) -> Result<(), Box<dyn Error>> {
	let mut app = App::default();

	loop {
		app.clamp_selection(editor);
		terminal.draw(|frame| draw_editor(frame, &app, editor, symposium))?;

		if event::poll(StdDuration::from_millis(250))? {
			if let CEvent::Key(key) = event::read()? {
				if key.kind != KeyEventKind::Press {
					continue;
				}

				if handle_key(&mut app, key.code, store, editor) {
					break;
				}
			}
		}
	}

	Ok(())
}

fn handle_key<S: AgendaStore>(app: &mut App, code: KeyCode, store: &mut S, editor: &mut AgendaEditor) -> bool {
	if editor.pending_deletion().is_some() {
		handle_confirm_key(app, code, store, editor);
		false
	} else if !editor.edit_session().is_idle() {
		handle_form_key(app, code, store, editor);
		false
	} else {
		handle_normal_key(app, code, store, editor)
	}
}

fn draw_editor(frame: &mut Frame, app: &App, editor: &AgendaEditor, symposium: &str) {
	let layout = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Length(3), Constraint::Min(8), Constraint::Length(5)])
		.split(frame.area());

	render_day_tabs(frame, layout[0], editor, symposium);
	render_items_panel(frame, layout[1], app, editor);
	render_footer(frame, layout[2], app, editor);

	if let Some(pending) = editor.pending_deletion() {
		render_confirm_popup(frame, &pending.prompt(), app.confirm_index);
	} else if let Some(form) = &app.form {
		render_form_popup(frame, form);
	}
}

fn render_day_tabs(frame: &mut Frame, area: Rect, editor: &AgendaEditor, symposium: &str) {
	let block = Block::default()
		.borders(Borders::ALL)
		.title(symposium.to_string())
		.border_style(Style::default().fg(INACTIVE_BORDER_COLOR));

	if editor.days().is_empty() {
		let empty = Paragraph::new("(no days yet, press n to add one)").block(block);
		frame.render_widget(empty, area);
		return;
	}

	let titles = editor
		.days()
		.iter()
		.map(|day| Line::from(day.title.clone()))
		.collect::<Vec<_>>();
	let mut tabs = Tabs::new(titles)
		.block(block)
		.highlight_style(Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD));
	if let Some(index) = active_day_index(editor) {
		tabs = tabs.select(index);
	}
	frame.render_widget(tabs, area);
}

fn render_items_panel(frame: &mut Frame, area: Rect, app: &App, editor: &AgendaEditor) {
	let Some(day) = editor.active_day() else {
		let panel = Paragraph::new("").block(Block::default().borders(Borders::ALL).title("Agenda"));
		frame.render_widget(panel, area);
		return;
	};

	let items = if day.items.is_empty() {
		vec![ListItem::new("(no items, press a to add one)")]
	} else {
		day.items.iter().map(|item| ListItem::new(render_item_line(item))).collect()
	};

	let mut state = ListState::default();
	if !day.items.is_empty() {
		state.select(Some(app.item_index.min(day.items.len() - 1)));
	}

	let idle = editor.edit_session().is_idle() && editor.pending_deletion().is_none();
	let list = List::new(items)
		.block(
			Block::default()
				.borders(Borders::ALL)
				.title(format!("{} | {}", day.title, day.date))
				.border_style(border_style(idle)),
		)
		.highlight_style(Style::default().bg(HIGHLIGHT_BACKGROUND_COLOR).add_modifier(Modifier::BOLD));

	frame.render_stateful_widget(list, area, &mut state);
}

fn render_item_line(item: &Item) -> Line<'static> {
	let mut spans = vec![
		Span::styled(format!("{:<16}", item.time), Style::default().fg(Color::Gray)),
		Span::styled(format!("{:<6} ", item.kind), kind_style(item.kind)),
		Span::raw(item.title.clone()),
	];
	if let Some(speaker) = &item.speaker {
		spans.push(Span::styled(format!(" | {speaker}"), Style::default().fg(Color::DarkGray)));
	}
	Line::from(spans)
}

fn kind_style(kind: ItemKind) -> Style {
	match kind {
		ItemKind::Talk => Style::default().fg(Color::LightCyan),
		ItemKind::Break => Style::default().fg(Color::LightGreen),
		ItemKind::Other => Style::default().fg(Color::LightMagenta),
	}
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App, editor: &AgendaEditor) {
	let footer_lines = if editor.pending_deletion().is_some() {
		vec![
			Line::from("y delete | n/Esc keep | arrows choose | Enter confirm choice"),
			Line::from(""),
			Line::from(app.status.clone()),
		]
	} else if app.form.is_some() {
		vec![
			Line::from("Tab/arrows move between fields | Left/Right change type | Enter save | Esc cancel"),
			Line::from(""),
			Line::from(app.status.clone()),
		]
	} else {
		vec![
			Line::from("Left/Right/Tab switch day | Up/Down select item | J/K move item down/up | q quit"),
			Line::from("a add item | e/Enter edit item | d delete item | n new day | E edit day | X delete day"),
			Line::from(app.status.clone()),
		]
	};

	let footer = Paragraph::new(footer_lines).block(Block::default().borders(Borders::ALL).title("Shortcuts"));
	frame.render_widget(footer, area);
}

fn render_form_popup(frame: &mut Frame, form: &FormState) {
	let area = centered_rect(60, 50, frame.area());
	frame.render_widget(Clear, area);

	let mut lines = Vec::new();
	for (index, (name, label, value)) in form.fields().into_iter().enumerate() {
		let focused = index == form.focused;
		let missing = form.missing.contains(&name);
		let label_style = if missing {
			Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD)
		} else if focused {
			Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
		} else {
			Style::default()
		};
		let cursor = if focused { "_" } else { "" };
		lines.push(Line::from(vec![
			Span::styled(format!("{:<9}", label), label_style),
			Span::raw(format!("{value}{cursor}")),
		]));
	}

	if let Some(error) = &form.error {
		lines.push(Line::from(""));
		lines.push(Line::from(Span::styled(
			error.clone(),
			Style::default().fg(Color::LightRed),
		)));
	}

	let panel = Paragraph::new(lines).block(
		Block::default()
			.borders(Borders::ALL)
			.title(form.title.clone())
			.border_style(border_style(true)),
	);
	frame.render_widget(panel, area);
}

fn render_confirm_popup(frame: &mut Frame, prompt: &str, selected: usize) {
	let area = centered_rect(50, 30, frame.area());
	frame.render_widget(Clear, area);

	let items = vec![
		ListItem::new("Delete").style(Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD)),
		ListItem::new("Cancel"),
	];
	let list = List::new(items)
		.block(Block::default().borders(Borders::ALL).title(prompt.to_string()))
		.highlight_symbol(">> ")
		.highlight_style(Style::default().bg(HIGHLIGHT_BACKGROUND_COLOR));

	let mut state = ListState::default();
	state.select(Some(selected.min(1)));
	frame.render_stateful_widget(list, area, &mut state);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
	let popup_layout = Layout::default()
		.direction(Direction::Vertical)
		.constraints([
			Constraint::Percentage((100 - percent_y) / 2),
			Constraint::Percentage(percent_y),
			Constraint::Percentage((100 - percent_y) / 2),
		])
		.split(area);
	Layout::default()
		.direction(Direction::Horizontal)
		.constraints([
			Constraint::Percentage((100 - percent_x) / 2),
			Constraint::Percentage(percent_x),
			Constraint::Percentage((100 - percent_x) / 2),
		])
		.split(popup_layout[1])[1]
}

fn handle_normal_key<S: AgendaStore>(
	app: &mut App,
	code: KeyCode,
	store: &mut S,
	editor: &mut AgendaEditor,
) -> bool {
	match code {
		KeyCode::Char('q') | KeyCode::Esc => true,
		KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => {
			app.shift_day(editor, -1);
			false
		}
		KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
			app.shift_day(editor, 1);
			false
		}
		KeyCode::Up | KeyCode::Char('k') => {
			app.item_index = app.item_index.saturating_sub(1);
			false
		}
		KeyCode::Down | KeyCode::Char('j') => {
			app.item_index += 1;
			app.clamp_selection(editor);
			false
		}
		KeyCode::Char('a') => {
			match editor.active_day().map(|day| day.id.clone()) {
				Some(day_id) => {
					editor.open_new_item(&day_id);
					app.open_form(editor);
				}
				None => app.status = "Add a day first (n)".to_string(),
			}
			false
		}
		KeyCode::Char('e') | KeyCode::Enter => {
			match app.selected_item(editor) {
				Some((day_id, item_id)) => {
					editor.open_edit_item(&day_id, &item_id);
					app.open_form(editor);
				}
				None => app.status = "Select an item first".to_string(),
			}
			false
		}
		KeyCode::Char('d') => {
			match app.selected_item(editor) {
				Some((day_id, item_id)) => {
					editor.request_delete_item(&day_id, &item_id);
					app.open_confirm();
				}
				None => app.status = "Select an item first".to_string(),
			}
			false
		}
		KeyCode::Char('J') => {
			move_selected_item(app, store, editor, 1);
			false
		}
		KeyCode::Char('K') => {
			move_selected_item(app, store, editor, -1);
			false
		}
		KeyCode::Char('n') => {
			editor.open_new_day();
			app.open_form(editor);
			false
		}
		KeyCode::Char('E') => {
			match editor.active_day().map(|day| day.id.clone()) {
				Some(day_id) => {
					editor.open_edit_day(&day_id);
					app.open_form(editor);
				}
				None => app.status = "No day to edit".to_string(),
			}
			false
		}
		KeyCode::Char('X') => {
			match editor.active_day().map(|day| day.id.clone()) {
				Some(day_id) => {
					editor.request_delete_day(&day_id);
					app.open_confirm();
				}
				None => app.status = "No day to delete".to_string(),
			}
			false
		}
		_ => false,
	}
}

fn move_selected_item<S: AgendaStore>(app: &mut App, store: &mut S, editor: &mut AgendaEditor, delta: i32) {
	let Some(day) = editor.active_day() else {
		return;
	};
	let day_id = day.id.clone();
	let source = app.item_index;
	let Some(destination) = source.checked_add_signed(delta as isize) else {
		return;
	};

	let drag = DragResult {
		source_index: source,
		destination: Some(destination),
	};
	if let Some(change) = editor.on_drag_end(&day_id, drag) {
		if apply_change(app, store, editor, change) {
			app.item_index = destination;
		}
	}
}

fn handle_form_key<S: AgendaStore>(app: &mut App, code: KeyCode, store: &mut S, editor: &mut AgendaEditor) {
	if app.form.is_none() {
		app.open_form(editor);
	}
	let Some(form) = app.form.as_mut() else {
		return;
	};

	match code {
		KeyCode::Esc => {
			editor.cancel_edit();
			app.form = None;
			app.status = "Edit cancelled".to_string();
		}
		KeyCode::Tab | KeyCode::Down => form.move_focus(1),
		KeyCode::BackTab | KeyCode::Up => form.move_focus(-1),
		KeyCode::Left => form.cycle_kind(-1),
		KeyCode::Right => form.cycle_kind(1),
		KeyCode::Backspace => {
			if let Some(value) = form.focused_text_mut() {
				value.pop();
			}
		}
		KeyCode::Char(value) => {
			if let Some(text) = form.focused_text_mut() {
				text.push(value);
			} else if value == ' ' {
				form.cycle_kind(1);
			}
		}
		KeyCode::Enter => {
			let values = form.values();
			match editor.commit(values) {
				Ok(change) => {
					app.form = None;
					let created_in_view = match &change {
						Change::ItemCreated { day_id, .. } => editor.selection().is_selected(day_id),
						_ => false,
					};
					if apply_change(app, store, editor, change) && created_in_view {
						app.item_index = editor.active_day().map(|day| day.items.len()).unwrap_or(1) - 1;
					}
				}
				Err(CommitError::Invalid(err)) => {
					form.missing = err.fields.clone();
					form.error = Some(err.to_string());
				}
				Err(err) => {
					editor.cancel_edit();
					app.form = None;
					app.status = format!("error: {err}");
				}
			}
		}
		_ => {}
	}
}

fn handle_confirm_key<S: AgendaStore>(app: &mut App, code: KeyCode, store: &mut S, editor: &mut AgendaEditor) {
	match code {
		KeyCode::Esc | KeyCode::Char('n') => {
			editor.dismiss_delete();
			app.status = "Delete cancelled".to_string();
		}
		KeyCode::Char('y') => confirm_delete(app, store, editor),
		KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('j') | KeyCode::Char('k') => {
			app.confirm_index = 1 - app.confirm_index.min(1);
		}
		KeyCode::Enter => {
			if app.confirm_index == 0 {
				confirm_delete(app, store, editor);
			} else {
				editor.dismiss_delete();
				app.status = "Delete cancelled".to_string();
			}
		}
		_ => {}
	}
}

fn confirm_delete<S: AgendaStore>(app: &mut App, store: &mut S, editor: &mut AgendaEditor) {
	if let Some(change) = editor.confirm_delete() {
		apply_change(app, store, editor, change);
		app.clamp_selection(editor);
	}
}

/// Saves `change`; the editor has already been reverted when this returns false.
fn apply_change<S: AgendaStore>(app: &mut App, store: &mut S, editor: &mut AgendaEditor, change: Change) -> bool {
	match commit_change(store, editor, change) {
		Ok(change) => {
			app.status = change.describe();
			true
		}
		Err(err) => {
			app.status = format!("error: {err} (change undone)");
			false
		}
	}
}

fn active_day_index(editor: &AgendaEditor) -> Option<usize> {
	let active = editor.selection().day_id()?;
	editor.days().iter().position(|day| day.id == active)
}

fn border_style(focused: bool) -> Style {
	if focused {
		Style::default()
			.fg(FOCUSED_BORDER_COLOR)
			.add_modifier(Modifier::BOLD)
	} else {
		Style::default().fg(INACTIVE_BORDER_COLOR)
	}
}

#[derive(Debug, Clone)]
enum FormDraft {
	Item(ItemForm),
	Day(DayForm),
}

#[derive(Debug, Clone)]
struct FormState {
	title: String,
	draft: FormDraft,
	focused: usize,
	missing: Vec<&'static str>,
	error: Option<String>,
}

impl FormState {
	fn from_session(session: &EditSession, editor: &AgendaEditor) -> Option<Self> {
		let (title, draft) = match session {
			EditSession::Idle => return None,
			EditSession::EditingItem(ItemTarget::New { day_id }) => {
				let day = editor.day(day_id).map(Day::label).unwrap_or_default();
				(format!("New item | {day}"), FormDraft::Item(ItemForm::default()))
			}
			EditSession::EditingItem(ItemTarget::Existing { item, .. }) => {
				(format!("Edit {}", item.title), FormDraft::Item(ItemForm::from(item)))
			}
			EditSession::EditingDay(DayTarget::New) => ("New day".to_string(), FormDraft::Day(DayForm::default())),
			EditSession::EditingDay(DayTarget::Existing(day)) => {
				(format!("Edit {}", day.title), FormDraft::Day(DayForm::from(day)))
			}
		};

		Some(Self {
			title,
			draft,
			focused: 0,
			missing: Vec::new(),
			error: None,
		})
	}

	/// (field name, label, display value) in focus order.
	fn fields(&self) -> Vec<(&'static str, &'static str, String)> {
		match &self.draft {
			FormDraft::Item(form) => vec![
				("time", "Time", form.time.clone()),
				("title", "Title", form.title.clone()),
				("speaker", "Speaker", form.speaker.clone()),
				("type", "Type", format!("< {} >", form.kind)),
			],
			FormDraft::Day(form) => vec![
				("title", "Title", form.title.clone()),
				("date", "Date", form.date.clone()),
			],
		}
	}

	fn field_count(&self) -> usize {
		match self.draft {
			FormDraft::Item(_) => 4,
			FormDraft::Day(_) => 2,
		}
	}

	fn move_focus(&mut self, delta: i32) {
		let count = self.field_count() as i32;
		self.focused = (self.focused as i32 + delta).rem_euclid(count) as usize;
	}

	fn focused_text_mut(&mut self) -> Option<&mut String> {
		match (&mut self.draft, self.focused) {
			(FormDraft::Item(form), 0) => Some(&mut form.time),
			(FormDraft::Item(form), 1) => Some(&mut form.title),
			(FormDraft::Item(form), 2) => Some(&mut form.speaker),
			(FormDraft::Day(form), 0) => Some(&mut form.title),
			(FormDraft::Day(form), 1) => Some(&mut form.date),
			_ => None,
		}
	}

	fn cycle_kind(&mut self, delta: i32) {
		if let (FormDraft::Item(form), 3) = (&mut self.draft, self.focused) {
			form.kind = form.kind.cycle(delta);
		}
	}

	fn values(&self) -> FormValues {
		match &self.draft {
			FormDraft::Item(form) => FormValues::Item(form.clone()),
			FormDraft::Day(form) => FormValues::Day(form.clone()),
		}
	}
}

#[derive(Debug, Clone)]
struct App {
	item_index: usize,
	form: Option<FormState>,
	confirm_index: usize,
	status: String,
}

impl Default for App {
	fn default() -> Self {
		Self {
			item_index: 0,
			form: None,
			confirm_index: 1,
			status: "Ready".to_string(),
		}
	}
}

impl App {
	fn clamp_selection(&mut self, editor: &AgendaEditor) {
		let len = editor.active_day().map(|day| day.items.len()).unwrap_or(0);
		if len == 0 {
			self.item_index = 0;
		} else {
			self.item_index = self.item_index.min(len - 1);
		}
	}

	fn shift_day(&mut self, editor: &mut AgendaEditor, delta: i32) {
		let days = editor.days();
		let Some(current) = active_day_index(editor) else {
			return;
		};
		let next = (current as i32 + delta).rem_euclid(days.len() as i32) as usize;
		let next_id = days[next].id.clone();
		editor.select_day(&next_id);
		self.item_index = 0;
	}

	fn selected_item(&self, editor: &AgendaEditor) -> Option<(String, String)> {
		let day = editor.active_day()?;
		let item = day.items.get(self.item_index)?;
		Some((day.id.clone(), item.id.clone()))
	}

	fn open_form(&mut self, editor: &AgendaEditor) {
		self.form = FormState::from_session(editor.edit_session(), editor);
	}

	fn open_confirm(&mut self) {
		self.form = None;
		// Cancel is preselected.
		self.confirm_index = 1;
	}
}

#[cfg(test)]
mod tests {
	use crossterm::event::KeyCode;
	use symposium_agenda::domain::{Day, EntityKind};
	use symposium_agenda::store::{AgendaStore, Entity};
	use symposium_agenda::{AgendaEditor, StorageError};

	use super::{App, handle_key};

	#[derive(Default)]
	struct RecordingStore {
		calls: Vec<String>,
		fail: bool,
	}

	impl RecordingStore {
		fn record(&mut self, call: String) -> Result<(), StorageError> {
			if self.fail {
				return Err(StorageError::Io(std::io::Error::other("disk full")));
			}
			self.calls.push(call);
			Ok(())
		}
	}

	impl AgendaStore for RecordingStore {
		fn create(&mut self, entity: &Entity) -> Result<String, StorageError> {
			self.record(format!("create {} {}", entity.kind(), entity.id()))?;
			Ok(entity.id().to_string())
		}

		fn update(&mut self, entity: &Entity) -> Result<(), StorageError> {
			self.record(format!("update {} {}", entity.kind(), entity.id()))
		}

		fn delete(&mut self, kind: EntityKind, id: &str) -> Result<(), StorageError> {
			self.record(format!("delete {kind} {id}"))
		}

		fn list(&self, _kind: EntityKind) -> Result<Vec<Entity>, StorageError> {
			Ok(Vec::new())
		}
	}

	fn press(app: &mut App, store: &mut RecordingStore, editor: &mut AgendaEditor, keys: &[KeyCode]) {
		for key in keys {
			assert!(!handle_key(app, *key, store, editor), "unexpected quit on {key:?}");
		}
	}

	fn type_text(app: &mut App, store: &mut RecordingStore, editor: &mut AgendaEditor, text: &str) {
		let keys = text.chars().map(KeyCode::Char).collect::<Vec<_>>();
		press(app, store, editor, &keys);
	}

	#[test]
	fn adds_item_through_the_dialog() {
		let mut app = App::default();
		let mut store = RecordingStore::default();
		let mut editor = AgendaEditor::new(vec![Day::new("d1", "Day 1", "Mon")]);

		press(&mut app, &mut store, &mut editor, &[KeyCode::Char('a')]);
		assert!(app.form.is_some());
		type_text(&mut app, &mut store, &mut editor, "09:00");
		press(&mut app, &mut store, &mut editor, &[KeyCode::Enter]);

		let form = app.form.as_ref().expect("dialog stays open on invalid input");
		assert_eq!(form.missing, vec!["title"]);
		assert!(editor.days()[0].items.is_empty());

		press(&mut app, &mut store, &mut editor, &[KeyCode::Tab]);
		type_text(&mut app, &mut store, &mut editor, "Opening");
		press(&mut app, &mut store, &mut editor, &[KeyCode::Tab, KeyCode::Tab, KeyCode::Right, KeyCode::Enter]);

		assert!(app.form.is_none());
		let item = &editor.days()[0].items[0];
		assert_eq!(item.title, "Opening");
		assert_eq!(item.kind.as_str(), "break");
		assert_eq!(store.calls, vec![format!("create item {}", item.id)]);
	}

	#[test]
	fn delete_defaults_to_cancel() {
		let mut app = App::default();
		let mut store = RecordingStore::default();
		let mut editor = AgendaEditor::new(vec![Day::new("d1", "Day 1", "Mon"), Day::new("d2", "Day 2", "Tue")]);

		press(&mut app, &mut store, &mut editor, &[KeyCode::Char('X'), KeyCode::Enter]);
		assert_eq!(editor.days().len(), 2);
		assert!(editor.pending_deletion().is_none());

		press(&mut app, &mut store, &mut editor, &[KeyCode::Char('X'), KeyCode::Char('y')]);
		assert_eq!(editor.days().len(), 1);
		assert_eq!(editor.selection().day_id(), Some("d2"));
		assert_eq!(store.calls, vec!["delete day d1".to_string()]);
	}

	#[test]
	fn failed_save_is_undone_and_reported() {
		let mut app = App::default();
		let mut store = RecordingStore {
			fail: true,
			..RecordingStore::default()
		};
		let mut editor = AgendaEditor::new(vec![Day::new("d1", "Day 1", "Mon")]);

		press(&mut app, &mut store, &mut editor, &[KeyCode::Char('X'), KeyCode::Char('y')]);
		assert_eq!(editor.days().len(), 1);
		assert!(app.status.starts_with("error: io error: disk full"));
	}

	#[test]
	fn tabs_wrap_and_escape_cancels_edit() {
		let mut app = App::default();
		let mut store = RecordingStore::default();
		let mut editor = AgendaEditor::new(vec![Day::new("d1", "Day 1", "Mon"), Day::new("d2", "Day 2", "Tue")]);

		press(&mut app, &mut store, &mut editor, &[KeyCode::Left]);
		assert_eq!(editor.selection().day_id(), Some("d2"));
		press(&mut app, &mut store, &mut editor, &[KeyCode::Tab]);
		assert_eq!(editor.selection().day_id(), Some("d1"));

		press(&mut app, &mut store, &mut editor, &[KeyCode::Char('E')]);
		type_text(&mut app, &mut store, &mut editor, " renamed");
		press(&mut app, &mut store, &mut editor, &[KeyCode::Esc]);
		assert!(editor.edit_session().is_idle());
		assert_eq!(editor.days()[0].title, "Day 1");
		assert!(store.calls.is_empty());

		assert!(handle_key(&mut app, KeyCode::Char('q'), &mut store, &mut editor));
	}
}
