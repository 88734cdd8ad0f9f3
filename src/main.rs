mod agendas;
mod logging;
mod ui;

use std::error::Error;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use symposium_agenda::domain::{Day, ItemKind};
use symposium_agenda::session::{DayForm, ItemForm};
use symposium_agenda::storage::{FileStore, load_document};
use symposium_agenda::sync::commit_change;
use symposium_agenda::{AgendaEditor, Change, DragResult};
use tracing::info;

use crate::agendas::{default_log_path, recent_agendas, remember_agenda, resolve_agenda_path};
use crate::logging::{LogTarget, init_logging};
use crate::ui::run_editor;

#[derive(Debug, Parser)]
#[command(name = "symposium-agenda", about = "Symposium agenda editor")]
struct Cli {
	#[arg(long)]
	agenda: Option<PathBuf>,
	/// Append logs to this file (defaults to SYMPOSIUM_LOG_FILE).
	#[arg(long)]
	log_file: Option<PathBuf>,
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
	Init {
		#[arg(long)]
		title: Option<String>,
	},
	Editor,
	AddDay {
		#[arg(long)]
		title: String,
		#[arg(long)]
		date: String,
	},
	EditDay {
		#[arg(long)]
		day: String,
		#[arg(long)]
		title: Option<String>,
		#[arg(long)]
		date: Option<String>,
	},
	RemoveDay {
		#[arg(long)]
		day: String,
		#[arg(long)]
		yes: bool,
	},
	AddItem {
		#[arg(long)]
		day: String,
		#[arg(long)]
		time: String,
		#[arg(long)]
		title: String,
		#[arg(long)]
		speaker: Option<String>,
		#[arg(long, default_value = "talk")]
		kind: ItemKind,
	},
	EditItem {
		#[arg(long)]
		day: String,
		#[arg(long)]
		item: String,
		#[arg(long)]
		time: Option<String>,
		#[arg(long)]
		title: Option<String>,
		#[arg(long)]
		speaker: Option<String>,
		#[arg(long)]
		kind: Option<ItemKind>,
	},
	MoveItem {
		#[arg(long)]
		day: String,
		#[arg(long)]
		from: usize,
		#[arg(long)]
		to: usize,
	},
	RemoveItem {
		#[arg(long)]
		day: String,
		#[arg(long)]
		item: String,
		#[arg(long)]
		yes: bool,
	},
	Show,
	Export,
	Agendas {
		#[arg(long, default_value_t = 20)]
		limit: usize,
	},
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> Result<(), Box<dyn Error>> {
	let cli = Cli::parse();
	let command = cli.command.unwrap_or(Command::Editor);

	let log_file = cli
		.log_file
		.or_else(|| std::env::var_os("SYMPOSIUM_LOG_FILE").map(PathBuf::from));
	match (&command, log_file) {
		(_, Some(path)) => init_logging(LogTarget::File(&path)),
		(Command::Editor, None) => init_logging(LogTarget::File(&default_log_path())),
		(_, None) => init_logging(LogTarget::Stderr),
	}

	if let Command::Agendas { limit } = command {
		return print_recent_agendas(limit);
	}

	let agenda_path = resolve_agenda_path(cli.agenda)?;
	let mut store = FileStore::open(&agenda_path)?;
	info!(path = %agenda_path.display(), days = store.days().len(), "agenda opened");
	if let Err(err) = remember_agenda(&agenda_path) {
		eprintln!("warning: failed to store recent agenda: {err}");
	}

	let mut editor = AgendaEditor::new(store.days().to_vec());

	match command {
		Command::Init { title } => {
			match title {
				Some(title) => store.set_symposium(title)?,
				None => store.flush()?,
			}
			println!("initialized agenda at {}", agenda_path.display());
		}
		Command::Editor => {
			run_editor(&mut store, &mut editor)?;
		}
		Command::AddDay { title, date } => {
			editor.open_new_day();
			let change = editor.commit(DayForm { title, date })?;
			report(commit_change(&mut store, &mut editor, change)?);
		}
		Command::EditDay { day, title, date } => {
			let existing = require_day(&editor, &day)?;
			let mut form = DayForm::from(existing);
			if let Some(title) = title {
				form.title = title;
			}
			if let Some(date) = date {
				form.date = date;
			}
			editor.open_edit_day(&day);
			let change = editor.commit(form)?;
			report(commit_change(&mut store, &mut editor, change)?);
		}
		Command::RemoveDay { day, yes } => {
			require_day(&editor, &day)?;
			editor.request_delete_day(&day);
			confirm_or_dismiss(&mut store, &mut editor, yes)?;
		}
		Command::AddItem {
			day,
			time,
			title,
			speaker,
			kind,
		} => {
			require_day(&editor, &day)?;
			editor.open_new_item(&day);
			let change = editor.commit(ItemForm {
				time,
				title,
				speaker: speaker.unwrap_or_default(),
				kind,
			})?;
			report(commit_change(&mut store, &mut editor, change)?);
		}
		Command::EditItem {
			day,
			item,
			time,
			title,
			speaker,
			kind,
		} => {
			let existing = require_day(&editor, &day)?
				.item(&item)
				.ok_or_else(|| format!("item not found in {day}: {item}"))?;
			let mut form = ItemForm::from(existing);
			if let Some(time) = time {
				form.time = time;
			}
			if let Some(title) = title {
				form.title = title;
			}
			if let Some(speaker) = speaker {
				form.speaker = speaker;
			}
			if let Some(kind) = kind {
				form.kind = kind;
			}
			editor.open_edit_item(&day, &item);
			let change = editor.commit(form)?;
			report(commit_change(&mut store, &mut editor, change)?);
		}
		Command::MoveItem { day, from, to } => {
			require_day(&editor, &day)?;
			let drag = DragResult {
				source_index: from,
				destination: Some(to),
			};
			match editor.on_drag_end(&day, drag) {
				Some(change) => report(commit_change(&mut store, &mut editor, change)?),
				None => println!("nothing to move"),
			}
		}
		Command::RemoveItem { day, item, yes } => {
			require_day(&editor, &day)?
				.item(&item)
				.ok_or_else(|| format!("item not found in {day}: {item}"))?;
			editor.request_delete_item(&day, &item);
			confirm_or_dismiss(&mut store, &mut editor, yes)?;
		}
		Command::Show => {
			print_agenda(&store, &editor);
		}
		Command::Export => {
			let export = AgendaExport {
				symposium: &store.document().header.symposium,
				updated_at: store.document().header.updated_at,
				days: editor.days(),
			};
			println!("{}", serde_json::to_string_pretty(&export)?);
		}
		Command::Agendas { .. } => {}
	}

	Ok(())
}

#[derive(Serialize)]
struct AgendaExport<'a> {
	symposium: &'a str,
	updated_at: DateTime<Utc>,
	days: &'a [Day],
}

fn require_day<'a>(editor: &'a AgendaEditor, day_id: &str) -> Result<&'a Day, String> {
	editor
		.day(day_id)
		.ok_or_else(|| format!("day not found: {day_id}"))
}

fn confirm_or_dismiss(
	store: &mut FileStore,
	editor: &mut AgendaEditor,
	confirmed: bool,
) -> Result<(), Box<dyn Error>> {
	if !confirmed {
		let prompt = editor
			.pending_deletion()
			.map(|pending| pending.prompt())
			.unwrap_or_default();
		editor.dismiss_delete();
		println!("{prompt} re-run with --yes to delete");
		return Ok(());
	}

	if let Some(change) = editor.confirm_delete() {
		report(commit_change(store, editor, change)?);
	}
	Ok(())
}

fn report(change: Change) {
	let id = match &change {
		Change::ItemCreated { item, .. } => Some(item.id.as_str()),
		Change::DayCreated { day } => Some(day.id.as_str()),
		_ => None,
	};
	match id {
		Some(id) => println!("{} ({id})", change.describe()),
		None => println!("{}", change.describe()),
	}
}

fn print_recent_agendas(limit: usize) -> Result<(), Box<dyn Error>> {
	let rows = recent_agendas(limit)?;
	if rows.is_empty() {
		println!("no recent agendas");
		return Ok(());
	}

	for (index, path) in rows.iter().enumerate() {
		let title = if path.exists() {
			load_document(path)
				.map(|document| document.header.symposium)
				.unwrap_or_else(|err| format!("unreadable: {err}"))
		} else {
			"missing".to_string()
		};
		println!("{:>2}. {} | {}", index + 1, title, path.display());
	}

	Ok(())
}

fn print_agenda(store: &FileStore, editor: &AgendaEditor) {
	println!("{}", store.document().header.symposium);
	if editor.days().is_empty() {
		println!("no days yet");
		return;
	}

	for day in editor.days() {
		let marker = if editor.selection().is_selected(&day.id) { "*" } else { " " };
		println!("\n{marker} {} | {} | {}", day.title, day.date, day.id);
		if day.items.is_empty() {
			println!("    (no items)");
		}
		for (index, item) in day.items.iter().enumerate() {
			let speaker = item
				.speaker
				.as_ref()
				.map(|speaker| format!(" ({speaker})"))
				.unwrap_or_default();
			println!(
				"  {index:>2}. {} | {} | {}{} | {}",
				item.time, item.kind, item.title, speaker, item.id
			);
		}
	}
}
