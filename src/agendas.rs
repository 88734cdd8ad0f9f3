use std::env;
use std::fs;
use std::io::{Error, ErrorKind, Write};
use std::path::{Path, PathBuf};

const RECENT_AGENDAS_FILE: &str = "recent_agendas.txt";
const MAX_RECENT_AGENDAS: usize = 50;
const STATE_DIR_NAME: &str = "symposium_agenda";
const AGENDA_EXTENSION: &str = "agenda";

pub fn resolve_agenda_path(cli_path: Option<PathBuf>) -> Result<PathBuf, Error> {
	if let Some(path) = cli_path {
		return Ok(absolutize(with_agenda_extension(path)?));
	}

	if let Some(path) = env::var_os("SYMPOSIUM_AGENDA") {
		let path = PathBuf::from(path);
		if !path.as_os_str().is_empty() {
			return Ok(absolutize(with_agenda_extension(path)?));
		}
	}

	if let Ok(mut recent) = recent_agendas(MAX_RECENT_AGENDAS) {
		if let Some(path) = recent.drain(..).next() {
			return Ok(path);
		}
	}

	Err(Error::new(
		ErrorKind::NotFound,
		"no agenda selected: pass --agenda <path>, set SYMPOSIUM_AGENDA, or pick one from `agendas`",
	))
}

pub fn remember_agenda(path: &Path) -> Result<(), Error> {
	let path = absolutize(path.to_path_buf());
	let mut entries = recent_agendas(MAX_RECENT_AGENDAS)?;
	entries.retain(|entry| entry != &path);
	entries.insert(0, path);
	entries.truncate(MAX_RECENT_AGENDAS);
	save_recent_agendas(&entries)
}

pub fn recent_agendas(limit: usize) -> Result<Vec<PathBuf>, Error> {
	let raw = match fs::read_to_string(recent_agendas_path()) {
		Ok(raw) => raw,
		Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
		Err(err) => return Err(err),
	};

	Ok(raw
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.take(limit)
		.map(PathBuf::from)
		.collect())
}

/// Agenda files always carry the `.agenda` extension; a bare name gets it appended.
pub fn with_agenda_extension(path: PathBuf) -> Result<PathBuf, Error> {
	match path.extension().and_then(|ext| ext.to_str()) {
		Some(AGENDA_EXTENSION) => Ok(path),
		None => Ok(path.with_extension(AGENDA_EXTENSION)),
		Some(other) => Err(Error::new(
			ErrorKind::InvalidInput,
			format!("not an agenda file (.{other}): {}", path.display()),
		)),
	}
}

/// Default log destination for the terminal editor.
pub fn default_log_path() -> PathBuf {
	state_dir().join("editor.log")
}

fn save_recent_agendas(entries: &[PathBuf]) -> Result<(), Error> {
	fs::create_dir_all(state_dir())?;

	let mut file = fs::File::create(recent_agendas_path())?;
	for path in entries {
		writeln!(file, "{}", path.display())?;
	}

	Ok(())
}

fn recent_agendas_path() -> PathBuf {
	state_dir().join(RECENT_AGENDAS_FILE)
}

fn state_dir() -> PathBuf {
	if let Some(path) = env::var_os("SYMPOSIUM_STATE_DIR") {
		return PathBuf::from(path);
	}

	#[cfg(target_os = "windows")]
	{
		if let Some(path) = env::var_os("LOCALAPPDATA") {
			return PathBuf::from(path).join(STATE_DIR_NAME);
		}
	}

	if let Some(path) = env::var_os("XDG_STATE_HOME") {
		return PathBuf::from(path).join(STATE_DIR_NAME);
	}

	if let Some(path) = env::var_os("HOME") {
		return PathBuf::from(path)
			.join(".local")
			.join("state")
			.join(STATE_DIR_NAME);
	}

	PathBuf::from(".symposium_agenda")
}

fn absolutize(path: PathBuf) -> PathBuf {
	let path = if path.is_absolute() {
		path
	} else if let Ok(cwd) = env::current_dir() {
		cwd.join(path)
	} else {
		path
	};

	if path.exists() {
		fs::canonicalize(&path).unwrap_or(path)
	} else {
		path
	}
}

#[cfg(test)]
mod tests {
	use std::io::ErrorKind;
	use std::path::PathBuf;

	use super::{absolutize, with_agenda_extension};

	#[test]
	fn relative_paths_are_anchored_to_cwd() {
		let path = absolutize(PathBuf::from("missing_agenda_for_test.agenda"));
		assert!(path.is_absolute());
		assert!(path.ends_with("missing_agenda_for_test.agenda"));
	}

	#[test]
	fn bare_names_get_the_agenda_extension() {
		let path = with_agenda_extension(PathBuf::from("summer")).expect("bare name accepted");
		assert_eq!(path, PathBuf::from("summer.agenda"));
		let path = with_agenda_extension(PathBuf::from("plans/summer.agenda")).expect("agenda accepted");
		assert_eq!(path, PathBuf::from("plans/summer.agenda"));
	}

	#[test]
	fn other_extensions_are_rejected() {
		let err = with_agenda_extension(PathBuf::from("notes.txt")).expect_err("txt rejected");
		assert_eq!(err.kind(), ErrorKind::InvalidInput);
		assert!(err.to_string().contains("notes.txt"));
	}
}
