use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Where log lines go. The terminal editor owns the screen, so it logs to a
/// file or nowhere.
pub enum LogTarget<'a> {
	Stderr,
	File(&'a Path),
	Discard,
}

pub fn init_logging(target: LogTarget<'_>) {
	let make_filter = || {
		EnvFilter::try_from_env("SYMPOSIUM_LOG")
			.or_else(|_| EnvFilter::try_from_default_env())
			.unwrap_or_else(|_| EnvFilter::new("info"))
	};

	let result = match target {
		LogTarget::Stderr => tracing_subscriber::fmt()
			.with_env_filter(make_filter())
			.with_writer(std::io::stderr)
			.try_init(),
		LogTarget::File(path) => match open_log_file(path) {
			Ok(file) => tracing_subscriber::fmt()
				.with_env_filter(make_filter())
				.with_ansi(false)
				.with_writer(Mutex::new(file))
				.try_init(),
			Err(err) => {
				eprintln!("warning: failed to open log file {}: {err}", path.display());
				return init_logging(LogTarget::Discard);
			}
		},
		LogTarget::Discard => tracing_subscriber::fmt()
			.with_env_filter(make_filter())
			.with_writer(std::io::sink)
			.try_init(),
	};

	// A second call keeps the subscriber installed first.
	if let Err(err) = result {
		eprintln!("warning: logging already initialised: {err}");
	}
}

fn open_log_file(path: &Path) -> std::io::Result<fs::File> {
	if let Some(parent) = path.parent() {
		if !parent.as_os_str().is_empty() {
			fs::create_dir_all(parent)?;
		}
	}
	OpenOptions::new().create(true).append(true).open(path)
}
