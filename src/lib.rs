//! In-memory agenda editor for a symposium: days holding ordered items, edited
//! through create/edit dialogs, confirmation-gated deletes and drag reordering.

pub mod collection;
pub mod confirm;
pub mod domain;
pub mod editor;
pub mod error;
pub mod selection;
pub mod session;
pub mod storage;
pub mod store;
pub mod sync;

pub use editor::{AgendaEditor, Change, DragResult};
pub use error::{CommitError, StorageError, ValidationError};
