//! Local record store for workspaces, sessions, templates, labels and
//! settings.
//!
//! The whole store is a single JSON document loaded at startup and
//! rewritten atomically after every mutation. A mutation only becomes
//! visible once it is on disk. It is the authoritative source the session
//! core rehydrates from after a restart.

mod directory;
mod document;
mod labels;
mod sessions;
mod settings;
mod templates;
mod workspaces;

pub use document::STORE_VERSION;
pub use settings::{AppSettings, Theme};
pub use templates::TemplateDraft;
pub use workspaces::{WorkspaceDraft, WorkspacePatch};
pub use labels::LabelDraft;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use wtstation_common::StoreError;

use document::StoreDocument;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Prefix of every session isolation key.
pub const PARTITION_PREFIX: &str = "persist:wa";

/// JSON-file backed record store.
pub struct RecordStore {
    /// `None` keeps the store purely in memory.
    path: Option<PathBuf>,
    doc: StoreDocument,
}

impl RecordStore {
    /// Open the store at `path`, starting empty when the file is missing.
    ///
    /// A file that fails to parse is moved aside to `*.corrupt` and the
    /// store starts fresh instead of refusing to boot.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let doc = if path.exists() {
            match Self::read_document(&path) {
                Ok(doc) => doc,
                Err(e) => {
                    let corrupt = path.with_extension("json.corrupt");
                    tracing::warn!(
                        error = %e,
                        moved_to = %corrupt.display(),
                        "Record store unreadable; starting fresh"
                    );
                    fs::rename(&path, &corrupt)?;
                    StoreDocument::default()
                }
            }
        } else {
            StoreDocument::default()
        };

        tracing::info!(
            path = %path.display(),
            workspaces = doc.workspaces.len(),
            sessions = doc.sessions.len(),
            "Record store opened"
        );
        Ok(Self {
            path: Some(path),
            doc,
        })
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            doc: StoreDocument::default(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn read_document(path: &Path) -> Result<StoreDocument> {
        let content = fs::read_to_string(path)?;
        let mut doc: StoreDocument = serde_json::from_str(&content)?;
        doc.migrate();
        Ok(doc)
    }

    /// Write the current document to disk.
    pub fn flush(&self) -> Result<()> {
        self.write_document(&self.doc)
    }

    /// Apply `change` to a copy of the document, write the copy, and only
    /// then make it current. On any error the store is left untouched.
    pub(crate) fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut StoreDocument) -> Result<T>,
    ) -> Result<T> {
        let mut next = self.doc.clone();
        let value = change(&mut next)?;
        self.write_document(&next)?;
        self.doc = next;
        Ok(value)
    }

    /// Atomic write: temp file, then rename.
    fn write_document(&self, doc: &StoreDocument) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        {
            let file = File::create(&tmp_path)?;
            serde_json::to_writer_pretty(BufWriter::new(file), doc)?;
        }
        fs::rename(&tmp_path, path)?;

        tracing::debug!(path = %path.display(), "Record store flushed");
        Ok(())
    }
}
