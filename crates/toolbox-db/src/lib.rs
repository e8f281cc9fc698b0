//! Load toolbox lexicon files and turn them into typed entries.
//!
//! A toolbox file starts with a `\_sh` header line and a blank line, followed
//! by records of `\tag value` lines separated by blank lines. This crate
//! covers the whole path from bytes to [`Entry`] values:
//!
//! - [`parse_toolbox`] validates the header and line shapes and yields
//!   [`RawRecord`]s, failing with a line-accurate [`ToolboxError`].
//! - [`nesting`] annotates definition text with bracket depth and splits it
//!   into senses and subsenses without breaking inside asides.
//! - [`build_entries`] validates records, derives canonical forms and gloss
//!   paths, and collects non-fatal [`toolbox_types::Warning`]s.
//!
//! Callers choose between memory-mapped files or owned buffers at runtime via
//! [`LoadMode`].
//!
//! # Example
//! ```no_run
//! use toolbox_db::{LoadMode, ToolboxFile};
//!
//! # fn main() -> anyhow::Result<()> {
//! let file = ToolboxFile::load_with_mode("/path/to/dictionary.toolbox", LoadMode::Mmap)?;
//! let built = file.entries()?;
//! for entry in &built.entries {
//!     println!("{}: {:?}", entry.headword(), entry.canonical_subsenses());
//! }
//! # Ok(()) }
//! ```

pub mod entry;
pub mod error;
pub mod nesting;
pub mod record;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use memmap2::Mmap;
use toolbox_types::RawRecord;

pub use entry::{BuiltEntries, build_entries, build_entry};
pub use error::ToolboxError;
pub use record::{parse_records, parse_toolbox};
pub use toolbox_types::Entry;

/// Strategy for loading toolbox files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map the file (fast, zero-copy).
    Mmap,
    /// Read the file into an owned buffer (portable fallback).
    Owned,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// A toolbox file held in memory, already checked to be UTF-8.
pub struct ToolboxFile {
    path: PathBuf,
    buffer: Buffer,
}

impl ToolboxFile {
    /// Load a toolbox file into an owned buffer.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(path, LoadMode::Owned)
    }

    /// Load a toolbox file choosing between mmap and owned buffers at runtime.
    pub fn load_with_mode(path: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let buffer = load_file(&path, mode)?;
        std::str::from_utf8(buffer.as_slice())
            .with_context(|| format!("{} is not valid UTF-8", path.display()))?;
        Ok(Self { path, buffer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        std::str::from_utf8(self.buffer.as_slice()).expect("toolbox text is valid utf8")
    }

    pub fn records(&self) -> Result<Vec<RawRecord>, ToolboxError> {
        parse_toolbox(self.text())
    }

    pub fn entries(&self) -> Result<BuiltEntries, ToolboxError> {
        build_entries(&self.records()?)
    }
}

/// Parse and build entries straight from text.
pub fn load_entries(text: &str) -> Result<BuiltEntries, ToolboxError> {
    build_entries(&parse_toolbox(text)?)
}

fn load_file(path: &Path, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        LoadMode::Owned => {
            let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}
