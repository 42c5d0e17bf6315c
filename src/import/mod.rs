//! Importing candidate journal entries from CSV and JSON files.
//!
//! Importers only parse; the entries they produce still pass through the
//! balance validator when posted. Malformed amounts or dates reject the
//! record outright rather than being coerced to zero.

use std::path::Path;

use crate::core::{NewEntry, StoreError};

pub mod csv;
pub mod json;

/// A file format that can be parsed into candidate journal entries.
pub trait EntryImporter {
    fn parse(path: &Path) -> Result<Vec<NewEntry>, ImportError>;
}

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Parse(String),
    Store(StoreError),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(e) => write!(f, "io error: {e}"),
            ImportError::Parse(e) => write!(f, "parse error: {e}"),
            ImportError::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(e) => Some(e),
            ImportError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(e: std::io::Error) -> Self {
        ImportError::Io(e)
    }
}

impl From<StoreError> for ImportError {
    fn from(e: StoreError) -> Self {
        ImportError::Store(e)
    }
}
