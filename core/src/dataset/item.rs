use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::constants::ENCRYPTED_SUFFIX;
use crate::utils::{file_name_of, suffix_of};

/// How a worker turns the file into presentation bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ItemKind {
    /// `.enc` envelope; decrypted with the session key.
    Encrypted,
    /// Raw image file; read as-is.
    Plain,
}

impl ItemKind {
    pub fn of_path(path: &Path) -> Self {
        match suffix_of(path).as_deref() {
            Some(ENCRYPTED_SUFFIX) => ItemKind::Encrypted,
            _ => ItemKind::Plain,
        }
    }
}

/// One addressable dataset entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub index: usize,
    pub path: PathBuf,
    pub kind: ItemKind,
}

impl Item {
    pub fn new(index: usize, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = ItemKind::of_path(&path);
        Self { index, path, kind }
    }

    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }

    pub fn is_encrypted(&self) -> bool {
        self.kind == ItemKind::Encrypted
    }
}
