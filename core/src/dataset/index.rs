//! dataset/index.rs
//! Directory discovery, blacklist exclusion and seeded shuffling.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::constants::MANIFEST_FILE_NAME;
use crate::dataset::item::Item;
use crate::types::{DatasetError, Result};
use crate::utils::{file_name_of, suffix_of};

/// Ordered list of items under one directory.
#[derive(Debug, Clone, Default)]
pub struct DatasetIndex {
    root: PathBuf,
    items: Vec<Item>,
}

impl DatasetIndex {
    /// List `directory` (non-recursive), keeping regular files whose suffix is in
    /// `allowed_suffixes` (compared case-insensitively, without the dot).
    ///
    /// If the directory holds a `data_file.txt` manifest, its lines decide
    /// membership and order instead; every listed file must exist.
    /// Without a manifest, items are sorted by file name.
    pub fn discover<S: AsRef<str>>(directory: &Path, allowed_suffixes: &[S]) -> Result<Self> {
        let allowed: HashSet<String> = allowed_suffixes
            .iter()
            .map(|s| s.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();

        let manifest = directory.join(MANIFEST_FILE_NAME);
        let paths = if manifest.is_file() {
            info!("[INDEX] using manifest {}", manifest.display());
            read_manifest(directory, &manifest)?
        } else {
            let mut paths = Vec::new();
            let entries = fs::read_dir(directory).map_err(|e| DatasetError::io(directory, e))?;
            for entry in entries {
                let entry = entry.map_err(|e| DatasetError::io(directory, e))?;
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                match suffix_of(&path) {
                    Some(suffix) if allowed.contains(&suffix) => paths.push(path),
                    _ => debug!("[INDEX] skipping {}", path.display()),
                }
            }
            paths.sort_by_key(|p| file_name_of(p));
            paths
        };

        info!("[INDEX] discovered {} items in {}", paths.len(), directory.display());
        Ok(Self::from_paths(directory, paths))
    }

    /// Build an index from an explicit, already ordered path list.
    pub fn from_paths<I, P>(root: &Path, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let items = paths
            .into_iter()
            .enumerate()
            .map(|(i, p)| Item::new(i, p))
            .collect();
        Self { root: root.to_path_buf(), items }
    }

    /// Drop items whose file name is in `blacklist`. Returns how many were removed.
    pub fn exclude(&mut self, blacklist: &HashSet<String>) -> usize {
        if blacklist.is_empty() {
            return 0;
        }
        let before = self.items.len();
        self.items.retain(|item| !blacklist.contains(&item.file_name()));
        self.renumber();
        let removed = before - self.items.len();
        debug!("[INDEX] blacklist removed {} items", removed);
        removed
    }

    /// Permute items with a Fisher-Yates shuffle seeded by `seed`.
    ///
    /// Returns the permutation: `perm[new_index] == old_index`.
    pub fn shuffle(&mut self, seed: u64) -> Vec<usize> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut perm: Vec<usize> = (0..self.items.len()).collect();
        perm.shuffle(&mut rng);

        let old = std::mem::take(&mut self.items);
        let mut slots: Vec<Option<Item>> = old.into_iter().map(Some).collect();
        self.items = perm
            .iter()
            .filter_map(|&i| slots[i].take())
            .collect();
        self.renumber();
        debug!("[INDEX] shuffled {} items with seed {}", self.items.len(), seed);
        perm
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// Like `get`, failing with `IndexOutOfRange`.
    pub fn item(&self, index: usize) -> Result<&Item> {
        self.items
            .get(index)
            .ok_or(DatasetError::IndexOutOfRange { index, len: self.items.len() })
    }

    pub fn file_name(&self, index: usize) -> Result<String> {
        self.item(index).map(Item::file_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// First item that needs the key, used to validate a password.
    pub fn first_encrypted(&self) -> Option<&Item> {
        self.items.iter().find(|item| item.is_encrypted())
    }

    fn renumber(&mut self) {
        for (i, item) in self.items.iter_mut().enumerate() {
            item.index = i;
        }
    }
}

fn read_manifest(directory: &Path, manifest: &Path) -> Result<Vec<PathBuf>> {
    let text = fs::read_to_string(manifest).map_err(|e| DatasetError::io(manifest, e))?;
    let mut paths = Vec::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let path = directory.join(line);
        if !path.is_file() {
            return Err(DatasetError::io(
                &path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "listed in manifest but missing"),
            ));
        }
        paths.push(path);
    }
    Ok(paths)
}
