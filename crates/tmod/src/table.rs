//! Ordered table of the entries stored in an archive

use indexmap::IndexMap;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};

/// Logical name of the entry holding the main assembly of a mod
pub const MAIN_ENTRY: &str = "Windows.dll";

/// A single entry of an archive in its raw (decompressed) form
#[derive(Debug, Clone)]
pub struct ModEntry {
    data: Vec<u8>,
    stored_len: Option<u64>,
}

impl ModEntry {
    fn new(data: Vec<u8>, stored_len: Option<u64>) -> Self {
        Self { data, stored_len }
    }

    /// The raw bytes of the entry
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the raw bytes of the entry
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Size of the entry, in bytes, when uncompressed
    pub fn raw_len(&self) -> u64 {
        self.data.len() as u64
    }

    /// Size of the entry, in bytes, as it was stored in the archive it was read from
    ///
    /// Entries that were added or replaced since have no stored size until the archive is written
    /// and read again.
    pub fn stored_len(&self) -> Option<u64> {
        self.stored_len
    }

    /// Whether the entry was stored compressed in the archive it was read from
    pub fn is_compressed(&self) -> Option<bool> {
        self.stored_len.map(|stored| stored != self.raw_len())
    }
}

/// Entries of an archive keyed by logical name, in insertion order
///
/// Names are normalized on the way in, see [`normalize_name`], so two spellings of the same path
/// always resolve to the same entry.
#[derive(Debug, Clone, Default)]
pub struct EntryTable {
    entries: IndexMap<Box<str>, ModEntry>,
}

impl EntryTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Number of entries in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an entry with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Look up an entry by name
    pub fn get(&self, name: &str) -> Option<&ModEntry> {
        match self.entries.get(name) {
            Some(entry) => Some(entry),
            None => normalize_name(name).and_then(|n| self.entries.get(n.as_str())),
        }
    }

    /// Get the position of an entry in iteration order
    pub fn index_of(&self, name: &str) -> Option<usize> {
        match self.entries.get_index_of(name) {
            Some(index) => Some(index),
            None => normalize_name(name).and_then(|n| self.entries.get_index_of(n.as_str())),
        }
    }

    /// Get an entry by its position in iteration order
    pub fn get_index(&self, index: usize) -> Option<(&str, &ModEntry)> {
        self.entries
            .get_index(index)
            .map(|(name, entry)| (name.as_ref(), entry))
    }

    /// Returns an iterator over all entry names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|name| name.as_ref())
    }

    /// Returns an iterator over all entries, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModEntry)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_ref(), entry))
    }

    /// Replace the data of an existing entry, or append a new one
    ///
    /// A replaced entry keeps its position and forgets its stored size. Returns the previous data
    /// if there was any.
    pub fn replace_or_insert(
        &mut self,
        name: &str,
        data: impl Into<Vec<u8>>,
    ) -> Result<Option<Vec<u8>>> {
        let name = normalize_name(name).ok_or_else(|| Error::InvalidName(name.to_owned()))?;
        Ok(self.put(name, ModEntry::new(data.into(), None)))
    }

    /// Insert an entry read from disk, keeping its stored size
    pub(crate) fn insert_stored(&mut self, name: String, data: Vec<u8>, stored_len: u64) {
        if let Some(previous) = self.put(name, ModEntry::new(data, Some(stored_len))) {
            debug!("duplicate entry replaced {} bytes", previous.len());
        }
    }

    fn put(&mut self, name: String, entry: ModEntry) -> Option<Vec<u8>> {
        self.entries
            .insert(name.into_boxed_str(), entry)
            .map(ModEntry::into_data)
    }

    /// Total size of the entries when decompressed
    pub fn decompressed_size(&self) -> Option<u128> {
        let mut total = 0u128;
        for entry in self.entries.values() {
            total = total.checked_add(entry.raw_len() as u128)?;
        }
        Some(total)
    }
}

/// Tables are equal when they hold the same names with the same data in the same order
impl PartialEq for EntryTable {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((a, a_entry), (b, b_entry))| a == b && a_entry.data == b_entry.data)
    }
}

impl Eq for EntryTable {}

impl<'a> IntoIterator for &'a EntryTable {
    type Item = (&'a str, &'a ModEntry);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Normalize a logical name to `/` separators
///
/// Backslashes are treated as separators, empty and `.` components are dropped. Returns `None`
/// when nothing is left.
pub fn normalize_name(name: &str) -> Option<String> {
    let normalized = name
        .split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Get a relative path for a logical name that is safe to join onto an output directory
///
/// # Warnings
///
/// Logical names come straight from the archive. A crafted archive may contain names that break
/// out of the current directory (`../runtime`) or are absolute, and writing to them carelessly
/// allows an attacker to overwrite files elsewhere. Such names return `None`.
pub fn enclosed_path(name: &str) -> Option<PathBuf> {
    let normalized = normalize_name(name)?;

    let mut path = PathBuf::new();
    for component in Path::new(&normalized).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}
