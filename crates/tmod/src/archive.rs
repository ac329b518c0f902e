//! In-memory representation of a TMOD archive

use crate::error::{Error, Result};
use crate::table::{EntryTable, MAIN_ENTRY};
use crate::types::{FORMAT_VERSION, HASH_LEN};

/// A TMOD archive held entirely in memory
///
/// Archives are produced by [`ModArchive::read`] or built from scratch with [`ModArchive::new`],
/// modified through [`ModArchive::merge`] or [`ModArchive::replace_or_insert`], and serialized
/// with [`crate::ModWriter`]. Writing never changes the archive, so it can be modified and written
/// again.
///
/// ```
/// # fn doit() -> tmod::error::Result<()>
/// # {
/// use tmod::{ModArchive, MAIN_ENTRY};
///
/// let mut archive = ModArchive::new("ExampleMod");
/// archive.replace_or_insert(MAIN_ENTRY, b"MZ".to_vec())?;
/// archive.replace_or_insert("Content/icon.png", b"PNG".to_vec())?;
///
/// let bytes = archive.write()?;
/// let reread = ModArchive::read(&bytes)?;
///
/// assert_eq!(reread.name(), "ExampleMod");
/// assert_eq!(reread.entries(), archive.entries());
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModArchive {
    pub(crate) name: String,
    pub(crate) mod_version: String,
    pub(crate) format_version: u32,
    pub(crate) hash: [u8; HASH_LEN],
    pub(crate) signature: Vec<u8>,
    pub(crate) entries: EntryTable,
}

impl ModArchive {
    /// Create an empty, unsigned archive
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mod_version: String::new(),
            format_version: FORMAT_VERSION,
            hash: [0; HASH_LEN],
            signature: Vec::new(),
            entries: EntryTable::new(),
        }
    }

    /// Human readable name of the archive
    ///
    /// Tooling uses this to name output files and directories. It is not a path.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version string of the bundled mod
    pub fn mod_version(&self) -> &str {
        &self.mod_version
    }

    /// Change the version string of the bundled mod
    pub fn set_mod_version(&mut self, version: impl Into<String>) {
        self.mod_version = version.into();
    }

    /// Format version the archive was read with
    ///
    /// Archives are always written with [`FORMAT_VERSION`].
    pub fn format_version(&self) -> u32 {
        self.format_version
    }

    /// Content hash the archive was read with
    ///
    /// All zeroes for archives that were not read from bytes.
    pub fn hash(&self) -> &[u8; HASH_LEN] {
        &self.hash
    }

    /// Opaque signature bytes
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Replace the opaque signature bytes
    pub fn set_signature(&mut self, signature: impl Into<Vec<u8>>) {
        self.signature = signature.into();
    }

    /// The entries of this archive
    pub fn entries(&self) -> &EntryTable {
        &self.entries
    }

    /// Number of entries contained in this archive
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this archive contains no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the raw data of an entry by name
    pub fn by_name(&self, name: &str) -> Result<&[u8]> {
        self.entries
            .get(name)
            .map(|entry| entry.data())
            .ok_or_else(|| Error::FileNotFound(name.to_owned()))
    }

    /// Get the raw data of the main assembly
    pub fn main_entry(&self) -> Result<&[u8]> {
        self.entries
            .get(MAIN_ENTRY)
            .map(|entry| entry.data())
            .ok_or(Error::MissingMainEntry)
    }

    /// Replace the data of a single entry, or append it if it does not exist yet
    pub fn replace_or_insert(
        &mut self,
        name: &str,
        data: impl Into<Vec<u8>>,
    ) -> Result<Option<Vec<u8>>> {
        self.entries.replace_or_insert(name, data)
    }

    /// Total size of the files in the archive when decompressed, if it can be known
    pub fn decompressed_size(&self) -> Option<u128> {
        self.entries.decompressed_size()
    }
}
