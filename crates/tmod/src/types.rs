//! Base types for structure of TMOD file.

use binrw::binrw;

/// Magic number every TMOD file starts with
pub const FORMAT_TAG: [u8; 4] = *b"TMOD";

/// Format version stamped by the writer
pub const FORMAT_VERSION: u32 = 2;

/// Oldest format version the reader accepts
pub const MIN_FORMAT_VERSION: u32 = 1;

/// First format version carrying a signature block
pub const SIGNED_FORMAT_VERSION: u32 = 2;

/// Size of the content hash in bytes
pub const HASH_LEN: usize = 16;

/// Position of the content hash from the start of the file
pub const HASH_OFFSET: u64 = 8;

/// Length prefixed UTF-8 string
///
/// Stored as a little endian `u32` byte count followed by the string data, without a terminator.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModString {
    #[br(temp)]
    #[bw(try_calc = u32::try_from(value.len()))]
    len: u32,

    #[br(count = len, try_map = String::from_utf8)]
    #[bw(map = |s: &String| s.as_bytes().to_vec())]
    value: String,
}

impl ModString {
    /// Borrow the string contents
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Take ownership of the string contents
    pub fn into_string(self) -> String {
        self.value
    }
}

impl From<&str> for ModString {
    fn from(value: &str) -> Self {
        Self {
            value: value.to_owned(),
        }
    }
}

impl From<String> for ModString {
    fn from(value: String) -> Self {
        Self { value }
    }
}

/// TMOD file header
///
/// Follows the "TMOD" magic and the format version. The signature block is only present from
/// [`SIGNED_FORMAT_VERSION`] onwards, so reading requires the version as an argument.
#[binrw]
#[brw(little)]
#[br(import(version: u32))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModHeader {
    /// MD5 digest of the body
    pub hash: [u8; HASH_LEN],

    #[br(temp, if(version >= SIGNED_FORMAT_VERSION))]
    #[bw(try_calc = u32::try_from(signature.len()))]
    signature_len: u32,

    /// Opaque signature bytes, never interpreted
    #[br(count = signature_len)]
    pub signature: Vec<u8>,
}

/// TMOD file manifest
///
/// The start of the hashed body: archive identity followed by the entry table.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModManifest {
    /// Human readable archive name
    pub name: ModString,

    /// Version string of the mod
    pub mod_version: ModString,

    #[br(temp)]
    #[bw(try_calc = u32::try_from(records.len()))]
    entry_count: u32,

    /// One record per entry, in payload order
    #[br(count = entry_count)]
    pub records: Vec<ModRecord>,
}

/// TMOD entry record
///
/// Defines an entry in the TMOD file
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModRecord {
    /// Logical name of the entry
    pub name: ModString,

    /// The size of the data for this entry before compression
    pub raw_len: u32,

    /// The size of this entry's data inside the payload block
    pub stored_len: u32,

    /// The offset to this entry's data from the start of the payload block
    pub stored_offset: u32,
}

impl ModRecord {
    /// Whether the payload is a deflate stream rather than the raw bytes
    pub fn is_compressed(&self) -> bool {
        self.stored_len != self.raw_len
    }
}
