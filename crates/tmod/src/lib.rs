//! This library handles reading, patching and creating **TMOD** mod archives.
//!
//! # TMOD Archive Format Documentation
//!
//! A TMOD file bundles the files of a single mod (its main assembly, assets and metadata) into one
//! binary container. Each entry is stored either as-is or as a raw DEFLATE stream, whichever is
//! smaller. TMOD files are typically identified with the `.tmod` extension.
//!
//! ## File Structure
//!
//! A TMOD file consists of a fixed preamble, a header carrying the content hash and signature, and a
//! body made of the manifest (archive name, mod version and entry table) followed by the payload block.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: 0x444F4D54 ("TMOD")                               |
//! | 0x0004         | Version                | 4 bytes: Format version, `1` or `2`                        |
//! | 0x0008         | Content Hash           | 16 bytes: MD5 digest of the body                           |
//! | 0x0018         | Signature              | Version 2 only: 4 byte length followed by opaque bytes     |
//!
//! ### Body
//!
//! Everything following the header is covered by the content hash.
//!
//! - **Name**: the human readable archive name, used by tooling to name output directories.
//! - **Mod Version**: an opaque version string carried through untouched.
//! - **Entry Count**: A 4-byte unsigned integer indicating the number of entries in the archive.
//! - **Entry Table**: one record per entry, see below.
//! - **Payload Block**: the stored form of every entry, concatenated in table order up to the end of the file.
//!
//! ### Entry Record
//!
//! | Field                  | Description                                                          |
//! |------------------------|----------------------------------------------------------------------|
//! | Name                   | Length prefixed logical name, `/` separated                          |
//! | Raw Size               | 4 bytes: Size of the entry when decompressed                         |
//! | Stored Size            | 4 bytes: Size of the entry inside the payload block                  |
//! | Stored Offset          | 4 bytes: Offset of the entry from the start of the payload block     |
//!
//! An entry whose stored size equals its raw size is stored uncompressed, anything else is a raw
//! DEFLATE stream. Offsets must match the running sum of the preceding stored sizes.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.tmod`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Strings**: 4 byte length followed by UTF-8 data, no terminator
//! - **Main Entry**: every archive must contain [`MAIN_ENTRY`]
//!

pub mod archive;
pub mod codec;
pub mod error;
pub mod merge;
pub mod overlay;
pub mod read;
pub mod table;
pub mod types;
pub mod write;

pub use archive::ModArchive;
pub use merge::MergeSummary;
pub use overlay::collect_overlay;
pub use table::{EntryTable, ModEntry, MAIN_ENTRY};
pub use write::{ModWriter, ModWriterOptions};
