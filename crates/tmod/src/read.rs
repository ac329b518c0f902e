//! Reading TMOD archives
//!

use binrw::BinRead;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use tracing::{debug, instrument, trace};

use crate::{
    archive::ModArchive,
    codec,
    error::{CorruptEntryError, Error, Result},
    table::{normalize_name, EntryTable, MAIN_ENTRY},
    types::{ModHeader, ModManifest, ModRecord, FORMAT_TAG, FORMAT_VERSION, MIN_FORMAT_VERSION},
};

impl ModArchive {
    /// Read a TMOD archive from a reader, loading every entry into memory
    pub fn from_reader<R: Read>(mut reader: R) -> Result<ModArchive> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::read(&bytes)
    }

    /// Parse a TMOD archive, decompressing every entry
    ///
    /// Fails without returning anything if the magic, version, content hash or any entry does not
    /// check out.
    ///
    /// ```no_run
    /// fn list_tmod_contents(path: &str) -> tmod::error::Result<()> {
    ///     let archive = tmod::ModArchive::read(&std::fs::read(path)?)?;
    ///
    ///     for (name, entry) in archive.entries() {
    ///         println!("{}: {} bytes", name, entry.raw_len());
    ///     }
    ///
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip_all, err, fields(size = bytes.len()))]
    pub fn read(bytes: &[u8]) -> Result<ModArchive> {
        let mut reader = Cursor::new(bytes);

        let mut tag = [0u8; 4];
        reader.read_exact(&mut tag).map_err(|_| Error::BadMagic)?;
        if tag != FORMAT_TAG {
            return Err(Error::BadMagic);
        }

        let format_version = reader
            .read_u32::<LittleEndian>()
            .map_err(|e| CorruptEntryError::Header(e.to_string()))?;
        if !(MIN_FORMAT_VERSION..=FORMAT_VERSION).contains(&format_version) {
            return Err(Error::UnsupportedVersion {
                found: format_version,
                supported: FORMAT_VERSION,
            });
        }

        let header = ModHeader::read_args(&mut reader, (format_version,))
            .map_err(|e| CorruptEntryError::Header(e.to_string()))?;
        let body = &bytes[reader.position() as usize..];
        debug!(
            format_version,
            signature = header.signature.len(),
            body = body.len(),
            "read header"
        );

        if codec::content_hash(body) != header.hash {
            return Err(CorruptEntryError::HashMismatch.into());
        }

        let mut body_reader = Cursor::new(body);
        let manifest = ModManifest::read(&mut body_reader)
            .map_err(|e| CorruptEntryError::Table(e.to_string()))?;
        let payload = &body[body_reader.position() as usize..];

        let entries = Self::read_entries(manifest.records, payload)?;
        if !entries.contains(MAIN_ENTRY) {
            return Err(Error::MissingMainEntry);
        }

        Ok(ModArchive {
            name: manifest.name.into_string(),
            mod_version: manifest.mod_version.into_string(),
            format_version,
            hash: header.hash,
            signature: header.signature,
            entries,
        })
    }

    fn read_entries(records: Vec<ModRecord>, payload: &[u8]) -> Result<EntryTable> {
        let mut entries = EntryTable::with_capacity(records.len());

        let mut offset = 0u64;
        for record in records {
            let raw_name = record.name.as_str();
            let name = normalize_name(raw_name)
                .ok_or_else(|| CorruptEntryError::InvalidName(raw_name.to_owned()))?;

            if record.stored_offset as u64 != offset {
                return Err(CorruptEntryError::OffsetMismatch {
                    name,
                    expected: offset,
                    found: record.stored_offset as u64,
                }
                .into());
            }

            let end = offset + record.stored_len as u64;
            let stored = payload
                .get(offset as usize..end as usize)
                .ok_or_else(|| CorruptEntryError::Truncated(name.clone()))?;

            trace!(
                name = %name,
                raw = record.raw_len,
                stored = record.stored_len,
                "reading entry"
            );
            let data = if record.is_compressed() {
                codec::decompress(stored, record.raw_len as u64)?
            } else {
                stored.to_vec()
            };

            entries.insert_stored(name, data, record.stored_len as u64);
            offset = end;
        }

        if offset != payload.len() as u64 {
            return Err(CorruptEntryError::TrailingPayload(payload.len() as u64 - offset).into());
        }

        Ok(entries)
    }
}
