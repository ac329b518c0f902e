//! Types for writing TMOD archives
//!

use binrw::BinWrite;
use bon::Builder;
use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use std::borrow::Cow;
use std::io::{Cursor, Seek, SeekFrom, Write};
use tracing::{debug, instrument};

use crate::archive::ModArchive;
use crate::codec;
use crate::error::{Error, Result};
use crate::table::MAIN_ENTRY;
use crate::types::{ModHeader, ModManifest, ModRecord, FORMAT_TAG, FORMAT_VERSION, HASH_OFFSET};

/// Options for how the TMOD file should be written
#[derive(Debug, Clone, Copy, Builder)]
pub struct ModWriterOptions {
    /// DEFLATE level from 0 to 9
    #[builder(default = 6)]
    pub level: u32,

    /// Entries smaller than this are stored without trying to compress them
    #[builder(default)]
    pub min_compress_size: usize,
}

impl Default for ModWriterOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// TMOD archive generator
///
/// ```
/// # fn doit() -> tmod::error::Result<()>
/// # {
/// use tmod::{ModArchive, ModWriter, ModWriterOptions, MAIN_ENTRY};
///
/// let mut archive = ModArchive::new("ExampleMod");
/// archive.replace_or_insert(MAIN_ENTRY, b"MZ".to_vec())?;
///
/// let writer = ModWriter::new(ModWriterOptions::builder().level(9).build());
///
/// // We use a buffer here, though you'd normally use a `File`
/// let mut buf = Vec::new();
/// writer.write_to(&archive, &mut buf)?;
///
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModWriter {
    options: ModWriterOptions,
}

impl ModWriter {
    /// Create a writer with the given options
    pub fn new(options: ModWriterOptions) -> ModWriter {
        ModWriter { options }
    }

    /// Serialize `archive` into the bytes of a TMOD file
    ///
    /// The archive itself is left untouched. Every call compresses the entries and computes the
    /// content hash from scratch, and always stamps [`FORMAT_VERSION`].
    #[instrument(skip_all, err, fields(archive = archive.name(), entries = archive.len()))]
    pub fn write(&self, archive: &ModArchive) -> Result<Vec<u8>> {
        if !archive.entries().contains(MAIN_ENTRY) {
            return Err(Error::MissingMainEntry);
        }

        let mut records = Vec::with_capacity(archive.len());
        let mut payloads = Vec::with_capacity(archive.len());

        let mut offset = 0u64;
        for (name, entry) in archive.entries() {
            let stored = self.store(entry.data())?;
            debug!(
                name,
                raw = entry.raw_len(),
                stored = stored.len(),
                "storing entry"
            );

            records.push(ModRecord {
                name: name.into(),
                raw_len: Self::fit(entry.raw_len(), name)?,
                stored_len: Self::fit(stored.len() as u64, name)?,
                stored_offset: Self::fit(offset, name)?,
            });

            offset += stored.len() as u64;
            payloads.push(stored);
        }

        let manifest = ModManifest {
            name: archive.name().into(),
            mod_version: archive.mod_version().into(),
            records,
        };

        let header = ModHeader {
            hash: Default::default(),
            signature: archive.signature().to_vec(),
        };

        let mut out = Cursor::new(Vec::with_capacity(offset as usize));
        out.write_all(&FORMAT_TAG)?;
        out.write_u32::<LittleEndian>(FORMAT_VERSION)?;
        header.write(&mut out)?;

        let body_start = out.position() as usize;
        manifest.write(&mut out)?;
        for payload in &payloads {
            out.write_all(payload)?;
        }

        let hash = codec::content_hash(&out.get_ref()[body_start..]);
        out.seek(SeekFrom::Start(HASH_OFFSET))?;
        out.write_all(&hash)?;

        Ok(out.into_inner())
    }

    /// Serialize `archive` and write it out to `writer`
    #[instrument(skip_all, err)]
    pub fn write_to<W: Write>(&self, archive: &ModArchive, mut writer: W) -> Result<()> {
        let bytes = self.write(archive)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    #[instrument(skip_all, level = "trace", fields(size = raw.len()))]
    fn store<'a>(&self, raw: &'a [u8]) -> Result<Cow<'a, [u8]>> {
        if raw.len() < self.options.min_compress_size {
            return Ok(Cow::Borrowed(raw));
        }

        let compressed = codec::compress(raw, Compression::new(self.options.level.min(9)))?;
        if codec::should_compress(raw.len() as u64, compressed.len() as u64) {
            Ok(Cow::Owned(compressed))
        } else {
            Ok(Cow::Borrowed(raw))
        }
    }

    fn fit(value: u64, name: &str) -> Result<u32> {
        u32::try_from(value)
            .map_err(|_| Error::CustomError(format!("entry {name} is too large for a tmod archive")))
    }
}

impl ModArchive {
    /// Serialize this archive with the default [`ModWriterOptions`]
    pub fn write(&self) -> Result<Vec<u8>> {
        ModWriter::default().write(self)
    }
}
