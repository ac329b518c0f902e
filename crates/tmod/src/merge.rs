//! Applying overlays of files onto an archive

use tracing::{debug, info, instrument};

use crate::archive::ModArchive;
use crate::error::{Error, Result};
use crate::table::normalize_name;

/// Counts of what a merge changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Entries that did not exist before
    pub added: usize,

    /// Existing entries whose data was replaced
    pub replaced: usize,
}

impl ModArchive {
    /// Apply an overlay of `(logical name, data)` pairs to this archive
    ///
    /// Existing entries are replaced in place, new ones are appended in overlay order. When a name
    /// appears more than once the last pair wins. Every name is validated before anything is
    /// applied, so an invalid name leaves the archive untouched.
    ///
    /// The archive name and signature are never changed by a merge.
    #[instrument(skip_all, err, fields(archive = %self.name))]
    pub fn merge<I, N, D>(&mut self, overlay: I) -> Result<MergeSummary>
    where
        I: IntoIterator<Item = (N, D)>,
        N: AsRef<str>,
        D: Into<Vec<u8>>,
    {
        let overlay = overlay
            .into_iter()
            .map(|(name, data)| {
                let name = name.as_ref();
                normalize_name(name)
                    .map(|normalized| (normalized, data))
                    .ok_or_else(|| Error::InvalidName(name.to_owned()))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut summary = MergeSummary::default();
        for (name, data) in overlay {
            if self.entries.replace_or_insert(&name, data)?.is_some() {
                debug!(name = %name, "replaced entry");
                summary.replaced += 1;
            } else {
                debug!(name = %name, "added entry");
                summary.added += 1;
            }
        }

        info!(
            added = summary.added,
            replaced = summary.replaced,
            "merged overlay"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use crate::error::{Error, Result};
    use crate::merge::MergeSummary;
    use crate::{ModArchive, MAIN_ENTRY};

    fn archive() -> Result<ModArchive> {
        let mut archive = ModArchive::new("Example");
        archive.replace_or_insert(MAIN_ENTRY, b"MZ".to_vec())?;
        archive.replace_or_insert("a.dll", b"Y".to_vec())?;
        archive.set_signature(vec![0x01; 4]);
        Ok(archive)
    }

    #[traced_test]
    #[test]
    fn merge_replaces_existing_entry() -> Result<()> {
        let mut archive = archive()?;

        let summary = archive.merge([("a.dll", b"X".to_vec())])?;

        assert_eq!(
            summary,
            MergeSummary {
                added: 0,
                replaced: 1
            }
        );
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.by_name("a.dll")?, b"X");
        assert_eq!(
            archive.entries().names().filter(|n| *n == "a.dll").count(),
            1
        );

        Ok(())
    }

    #[test]
    fn merge_appends_new_entry() -> Result<()> {
        let mut archive = archive()?;
        let before = archive.clone();

        archive.merge([("new/asset.png", b"Z".to_vec())])?;

        assert_eq!(archive.len(), before.len() + 1);
        assert_eq!(
            archive.entries().names().collect::<Vec<_>>(),
            [MAIN_ENTRY, "a.dll", "new/asset.png"]
        );
        for (name, entry) in before.entries() {
            assert_eq!(archive.by_name(name)?, entry.data());
        }

        Ok(())
    }

    #[test]
    fn merge_last_write_wins() -> Result<()> {
        let mut archive = archive()?;

        let summary = archive.merge(vec![
            ("b.txt".to_owned(), b"first".to_vec()),
            ("b.txt".to_owned(), b"second".to_vec()),
        ])?;

        assert_eq!(
            summary,
            MergeSummary {
                added: 1,
                replaced: 1
            }
        );
        assert_eq!(archive.by_name("b.txt")?, b"second");

        Ok(())
    }

    #[test]
    fn merge_keeps_name_and_signature() -> Result<()> {
        let mut archive = archive()?;

        archive.merge([(MAIN_ENTRY, b"MZ2".to_vec())])?;

        assert_eq!(archive.name(), "Example");
        assert_eq!(archive.signature(), &[0x01; 4][..]);

        Ok(())
    }

    #[test]
    fn merge_rejects_invalid_name_without_changes() -> Result<()> {
        let mut archive = archive()?;
        let before = archive.clone();

        let result = archive.merge([("c.txt", b"c".to_vec()), ("/", b"bad".to_vec())]);

        assert!(matches!(result, Err(Error::InvalidName(_))));
        assert_eq!(archive, before);

        Ok(())
    }

    #[test]
    fn merge_names_stay_unique() -> Result<()> {
        let mut archive = archive()?;

        archive.merge([("dir\\x.txt", b"1".to_vec()), ("dir/x.txt", b"2".to_vec())])?;
        archive.merge([("./dir/x.txt", b"3".to_vec()), ("a.dll", b"4".to_vec())])?;

        let mut names = archive.entries().names().collect::<Vec<_>>();
        let count = names.len();
        names.sort_unstable();
        names.dedup();

        assert_eq!(names.len(), count);
        assert_eq!(archive.by_name("dir/x.txt")?, b"3");

        Ok(())
    }
}
