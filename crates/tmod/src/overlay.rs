//! Collecting overlays from a directory tree

use std::path::{Component, Path};
use tracing::{instrument, trace};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Walk `root` and pair every file with its logical name
///
/// Logical names are the paths relative to `root` joined with `/`, whatever the platform
/// separator is. Within a directory, subdirectories are visited before files and both are sorted
/// by name, so the result does not depend on the filesystem's listing order. Symbolic links are
/// followed.
#[instrument(skip_all, err, fields(root = %root.as_ref().display()))]
pub fn collect_overlay(root: impl AsRef<Path>) -> Result<Vec<(String, Vec<u8>)>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(Error::CustomError(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let walker = WalkDir::new(root).follow_links(true).sort_by(|a, b| {
        b.file_type()
            .is_dir()
            .cmp(&a.file_type().is_dir())
            .then_with(|| a.file_name().cmp(b.file_name()))
    });

    let mut overlay = Vec::new();
    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| Error::CustomError(e.to_string()))?;
        let name = logical_name(relative)?;
        trace!(name = %name, "collected");

        overlay.push((name, std::fs::read(entry.path())?));
    }

    Ok(overlay)
}

fn logical_name(relative: &Path) -> Result<String> {
    let parts = relative
        .components()
        .map(|component| match component {
            Component::Normal(part) => part
                .to_str()
                .ok_or_else(|| Error::InvalidName(relative.to_string_lossy().into_owned())),
            _ => Err(Error::InvalidName(
                relative.to_string_lossy().into_owned(),
            )),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(parts.join("/"))
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::path::Path;

    use crate::error::Result;
    use crate::overlay::logical_name;

    #[test]
    fn logical_name_uses_forward_slashes() -> Result<()> {
        let relative = Path::new("Content").join("Images").join("icon.png");

        assert_eq!(logical_name(&relative)?, "Content/Images/icon.png");

        Ok(())
    }

    #[test]
    fn logical_name_rejects_parent() {
        assert!(logical_name(Path::new("../icon.png")).is_err());
    }
}
