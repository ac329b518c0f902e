use miette::{IntoDiagnostic, Result};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tmod::{collect_overlay, ModArchive, MAIN_ENTRY};
use tracing::info;
use tracing_test::traced_test;

fn write_file(root: &Path, relative: &str, data: &[u8]) -> Result<()> {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).into_diagnostic()?;
    fs::write(path, data).into_diagnostic()
}

#[traced_test]
#[test]
fn collect_overlay_from_directory() -> Result<()> {
    let dir = tempfile::tempdir().into_diagnostic()?;
    write_file(dir.path(), "Windows.dll", b"patched")?;
    write_file(dir.path(), "Content/Images/icon.png", b"icon")?;
    write_file(dir.path(), "Content/a.txt", b"a")?;
    write_file(dir.path(), "Info", b"info")?;

    let overlay = collect_overlay(dir.path())?;
    let names = overlay
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>();

    // Directories first, then files, both sorted by name
    assert_eq!(
        names,
        [
            "Content/Images/icon.png",
            "Content/a.txt",
            "Info",
            "Windows.dll"
        ]
    );
    assert_eq!(overlay[3].1, b"patched");

    Ok(())
}

#[test]
fn collect_overlay_from_missing_directory() -> Result<()> {
    let dir = tempfile::tempdir().into_diagnostic()?;

    assert!(collect_overlay(dir.path().join("missing")).is_err());

    Ok(())
}

#[cfg(unix)]
#[test]
fn collect_overlay_follows_linked_directory() -> Result<()> {
    let dir = tempfile::tempdir().into_diagnostic()?;
    let shared = tempfile::tempdir().into_diagnostic()?;
    write_file(dir.path(), "Info", b"info")?;
    write_file(shared.path(), "icon.png", b"icon")?;
    std::os::unix::fs::symlink(shared.path(), dir.path().join("Shared")).into_diagnostic()?;

    let overlay = collect_overlay(dir.path())?;

    assert_eq!(
        overlay,
        [
            ("Shared/icon.png".to_owned(), b"icon".to_vec()),
            ("Info".to_owned(), b"info".to_vec())
        ]
    );

    Ok(())
}

#[traced_test]
#[test]
fn patch_archive_from_directory() -> Result<()> {
    let mut archive = ModArchive::new("ExampleMod");
    archive.replace_or_insert(MAIN_ENTRY, b"original".to_vec())?;
    archive.replace_or_insert("Info", b"info".to_vec())?;
    archive.set_signature(vec![0x5A; 8]);
    let original = archive.write()?;

    let dir = tempfile::tempdir().into_diagnostic()?;
    write_file(dir.path(), "Windows.dll", b"patched")?;
    write_file(dir.path(), "Content/new.png", b"new")?;

    let mut loaded = ModArchive::read(&original)?;
    let summary = loaded.merge(collect_overlay(dir.path())?)?;
    assert_eq!(summary.added, 1);
    assert_eq!(summary.replaced, 1);

    let patched = dir.path().join(format!("{}_patched.tmod", loaded.name()));
    fs::write(&patched, loaded.write()?).into_diagnostic()?;
    info!("wrote {}", patched.display());

    let reread = ModArchive::read(&fs::read(&patched).into_diagnostic()?)?;
    assert_eq!(
        reread.entries().names().collect::<Vec<_>>(),
        [MAIN_ENTRY, "Info", "Content/new.png"]
    );
    assert_eq!(reread.main_entry()?, b"patched");
    assert_eq!(reread.by_name("Info")?, b"info");
    assert_eq!(reread.signature(), &[0x5A; 8][..]);
    assert_eq!(reread.name(), "ExampleMod");

    Ok(())
}
