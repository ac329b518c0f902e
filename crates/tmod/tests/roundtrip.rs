use pretty_assertions::assert_eq;
use rand::{rngs::StdRng, RngCore, SeedableRng};
use tmod::error::{CorruptEntryError, Error, Result};
use tmod::{ModArchive, MAIN_ENTRY};
use tracing::info;
use tracing_test::traced_test;

fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut data = vec![0u8; len];
    StdRng::seed_from_u64(seed).fill_bytes(&mut data);
    data
}

/// Repetitive text that deflates to well under half its size
fn assembly_like(len: usize) -> Vec<u8> {
    b"MZ\x90\x00 System.Runtime Terraria.ModLoader ModContent "
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

fn example_archive() -> Result<ModArchive> {
    let mut archive = ModArchive::new("ExampleMod");
    archive.set_mod_version("0.11.8.9");
    archive.replace_or_insert(MAIN_ENTRY, assembly_like(10_000))?;
    archive.replace_or_insert("icon.png", random_bytes(500, 1))?;
    archive.replace_or_insert("Info", b"displayName = Example Mod\n".to_vec())?;
    archive.replace_or_insert("Content/empty.txt", Vec::new())?;
    Ok(archive)
}

#[traced_test]
#[test]
fn roundtrip_preserves_entries_and_order() -> Result<()> {
    let archive = example_archive()?;

    let reread = ModArchive::read(&archive.write()?)?;

    assert_eq!(reread.name(), "ExampleMod");
    assert_eq!(reread.mod_version(), "0.11.8.9");
    assert_eq!(
        reread.entries().names().collect::<Vec<_>>(),
        archive.entries().names().collect::<Vec<_>>()
    );
    for (name, entry) in archive.entries() {
        info!("comparing {}", name);
        assert_eq!(reread.by_name(name)?, entry.data());
    }
    assert_eq!(reread.entries(), archive.entries());

    Ok(())
}

#[test]
fn compressible_main_and_incompressible_icon() -> Result<()> {
    let archive = example_archive()?;

    let reread = ModArchive::read(&archive.write()?)?;

    let main = reread.entries().get(MAIN_ENTRY).unwrap();
    assert_eq!(main.raw_len(), 10_000);
    assert_eq!(main.is_compressed(), Some(true));
    assert!(main.stored_len().unwrap() < 4_000);

    let icon = reread.entries().get("icon.png").unwrap();
    assert_eq!(icon.raw_len(), 500);
    assert_eq!(icon.stored_len(), Some(500));
    assert_eq!(icon.is_compressed(), Some(false));

    let empty = reread.entries().get("Content/empty.txt").unwrap();
    assert_eq!(empty.stored_len(), Some(0));

    Ok(())
}

#[test]
fn large_random_entry_is_stored_raw() -> Result<()> {
    let large = random_bytes(1_200_000, 2);

    let mut archive = ModArchive::new("Large");
    archive.replace_or_insert(MAIN_ENTRY, large.clone())?;

    let bytes = archive.write()?;
    let reread = ModArchive::read(&bytes)?;

    let main = reread.entries().get(MAIN_ENTRY).unwrap();
    assert_eq!(main.is_compressed(), Some(false));
    assert_eq!(reread.main_entry()?, &large[..]);

    Ok(())
}

#[test]
fn rewriting_a_read_archive_is_stable() -> Result<()> {
    let first = example_archive()?.write()?;

    let second = ModArchive::read(&first)?.write()?;

    assert_eq!(first, second);

    Ok(())
}

#[test]
fn flipping_any_body_byte_is_detected() -> Result<()> {
    let mut archive = ModArchive::new("Flip");
    archive.replace_or_insert(MAIN_ENTRY, assembly_like(256))?;
    archive.replace_or_insert("icon.png", random_bytes(64, 3))?;
    let bytes = archive.write()?;

    // Body starts after magic, version, hash and the empty signature length
    for position in 28..bytes.len() {
        let mut corrupted = bytes.clone();
        corrupted[position] ^= 0x01;

        let result = ModArchive::read(&corrupted);
        assert!(
            matches!(
                result,
                Err(Error::CorruptEntry(CorruptEntryError::HashMismatch))
            ),
            "byte {position} was not detected"
        );
    }

    Ok(())
}

#[test]
fn bad_magic_and_version() -> Result<()> {
    let bytes = example_archive()?.write()?;

    let mut bad_magic = bytes.clone();
    bad_magic[..4].copy_from_slice(b"TMOE");
    assert!(matches!(ModArchive::read(&bad_magic), Err(Error::BadMagic)));

    let mut future = bytes;
    future[4] = 0x09;
    assert!(matches!(
        ModArchive::read(&future),
        Err(Error::UnsupportedVersion { found: 9, .. })
    ));

    Ok(())
}

#[test]
fn from_reader_matches_read() -> Result<()> {
    let bytes = example_archive()?.write()?;

    let archive = ModArchive::from_reader(std::io::Cursor::new(&bytes))?;

    assert_eq!(archive, ModArchive::read(&bytes)?);

    Ok(())
}
