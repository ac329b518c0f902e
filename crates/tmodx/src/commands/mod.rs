use miette::{miette, Context, IntoDiagnostic, Result};
use std::path::Path;
use tmod::ModArchive;

pub mod dump;
pub mod list;
pub mod patch;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Write the entries of a TMOD file into a directory named after the mod
    Dump(dump::DumpArgs),
    /// List the entries of a TMOD file
    List(list::ListArgs),
    /// Merge a directory into a TMOD file, writing a patched copy
    Patch(patch::PatchArgs),
}

impl Commands {
    pub fn handle(&self) -> Result<()> {
        match self {
            Commands::Dump(dump) => dump.handle(),
            Commands::List(list) => list.handle(),
            Commands::Patch(patch) => patch.handle(),
        }
    }
}

/// Load a whole archive from disk
pub(crate) fn open(path: &Path) -> Result<ModArchive> {
    if !path.is_file() {
        return Err(miette!("{} is not a file", path.display()));
    }

    let bytes = std::fs::read(path)
        .into_diagnostic()
        .context(format!("reading {}", path.display()))?;

    ModArchive::read(&bytes).context(format!("parsing {}", path.display()))
}
