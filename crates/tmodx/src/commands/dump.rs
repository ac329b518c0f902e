use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};
use tmod::{table::enclosed_path, MAIN_ENTRY};
use tracing::{info, warn};

#[derive(Args)]
pub struct DumpArgs {
    /// An input TMOD file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Directory to create the mod's directory in
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    directory: PathBuf,

    /// Only write the main assembly
    #[arg(long, default_value_t = false)]
    dll_only: bool,

    /// Replace the mod's directory if it already exists
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl DumpArgs {
    pub fn handle(&self) -> Result<()> {
        let tmod = super::open(&self.file)?;

        let target = self.directory.join(
            enclosed_path(tmod.name())
                .ok_or(miette!("archive name {:?} is not a usable directory name", tmod.name()))?,
        );

        if target.exists() {
            if !self.overwrite {
                return Err(miette!(
                    "{} already exists, pass --overwrite to replace it",
                    target.display()
                ));
            }
            std::fs::remove_dir_all(&target)
                .into_diagnostic()
                .context(format!("removing {}", target.display()))?;
        }
        std::fs::create_dir_all(&target)
            .into_diagnostic()
            .context(format!("creating {}", target.display()))?;

        if self.dll_only {
            let p = target.join(MAIN_ENTRY);
            info!("writing {}", p.display());
            return write_new(&p, tmod.main_entry()?);
        }

        for (name, entry) in tmod.entries() {
            let Some(relative) = enclosed_path(name) else {
                warn!("skipping {name}, it would be written outside of {}", target.display());
                continue;
            };

            let p = target.join(relative);
            info!("writing {}", p.display());

            if let Some(parent) = p.parent() {
                std::fs::create_dir_all(parent)
                    .into_diagnostic()
                    .context(format!("creating {}", parent.display()))?;
            }
            write_new(&p, entry.data())?;
        }

        Ok(())
    }
}

fn write_new(p: &Path, data: &[u8]) -> Result<()> {
    File::create_new(p)
        .into_diagnostic()
        .context(format!("creating {}", p.display()))?
        .write_all(data)
        .into_diagnostic()
        .context(format!("writing {}", p.display()))
}
