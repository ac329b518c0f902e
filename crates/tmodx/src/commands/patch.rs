use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{fs::File, path::PathBuf};
use tmod::{collect_overlay, table::enclosed_path, ModWriter, ModWriterOptions};
use tracing::info;

#[derive(Args)]
pub struct PatchArgs {
    /// A source TMOD file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Directory whose files are added to or replace entries of the archive
    #[arg(short = 'p', long, value_name = "DIR")]
    folder: PathBuf,

    /// Where to write the patched archive, defaults to `<name>_patched.tmod`
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Compression level for all entries
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(0..=9))]
    level: u32,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl PatchArgs {
    pub fn handle(&self) -> Result<()> {
        if !self.folder.is_dir() {
            return Err(miette!("{} is not a directory", self.folder.display()));
        }

        let mut tmod = super::open(&self.file)?;

        let overlay = collect_overlay(&self.folder)
            .context(format!("collecting {}", self.folder.display()))?;
        if overlay.is_empty() {
            return Err(miette!("directory is empty"));
        }

        let summary = tmod.merge(overlay).context("merging directory")?;
        info!(
            "{} entries added, {} replaced",
            summary.added, summary.replaced
        );

        let output = match &self.output {
            Some(output) => output.clone(),
            None => patched_file_name(tmod.name())?,
        };
        info!("creating {}", output.display());

        let out = if !self.overwrite {
            File::create_new(&output)
                .into_diagnostic()
                .context(format!("creating {}", output.display()))?
        } else {
            File::create(&output)
                .into_diagnostic()
                .context(format!("creating {}", output.display()))?
        };

        ModWriter::new(ModWriterOptions::builder().level(self.level).build())
            .write_to(&tmod, out)
            .context("finalizing tmod file")?;

        Ok(())
    }
}

/// `<name>_patched.tmod` in the current directory
fn patched_file_name(name: &str) -> Result<PathBuf> {
    enclosed_path(name)
        .filter(|path| path.components().count() == 1)
        .map(|path| {
            let mut file_name = path.into_os_string();
            file_name.push("_patched.tmod");
            PathBuf::from(file_name)
        })
        .ok_or(miette!("archive name {name:?} is not a usable file name"))
}
