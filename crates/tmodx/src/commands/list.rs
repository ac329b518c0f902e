use clap::Args;
use miette::Result;
use owo_colors::{OwoColorize, Stream};
use std::path::PathBuf;

#[derive(Args)]
pub struct ListArgs {
    /// An input TMOD file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let tmod = super::open(&self.file)?;

        println!(
            "{} {} ({} entries, format version {})",
            tmod.name()
                .if_supports_color(Stream::Stdout, |t| t.bold()),
            tmod.mod_version(),
            tmod.len(),
            tmod.format_version()
        );

        for (name, entry) in tmod.entries() {
            let stored = entry.stored_len().unwrap_or(entry.raw_len());
            let marker = if entry.is_compressed().unwrap_or(false) {
                "deflate"
            } else {
                "stored"
            };

            println!(
                "{:>10} {:>10} {:<7} {}",
                entry.raw_len(),
                stored,
                marker.if_supports_color(Stream::Stdout, |t| t.dimmed()),
                name.if_supports_color(Stream::Stdout, |t| t.green())
            );
        }

        if let Some(total) = tmod.decompressed_size() {
            println!("{total:>10} total");
        }

        Ok(())
    }
}
