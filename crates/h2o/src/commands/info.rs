use clap::Args;
use h2o_archive::{
    compression::Blast,
    names::NameTable,
    read::H2oArchive,
    types::{ArchiveHeader, FileEntry, ParentRef},
};
use miette::{Context, IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args)]
pub struct InfoArgs {
    /// An input H2O file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Print the JSON on a single line
    #[arg(long, default_value_t = false)]
    compact: bool,
}

#[derive(Serialize)]
struct Summary<'a> {
    header: &'a ArchiveHeader,
    entries: &'a [FileEntry],
    folder_names: &'a NameTable,
    file_names: &'a NameTable,
    parents: &'a [ParentRef],
    unused: usize,
    trailer: u32,
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let buffer = std::fs::read(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let h2o = H2oArchive::decode(&buffer, &Blast)
            .context(format!("decoding {}", &self.file.display()))?;

        let summary = Summary {
            header: h2o.header(),
            entries: h2o.entries(),
            folder_names: h2o.folder_names(),
            file_names: h2o.file_names(),
            parents: h2o.parents(),
            unused: h2o.unused_count(),
            trailer: h2o.trailer(),
        };

        let json = if self.compact {
            serde_json::to_string(&summary)
        } else {
            serde_json::to_string_pretty(&summary)
        }
        .into_diagnostic()?;
        println!("{json}");

        Ok(())
    }
}
