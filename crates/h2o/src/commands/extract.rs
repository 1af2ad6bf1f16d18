use clap::Args;
use h2o_archive::{
    compression::Blast,
    extract::{DirectoryWriter, ExtractOptions},
    read::read_archive,
};
use miette::{miette, Context, IntoDiagnostic, Result};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args)]
pub struct ExtractArgs {
    /// An input H2O file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Name of the folder created inside the target, defaults to the file name without extension
    #[arg(short, long)]
    name: Option<String>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let name = match &self.name {
            Some(name) => name.clone(),
            None => self
                .file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .ok_or(miette!("unable to create file stem for {}", self.file.display()))?,
        };

        let buffer = std::fs::read(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let data = read_archive(name, &buffer, &Blast)
            .context(format!("decoding {}", &self.file.display()))?;

        if !data.unused_files.is_empty() {
            warn!("{} files have no data and will not be written", data.unused_files.len());
        }

        let writer = DirectoryWriter::new(
            &self.directory,
            ExtractOptions::builder().overwrite(self.overwrite).build(),
        );
        let out = writer
            .write(&data)
            .context(format!("writing to {}", &self.directory.display()))?;

        info!("extracted {} files to {}", data.file_count() - data.unused_files.len(), out.display());
        Ok(())
    }
}
