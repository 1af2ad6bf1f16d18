pub mod extract;
pub mod info;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Extract an H2O file into a directory
    Extract(extract::ExtractArgs),
    /// Print the header and tables of an H2O file as JSON
    Info(info::InfoArgs),
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Extract(extract) => extract.handle(),
            Commands::Info(info) => info.handle(),
        }
    }
}
