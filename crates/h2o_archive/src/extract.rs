//! Writing a decoded archive to disk

use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use bon::Builder;
use tracing::{info, instrument};

use crate::error::{Error, Result};
use crate::tree::{ArchivedData, ArchivedFile};

/// Options for how the archive should be written
#[derive(Debug, Clone, Copy, Default, Builder)]
pub struct ExtractOptions {
    /// Replace files that already exist instead of failing
    #[builder(default)]
    pub overwrite: bool,
}

/// Writes an [`ArchivedData`] into a directory
///
/// ```no_run
/// # fn doit(data: &h2o_archive::tree::ArchivedData) -> h2o_archive::error::Result<()> {
/// use h2o_archive::extract::{DirectoryWriter, ExtractOptions};
///
/// let writer = DirectoryWriter::new("out", ExtractOptions::builder().overwrite(true).build());
/// writer.write(data)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryWriter {
    root: PathBuf,
    options: ExtractOptions,
}

impl DirectoryWriter {
    pub fn new(root: impl Into<PathBuf>, options: ExtractOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    /// Create `<root>/<archive name>`, write the top level files into it and
    /// every folder below it. Unused files are skipped.
    ///
    /// Returns the directory the archive was written to.
    #[instrument(skip_all, fields(name = %data.name), err)]
    pub fn write(&self, data: &ArchivedData) -> Result<PathBuf> {
        let base = self.root.join(relative_path(&data.name)?);
        fs::create_dir_all(&base)?;

        for file in &data.top_level_files {
            self.write_file(&base, file)?;
        }

        for folder in &data.folders {
            let dir = base.join(relative_path(&folder.name)?);
            fs::create_dir_all(&dir)?;

            for file in &folder.files {
                self.write_file(&dir, file)?;
            }
        }

        Ok(base)
    }

    fn write_file(&self, dir: &Path, file: &ArchivedFile) -> Result<()> {
        let Some(contents) = &file.contents else {
            return Ok(());
        };

        let path = dir.join(relative_path(&file.name)?);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        info!("writing {}", path.display());

        let mut out = if self.options.overwrite {
            File::create(&path)?
        } else {
            File::create_new(&path)?
        };
        out.write_all(contents)?;

        Ok(())
    }
}

/// Turn an archive name using `\` separators into a relative path,
/// refusing anything that would leave the output directory.
pub(crate) fn relative_path(name: &str) -> Result<PathBuf> {
    let path: PathBuf = name
        .split(['\\', '/'])
        .filter(|part| !part.is_empty())
        .collect();

    let safe = !path.as_os_str().is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
    if !safe {
        return Err(Error::UnsafePath(name.to_owned()));
    }

    Ok(path)
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use crate::error::Error;
    use crate::extract::relative_path;

    #[test]
    fn backslashes_become_components() {
        assert_eq!(
            relative_path("Example\\Child One").unwrap(),
            PathBuf::from("Example").join("Child One")
        );
    }

    #[test]
    fn parent_components_are_refused() {
        assert!(matches!(
            relative_path("..\\..\\etc"),
            Err(Error::UnsafePath(_))
        ));
        assert!(matches!(relative_path(""), Err(Error::UnsafePath(_))));
    }

    #[test]
    fn leading_separators_are_dropped() {
        assert_eq!(
            relative_path("\\Example").unwrap(),
            PathBuf::from("Example")
        );
    }
}
