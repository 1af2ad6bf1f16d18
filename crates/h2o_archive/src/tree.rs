//! The folder and file tree an archive decodes into

use tracing::{info, warn};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::names::NameTable;
use crate::types::{FileEntry, FolderRef, NameRef, ParentRef};

/// Where a file ended up once the tree was assembled
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Placement {
    /// Directly inside the archive directory
    TopLevel,

    /// Inside the folder at this index
    Folder(usize),

    /// Not written anywhere, kept for diagnostics
    Unused,
}

/// A file recovered from an archive
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ArchivedFile {
    pub id: i32,

    /// Name from the file name table, or a placeholder when the entry has none
    pub name: String,

    pub placement: Placement,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub contents: Option<Vec<u8>>,
}

/// A folder and the files stored in it
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FolderNode {
    /// Name of the folder, nested folders carry their full `\` separated path
    pub name: String,

    pub parent: ParentRef,

    pub files: Vec<ArchivedFile>,
}

/// Everything recovered from an archive
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ArchivedData {
    /// Name of the directory the archive extracts into
    pub name: String,

    pub folders: Vec<FolderNode>,

    pub top_level_files: Vec<ArchivedFile>,

    /// Files without recoverable data
    pub unused_files: Vec<ArchivedFile>,
}

impl ArchivedData {
    /// Total number of files, including the unused ones
    pub fn file_count(&self) -> usize {
        self.folders.iter().map(|f| f.files.len()).sum::<usize>()
            + self.top_level_files.len()
            + self.unused_files.len()
    }
}

/// Name given to entries that have no usable file name
pub fn placeholder_name(id: i32) -> String {
    format!("UNUSED_{id}")
}

fn resolve_name(entry: &FileEntry, file_names: &NameTable) -> String {
    let name = match entry.name() {
        NameRef::Index(index) => file_names.by_index(index),
        NameRef::Unnamed(_) => None,
    };

    match name {
        Some(name) => name.to_owned(),
        None => {
            info!(
                file_id = entry.file_id,
                index = entry.file_name_index,
                "file has no name, using a placeholder"
            );
            placeholder_name(entry.file_id)
        }
    }
}

/// Combine the decoded tables into the final tree.
///
/// Files without contents are always unused. Everything else goes to the
/// top level or to its folder, keeping table order within each list. A
/// folder index that points nowhere also sends the file to the unused list.
pub fn assemble(
    name: String,
    entries: Vec<FileEntry>,
    contents: Vec<Option<Vec<u8>>>,
    folder_names: NameTable,
    file_names: NameTable,
    parents: Vec<ParentRef>,
) -> ArchivedData {
    if folder_names.len() != parents.len() {
        warn!(
            names = folder_names.len(),
            parents = parents.len(),
            "folder name and parent counts differ"
        );
    }

    let mut parents = parents.into_iter();
    let mut folders: Vec<FolderNode> = folder_names
        .into_iter()
        .map(|name| FolderNode {
            name,
            parent: parents.next().unwrap_or(ParentRef::Root),
            files: Vec::new(),
        })
        .collect();

    let mut top_level_files = Vec::new();
    let mut unused_files = Vec::new();

    for (entry, contents) in entries.iter().zip(contents) {
        let name = resolve_name(entry, &file_names);
        let placement = match (&contents, entry.folder()) {
            (None, _) => Placement::Unused,
            (Some(_), FolderRef::TopLevel) => Placement::TopLevel,
            (Some(_), FolderRef::Folder(index)) if index < folders.len() => {
                Placement::Folder(index)
            }
            (Some(_), folder) => {
                warn!(
                    file_id = entry.file_id,
                    ?folder,
                    "file points to a folder that does not exist"
                );
                Placement::Unused
            }
        };

        let file = ArchivedFile {
            id: entry.file_id,
            name,
            placement,
            contents,
        };

        match placement {
            Placement::TopLevel => top_level_files.push(file),
            Placement::Folder(index) => folders[index].files.push(file),
            Placement::Unused => unused_files.push(file),
        }
    }

    ArchivedData {
        name,
        folders,
        top_level_files,
        unused_files,
    }
}
