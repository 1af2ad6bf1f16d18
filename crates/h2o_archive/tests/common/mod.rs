#![allow(dead_code)]

/// The implode sample from the reference blast decoder, inflates to `AIAIAIAIAIAIA`
pub const IMPLODED: [u8; 8] = [0x00, 0x04, 0x82, 0x24, 0x25, 0x8F, 0x80, 0x7F];

pub const IMPLODED_RAW: &[u8] = b"AIAIAIAIAIAIA";

/// One file of a hand built archive
pub enum Payload {
    Stored(Vec<u8>),
    Compressed { data: Vec<u8>, raw_size: u32 },
    Unused,
}

pub struct Entry {
    pub folder: i32,
    pub name: i32,
    pub id: i32,
    pub payload: Payload,
}

/// Lays out an archive the way the game packs them
#[derive(Default)]
pub struct ArchiveBuilder {
    entries: Vec<Entry>,
    folders: Vec<(String, i32)>,
    files: Vec<String>,
    compressed_file_names: Option<(Vec<u8>, u32)>,
}

impl ArchiveBuilder {
    pub fn folder(mut self, name: &str, parent: i32) -> Self {
        self.folders.push((name.into(), parent));
        self
    }

    pub fn file_name(mut self, name: &str) -> Self {
        self.files.push(name.into());
        self
    }

    pub fn entry(mut self, folder: i32, name: i32, id: i32, payload: Payload) -> Self {
        self.entries.push(Entry {
            folder,
            name,
            id,
            payload,
        });
        self
    }

    /// Replace the file name block with `data`, declared to inflate to `raw_size` bytes
    pub fn compressed_file_names(mut self, data: Vec<u8>, raw_size: u32) -> Self {
        self.compressed_file_names = Some((data, raw_size));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"LIQDLH2O");
        out.extend_from_slice(&1.0f32.to_le_bytes());
        out.extend_from_slice(b"(c) test");
        out.push(0x1A);
        out.extend_from_slice(&6u32.to_le_bytes());
        out.extend_from_slice(&(self.entries.len() as u32).to_le_bytes());
        out.extend_from_slice(&0u64.to_le_bytes());
        out.extend_from_slice(&0u64.to_le_bytes());

        for entry in &self.entries {
            let (tag, raw, compressed, offset) = match &entry.payload {
                Payload::Stored(data) => (0u32, data.len() as u32, data.len() as u32, 1u64),
                Payload::Compressed { data, raw_size } => (2, *raw_size, data.len() as u32, 1),
                Payload::Unused => (2, 0, 0, 0),
            };
            out.extend_from_slice(&tag.to_le_bytes());
            out.extend_from_slice(&entry.folder.to_le_bytes());
            out.extend_from_slice(&entry.name.to_le_bytes());
            out.extend_from_slice(&entry.id.to_le_bytes());
            out.extend_from_slice(&raw.to_le_bytes());
            out.extend_from_slice(&compressed.to_le_bytes());
            out.extend_from_slice(&offset.to_le_bytes());
            out.extend_from_slice(&[0x00; 4]);
            out.extend_from_slice(&0i32.to_le_bytes());
        }

        let folder_names: Vec<&str> = self.folders.iter().map(|(n, _)| n.as_str()).collect();
        out.extend_from_slice(&name_block(&folder_names));

        match &self.compressed_file_names {
            Some((data, raw_size)) => {
                out.extend_from_slice(&(data.len() as u32).to_le_bytes());
                out.extend_from_slice(&raw_size.to_le_bytes());
                out.extend_from_slice(&[0x00; 4]);
                out.extend_from_slice(data);
            }
            None => {
                let file_names: Vec<&str> = self.files.iter().map(String::as_str).collect();
                out.extend_from_slice(&name_block(&file_names));
            }
        }

        out.extend_from_slice(&(self.folders.len() as u32).to_le_bytes());
        for (_, parent) in &self.folders {
            out.extend_from_slice(&parent.to_le_bytes());
        }

        for entry in &self.entries {
            match &entry.payload {
                Payload::Stored(data) => out.extend_from_slice(data),
                Payload::Compressed { data, raw_size } => {
                    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
                    out.extend_from_slice(&raw_size.to_le_bytes());
                    out.extend_from_slice(&[0x00; 4]);
                    out.extend_from_slice(data);
                }
                Payload::Unused => {}
            }
        }

        out.extend_from_slice(&0u32.to_le_bytes());
        out
    }
}

/// Body of a name block: count, size, then the UTF-16 names
pub fn name_body(names: &[&str]) -> Vec<u8> {
    let mut strings = Vec::new();
    for name in names {
        for rune in name.encode_utf16() {
            strings.extend_from_slice(&rune.to_le_bytes());
        }
        strings.extend_from_slice(&[0x00, 0x00]);
    }

    let mut out = Vec::new();
    out.extend_from_slice(&(names.len() as u32).to_le_bytes());
    out.extend_from_slice(&(strings.len() as u32).to_le_bytes());
    out.extend_from_slice(&strings);
    out
}

/// An uncompressed name block
pub fn name_block(names: &[&str]) -> Vec<u8> {
    let body = name_body(names);

    let mut out = Vec::new();
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(&[0x00; 4]);
    out.extend_from_slice(&body);
    out
}

/// A directory under the system temp dir that is removed on drop
pub struct TempDir(pub std::path::PathBuf);

impl TempDir {
    pub fn new(label: &str) -> Self {
        let path = std::env::temp_dir().join(format!("h2o-{}-{}", label, std::process::id()));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).unwrap();
        TempDir(path)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}
