use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::{ExplorerError, Result};
use crate::file_types::{extension_of, file_stem};
use crate::models::{NodeKind, StorageEntry};

/// Name of the folder, under the vault root, that receives trashed entries
pub const TRASH_DIR: &str = ".trash";

/// The host's file and folder namespace.
///
/// The explorer reads and mutates the vault only through this trait. Paths
/// are vault-relative and `/`-separated; the root folder is `""`. Handles are
/// opaque to the explorer and only passed back into the storage.
pub trait Storage {
    type Handle: Clone + std::fmt::Debug + PartialEq;

    /// Handle of the root folder
    fn root(&self) -> Self::Handle;

    /// Lists the direct children of a folder, in no particular order.
    fn list_children(&self, folder: &Self::Handle) -> Result<Vec<StorageEntry<Self::Handle>>>;

    fn read_text(&self, file: &Self::Handle) -> Result<String>;

    /// Moves the entry behind `handle` to `new_path`. Fails if the target exists.
    fn rename(&self, handle: &Self::Handle, new_path: &str) -> Result<()>;

    fn create_folder(&self, path: &str) -> Result<()>;

    /// Creates a new file. Fails if the path is already taken.
    fn create_file(&self, path: &str, content: &str) -> Result<()>;

    /// Copies a file's bytes to `new_path`. Fails if the target exists.
    fn copy(&self, file: &Self::Handle, new_path: &str) -> Result<()>;

    /// Deletes an entry with move-to-trash semantics.
    fn trash(&self, handle: &Self::Handle) -> Result<()>;

    fn exists(&self, path: &str) -> bool;
}

/// Validates a single path component.
///
/// Rejects empty names, `.` and `..`, names containing `/` or `\`, and
/// hidden names starting with `.`, which the vault never lists.
pub fn validate_name(name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(ExplorerError::InvalidName("name is empty".to_string()));
    }
    if name == "." || name == ".." {
        return Err(ExplorerError::InvalidName(format!(
            "'{}' is not a valid name",
            name
        )));
    }
    if name.contains('/') {
        return Err(ExplorerError::InvalidName(format!(
            "'{}' contains invalid separator '/'",
            name
        )));
    }
    if name.contains('\\') {
        return Err(ExplorerError::InvalidName(format!(
            "'{}' contains invalid separator '\\'",
            name
        )));
    }
    if name.starts_with('.') {
        return Err(ExplorerError::InvalidName(format!(
            "'{}' starts with '.' and would be hidden",
            name
        )));
    }
    Ok(name)
}

/// Joins a folder path and an entry name. The root folder is `""`.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Parent folder of a vault path, `""` for root-level entries
pub fn parent_path(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

/// Last component of a vault path
pub fn base_name(path: &str) -> &str {
    path.rsplit_once('/').map(|(_, name)| name).unwrap_or(path)
}

/// Whether `path` equals `ancestor` or lies beneath it
pub fn is_within(path: &str, ancestor: &str) -> bool {
    path == ancestor
        || (path.len() > ancestor.len()
            && path.starts_with(ancestor)
            && path.as_bytes()[ancestor.len()] == b'/')
}

/// A vault backed by a directory on the local disk.
///
/// Hidden entries (names starting with `.`) are never listed, which keeps
/// the trash folder and host settings folders out of the tree.
#[derive(Debug, Clone)]
pub struct LocalVault {
    /// Vault root directory
    pub root_dir: PathBuf,
    /// Directory receiving trashed entries (`.trash/`)
    pub trash_dir: PathBuf,
}

impl LocalVault {
    pub fn new(root_dir: &Path) -> Self {
        let root_dir = root_dir.to_path_buf();
        let trash_dir = root_dir.join(TRASH_DIR);
        Self { root_dir, trash_dir }
    }

    /// Creates the root directory if it does not exist yet.
    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root_dir)
            .map_err(|e| ExplorerError::mutation("create", "", e))
    }

    /// Resolves a vault path to a location on disk, validating every component.
    pub fn resolve(&self, path: &str) -> Result<PathBuf> {
        let mut resolved = self.root_dir.clone();
        if path.is_empty() {
            return Ok(resolved);
        }
        for component in path.split('/') {
            resolved.push(validate_name(component)?);
        }
        Ok(resolved)
    }

    /// Vault path of a handle, for messages
    pub fn relative(&self, handle: &Path) -> String {
        handle
            .strip_prefix(&self.root_dir)
            .map(|p| {
                p.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_else(|_| handle.to_string_lossy().into_owned())
    }

    /// Picks a free name inside the trash folder.
    ///
    /// On collision a timestamp is suffixed, then a counter after it until
    /// the name is free.
    fn trash_target(&self, name: &str) -> PathBuf {
        let target = self.trash_dir.join(name);
        if !target.exists() {
            return target;
        }
        let timestamp = Local::now().format("%Y%m%d%H%M%S%3f").to_string();
        let (stem, ext) = match extension_of(name) {
            Some(_) => (file_stem(name), &name[file_stem(name).len()..]),
            None => (name, ""),
        };
        let mut counter = 1usize;
        loop {
            let suffix = if counter == 1 {
                timestamp.clone()
            } else {
                format!("{}-{}", timestamp, counter)
            };
            let candidate = self.trash_dir.join(format!("{}-{}{}", stem, suffix, ext));
            if !candidate.exists() {
                return candidate;
            }
            counter += 1;
        }
    }
}

impl Storage for LocalVault {
    type Handle = PathBuf;

    fn root(&self) -> PathBuf {
        self.root_dir.clone()
    }

    fn list_children(&self, folder: &PathBuf) -> Result<Vec<StorageEntry<PathBuf>>> {
        let rel = self.relative(folder);
        let read_dir = fs::read_dir(folder).map_err(|e| ExplorerError::read(&rel, e))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry in '{}': {}", rel, e);
                    continue;
                }
            };
            let Ok(name) = entry.file_name().into_string() else {
                log::warn!("Skipping non UTF-8 entry in '{}'", rel);
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let path = entry.path();
            // Follows symlinks so a linked folder lists as a folder.
            let kind = match fs::metadata(&path) {
                Ok(meta) if meta.is_dir() => NodeKind::Folder,
                Ok(meta) if meta.is_file() => NodeKind::File,
                Ok(_) => continue,
                Err(e) => {
                    log::warn!("Skipping '{}': {}", join_path(&rel, &name), e);
                    continue;
                }
            };
            entries.push(StorageEntry {
                name,
                kind,
                handle: path,
            });
        }
        Ok(entries)
    }

    fn read_text(&self, file: &PathBuf) -> Result<String> {
        fs::read_to_string(file).map_err(|e| ExplorerError::read(self.relative(file), e))
    }

    fn rename(&self, handle: &PathBuf, new_path: &str) -> Result<()> {
        let from = self.relative(handle);
        let target = self.resolve(new_path)?;
        if target.exists() {
            return Err(ExplorerError::mutation(
                "rename",
                &from,
                format!("'{}' already exists", new_path),
            ));
        }
        fs::rename(handle, &target).map_err(|e| ExplorerError::mutation("rename", &from, e))?;
        log::info!("Renamed '{}' to '{}'", from, new_path);
        Ok(())
    }

    fn create_folder(&self, path: &str) -> Result<()> {
        let target = self.resolve(path)?;
        fs::create_dir(&target).map_err(|e| ExplorerError::mutation("create folder", path, e))?;
        log::info!("Created folder '{}'", path);
        Ok(())
    }

    fn create_file(&self, path: &str, content: &str) -> Result<()> {
        use std::io::Write;

        let target = self.resolve(path)?;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .map_err(|e| ExplorerError::mutation("create file", path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| ExplorerError::mutation("create file", path, e))?;
        log::info!("Created file '{}'", path);
        Ok(())
    }

    fn copy(&self, file: &PathBuf, new_path: &str) -> Result<()> {
        let from = self.relative(file);
        let target = self.resolve(new_path)?;
        let mut source = fs::File::open(file).map_err(|e| ExplorerError::read(&from, e))?;
        let mut dest = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .map_err(|e| ExplorerError::mutation("copy", &from, e))?;
        std::io::copy(&mut source, &mut dest).map_err(|e| ExplorerError::mutation("copy", &from, e))?;
        log::info!("Copied '{}' to '{}'", from, new_path);
        Ok(())
    }

    fn trash(&self, handle: &PathBuf) -> Result<()> {
        let rel = self.relative(handle);
        if *handle == self.root_dir {
            return Err(ExplorerError::mutation("delete", &rel, "the vault root cannot be deleted"));
        }
        let name = handle
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ExplorerError::mutation("delete", &rel, "entry has no name"))?;

        fs::create_dir_all(&self.trash_dir)
            .map_err(|e| ExplorerError::mutation("delete", &rel, e))?;
        let target = self.trash_target(&name);
        fs::rename(handle, &target).map_err(|e| ExplorerError::mutation("delete", &rel, e))?;
        log::info!("Moved '{}' to trash", rel);
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.exists()).unwrap_or(false)
    }
}
