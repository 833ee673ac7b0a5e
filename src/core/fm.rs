//! Directory reading for treeline.
//!
//! Provides the [FileEntry] struct which every other part of the tree model consumes.
//! Entries are read-only snapshots of what the filesystem reported at listing time.

use crate::utils::with_lowered_stack;

use std::borrow::Cow;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A single entry in a directory listing.
/// Holds the absolute path, size, modification time and attribute flags.
/// Created and populated by the [browse_dir] function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    path: PathBuf,
    flags: u8,
    size: u64,
    modified: Option<SystemTime>,
}

impl FileEntry {
    // Flag bit definitions
    pub const IS_DIR: u8 = 1 << 0;
    pub const IS_HIDDEN: u8 = 1 << 1;
    pub const IS_SYMLINK: u8 = 1 << 2;
    pub const IS_BROKEN_SYM: u8 = 1 << 3;

    pub fn new(path: PathBuf, flags: u8, size: u64, modified: Option<SystemTime>) -> Self {
        FileEntry {
            path,
            flags,
            size,
            modified,
        }
    }

    /// Shorthand for a plain file entry, mostly useful when building listings by hand.
    pub fn file(path: impl Into<PathBuf>, size: u64, modified: Option<SystemTime>) -> Self {
        Self::new(path.into(), 0, size, modified)
    }

    /// Shorthand for a plain directory entry.
    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self::new(path.into(), Self::IS_DIR, 0, None)
    }

    // Accessors

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn name(&self) -> &OsStr {
        self.path.file_name().unwrap_or(self.path.as_os_str())
    }

    #[inline]
    pub fn name_str(&self) -> Cow<'_, str> {
        self.name().to_string_lossy()
    }

    #[inline(always)]
    pub fn flags(&self) -> u8 {
        self.flags
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Modification time, with unknown times treated as the UNIX epoch.
    #[inline]
    pub fn modified(&self) -> SystemTime {
        self.modified.unwrap_or(SystemTime::UNIX_EPOCH)
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.flags & Self::IS_DIR != 0
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.flags & Self::IS_HIDDEN != 0
    }

    #[inline]
    pub fn is_symlink(&self) -> bool {
        self.flags & Self::IS_SYMLINK != 0
    }

    #[inline]
    pub fn is_broken_sym(&self) -> bool {
        self.flags & Self::IS_BROKEN_SYM != 0
    }

    /// Lowercased extension, if the name has one that is not just a leading dot.
    pub fn extension_lowercase(&self) -> Option<String> {
        let name = self.name_str();
        let dot_idx = name.rfind('.')?;
        if dot_idx == 0 || dot_idx == name.len() - 1 {
            return None;
        }
        Some(with_lowered_stack(&name[dot_idx + 1..], |s| s.to_owned()))
    }
}

/// Reads the contents of the provided directory into a vector of [FileEntry].
///
/// The order of the returned entries is whatever the OS hands back; callers sort.
/// Entries whose metadata cannot be read are skipped rather than failing the listing.
pub fn browse_dir(path: &Path) -> io::Result<Vec<FileEntry>> {
    let mut entries = Vec::with_capacity(64);

    for entry in fs::read_dir(path)? {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        let ft = match entry.file_type() {
            Ok(ft) => ft,
            Err(_) => continue,
        };

        let mut flags = 0u8;
        if ft.is_dir() {
            flags |= FileEntry::IS_DIR;
        }
        if ft.is_symlink() {
            flags |= FileEntry::IS_SYMLINK;
        }

        // Follow symlinks so a link to a directory is listed and expanded as one
        let md_res = if ft.is_symlink() {
            fs::metadata(entry.path())
        } else {
            entry.metadata()
        };

        let (size, modified) = match md_res {
            Ok(md) => {
                if md.is_dir() {
                    flags |= FileEntry::IS_DIR;
                }
                let size = if md.is_dir() { 0 } else { md.len() };
                (size, md.modified().ok())
            }
            Err(_) => {
                if ft.is_symlink() {
                    flags |= FileEntry::IS_BROKEN_SYM;
                }
                (0, None)
            }
        };

        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            flags |= FileEntry::IS_HIDDEN;
        }

        entries.push(FileEntry::new(entry.path(), flags, size, modified));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn file_entry_flags() {
        let fe_file = FileEntry::file("/tmp/file.txt", 3, None);
        assert!(!fe_file.is_dir());
        assert_eq!(fe_file.name_str(), "file.txt");
        assert_eq!(fe_file.modified(), SystemTime::UNIX_EPOCH);

        let flags = FileEntry::IS_DIR | FileEntry::IS_HIDDEN;
        let fe_dir = FileEntry::new(PathBuf::from("/tmp/.hidden_folder"), flags, 0, None);
        assert!(fe_dir.is_dir());
        assert!(fe_dir.is_hidden());
        assert!(!fe_dir.is_symlink());
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(
            FileEntry::file("/p/foo.PNG", 0, None).extension_lowercase(),
            Some("png".to_string())
        );
        assert_eq!(FileEntry::file("/p/.bashrc", 0, None).extension_lowercase(), None);
        assert_eq!(FileEntry::file("/p/trailing.", 0, None).extension_lowercase(), None);
        assert_eq!(FileEntry::file("/p/Makefile", 0, None).extension_lowercase(), None);
    }

    #[test]
    fn browse_reads_size_and_kind() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = TempDir::new()?;
        let mut file = File::create(tmp.path().join("hello.txt"))?;
        write!(file, "abc123")?;
        fs::create_dir(tmp.path().join("sub"))?;
        File::create(tmp.path().join(".hidden"))?;

        let mut entries = browse_dir(tmp.path())?;
        entries.sort_by(|a, b| a.path().cmp(b.path()));

        assert_eq!(entries.len(), 3);
        let hidden = &entries[0];
        assert!(hidden.is_hidden());
        let hello = &entries[1];
        assert_eq!(hello.size(), 6);
        assert!(!hello.is_dir());
        assert!(hello.path().is_absolute());
        assert!(entries[2].is_dir());
        Ok(())
    }

    #[test]
    fn browse_nonexistent() {
        let result = browse_dir(Path::new("/path/does/not/exist"));
        assert!(result.is_err());
    }
}
