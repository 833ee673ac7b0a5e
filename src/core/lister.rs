//! Filtering and partitioning of directory listings.
//!
//! [list_dir] reads a directory through [browse_dir], drops entries the active
//! [VisibilityFilter] rejects, then splits the rest into directories and files.
//! Each half is sorted on its own with the same comparator.

use crate::core::sort::SortMode;
use crate::core::{FileEntry, browse_dir};

use std::collections::HashSet;
use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Decides whether an entry shows up in the tree at all.
pub trait VisibilityFilter {
    fn is_visible(&self, entry: &FileEntry) -> bool;
}

impl<F> VisibilityFilter for F
where
    F: Fn(&FileEntry) -> bool,
{
    fn is_visible(&self, entry: &FileEntry) -> bool {
        self(entry)
    }
}

/// Shows everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowAll;

impl VisibilityFilter for ShowAll {
    fn is_visible(&self, _entry: &FileEntry) -> bool {
        true
    }
}

/// Config driven filter: hides dotfiles unless asked not to, always hides names on the
/// ignore list, and always shows names on the `always_show` list.
#[derive(Debug, Clone)]
pub struct HiddenFilter {
    show_hidden: bool,
    always_show: Arc<HashSet<OsString>>,
    ignore: Arc<HashSet<OsString>>,
}

impl HiddenFilter {
    pub fn new(
        show_hidden: bool,
        always_show: Arc<HashSet<OsString>>,
        ignore: Arc<HashSet<OsString>>,
    ) -> Self {
        Self {
            show_hidden,
            always_show,
            ignore,
        }
    }
}

impl VisibilityFilter for HiddenFilter {
    fn is_visible(&self, entry: &FileEntry) -> bool {
        let name = entry.name();
        if self.always_show.contains(name) {
            return true;
        }
        if self.ignore.contains(name) {
            return false;
        }
        self.show_hidden || !entry.is_hidden()
    }
}

/// The immediate children of one directory, split and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub dirs: Vec<FileEntry>,
    pub files: Vec<FileEntry>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dirs.len() + self.files.len()
    }

    /// Builds a listing from already-read entries.
    pub fn from_entries(
        entries: Vec<FileEntry>,
        mode: SortMode,
        filter: &dyn VisibilityFilter,
    ) -> Self {
        let (mut dirs, mut files): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .filter(|e| filter.is_visible(e))
            .partition(FileEntry::is_dir);
        mode.sort(&mut dirs);
        mode.sort(&mut files);
        Listing { dirs, files }
    }
}

/// Lists, filters and partitions the immediate children of `path`.
pub fn list_dir(
    path: &Path,
    mode: SortMode,
    filter: &dyn VisibilityFilter,
) -> io::Result<Listing> {
    let entries = browse_dir(path)?;
    Ok(Listing::from_entries(entries, mode, filter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    #[test]
    fn empty_directory_gives_empty_listing() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = TempDir::new()?;
        let listing = list_dir(tmp.path(), SortMode::AlphabeticAsc, &ShowAll)?;
        assert!(listing.is_empty());
        assert_eq!(listing, Listing::default());
        Ok(())
    }

    #[test]
    fn partitions_and_sorts_each_half() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = TempDir::new()?;
        fs::create_dir(tmp.path().join("zeta"))?;
        fs::create_dir(tmp.path().join("alpha"))?;
        File::create(tmp.path().join("c.txt"))?;
        File::create(tmp.path().join("a.txt"))?;

        let listing = list_dir(tmp.path(), SortMode::AlphabeticDesc, &ShowAll)?;
        let dirs: Vec<_> = listing.dirs.iter().map(|e| e.name_str().into_owned()).collect();
        let files: Vec<_> = listing.files.iter().map(|e| e.name_str().into_owned()).collect();
        assert_eq!(dirs, ["zeta", "alpha"]);
        assert_eq!(files, ["c.txt", "a.txt"]);
        Ok(())
    }

    #[test]
    fn hidden_filter_rules() {
        let always: HashSet<OsString> = [OsString::from(".env")].into_iter().collect();
        let ignore: HashSet<OsString> = [OsString::from("target")].into_iter().collect();
        let filter = HiddenFilter::new(false, Arc::new(always), Arc::new(ignore));

        let hidden = FileEntry::new("/p/.cache".into(), FileEntry::IS_HIDDEN, 0, None);
        let env = FileEntry::new("/p/.env".into(), FileEntry::IS_HIDDEN, 0, None);
        let target = FileEntry::dir("/p/target");
        let src = FileEntry::dir("/p/src");

        assert!(!filter.is_visible(&hidden));
        assert!(filter.is_visible(&env));
        assert!(!filter.is_visible(&target));
        assert!(filter.is_visible(&src));
    }

    #[test]
    fn closures_work_as_filters() {
        let entries = vec![
            FileEntry::file("/p/keep.rs", 0, None),
            FileEntry::file("/p/drop.log", 0, None),
        ];
        let only_rs = |e: &FileEntry| e.extension_lowercase().as_deref() == Some("rs");
        let listing = Listing::from_entries(entries, SortMode::AlphabeticAsc, &only_rs);
        assert_eq!(listing.len(), 1);
        assert_eq!(listing.files[0].name_str(), "keep.rs");
    }
}
