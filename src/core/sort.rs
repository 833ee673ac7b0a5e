//! Ordering predicates for directory listings.
//!
//! Every [SortMode] maps to a comparator of the form "does `a` sort before `b`".
//! Ties on size or modification time are broken by name, in the same direction as the
//! primary key, so each comparator is a total order and repeated sorts are stable.

use crate::core::FileEntry;
use crate::error::TreeError;

use serde::Deserialize;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Comparator signature shared by all sort modes.
pub type Comparator = fn(&FileEntry, &FileEntry) -> bool;

const SORT_MODE_NAMES: &str =
    "alphabetic-asc, alphabetic-desc, size-asc, size-desc, mod-time-asc, mod-time-desc";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum SortMode {
    #[default]
    AlphabeticAsc,
    AlphabeticDesc,
    SizeAsc,
    SizeDesc,
    ModTimeAsc,
    ModTimeDesc,
}

impl SortMode {
    pub const ALL: [SortMode; 6] = [
        SortMode::AlphabeticAsc,
        SortMode::AlphabeticDesc,
        SortMode::SizeAsc,
        SortMode::SizeDesc,
        SortMode::ModTimeAsc,
        SortMode::ModTimeDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::AlphabeticAsc => "alphabetic-asc",
            SortMode::AlphabeticDesc => "alphabetic-desc",
            SortMode::SizeAsc => "size-asc",
            SortMode::SizeDesc => "size-desc",
            SortMode::ModTimeAsc => "mod-time-asc",
            SortMode::ModTimeDesc => "mod-time-desc",
        }
    }

    /// The "sorts before" predicate for this mode.
    pub fn comparator(&self) -> Comparator {
        match self {
            SortMode::AlphabeticAsc => alphabetic_asc,
            SortMode::AlphabeticDesc => alphabetic_desc,
            SortMode::SizeAsc => size_asc,
            SortMode::SizeDesc => size_desc,
            SortMode::ModTimeAsc => mod_time_asc,
            SortMode::ModTimeDesc => mod_time_desc,
        }
    }

    /// Sorts entries in place. The sort is stable.
    pub fn sort(&self, entries: &mut [FileEntry]) {
        let before = self.comparator();
        entries.sort_by(|a, b| ordering_from(before, a, b));
    }
}

/// Lifts a "sorts before" predicate into an [Ordering] for `sort_by`.
pub fn ordering_from(before: Comparator, a: &FileEntry, b: &FileEntry) -> Ordering {
    if before(a, b) {
        Ordering::Less
    } else if before(b, a) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

impl FromStr for SortMode {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('_', "-");
        SortMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| TreeError::Configuration {
                value: s.to_string(),
                expected: SORT_MODE_NAMES,
            })
    }
}

impl TryFrom<String> for SortMode {
    type Error = TreeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[inline]
fn by_name(a: &FileEntry, b: &FileEntry) -> Ordering {
    a.name().cmp(b.name())
}

fn alphabetic_asc(a: &FileEntry, b: &FileEntry) -> bool {
    by_name(a, b) == Ordering::Less
}

fn alphabetic_desc(a: &FileEntry, b: &FileEntry) -> bool {
    by_name(a, b) == Ordering::Greater
}

fn size_asc(a: &FileEntry, b: &FileEntry) -> bool {
    a.size().cmp(&b.size()).then_with(|| by_name(a, b)) == Ordering::Less
}

fn size_desc(a: &FileEntry, b: &FileEntry) -> bool {
    a.size().cmp(&b.size()).then_with(|| by_name(a, b)) == Ordering::Greater
}

fn mod_time_asc(a: &FileEntry, b: &FileEntry) -> bool {
    a.modified().cmp(&b.modified()).then_with(|| by_name(a, b)) == Ordering::Less
}

fn mod_time_desc(a: &FileEntry, b: &FileEntry) -> bool {
    a.modified().cmp(&b.modified()).then_with(|| by_name(a, b)) == Ordering::Greater
}
