//! Module for mapping file paths and directory states to decorations.
//!
//! A [Decoration] is what the renderer puts in front of a node's label. In graphical mode that
//! is a Nerd Font icon, looked up by special file name first and then by lowercased extension.
//! In text mode directories get a `+`/`-` glyph and files get nothing.
//!
//! [IconStrategy] bundles the two insertion functions together with the open/closed directory
//! assets so [crate::ui::mode::RenderContext] can swap all of them in one assignment.

use crate::utils::with_lowered_stack;

use phf::phf_map;

use std::fmt;
use std::path::Path;

pub const DIR_CLOSED_ICON: &str = "\u{f07b}";
pub const DIR_OPEN_ICON: &str = "\u{f07c}";
pub const DEFAULT_FILE_ICON: &str = "\u{f15b}";

pub const DIR_CLOSED_GLYPH: &str = "+";
pub const DIR_OPEN_GLYPH: &str = "-";

/// File extension to icon mapping. Keys are lowercase.
static EXT_ICON_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "rs" => "\u{e7a8}",
    "py" => "\u{e606}",
    "js" => "\u{e74e}",
    "ts" => "\u{e628}",
    "tsx" => "\u{e7ba}",
    "jsx" => "\u{e7ba}",
    "md" => "\u{f48a}",
    "html" => "\u{e736}",
    "css" => "\u{e749}",
    "json" => "\u{e60b}",
    "toml" => "\u{e6b2}",
    "yml" => "\u{f013}",
    "yaml" => "\u{f013}",
    "xml" => "\u{f05c0}",
    "sh" => "\u{e795}",
    "go" => "\u{e627}",
    "java" => "\u{e738}",
    "c" => "\u{e61e}",
    "cpp" => "\u{e61d}",
    "h" => "\u{f0fd}",
    "hpp" => "\u{f0fd}",
    "rb" => "\u{e791}",
    "lua" => "\u{e620}",
    "el" => "\u{e632}",
    "org" => "\u{e633}",
    "sql" => "\u{e706}",
    "lock" => "\u{f023}",
    "zip" => "\u{f1c6}",
    "tar" => "\u{f1c6}",
    "gz" => "\u{f1c6}",
    "png" => "\u{f1c5}",
    "jpg" => "\u{f1c5}",
    "jpeg" => "\u{f1c5}",
    "gif" => "\u{f1c5}",
    "svg" => "\u{f1c5}",
    "pdf" => "\u{f1c1}",
    "txt" => "\u{f15c}",
    "log" => "\u{f18d}",
    "diff" => "\u{e728}",
    "patch" => "\u{e728}",
};

/// Special file names, matched exactly before the extension table.
static SPECIAL_FILE_ICON_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "Cargo.toml" => "\u{e7a8}",
    "Cargo.lock" => "\u{f023}",
    "Makefile" => "\u{e779}",
    "Dockerfile" => "\u{e7b0}",
    "LICENSE" => "\u{f02d}",
    "README" => "\u{f48a}",
    ".gitignore" => "\u{e702}",
    ".gitmodules" => "\u{e702}",
};

/// What gets drawn before a node label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decoration {
    /// Graphical icon asset.
    Icon(&'static str),
    /// Inline text glyph.
    Glyph(&'static str),
    /// No decoration and no reserved column.
    #[default]
    Blank,
}

impl Decoration {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decoration::Icon(s) | Decoration::Glyph(s) => s,
            Decoration::Blank => "",
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Decoration::Blank)
    }
}

impl fmt::Display for Decoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Open and closed directory assets of the active mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirAssets {
    pub closed: Decoration,
    pub open: Decoration,
}

pub type DirInsert = fn(bool, &DirAssets) -> Decoration;
pub type FileInsert = fn(&Path) -> Decoration;

/// The decoration functions and assets of one render mode.
#[derive(Clone, Copy)]
pub struct IconStrategy {
    insert_dir: DirInsert,
    insert_file: FileInsert,
    assets: DirAssets,
}

impl IconStrategy {
    pub fn graphical() -> Self {
        IconStrategy {
            insert_dir: insert_dir_asset,
            insert_file: graphical_file_icon,
            assets: DirAssets {
                closed: Decoration::Icon(DIR_CLOSED_ICON),
                open: Decoration::Icon(DIR_OPEN_ICON),
            },
        }
    }

    pub fn text() -> Self {
        IconStrategy {
            insert_dir: insert_dir_asset,
            insert_file: text_file_glyph,
            assets: DirAssets {
                closed: Decoration::Glyph(DIR_CLOSED_GLYPH),
                open: Decoration::Glyph(DIR_OPEN_GLYPH),
            },
        }
    }

    #[inline]
    pub fn dir(&self, open: bool) -> Decoration {
        (self.insert_dir)(open, &self.assets)
    }

    #[inline]
    pub fn file(&self, path: &Path) -> Decoration {
        (self.insert_file)(path)
    }

    #[inline]
    pub fn assets(&self) -> &DirAssets {
        &self.assets
    }
}

impl fmt::Debug for IconStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconStrategy")
            .field("assets", &self.assets)
            .finish_non_exhaustive()
    }
}

fn insert_dir_asset(open: bool, assets: &DirAssets) -> Decoration {
    if open { assets.open } else { assets.closed }
}

fn text_file_glyph(_path: &Path) -> Decoration {
    Decoration::Blank
}

fn graphical_file_icon(path: &Path) -> Decoration {
    Decoration::Icon(file_icon(path))
}

/// Icon for a file path. Special names first, then the extension case-insensitively, then the
/// default file icon.
pub fn file_icon(path: &Path) -> &'static str {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return DEFAULT_FILE_ICON;
    };

    if let Some(icon) = SPECIAL_FILE_ICON_MAP.get(name) {
        return icon;
    }

    if let Some(dot_idx) = name.rfind('.')
        && dot_idx > 0
        && dot_idx < name.len() - 1
    {
        let ext = &name[dot_idx + 1..];
        if let Some(icon) = EXT_ICON_MAP.get(ext) {
            return icon;
        }
        if let Some(icon) = with_lowered_stack(ext, |s| EXT_ICON_MAP.get(s).copied()) {
            return icon;
        }
    }

    DEFAULT_FILE_ICON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_match_ignores_case() {
        assert_eq!(file_icon(Path::new("/p/foo.PNG")), file_icon(Path::new("/p/foo.png")));
        assert_ne!(file_icon(Path::new("/p/foo.png")), DEFAULT_FILE_ICON);
    }

    #[test]
    fn unknown_or_missing_extension_falls_back() {
        assert_eq!(file_icon(Path::new("/p/foo.unknownext")), DEFAULT_FILE_ICON);
        assert_eq!(file_icon(Path::new("/p/noext")), DEFAULT_FILE_ICON);
        assert_eq!(file_icon(Path::new("/p/.hidden")), DEFAULT_FILE_ICON);
        assert_eq!(file_icon(Path::new("/p/Cargo.toml")), "\u{e7a8}");
    }

    #[test]
    fn text_strategy_decorations() {
        let text = IconStrategy::text();
        assert_eq!(text.dir(false), Decoration::Glyph("+"));
        assert_eq!(text.dir(true), Decoration::Glyph("-"));
        assert!(text.file(Path::new("/p/main.rs")).is_blank());
    }

    #[test]
    fn graphical_strategy_decorations() {
        let gfx = IconStrategy::graphical();
        assert_eq!(gfx.dir(false), Decoration::Icon(DIR_CLOSED_ICON));
        assert_eq!(gfx.dir(true), Decoration::Icon(DIR_OPEN_ICON));
        assert_eq!(
            gfx.file(Path::new("/p/unknown.zzz")),
            Decoration::Icon(DEFAULT_FILE_ICON)
        );
    }
}
