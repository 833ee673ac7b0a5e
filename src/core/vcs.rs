//! Version control status input for treeline.
//!
//! Status is produced outside the tree model and handed in as a [StatusHandle]. A handle may
//! already hold a parsed [StatusMap], may still be waiting on a background producer, or may be
//! unavailable altogether. Node construction never waits on it: files are styled neutrally
//! first and re-styled once the map arrives (see [crate::core::branch::FileTree::poll_status]).
//!
//! [spawn_git_status] is the bundled producer. It runs `git status --porcelain --ignored` on a
//! worker thread and sends the parsed map back over a crossbeam channel.

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError, bounded};

use std::borrow::Cow;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

/// The status categories the styling layer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VcsStatus {
    Modified,
    Added,
    Deleted,
    Renamed,
    Untracked,
    Ignored,
    Conflicted,
}

impl VcsStatus {
    /// Maps the two-letter porcelain code to a category.
    /// Conflicts win over everything, then the worktree column, then the index column.
    pub fn from_porcelain(code: &str) -> Option<Self> {
        let mut chars = code.chars();
        let x = chars.next()?;
        let y = chars.next()?;
        match (x, y) {
            ('?', '?') => Some(VcsStatus::Untracked),
            ('!', '!') => Some(VcsStatus::Ignored),
            ('U', _) | (_, 'U') | ('A', 'A') | ('D', 'D') => Some(VcsStatus::Conflicted),
            (_, 'M') | (_, 'T') => Some(VcsStatus::Modified),
            (_, 'D') => Some(VcsStatus::Deleted),
            ('R', _) | ('C', _) => Some(VcsStatus::Renamed),
            ('A', _) => Some(VcsStatus::Added),
            ('M', _) | ('T', _) => Some(VcsStatus::Modified),
            ('D', _) => Some(VcsStatus::Deleted),
            _ => None,
        }
    }
}

/// Absolute path to status category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMap {
    entries: HashMap<PathBuf, VcsStatus>,
}

impl StatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, status: VcsStatus) {
        self.entries.insert(path.into(), status);
    }

    /// Status of `path`. Paths inside an ignored or untracked directory inherit its status.
    pub fn get(&self, path: &Path) -> Option<VcsStatus> {
        if let Some(status) = self.entries.get(path) {
            return Some(*status);
        }
        path.ancestors()
            .skip(1)
            .filter_map(|p| self.entries.get(p))
            .find(|s| matches!(s, VcsStatus::Ignored | VcsStatus::Untracked))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(PathBuf, VcsStatus)> for StatusMap {
    fn from_iter<I: IntoIterator<Item = (PathBuf, VcsStatus)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Parses `git status --porcelain` (v1) output. Paths are joined onto `root`, which must be the
/// repository top level since porcelain paths are relative to it.
pub fn parse_porcelain(root: &Path, output: &str) -> StatusMap {
    let mut map = StatusMap::new();
    for line in output.lines() {
        let (Some(code), Some(rest)) = (line.get(..2), line.get(2..)) else {
            continue;
        };
        let Some(status) = VcsStatus::from_porcelain(code) else {
            continue;
        };
        let rest = rest.trim_start();
        // Renames are reported as "old -> new", only the new path is on disk
        let raw = match rest.rsplit_once(" -> ") {
            Some((_, new)) => new,
            None => rest,
        };
        let raw = unquote(raw);
        let trimmed = raw.trim_end_matches('/');
        if trimmed.is_empty() {
            continue;
        }
        map.insert(root.join(trimmed), status);
    }
    map
}

/// Decodes a path git quoted because of unusual characters: the surrounding quotes, C-style
/// backslash escapes and octal bytes (`\303\251` is `é`).
fn unquote(path: &str) -> Cow<'_, str> {
    let Some(inner) = path.strip_prefix('"').and_then(|p| p.strip_suffix('"')) else {
        return Cow::Borrowed(path);
    };
    let mut bytes = Vec::with_capacity(inner.len());
    let mut iter = inner.bytes().peekable();
    while let Some(b) = iter.next() {
        if b != b'\\' {
            bytes.push(b);
            continue;
        }
        match iter.next() {
            Some(d @ b'0'..=b'7') => {
                let mut value = u32::from(d - b'0');
                for _ in 0..2 {
                    match iter.peek() {
                        Some(&d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            iter.next();
                        }
                        _ => break,
                    }
                }
                bytes.push((value & 0xff) as u8);
            }
            Some(b'a') => bytes.push(0x07),
            Some(b'b') => bytes.push(0x08),
            Some(b'f') => bytes.push(0x0c),
            Some(b'n') => bytes.push(b'\n'),
            Some(b'r') => bytes.push(b'\r'),
            Some(b't') => bytes.push(b'\t'),
            Some(b'v') => bytes.push(0x0b),
            // \\ and \"
            Some(other) => bytes.push(other),
            None => bytes.push(b'\\'),
        }
    }
    Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
}

/// A possibly not-yet-available [StatusMap].
#[derive(Debug, Default)]
pub enum StatusHandle {
    Ready(StatusMap),
    Pending(Receiver<StatusMap>),
    #[default]
    Unavailable,
}

impl StatusHandle {
    pub fn ready(map: StatusMap) -> Self {
        StatusHandle::Ready(map)
    }

    /// Non-blocking: moves a delivered map from the channel into the handle.
    /// A producer that hung up without sending turns the handle [StatusHandle::Unavailable].
    pub fn poll(&mut self) -> Option<&StatusMap> {
        if let StatusHandle::Pending(rx) = self {
            match rx.try_recv() {
                Ok(map) => *self = StatusHandle::Ready(map),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => *self = StatusHandle::Unavailable,
            }
        }
        match self {
            StatusHandle::Ready(map) => Some(map),
            _ => None,
        }
    }

    /// Blocks up to `timeout` for a pending producer. How long to wait is the caller's call;
    /// a producer that never answers just leaves the handle pending.
    pub fn wait(&mut self, timeout: Duration) -> Option<&StatusMap> {
        if let StatusHandle::Pending(rx) = self {
            match rx.recv_timeout(timeout) {
                Ok(map) => *self = StatusHandle::Ready(map),
                Err(RecvTimeoutError::Timeout) => return None,
                Err(RecvTimeoutError::Disconnected) => *self = StatusHandle::Unavailable,
            }
        }
        match self {
            StatusHandle::Ready(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, StatusHandle::Pending(_))
    }
}

/// Starts `git status` for `dir` on a background thread.
/// Returns [StatusHandle::Unavailable] when git is not installed.
pub fn spawn_git_status(dir: &Path) -> StatusHandle {
    if which::which("git").is_err() {
        tracing::debug!("git not found in PATH, skipping status");
        return StatusHandle::Unavailable;
    }

    let (tx, rx) = bounded::<StatusMap>(1);
    let dir = dir.to_path_buf();
    thread::spawn(move || match git_status(&dir) {
        Ok(map) => {
            let _ = tx.send(map);
        }
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "git status failed");
        }
    });
    StatusHandle::Pending(rx)
}

/// Runs git synchronously and parses its output.
pub fn git_status(dir: &Path) -> io::Result<StatusMap> {
    let top = run_git(dir, &["rev-parse", "--show-toplevel"])?;
    let root = PathBuf::from(top.trim());
    let output = run_git(dir, &["status", "--porcelain", "--ignored"])?;
    Ok(parse_porcelain(&root, &output))
}

fn run_git(dir: &Path, args: &[&str]) -> io::Result<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()?;

    if !output.status.success() {
        return Err(io::Error::other(format!(
            "git {} exited with {}",
            args.join(" "),
            output.status
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn porcelain_codes() {
        assert_eq!(VcsStatus::from_porcelain(" M"), Some(VcsStatus::Modified));
        assert_eq!(VcsStatus::from_porcelain("M "), Some(VcsStatus::Modified));
        assert_eq!(VcsStatus::from_porcelain("A "), Some(VcsStatus::Added));
        assert_eq!(VcsStatus::from_porcelain("??"), Some(VcsStatus::Untracked));
        assert_eq!(VcsStatus::from_porcelain("!!"), Some(VcsStatus::Ignored));
        assert_eq!(VcsStatus::from_porcelain("UU"), Some(VcsStatus::Conflicted));
        assert_eq!(VcsStatus::from_porcelain("R "), Some(VcsStatus::Renamed));
        assert_eq!(VcsStatus::from_porcelain(" D"), Some(VcsStatus::Deleted));
        assert_eq!(VcsStatus::from_porcelain("  "), None);
    }

    #[test]
    fn parse_porcelain_lines() {
        let out = " M src/main.rs\n?? notes.txt\n!! target/\nR  old.rs -> new.rs\n?? \"with space.txt\"\n";
        let root = Path::new("/repo");
        let map = parse_porcelain(root, out);

        assert_eq!(map.get(Path::new("/repo/src/main.rs")), Some(VcsStatus::Modified));
        assert_eq!(map.get(Path::new("/repo/notes.txt")), Some(VcsStatus::Untracked));
        assert_eq!(map.get(Path::new("/repo/target")), Some(VcsStatus::Ignored));
        assert_eq!(map.get(Path::new("/repo/new.rs")), Some(VcsStatus::Renamed));
        assert_eq!(map.get(Path::new("/repo/old.rs")), None);
        assert_eq!(
            map.get(Path::new("/repo/with space.txt")),
            Some(VcsStatus::Untracked)
        );
    }

    #[test]
    fn quoted_paths_are_unescaped() {
        let out = "?? \"caf\\303\\251.txt\"\n M \"say \\\"hi\\\".md\"\nR  \"a b\" -> \"tab\\there\"\n";
        let map = parse_porcelain(Path::new("/repo"), out);

        assert_eq!(map.get(Path::new("/repo/café.txt")), Some(VcsStatus::Untracked));
        assert_eq!(map.get(Path::new("/repo/say \"hi\".md")), Some(VcsStatus::Modified));
        assert_eq!(map.get(Path::new("/repo/tab\there")), Some(VcsStatus::Renamed));
        assert_eq!(unquote("plain.rs"), "plain.rs");
    }

    #[test]
    fn ignored_directory_covers_children() {
        let map = parse_porcelain(Path::new("/repo"), "!! target/\n");
        assert_eq!(
            map.get(Path::new("/repo/target/debug/app")),
            Some(VcsStatus::Ignored)
        );
        assert_eq!(map.get(Path::new("/repo/src/lib.rs")), None);
    }

    #[test]
    fn pending_handle_resolves_later() {
        let (tx, rx) = unbounded();
        let mut handle = StatusHandle::Pending(rx);
        assert!(handle.poll().is_none());
        assert!(handle.is_pending());

        let mut map = StatusMap::new();
        map.insert("/p/a.txt", VcsStatus::Modified);
        tx.send(map.clone()).unwrap();

        assert_eq!(handle.poll(), Some(&map));
        assert!(!handle.is_pending());
        // Idempotent once ready
        assert_eq!(handle.poll(), Some(&map));
    }

    #[test]
    fn dropped_producer_becomes_unavailable() {
        let (tx, rx) = unbounded::<StatusMap>();
        drop(tx);
        let mut handle = StatusHandle::Pending(rx);
        assert!(handle.poll().is_none());
        assert!(matches!(handle, StatusHandle::Unavailable));
    }
}
