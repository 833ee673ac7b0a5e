//! Branch assembly and the tree operations built on it.
//!
//! An [Assembler] turns one directory into a linked run of nodes: directories first, then
//! files, the two runs stitched into one chain. Directories the [ExpandedSet] remembers as open
//! are assembled again underneath their node and spliced in right after it, so reopening a
//! directory brings back the state of everything below it.
//!
//! [FileTree] owns the arena, render context, settings and status handle, and exposes the
//! operations a front end needs: build, expand, collapse, rebuild, re-style, re-decorate and
//! chain navigation.
//!
//! # Failure policy
//! A directory that cannot be read becomes an empty branch. The failure is logged and kept as
//! an [AssemblyWarning] for the front end to show; it never aborts the surrounding tree.

use crate::config::Theme;
use crate::core::lister::{VisibilityFilter, list_dir};
use crate::core::sort::SortMode;
use crate::core::tree::{Node, NodeArena, NodeId, NodeSeed, NodeState, Run, build_run};
use crate::core::vcs::{StatusHandle, StatusMap};
use crate::error::Result;
use crate::ui::mode::{CapabilityProbe, RenderContext};
use crate::ui::render::RenderLine;

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Remembers which directories were open.
pub trait ExpandedSet {
    fn is_expanded(&self, path: &Path) -> bool;
}

impl ExpandedSet for HashSet<PathBuf> {
    fn is_expanded(&self, path: &Path) -> bool {
        self.contains(path)
    }
}

/// A directory that could not be listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyWarning {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for AssemblyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot read {}: {}", self.path.display(), self.message)
    }
}

/// Which part of the tree a re-style pass touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestyleScope {
    #[default]
    WholeTree,
    /// The node and every visible node below it.
    Subtree(NodeId),
}

/// Builds linked branches. Borrowed view over the settings of one tree.
pub struct Assembler<'a> {
    sort: SortMode,
    filter: &'a dyn VisibilityFilter,
    theme: &'a Theme,
    expanded: &'a dyn ExpandedSet,
    warnings: Vec<AssemblyWarning>,
}

impl<'a> Assembler<'a> {
    pub fn new(
        sort: SortMode,
        filter: &'a dyn VisibilityFilter,
        theme: &'a Theme,
        expanded: &'a dyn ExpandedSet,
    ) -> Self {
        Self {
            sort,
            filter,
            theme,
            expanded,
            warnings: Vec::new(),
        }
    }

    /// Assembles the branch for `dir` at `depth` under `parent`.
    ///
    /// Returns the head and tail of the linked run, where the tail is the last visible node of
    /// the whole branch (re-expanded descendants included). `None` means the directory showed
    /// nothing, either because it is empty or because it could not be read.
    pub fn assemble(
        &mut self,
        arena: &mut NodeArena,
        ctx: &RenderContext,
        dir: &Path,
        depth: usize,
        status: &mut StatusHandle,
        parent: Option<NodeId>,
    ) -> Option<Run> {
        let listing = match list_dir(dir, self.sort, self.filter) {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "unreadable directory");
                self.warnings.push(AssemblyWarning {
                    path: dir.to_path_buf(),
                    message: e.to_string(),
                });
                return None;
            }
        };

        let strategy = ctx.strategy();
        let dir_style = self.theme.directory_style();
        let dirs = build_run(arena, &listing.dirs, depth, parent, |_| NodeSeed {
            state: NodeState::DirClosed,
            style: dir_style,
            decoration: strategy.dir(false),
        });

        // Status may still be on its way; files without it get the neutral base style
        let statuses = status.poll();
        let theme = self.theme;
        let files = build_run(arena, &listing.files, depth, parent, |entry| NodeSeed {
            state: NodeState::File,
            style: theme.file_style(statuses.and_then(|map| map.get(entry.path()))),
            decoration: strategy.file(entry.path()),
        });

        if let (Some(d), Some(f)) = (dirs, files) {
            arena.link(Some(d.tail), Some(f.head));
        }

        tracing::debug!(
            path = %dir.display(),
            dirs = listing.dirs.len(),
            files = listing.files.len(),
            "assembled branch"
        );

        if let Some(d) = dirs {
            let dir_ids: Vec<NodeId> = arena
                .iter_from(Some(d.head))
                .take(listing.dirs.len())
                .map(|(id, _)| id)
                .collect();
            for id in dir_ids {
                let reopen = arena
                    .get(id)
                    .is_some_and(|node| self.expanded.is_expanded(node.path()));
                if reopen {
                    self.open(arena, ctx, id, status);
                }
            }
        }

        match (dirs, files) {
            (Some(d), Some(f)) => Some(Run {
                head: d.head,
                tail: f.tail,
            }),
            (Some(d), None) => Some(Run {
                head: d.head,
                tail: arena.last_descendant(d.tail),
            }),
            (None, files) => files,
        }
    }

    /// Opens a closed directory node: marks it open, swaps its decoration and splices its
    /// assembled branch in right after it. Returns the spliced run, if any.
    pub fn open(
        &mut self,
        arena: &mut NodeArena,
        ctx: &RenderContext,
        id: NodeId,
        status: &mut StatusHandle,
    ) -> Option<Run> {
        let (path, depth) = {
            let node = arena.get_mut(id)?;
            if node.state != NodeState::DirClosed {
                return None;
            }
            node.state = NodeState::DirOpen;
            node.decoration = ctx.strategy().dir(true);
            (node.path().to_path_buf(), node.depth())
        };

        let after = arena.get(id).and_then(Node::next);
        let run = self.assemble(arena, ctx, &path, depth + 1, status, Some(id))?;
        arena.link(Some(id), Some(run.head));
        arena.link(Some(run.tail), after);
        Some(run)
    }

    pub fn warnings(&self) -> &[AssemblyWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<AssemblyWarning> {
        std::mem::take(&mut self.warnings)
    }
}

/// Everything that shapes how a tree is listed and styled.
pub struct TreeSettings {
    pub sort: SortMode,
    pub filter: Box<dyn VisibilityFilter>,
    pub theme: Theme,
    pub indent_width: usize,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            sort: SortMode::default(),
            filter: Box::new(crate::core::lister::ShowAll),
            theme: Theme::default(),
            indent_width: 2,
        }
    }
}

impl fmt::Debug for TreeSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeSettings")
            .field("sort", &self.sort)
            .field("theme", &self.theme)
            .field("indent_width", &self.indent_width)
            .finish_non_exhaustive()
    }
}

/// A lazily built tree rooted at one directory.
#[derive(Debug)]
pub struct FileTree {
    root: PathBuf,
    arena: NodeArena,
    head: Option<NodeId>,
    ctx: RenderContext,
    settings: TreeSettings,
    expanded: HashSet<PathBuf>,
    status: StatusHandle,
    /// Whether the whole tree has been styled from the current `Ready` map.
    status_applied: bool,
    warnings: Vec<AssemblyWarning>,
}

impl FileTree {
    pub fn new(root: impl Into<PathBuf>, settings: TreeSettings, ctx: RenderContext) -> Self {
        Self {
            root: root.into(),
            arena: NodeArena::new(),
            head: None,
            ctx,
            settings,
            expanded: HashSet::new(),
            status: StatusHandle::Unavailable,
            status_applied: false,
            warnings: Vec::new(),
        }
    }

    /// Replaces the status handle. Already built files keep their style until the next
    /// [FileTree::poll_status] or [FileTree::apply_status].
    pub fn set_status(&mut self, status: StatusHandle) {
        self.status = status;
        self.status_applied = false;
    }

    /// Seeds the set of open directories, e.g. from a previous session.
    pub fn set_expanded(&mut self, expanded: HashSet<PathBuf>) {
        self.expanded = expanded;
    }

    pub fn expanded(&self) -> &HashSet<PathBuf> {
        &self.expanded
    }

    /// (Re)builds the whole tree from the root. Old handles become invalid.
    pub fn build(&mut self) -> Option<Run> {
        self.arena.clear();
        let was_pending = self.status.is_pending();
        let mut assembler = Assembler::new(
            self.settings.sort,
            self.settings.filter.as_ref(),
            &self.settings.theme,
            &self.expanded,
        );
        let run = assembler.assemble(
            &mut self.arena,
            &self.ctx,
            &self.root,
            0,
            &mut self.status,
            None,
        );
        self.warnings.extend(assembler.take_warnings());
        self.head = run.map(|r| r.head);
        self.settle_status(was_pending);
        run
    }

    /// Changes the sort mode by name and rebuilds. An unknown name leaves the tree untouched.
    pub fn set_sort(&mut self, name: &str) -> Result<()> {
        self.settings.sort = name.parse()?;
        self.build();
        Ok(())
    }

    /// Runs the render mode check and re-decorates every node when the mode swapped.
    pub fn refresh_mode(&mut self, probe: &dyn CapabilityProbe) -> bool {
        if !self.ctx.check(probe) {
            return false;
        }
        self.redecorate();
        true
    }

    /// Re-resolves every decoration from the active strategy.
    pub fn redecorate(&mut self) {
        let strategy = *self.ctx.strategy();
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let Some(node) = self.arena.get_mut(id) else {
                break;
            };
            node.decoration = match node.state {
                NodeState::DirClosed => strategy.dir(false),
                NodeState::DirOpen => strategy.dir(true),
                NodeState::File => strategy.file(node.path()),
            };
            cursor = node.next;
        }
    }

    /// Opens a closed directory. Returns false for files, open directories and stale handles.
    pub fn expand(&mut self, id: NodeId) -> bool {
        let Some(node) = self.arena.get(id) else {
            return false;
        };
        if node.state != NodeState::DirClosed {
            return false;
        }
        self.expanded.insert(node.path().to_path_buf());

        let was_pending = self.status.is_pending();
        let mut assembler = Assembler::new(
            self.settings.sort,
            self.settings.filter.as_ref(),
            &self.settings.theme,
            &self.expanded,
        );
        assembler.open(&mut self.arena, &self.ctx, id, &mut self.status);
        self.warnings.extend(assembler.take_warnings());
        self.settle_status(was_pending);
        true
    }

    /// Closes an open directory and discards every node below it. Descendants stay in the
    /// expanded set so they reopen with it.
    pub fn collapse(&mut self, id: NodeId) -> bool {
        let decoration = self.ctx.strategy().dir(false);
        let Some(node) = self.arena.get_mut(id) else {
            return false;
        };
        if node.state != NodeState::DirOpen {
            return false;
        }
        node.state = NodeState::DirClosed;
        node.decoration = decoration;
        let path = node.path().to_path_buf();
        self.expanded.remove(&path);
        self.arena.remove_descendants(id);
        true
    }

    pub fn toggle(&mut self, id: NodeId) -> bool {
        match self.arena.get(id).map(Node::state) {
            Some(NodeState::DirClosed) => self.expand(id),
            Some(NodeState::DirOpen) => self.collapse(id),
            _ => false,
        }
    }

    /// Opens every closed directory shallower than `depth`, top to bottom. Returns how many
    /// directories were opened.
    pub fn expand_to_depth(&mut self, depth: usize) -> usize {
        let mut opened = 0;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let Some(node) = self.arena.get(id) else {
                break;
            };
            let wants = node.state == NodeState::DirClosed && node.depth() < depth;
            if wants && self.expand(id) {
                opened += 1;
            }
            cursor = self.next_visible(id);
        }
        opened
    }

    /// Discards and re-assembles the branch below an open directory. The old child nodes are
    /// dropped, not merged.
    pub fn rebuild(&mut self, id: NodeId) -> bool {
        let Some(node) = self.arena.get_mut(id) else {
            return false;
        };
        if node.state != NodeState::DirOpen {
            return false;
        }
        node.state = NodeState::DirClosed;
        self.arena.remove_descendants(id);

        let was_pending = self.status.is_pending();
        let mut assembler = Assembler::new(
            self.settings.sort,
            self.settings.filter.as_ref(),
            &self.settings.theme,
            &self.expanded,
        );
        assembler.open(&mut self.arena, &self.ctx, id, &mut self.status);
        self.warnings.extend(assembler.take_warnings());
        self.settle_status(was_pending);
        true
    }

    /// Re-styles file nodes from `map`. Links, paths, states and decorations are left alone,
    /// so running it twice with the same map changes nothing.
    pub fn apply_status(&mut self, map: &StatusMap, scope: RestyleScope) {
        let (start, end) = match self.scope_bounds(scope) {
            Some(bounds) => bounds,
            None => return,
        };
        restyle(&mut self.arena, &self.settings.theme, map, start, end);
    }

    /// Picks up status that arrived since the last call and re-styles `scope` with it.
    /// Returns true when a map not yet applied to the whole tree was applied.
    pub fn poll_status(&mut self, scope: RestyleScope) -> bool {
        if self.status.is_pending() {
            self.status.poll();
        }
        self.restyle_unapplied(scope)
    }

    /// Like [FileTree::poll_status] but blocks up to `timeout` for the producer.
    pub fn wait_status(&mut self, timeout: Duration, scope: RestyleScope) -> bool {
        if self.status.is_pending() {
            self.status.wait(timeout);
        }
        self.restyle_unapplied(scope)
    }

    /// A poll inside assembly may have turned the handle ready after earlier files were built
    /// with the base style. Catch those up in one whole-tree pass.
    fn settle_status(&mut self, was_pending: bool) {
        if was_pending && !self.status.is_pending() {
            tracing::debug!("status arrived during assembly, restyling tree");
            self.status_applied = false;
            self.restyle_unapplied(RestyleScope::WholeTree);
        }
    }

    fn restyle_unapplied(&mut self, scope: RestyleScope) -> bool {
        if self.status_applied {
            return false;
        }
        let applied = self.restyle_from_handle(scope);
        if applied && scope == RestyleScope::WholeTree {
            self.status_applied = true;
        }
        applied
    }

    fn restyle_from_handle(&mut self, scope: RestyleScope) -> bool {
        let Some((start, end)) = self.scope_bounds(scope) else {
            return false;
        };
        let StatusHandle::Ready(map) = &self.status else {
            return false;
        };
        restyle(&mut self.arena, &self.settings.theme, map, start, end);
        true
    }

    fn scope_bounds(&self, scope: RestyleScope) -> Option<(NodeId, Option<NodeId>)> {
        match scope {
            RestyleScope::WholeTree => self.head.map(|head| (head, None)),
            RestyleScope::Subtree(id) => {
                if !self.arena.contains(id) {
                    return None;
                }
                Some((id, Some(self.arena.last_descendant(id))))
            }
        }
    }

    // Accessors and navigation

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    #[inline]
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    #[inline]
    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    #[inline]
    pub fn settings(&self) -> &TreeSettings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn visible_nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.arena.iter_from(self.head)
    }

    pub fn next_visible(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(Node::next)
    }

    pub fn prev_visible(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(Node::prev)
    }

    pub fn find(&self, path: &Path) -> Option<NodeId> {
        self.visible_nodes()
            .find(|(_, node)| node.path() == path)
            .map(|(id, _)| id)
    }

    /// Values for the rendering sink, one per visible node.
    pub fn render_lines(&self) -> Vec<RenderLine> {
        self.visible_nodes()
            .map(|(_, node)| RenderLine::from_node(node, self.settings.indent_width))
            .collect()
    }

    pub fn warnings(&self) -> &[AssemblyWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<AssemblyWarning> {
        std::mem::take(&mut self.warnings)
    }
}

/// Re-styles file nodes from `start` up to and including `end` (or the end of the chain).
fn restyle(
    arena: &mut NodeArena,
    theme: &Theme,
    map: &StatusMap,
    start: NodeId,
    end: Option<NodeId>,
) {
    let mut cursor = Some(start);
    while let Some(id) = cursor {
        let Some(node) = arena.get_mut(id) else {
            break;
        };
        if node.state == NodeState::File {
            node.style = theme.file_style(map.get(node.path()));
        }
        cursor = if Some(id) == end { None } else { node.next };
    }
}
