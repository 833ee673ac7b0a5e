//! Node storage and run building.
//!
//! Nodes live in a [NodeArena] and refer to each other through [NodeId] handles. The visible
//! tree is one flat, doubly linked chain in depth-first order: a node's `next` is the next line
//! on screen, whatever its depth. `parent` is kept for walking up, there are no child lists.
//!
//! Handles carry a generation, so a handle to a removed node stays dead even after its slot is
//! reused by a later assembly.

use crate::core::FileEntry;
use crate::ui::icons::Decoration;

use ratatui::style::Style;

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    DirClosed,
    DirOpen,
    File,
}

impl NodeState {
    #[inline]
    pub fn is_dir(&self) -> bool {
        !matches!(self, NodeState::File)
    }
}

/// One line of the tree.
#[derive(Debug, Clone)]
pub struct Node {
    path: PathBuf,
    pub(crate) state: NodeState,
    depth: usize,
    parent: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) style: Style,
    pub(crate) decoration: Decoration,
}

impl Node {
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last path component, or the whole path for roots like `/`.
    pub fn label(&self) -> std::borrow::Cow<'_, str> {
        self.path
            .file_name()
            .unwrap_or(self.path.as_os_str())
            .to_string_lossy()
    }

    #[inline]
    pub fn state(&self) -> NodeState {
        self.state
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    #[inline]
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    #[inline]
    pub fn style(&self) -> Style {
        self.style
    }

    #[inline]
    pub fn decoration(&self) -> Decoration {
        self.decoration
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.state.is_dir()
    }

    /// Columns of indentation for this node.
    #[inline]
    pub fn indent(&self, width: usize) -> usize {
        indent(self.depth, width)
    }
}

/// What a builder closure decides for one entry. Depth, parent and links are filled in by
/// [build_run].
#[derive(Debug, Clone)]
pub struct NodeSeed {
    pub state: NodeState,
    pub style: Style,
    pub decoration: Decoration,
}

/// First and last node of a linked run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub head: NodeId,
    pub tail: NodeId,
}

/// Indentation in columns for a depth.
#[inline]
pub fn indent(depth: usize, width: usize) -> usize {
    depth.saturating_mul(width)
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Owns every node. Handles only reference slots.
#[derive(Debug, Default)]
pub struct NodeArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn insert(&mut self, node: Node) -> NodeId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    /// Removes one node without touching its neighbours' links.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(node)
    }

    /// Drops every node. Slots are kept so that handles taken before the clear stay stale.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index as u32);
        }
        self.len = 0;
    }

    /// Sets `a.next = b` and `b.prev = a`. Either side may be absent.
    pub(crate) fn link(&mut self, a: Option<NodeId>, b: Option<NodeId>) {
        if let Some(node) = a.and_then(|a| self.get_mut(a)) {
            node.next = b;
        }
        if let Some(node) = b.and_then(|b| self.get_mut(b)) {
            node.prev = a;
        }
    }

    /// The last visible node inside the subtree of `id` (or `id` itself when it shows no
    /// children). Relies on the chain being depth-first.
    pub fn last_descendant(&self, id: NodeId) -> NodeId {
        let Some(depth) = self.get(id).map(Node::depth) else {
            return id;
        };
        let mut last = id;
        let mut cursor = self.get(id).and_then(Node::next);
        while let Some(next) = cursor {
            match self.get(next) {
                Some(node) if node.depth() > depth => {
                    last = next;
                    cursor = node.next();
                }
                _ => break,
            }
        }
        last
    }

    /// Removes everything below `id` in the chain and relinks `id` to what followed the
    /// subtree. Returns how many nodes were removed.
    pub fn remove_descendants(&mut self, id: NodeId) -> usize {
        let last = self.last_descendant(id);
        if last == id {
            return 0;
        }
        let after = self.get(last).and_then(Node::next);
        let mut cursor = self.get(id).and_then(Node::next);
        let mut removed = 0;
        while let Some(current) = cursor {
            cursor = if current == last {
                None
            } else {
                self.get(current).and_then(Node::next)
            };
            if self.remove(current).is_some() {
                removed += 1;
            }
        }
        self.link(Some(id), after);
        removed
    }

    /// Walks the chain forward starting at `head`.
    pub fn iter_from(&self, head: Option<NodeId>) -> ChainIter<'_> {
        ChainIter {
            arena: self,
            cursor: head,
        }
    }
}

/// Iterator over a linked chain.
pub struct ChainIter<'a> {
    arena: &'a NodeArena,
    cursor: Option<NodeId>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let node = self.arena.get(id)?;
        self.cursor = node.next;
        Some((id, node))
    }
}

/// Builds one node per entry, in order, linking each to the one before it.
///
/// `make` decides the state, style and decoration of each node. Returns `None` for an empty
/// input so the caller can skip stitching.
pub fn build_run<F>(
    arena: &mut NodeArena,
    entries: &[FileEntry],
    depth: usize,
    parent: Option<NodeId>,
    mut make: F,
) -> Option<Run>
where
    F: FnMut(&FileEntry) -> NodeSeed,
{
    let mut head = None;
    let mut prev: Option<NodeId> = None;

    for entry in entries {
        let seed = make(entry);
        let id = arena.insert(Node {
            path: entry.path().to_path_buf(),
            state: seed.state,
            depth,
            parent,
            prev,
            next: None,
            style: seed.style,
            decoration: seed.decoration,
        });
        if let Some(prev_node) = prev.and_then(|p| arena.get_mut(p)) {
            prev_node.next = Some(id);
        }
        head.get_or_insert(id);
        prev = Some(id);
    }

    Some(Run {
        head: head?,
        tail: prev?,
    })
}
