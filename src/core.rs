//! Core tree model for treeline.
//!
//! This module contains the non-UI pieces of the tree:
//! - [fm]: directory reading and the [FileEntry] record.
//! - [sort]: the six ordering predicates and [SortMode].
//! - [lister]: visibility filtering and the directories/files split.
//! - [vcs]: parsed version control status and the async [StatusHandle].
//! - [tree]: the node arena, handles and run building.
//! - [branch]: branch assembly and the [FileTree] operations.
//!
//! Most callers only need [FileTree], [TreeSettings] and a [crate::ui::mode::RenderContext].

pub mod branch;
pub mod fm;
pub mod lister;
pub mod sort;
pub mod tree;
pub mod vcs;

pub use branch::{Assembler, AssemblyWarning, ExpandedSet, FileTree, RestyleScope, TreeSettings};
pub use fm::{FileEntry, browse_dir};
pub use lister::{HiddenFilter, Listing, ShowAll, VisibilityFilter, list_dir};
pub use sort::SortMode;
pub use tree::{Node, NodeArena, NodeId, NodeState, Run};
pub use vcs::{StatusHandle, StatusMap, VcsStatus, spawn_git_status};
