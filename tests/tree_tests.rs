//! Tree assembly tests for treeline
//!
//! These tests build real directory layouts in temporary directories and check the shape of
//! the assembled chain: ordering, link consistency, expansion, decorations and late status.
//! Temporary resources are cleaned up automatically when the tests complete.

use treeline::config::{Config, Theme};
use treeline::core::{
    FileTree, NodeState, RestyleScope, SortMode, StatusHandle, StatusMap, TreeSettings, VcsStatus,
};
use treeline::ui::icons::{DEFAULT_FILE_ICON, DIR_CLOSED_ICON, DIR_OPEN_ICON};
use treeline::ui::{Decoration, FixedProbe, RenderContext, RenderMode};

use std::error;
use std::fs::{self, File};
use std::path::Path;
use tempfile::{TempDir, tempdir};

fn text_tree(root: &Path) -> FileTree {
    FileTree::new(
        root,
        TreeSettings::default(),
        RenderContext::with_mode(RenderMode::Text),
    )
}

fn labels(tree: &FileTree) -> Vec<String> {
    tree.visible_nodes()
        .map(|(_, node)| node.label().into_owned())
        .collect()
}

/// Every non-terminal node's successor points back at it, and the chain has no breaks.
fn assert_single_chain(tree: &FileTree) {
    let mut count = 0;
    for (id, node) in tree.visible_nodes() {
        count += 1;
        if let Some(next) = node.next() {
            let back = tree.get(next).and_then(|n| n.prev());
            assert_eq!(back, Some(id), "next.prev broken after {}", node.label());
        }
    }
    assert_eq!(count, tree.len(), "chain does not cover every node");
}

/// Directories before files among the direct children of each parent.
fn assert_dirs_first(tree: &FileTree) {
    let mut seen_file = std::collections::HashMap::new();
    for (_, node) in tree.visible_nodes() {
        let key = node.parent();
        if node.is_dir() {
            assert!(
                !seen_file.get(&key).copied().unwrap_or(false),
                "directory {} after a file",
                node.label()
            );
        } else {
            seen_file.insert(key, true);
        }
    }
}

fn nested_layout() -> Result<TempDir, Box<dyn error::Error>> {
    let dir = tempdir()?;
    let root = dir.path();
    for sub in ["src", "src/core", "docs", "empty"] {
        fs::create_dir_all(root.join(sub))?;
    }
    for file in [
        "README.md",
        "Cargo.toml",
        "src/lib.rs",
        "src/main.rs",
        "src/core/tree.rs",
        "docs/guide.md",
    ] {
        File::create(root.join(file))?;
    }
    Ok(dir)
}

#[test]
fn example_directory_orders_and_links() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    let p = dir.path();
    fs::create_dir(p.join("b"))?;
    File::create(p.join("a.txt"))?;
    File::create(p.join("c.txt"))?;

    let mut tree = text_tree(p);
    tree.build().ok_or("expected nodes")?;
    assert_eq!(labels(&tree), ["b", "a.txt", "c.txt"]);

    let b = tree.find(&p.join("b")).ok_or("b missing")?;
    let a = tree.find(&p.join("a.txt")).ok_or("a.txt missing")?;
    assert_eq!(tree.next_visible(b), Some(a));
    assert_eq!(tree.prev_visible(a), Some(b));
    assert_eq!(tree.get(b).ok_or("b")?.state(), NodeState::DirClosed);
    assert_eq!(tree.get(a).ok_or("a")?.state(), NodeState::File);
    assert_eq!(tree.get(a).ok_or("a")?.depth(), 0);
    Ok(())
}

#[test]
fn empty_directory_is_an_empty_chain() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    let mut tree = text_tree(dir.path());
    assert_eq!(tree.build(), None);
    assert!(tree.is_empty());
    assert!(tree.warnings().is_empty(), "empty is not an error");
    Ok(())
}

#[test]
fn only_files_or_only_dirs() -> Result<(), Box<dyn error::Error>> {
    let files_only = tempdir()?;
    File::create(files_only.path().join("x"))?;
    File::create(files_only.path().join("y"))?;
    let mut tree = text_tree(files_only.path());
    let run = tree.build().ok_or("run")?;
    assert_eq!(tree.get(run.head).ok_or("head")?.prev(), None);
    assert_eq!(labels(&tree), ["x", "y"]);

    let dirs_only = tempdir()?;
    fs::create_dir(dirs_only.path().join("d1"))?;
    fs::create_dir(dirs_only.path().join("d2"))?;
    let mut tree = text_tree(dirs_only.path());
    let run = tree.build().ok_or("run")?;
    assert_eq!(tree.get(run.tail).ok_or("tail")?.next(), None);
    assert_eq!(labels(&tree), ["d1", "d2"]);
    Ok(())
}

#[test]
fn fully_expanded_tree_is_one_chain() -> Result<(), Box<dyn error::Error>> {
    let dir = nested_layout()?;
    for mode in SortMode::ALL {
        let settings = TreeSettings {
            sort: mode,
            ..TreeSettings::default()
        };
        let mut tree = FileTree::new(
            dir.path(),
            settings,
            RenderContext::with_mode(RenderMode::Text),
        );
        tree.build();
        tree.expand_to_depth(usize::MAX);

        assert_eq!(tree.len(), 10, "mode {mode}");
        assert_single_chain(&tree);
        assert_dirs_first(&tree);
    }
    Ok(())
}

#[test]
fn depth_and_parent_follow_nesting() -> Result<(), Box<dyn error::Error>> {
    let dir = nested_layout()?;
    let mut tree = text_tree(dir.path());
    tree.build();
    tree.expand_to_depth(3);

    let core = tree.find(&dir.path().join("src/core")).ok_or("src/core")?;
    let src = tree.find(&dir.path().join("src")).ok_or("src")?;
    let tree_rs = tree
        .find(&dir.path().join("src/core/tree.rs"))
        .ok_or("tree.rs")?;

    let tree_node = tree.get(tree_rs).ok_or("tree.rs node")?;
    assert_eq!(tree_node.depth(), 2);
    assert_eq!(tree_node.parent(), Some(core));
    assert_eq!(tree.get(core).ok_or("core node")?.parent(), Some(src));

    let lines = tree.render_lines();
    let line = lines
        .iter()
        .find(|l| l.label == "tree.rs")
        .ok_or("tree.rs line")?;
    assert_eq!(line.indent, 4);
    assert_eq!(line.to_string(), "    tree.rs");
    Ok(())
}

#[test]
fn collapse_then_expand_restores_descendants() -> Result<(), Box<dyn error::Error>> {
    let dir = nested_layout()?;
    let mut tree = text_tree(dir.path());
    tree.build();
    let src = tree.find(&dir.path().join("src")).ok_or("src")?;
    tree.expand(src);
    let core = tree.find(&dir.path().join("src/core")).ok_or("core")?;
    tree.expand(core);
    let expanded = labels(&tree);

    assert!(tree.collapse(src));
    assert!(tree.find(&dir.path().join("src/lib.rs")).is_none());
    assert_single_chain(&tree);

    assert!(tree.toggle(src));
    assert_eq!(labels(&tree), expanded, "src/core reopened with src");
    assert_single_chain(&tree);
    Ok(())
}

#[test]
fn mode_switch_redecorates() -> Result<(), Box<dyn error::Error>> {
    let dir = nested_layout()?;
    let probe = FixedProbe::new(false);
    let mut tree = FileTree::new(dir.path(), TreeSettings::default(), RenderContext::new());
    assert!(tree.refresh_mode(&probe), "first query always transitions");
    tree.build();

    let docs = tree.find(&dir.path().join("docs")).ok_or("docs")?;
    let readme = tree.find(&dir.path().join("README.md")).ok_or("readme")?;
    assert_eq!(tree.get(docs).ok_or("docs")?.decoration(), Decoration::Glyph("+"));
    assert_eq!(tree.get(readme).ok_or("readme")?.decoration(), Decoration::Blank);

    assert!(!tree.refresh_mode(&probe));
    probe.set(true);
    assert!(tree.refresh_mode(&probe));
    assert_eq!(
        tree.get(docs).ok_or("docs")?.decoration(),
        Decoration::Icon(DIR_CLOSED_ICON)
    );
    assert!(matches!(
        tree.get(readme).ok_or("readme")?.decoration(),
        Decoration::Icon(icon) if icon != DEFAULT_FILE_ICON
    ));

    tree.expand(docs);
    assert_eq!(
        tree.get(docs).ok_or("docs")?.decoration(),
        Decoration::Icon(DIR_OPEN_ICON)
    );

    probe.set(false);
    assert!(tree.refresh_mode(&probe));
    assert_eq!(tree.get(docs).ok_or("docs")?.decoration(), Decoration::Glyph("-"));
    Ok(())
}

#[test]
fn graphical_file_icons_ignore_extension_case() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("foo.PNG"))?;
    File::create(dir.path().join("bar.png"))?;
    File::create(dir.path().join("foo.unknownext"))?;

    let mut tree = FileTree::new(
        dir.path(),
        TreeSettings::default(),
        RenderContext::with_mode(RenderMode::Graphical),
    );
    tree.build();
    let icon = |name: &str| {
        tree.find(&dir.path().join(name))
            .and_then(|id| tree.get(id))
            .map(|n| n.decoration())
    };
    assert_eq!(icon("foo.PNG"), icon("bar.png"));
    assert_eq!(
        icon("foo.unknownext"),
        Some(Decoration::Icon(DEFAULT_FILE_ICON))
    );
    Ok(())
}

#[test]
fn status_arriving_late_restyles_in_place() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("b"))?;
    File::create(dir.path().join("a.txt"))?;
    File::create(dir.path().join("c.txt"))?;

    let (tx, rx) = crossbeam_channel::bounded(1);
    let mut tree = text_tree(dir.path());
    tree.set_status(StatusHandle::Pending(rx));
    tree.build();

    let a = tree.find(&dir.path().join("a.txt")).ok_or("a.txt")?;
    let links_before = {
        let node = tree.get(a).ok_or("a")?;
        (node.prev(), node.next())
    };

    let mut map = StatusMap::new();
    map.insert(dir.path().join("a.txt"), VcsStatus::Modified);
    tx.send(map).map_err(|_| "status channel closed")?;
    assert!(tree.wait_status(std::time::Duration::from_secs(1), RestyleScope::WholeTree));

    let theme = Theme::default();
    let node = tree.get(a).ok_or("a")?;
    assert_eq!(node.style(), theme.file_style(Some(VcsStatus::Modified)));
    assert_eq!((node.prev(), node.next()), links_before);
    assert_eq!(node.path(), dir.path().join("a.txt"));

    let c = tree.find(&dir.path().join("c.txt")).ok_or("c.txt")?;
    assert_eq!(tree.get(c).ok_or("c")?.style(), theme.file_style(None));
    assert!(!tree.poll_status(RestyleScope::WholeTree), "nothing new");
    Ok(())
}

#[test]
fn config_filter_hides_dotfiles_and_ignored() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join(".git"))?;
    fs::create_dir(dir.path().join("src"))?;
    File::create(dir.path().join(".env"))?;
    File::create(dir.path().join(".hidden"))?;
    File::create(dir.path().join("main.rs"))?;

    let config = Config::parse("[general]\nalways_show = [\".env\"]\nsort = \"alphabetic-desc\"\n")?;
    let mut tree = FileTree::new(
        dir.path(),
        config.tree_settings(),
        RenderContext::with_mode(RenderMode::Text),
    );
    tree.build();
    assert_eq!(labels(&tree), ["src", "main.rs", ".env"]);
    Ok(())
}
