//! main.rs
//! Entry point for treeline

use treeline::config::Config;
use treeline::core::{FileTree, RestyleScope, spawn_git_status};
use treeline::ui::{CapabilityProbe, FixedProbe, RenderContext, TerminalProbe};
use treeline::utils::cli::{CliAction, handle_args, resolve_root};
use treeline::utils::shorten_home_path;

use tracing_subscriber::EnvFilter;

use std::process::ExitCode;
use std::time::Duration;

/// How long the printed tree waits for git status before showing neutral styles.
const STATUS_WAIT: Duration = Duration::from_millis(500);

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TREELINE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = match handle_args() {
        CliAction::Run(opts) => opts,
        CliAction::Exit => return ExitCode::SUCCESS,
        CliAction::Fail => return ExitCode::from(2),
    };

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[treeline] Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(sort) = opts.sort {
        config.general_mut().set_sort(sort);
    }
    if opts.show_hidden {
        config.general_mut().set_show_hidden(true);
    }
    if opts.force_text {
        config.display_mut().set_icons(false);
    }

    let root = match resolve_root(&opts) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("[treeline] Error: cannot open {:?}: {}", opts.path, e);
            return ExitCode::FAILURE;
        }
    };

    let probe: Box<dyn CapabilityProbe> = if opts.force_text {
        Box::new(FixedProbe::new(false))
    } else {
        Box::new(TerminalProbe::new(config.display().icons()))
    };
    let mut ctx = RenderContext::new();
    ctx.check(probe.as_ref());

    let mut tree = FileTree::new(&root, config.tree_settings(), ctx);
    if config.general().git_status() {
        tree.set_status(spawn_git_status(&root));
    }
    tree.build();
    tree.expand_to_depth(opts.expand_depth());
    tree.wait_status(STATUS_WAIT, RestyleScope::WholeTree);

    println!("{}", shorten_home_path(tree.root()));
    for line in tree.render_lines() {
        println!("{}", line);
    }
    for warning in tree.take_warnings() {
        eprintln!("[treeline] Warning: {}", warning);
    }
    ExitCode::SUCCESS
}
