//! Command-line argument parsing and help for treeline.
//!
//! When invoked with no args (`tl`), treeline prints the tree of the current directory.

use crate::config::Config;
use crate::core::sort::SortMode;

use std::path::{Path, PathBuf};

/// Depth used by `--all` when `--depth` is not given.
pub const DEFAULT_EXPAND_DEPTH: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub path: Option<String>,
    pub sort: Option<SortMode>,
    pub expand_all: bool,
    pub depth: Option<usize>,
    pub force_text: bool,
    pub show_hidden: bool,
}

impl RunOptions {
    /// Depth to open directories to. `--depth` alone is enough; `--all` without one uses
    /// [DEFAULT_EXPAND_DEPTH].
    pub fn expand_depth(&self) -> usize {
        self.depth
            .unwrap_or(if self.expand_all { DEFAULT_EXPAND_DEPTH } else { 0 })
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum CliAction {
    Run(RunOptions),
    Exit,
    /// Invalid usage; the message has already been printed.
    Fail,
}

pub fn handle_args() -> CliAction {
    parse_args(std::env::args().skip(1))
}

pub fn parse_args<I>(args: I) -> CliAction
where
    I: IntoIterator<Item = String>,
{
    let mut opts = RunOptions::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-v" => {
                print_version();
                return CliAction::Exit;
            }
            "-h" | "--help" => {
                print_help();
                return CliAction::Exit;
            }
            "--init" => return init_config(&Config::default_path()),
            "--sort" | "-s" => {
                let Some(value) = args.next() else {
                    eprintln!("Error: --sort needs a value");
                    return CliAction::Fail;
                };
                match value.parse::<SortMode>() {
                    Ok(mode) => opts.sort = Some(mode),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        return CliAction::Fail;
                    }
                }
            }
            "--depth" | "-d" => {
                match args.next().and_then(|v| v.parse::<usize>().ok()) {
                    Some(depth) => opts.depth = Some(depth),
                    None => {
                        eprintln!("Error: --depth needs a non-negative number");
                        return CliAction::Fail;
                    }
                }
            }
            "--all" | "-a" => opts.expand_all = true,
            "--text" => opts.force_text = true,
            "--hidden" | "-H" => opts.show_hidden = true,
            arg if !arg.starts_with('-') && !arg.trim().is_empty() => {
                if opts.path.is_some() {
                    eprintln!("Error: treeline accepts only one path.");
                    eprintln!("Usage: tl [OPTIONS] [PATH]");
                    return CliAction::Fail;
                }
                opts.path = Some(arg.to_string());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                eprintln!("Try --help for available options");
                return CliAction::Fail;
            }
        }
    }
    CliAction::Run(opts)
}

/// Writes the default config to `path`. Fails when it cannot, including when a file is
/// already there.
pub fn init_config(path: &Path) -> CliAction {
    match Config::generate_default(path) {
        Ok(()) => CliAction::Exit,
        Err(e) => {
            eprintln!("Error: {}", e);
            CliAction::Fail
        }
    }
}

/// Root path to open: the argument with `~` expanded, or the current directory.
pub fn resolve_root(opts: &RunOptions) -> std::io::Result<PathBuf> {
    let path = match &opts.path {
        Some(p) => crate::utils::expand_home_path(p),
        None => std::env::current_dir()?,
    };
    std::fs::canonicalize(path)
}

fn print_version() {
    println!("treeline {}", env!("CARGO_PKG_VERSION"));
}

fn print_help() {
    println!(
        r#"treeline - print a lazily built file tree with icons and git status

USAGE:
  tl [OPTIONS] [PATH]

PATH:
  Directory to show (defaults to current directory)

OPTIONS:
  -s, --sort MODE         alphabetic-asc, alphabetic-desc, size-asc, size-desc,
                          mod-time-asc, mod-time-desc
  -a, --all               Expand directories one level deep
  -d, --depth N           Expand directories down to depth N
  -H, --hidden            Show hidden files
      --text              Use text glyphs instead of icons
      --init              Generate a default configuration
  -h, --help              Print help information
  -v, --version           Display the current installed version of treeline

ENVIRONMENT:
  TREELINE_CONFIG         Override the default config path
  TREELINE_LOG            Log filter, e.g. "debug" (logs go to stderr)
"#
    );
}
