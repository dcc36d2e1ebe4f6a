//! Command-line interface for aictx
//!
//! A single command: resolve the input, merge config file and flags, then
//! write the tree listing and/or the source dump.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cancel::CancellationToken;
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::Config;
use crate::fetch::resolve_input;
use crate::pack::write_pack;
use crate::select::write_core_ignores;
use crate::utils::format_size;

mod utils;

pub use utils::OutputTarget;

/// Dump a project's filtered tree and source files into one LLM-friendly context file
#[derive(Parser, Debug)]
#[command(name = "aictx")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Local path, or a repository (`owner/repo[@branch]`, HTTPS or SSH URL)
    #[arg(value_name = "INPUT", default_value = ".")]
    input: String,

    /// Treat INPUT as a local path even if it looks like a repository
    #[arg(short, long)]
    local: bool,

    /// Comma-separated include patterns for both modes
    #[arg(short, long, value_name = "PATTERNS")]
    include: Option<String>,

    /// Comma-separated exclude patterns for both modes
    #[arg(short = 'x', long, value_name = "PATTERNS")]
    exclude: Option<String>,

    /// Disable the tree listing
    #[arg(long)]
    tree_disabled: bool,

    /// Include patterns for the tree listing (override --include)
    #[arg(long, value_name = "PATTERNS")]
    tree_include: Option<String>,

    /// Exclude patterns for the tree listing (override --exclude)
    #[arg(long, value_name = "PATTERNS")]
    tree_exclude: Option<String>,

    /// Show hidden files in the tree listing
    #[arg(long)]
    tree_show_hidden: bool,

    /// Disable the source dump
    #[arg(long)]
    source_disabled: bool,

    /// Include patterns for the source dump (override --include)
    #[arg(long, value_name = "PATTERNS")]
    source_include: Option<String>,

    /// Exclude patterns for the source dump (override --exclude)
    #[arg(long, value_name = "PATTERNS")]
    source_exclude: Option<String>,

    /// Skip files larger than this many megabytes in the source dump [default: 0.1]
    #[arg(long, value_name = "MB")]
    source_threshold: Option<f64>,

    /// Include hidden files in the source dump
    #[arg(long)]
    source_show_hidden: bool,

    /// Output file; `stdout`, `std` or `-` write to standard output
    #[arg(short, long, value_name = "FILE", default_value = "output.txt")]
    out: String,

    /// Write file contents without summary and headers
    #[arg(short, long)]
    raw: bool,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    verbose: bool,

    /// Print the built-in ignore patterns and exit
    #[arg(short = 'L', long)]
    list_core_ignores: bool,

    /// Do not apply the built-in ignore patterns
    #[arg(long)]
    no_core_ignores: bool,

    /// Do not read .gitignore
    #[arg(long)]
    no_git_ignore: bool,

    /// Config file (default: aictx.toml / aictx.yml in the input directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            tree_enabled: self.tree_disabled.then_some(false),
            tree_include: self.tree_include.clone(),
            tree_exclude: self.tree_exclude.clone(),
            tree_show_hidden: self.tree_show_hidden.then_some(true),
            source_enabled: self.source_disabled.then_some(false),
            source_include: self.source_include.clone(),
            source_exclude: self.source_exclude.clone(),
            source_show_hidden: self.source_show_hidden.then_some(true),
            source_threshold_mb: self.source_threshold,
            core_ignores: self.no_core_ignores.then_some(false),
            respect_gitignore: self.no_git_ignore.then_some(false),
            raw: self.raw.then_some(true),
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init();

    if cli.list_core_ignores {
        let mut stdout = io::stdout().lock();
        write_core_ignores(&mut stdout)?;
        stdout.flush()?;
        return Ok(());
    }

    ensure_mode_enabled(!cli.tree_disabled, !cli.source_disabled)?;

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        tracing::warn!("Failed to install Ctrl-C handler: {}", e);
    }

    let repo_ctx = resolve_input(&cli.input, cli.local)?;
    let root = repo_ctx.root();

    let file_config = load_config(config_anchor(root), cli.config.as_deref())?;
    let config = merge_cli_with_config(file_config, cli.overrides());
    ensure_mode_enabled(config.tree.enabled, config.source.enabled)?;
    log_config(&config);

    let target = OutputTarget::parse(&cli.out);
    let mut out = target.open()?;
    let excluded = target.excluded_name();

    let report = write_pack(root, &config, excluded.as_deref(), &mut out, &cancel)?;
    out.flush().context("Failed to flush output")?;
    drop(out);

    for message in report.messages() {
        tracing::info!("{}", message);
    }

    if let OutputTarget::File(path) = &target {
        let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        tracing::info!("Dumped to file {} ({})", path.display(), format_size(size));
    }

    Ok(())
}

fn ensure_mode_enabled(tree: bool, source: bool) -> Result<()> {
    if !tree && !source {
        anyhow::bail!("at least one of tree or source mode must be enabled");
    }
    Ok(())
}

/// Directory searched for a config file: the root itself, or the parent of a
/// single-file root.
fn config_anchor(root: &Path) -> &Path {
    if root.is_dir() {
        return root;
    }
    match root.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn log_config(config: &Config) {
    tracing::debug!(
        tree = config.tree.enabled,
        source = config.source.enabled,
        include = %config.include,
        exclude = %config.exclude,
        threshold_mb = config.source.threshold_mb,
        core_ignores = config.core_ignores,
        respect_gitignore = config.respect_gitignore,
        raw = config.raw,
        "resolved configuration"
    );
}
