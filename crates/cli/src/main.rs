use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use context_bundler::{
    detect_overlaps, parse_size, scan_roots, BundleConfig, BundleStats, Bundler, BundlerError,
    DiscoveredFile, IgnoreMatcher,
};
use std::io;
use std::path::{Path, PathBuf};

mod roots;

#[derive(Parser)]
#[command(name = "lcb")]
#[command(about = "Bundle Markdown files into LLM context documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory to scan (repeatable, defaults to the current directory)
    #[arg(short, long = "dir", value_name = "DIR")]
    dirs: Vec<PathBuf>,

    /// Output file path (overrides LCB_OUTPUT, default: context.md)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Maximum estimated size of one output part, e.g. 100MiB (overrides LCB_MAX_PART_SIZE)
    #[arg(long, value_name = "SIZE", value_parser = parse_size_arg)]
    max_size: Option<u64>,

    /// Ignore file looked up in every directory (overrides LCB_IGNORE_FILE, default: .lcbignore)
    #[arg(long, value_name = "NAME")]
    ignore_file: Option<String>,

    /// Print run statistics as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long)]
    quiet: bool,
}

fn parse_size_arg(raw: &str) -> std::result::Result<u64, String> {
    parse_size(raw).map_err(|err| err.to_string())
}

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn init_logger(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet || cli.json {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn build_config(cli: &Cli) -> Result<BundleConfig> {
    let mut config =
        BundleConfig::from_env().context("Invalid LCB_* environment configuration")?;
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    if let Some(max_size) = cli.max_size {
        config.max_part_size = max_size;
    }
    if let Some(name) = &cli.ignore_file {
        config.ignore_file_name = name.clone();
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;
    let roots = roots::resolve_roots(&cli.dirs)?;

    for (ancestor, descendant) in detect_overlaps(&roots) {
        log::warn!(
            "{} contains {}; files reachable from both are bundled once",
            ancestor.display(),
            descendant.display()
        );
    }

    let ignore_file_name = config.ignore_file_name.clone();
    let files = scan_roots(&roots, |root| {
        IgnoreMatcher::for_root(root, &ignore_file_name)
    })
    .context("Failed to scan directories")?;
    let files = skip_previous_output(files, &config.output);

    if files.is_empty() {
        log::warn!("no markdown files found");
        return Ok(());
    }
    log::debug!("found {} markdown files", files.len());

    let bundler = Bundler::new(config).multi_root(roots.len() > 1);
    let stats = match bundler.bundle(&files) {
        Ok(stats) => stats,
        Err(err) => {
            if let BundlerError::Write { written, .. } = &err {
                if !written.is_empty() {
                    log::error!("completed parts: {}", join_paths(written));
                }
            }
            return Err(err).context("Failed to bundle files");
        }
    };

    report(cli, &stats)
}

fn report(cli: &Cli, stats: &BundleStats) -> Result<()> {
    if cli.json {
        return print_stdout(&serde_json::to_string_pretty(stats)?);
    }
    if !cli.quiet {
        eprintln!(
            "bundled {} files to {}",
            stats.files_bundled,
            join_paths(&stats.parts)
        );
    }
    Ok(())
}

/// Drops an earlier bundle that sits inside one of the scanned roots.
fn skip_previous_output(files: Vec<DiscoveredFile>, output: &Path) -> Vec<DiscoveredFile> {
    let Ok(output) = output.canonicalize() else {
        return files;
    };
    files
        .into_iter()
        .filter(|file| {
            let same = file
                .absolute_path()
                .canonicalize()
                .is_ok_and(|path| path == output);
            if same {
                log::debug!("Skipping previous output {}", output.display());
            }
            !same
        })
        .collect()
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(&cli);
    run(&cli)
}
