//! # Context Bundler
//!
//! Collects Markdown files from one or more directories into size-bounded
//! documents for LLM prompts.
//!
//! ## Pipeline
//!
//! ```text
//! Roots
//!     │
//!     ├──> Labels (unique per root)
//!     │
//!     ├──> File Scanner (.lcbignore aware, per root)
//!     │      └─> Ordered, deduplicated Markdown files
//!     │
//!     └──> Bundler (read, partition, render)
//!            └─> context.md | context_part1.md, context_part2.md, ...
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use context_bundler::{scan_roots, BundleConfig, Bundler, IgnoreMatcher};
//! use std::path::PathBuf;
//!
//! fn main() -> context_bundler::Result<()> {
//!     let config = BundleConfig::default();
//!     let roots = vec![PathBuf::from("docs"), PathBuf::from("lib/docs")];
//!
//!     let files = scan_roots(&roots, |root| {
//!         IgnoreMatcher::for_root(root, &config.ignore_file_name)
//!     })?;
//!     let stats = Bundler::new(config).multi_root(true).bundle(&files)?;
//!
//!     println!("Bundled {} files into {} parts", stats.files_bundled, stats.parts.len());
//!     Ok(())
//! }
//! ```

mod anchor;
mod bundler;
mod config;
mod error;
mod ignore;
mod labels;
mod scanner;
mod stats;

pub use anchor::path_to_anchor;
pub use bundler::{
    part_paths, partition, render_part, BundleEntry, BundlePart, Bundler, FILE_OVERHEAD_ESTIMATE,
};
pub use config::{
    parse_size, BundleConfig, DEFAULT_MAX_PART_SIZE, DEFAULT_OUTPUT, ENV_IGNORE_FILE,
    ENV_MAX_PART_SIZE, ENV_OUTPUT,
};
pub use error::{BundlerError, Result};
pub use ignore::{IgnoreMatcher, DEFAULT_IGNORE_FILE};
pub use labels::{clean_path, derive_label, resolve_labels, SourceLabels};
pub use scanner::{detect_overlaps, scan_roots, DiscoveredFile, FileScanner, DEFAULT_EXCLUSIONS};
pub use stats::BundleStats;
