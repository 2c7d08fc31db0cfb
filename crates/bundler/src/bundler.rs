use crate::anchor::path_to_anchor;
use crate::config::BundleConfig;
use crate::error::{BundlerError, Result};
use crate::scanner::DiscoveredFile;
use crate::stats::BundleStats;
use std::path::{Path, PathBuf};

/// Rough size of the separator, source comment and TOC line added per file.
pub const FILE_OVERHEAD_ESTIMATE: u64 = 100;

const TITLE: &str = "# Bundled Context";

/// One file ready to be written: display path, source label and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    pub display_path: String,
    pub source_label: String,
    pub content: Vec<u8>,
}

impl BundleEntry {
    fn estimated_size(&self) -> u64 {
        self.content.len() as u64 + FILE_OVERHEAD_ESTIMATE
    }
}

/// A contiguous run of entries destined for one output document.
#[derive(Debug, Default)]
pub struct BundlePart {
    entries: Vec<BundleEntry>,
    size: u64,
}

impl BundlePart {
    fn push(&mut self, entry: BundleEntry) {
        self.size += entry.estimated_size();
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[BundleEntry] {
        &self.entries
    }

    /// Estimated size: content bytes plus the per-file overhead.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Source labels in first-seen order.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !labels.contains(&entry.source_label.as_str()) {
                labels.push(&entry.source_label);
            }
        }
        labels
    }
}

/// Split entries into parts whose estimated size stays within `max_part_size`.
///
/// A part is closed only when it already holds a file, so every part is
/// non-empty and a file larger than the limit ends up alone in its own part.
pub fn partition(entries: Vec<BundleEntry>, max_part_size: u64) -> Vec<BundlePart> {
    let mut parts = Vec::new();
    let mut current = BundlePart::default();

    for entry in entries {
        let size = entry.estimated_size();
        if !current.is_empty() && current.size + size > max_part_size {
            parts.push(std::mem::take(&mut current));
        }
        current.push(entry);
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Output paths for `count` parts: the path itself for one part, otherwise
/// `<stem>_part<N><.ext>` next to it, numbered from 1.
pub fn part_paths(output: &Path, count: usize) -> Vec<PathBuf> {
    if count == 1 {
        return vec![output.to_path_buf()];
    }

    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = output
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    (1..=count)
        .map(|n| output.with_file_name(format!("{stem}_part{n}{extension}")))
        .collect()
}

/// Serialize one part: title, table of contents, then every file verbatim.
pub fn render_part(part: &BundlePart, index: usize, total: usize) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::with_capacity(part.size() as usize);

    if total > 1 {
        out.extend_from_slice(format!("{TITLE} (Part {index} of {total})\n").as_bytes());
    } else {
        out.extend_from_slice(format!("{TITLE}\n").as_bytes());
    }
    out.push(b'\n');

    out.extend_from_slice(b"## Table of Contents\n");
    let labels = part.labels();
    if labels.len() > 1 {
        for label in labels {
            out.extend_from_slice(format!("\n### {label}\n").as_bytes());
            for entry in part.entries.iter().filter(|e| e.source_label == label) {
                push_toc_entry(&mut out, &entry.display_path);
            }
        }
    } else {
        for entry in &part.entries {
            push_toc_entry(&mut out, &entry.display_path);
        }
    }
    out.push(b'\n');

    for entry in &part.entries {
        out.extend_from_slice(b"---\n\n");
        out.extend_from_slice(format!("<!-- SOURCE: {} -->\n", entry.display_path).as_bytes());
        out.extend_from_slice(&entry.content);
        if !entry.content.ends_with(b"\n") {
            out.push(b'\n');
        }
        out.push(b'\n');
    }

    out
}

fn push_toc_entry(out: &mut Vec<u8>, display_path: &str) {
    let anchor = path_to_anchor(display_path);
    out.extend_from_slice(format!("- [{display_path}](#{anchor})\n").as_bytes());
}

/// Assembles discovered files into one or more Markdown documents.
pub struct Bundler {
    config: BundleConfig,
    multi_root: bool,
}

impl Bundler {
    pub fn new(config: BundleConfig) -> Self {
        Self {
            config,
            multi_root: false,
        }
    }

    /// Prefix display paths with the source label (used when bundling
    /// from more than one root).
    pub fn multi_root(mut self, multi_root: bool) -> Self {
        self.multi_root = multi_root;
        self
    }

    pub fn display_path(&self, file: &DiscoveredFile) -> String {
        if self.multi_root {
            format!("{}/{}", file.source_label(), file.path())
        } else {
            file.path().to_string()
        }
    }

    /// Read, partition and write `files`. `BundleStats::parts` lists the
    /// documents written, in order.
    ///
    /// Unreadable files are skipped with a warning. Fails with
    /// [`BundlerError::NothingToBundle`] when no file could be read and with
    /// [`BundlerError::Write`] when a part cannot be written; parts written
    /// before that failure stay on disk.
    pub fn bundle(&self, files: &[DiscoveredFile]) -> Result<BundleStats> {
        let mut stats = BundleStats::new(files.len());

        let entries = self.read_entries(files, &mut stats);
        if entries.is_empty() {
            return Err(BundlerError::NothingToBundle);
        }

        let parts = partition(entries, self.config.max_part_size);
        let paths = part_paths(&self.config.output, parts.len());
        let total = parts.len();

        for (index, (part, path)) in parts.iter().zip(paths).enumerate() {
            let document = render_part(part, index + 1, total);
            if let Err(source) = std::fs::write(&path, &document) {
                return Err(BundlerError::Write {
                    path,
                    written: stats.parts,
                    source,
                });
            }
            log::info!(
                "Wrote {} ({} files, {} bytes)",
                path.display(),
                part.len(),
                document.len()
            );
            stats.add_part(path, part.len(), document.len() as u64);
        }

        Ok(stats)
    }

    fn read_entries(&self, files: &[DiscoveredFile], stats: &mut BundleStats) -> Vec<BundleEntry> {
        let mut entries = Vec::with_capacity(files.len());
        for file in files {
            let display_path = self.display_path(file);
            match std::fs::read(file.absolute_path()) {
                Ok(content) => entries.push(BundleEntry {
                    display_path,
                    source_label: file.source_label().to_string(),
                    content,
                }),
                Err(err) => {
                    log::warn!("could not read {display_path}: {err}");
                    stats.add_skipped(&display_path, &err);
                }
            }
        }
        entries
    }
}
