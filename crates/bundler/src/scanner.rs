use crate::error::{BundlerError, Result};
use crate::ignore::IgnoreMatcher;
use crate::labels::{derive_label, resolve_labels};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Entry names never descended into or collected.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[".git", "node_modules", "vendor"];

/// A Markdown file found under one of the roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredFile {
    /// Relative path on disk, used for reading and identity.
    #[serde(skip)]
    relative: PathBuf,

    /// `/`-separated (lossy) form of `relative` for display, ordering and matching.
    path: String,

    depth: usize,

    /// Canonical absolute path of the source root.
    source_dir: PathBuf,

    source_label: String,
}

impl DiscoveredFile {
    pub fn new(
        relative: impl Into<PathBuf>,
        source_dir: impl Into<PathBuf>,
        source_label: impl Into<String>,
    ) -> Self {
        let relative = relative.into();
        let path = slash_path(&relative);
        Self {
            depth: path.matches('/').count(),
            path,
            relative,
            source_dir: source_dir.into(),
            source_label: source_label.into(),
        }
    }

    /// Relative path from the source root, `/`-separated.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Number of separators in `path` (root-level files are 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn absolute_path(&self) -> PathBuf {
        self.source_dir.join(&self.relative)
    }
}

/// Scanner for Markdown files under a single root
pub struct FileScanner {
    root: PathBuf,
    label: String,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let label = derive_label(&root);
        Self { root, label }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Collect Markdown files, shallowest first and alphabetical within a depth.
    ///
    /// `.git`, `node_modules`, `vendor`, hidden directories and ignored
    /// directories are pruned without being visited.
    pub fn scan(&self, matcher: &IgnoreMatcher) -> Result<Vec<DiscoveredFile>> {
        if !self.root.is_dir() {
            return Err(BundlerError::InvalidPath(self.root.display().to_string()));
        }
        let source_dir = std::fs::canonicalize(&self.root)?;

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|entry| self.should_visit(entry, matcher));

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(BundlerError::Walk {
                        root: self.root.clone(),
                        message: err.to_string(),
                    });
                }
                Err(err) => {
                    log::warn!("Failed to read entry: {err}");
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if name.starts_with('.') || !is_markdown(&name) {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let file = DiscoveredFile::new(relative, &source_dir, &self.label);
            if matcher.is_ignored(file.path()) {
                log::debug!("Ignoring {}", file.path());
                continue;
            }

            files.push(file);
        }

        sort_files(&mut files);
        log::debug!(
            "Found {} markdown files in {}",
            files.len(),
            self.root.display()
        );
        Ok(files)
    }

    fn should_visit(&self, entry: &DirEntry, matcher: &IgnoreMatcher) -> bool {
        if entry.depth() == 0 {
            return true;
        }

        let name = entry.file_name().to_string_lossy();
        if DEFAULT_EXCLUSIONS.iter().any(|excluded| *excluded == name) {
            return false;
        }
        if !entry.file_type().is_dir() {
            return true;
        }
        if name.starts_with('.') {
            return false;
        }

        match relative_path(entry.path(), &self.root) {
            Some(rel_path) if matcher.is_ignored(&rel_path) => {
                log::debug!("Skipping ignored directory {rel_path}");
                false
            }
            _ => true,
        }
    }
}

/// Scan every root with its own matcher and merge the results.
///
/// Output keeps root-argument order; within a root files are ordered by depth
/// then path. A file reachable through several (nested) roots is kept only for
/// the first root that yields it.
pub fn scan_roots<F>(roots: &[PathBuf], mut matcher_for: F) -> Result<Vec<DiscoveredFile>>
where
    F: FnMut(&Path) -> Result<IgnoreMatcher>,
{
    if roots.is_empty() {
        return Err(BundlerError::NoDirectories);
    }

    let labels = resolve_labels(roots);
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut merged = Vec::new();

    for root in roots {
        let matcher = matcher_for(root)?;
        let label = labels
            .get(root)
            .map(str::to_string)
            .unwrap_or_else(|| derive_label(root));

        let files = FileScanner::new(root).with_label(label).scan(&matcher)?;
        for file in files {
            if seen.insert(file.absolute_path()) {
                merged.push(file);
            } else {
                log::debug!(
                    "Skipping duplicate {} from {}",
                    file.path(),
                    root.display()
                );
            }
        }
    }

    Ok(merged)
}

/// Pairs of `(ancestor, descendant)` among the given roots.
pub fn detect_overlaps(roots: &[PathBuf]) -> Vec<(PathBuf, PathBuf)> {
    let resolved: Vec<PathBuf> = roots.iter().map(|root| absolute(root)).collect();

    let mut overlaps = Vec::new();
    for i in 0..resolved.len() {
        for j in (i + 1)..resolved.len() {
            if resolved[j].starts_with(&resolved[i]) {
                overlaps.push((roots[i].clone(), roots[j].clone()));
            } else if resolved[i].starts_with(&resolved[j]) {
                overlaps.push((roots[j].clone(), roots[i].clone()));
            }
        }
    }
    overlaps
}

fn sort_files(files: &mut [DiscoveredFile]) {
    files.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.path.cmp(&b.path)));
}

fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn is_markdown(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".md")
}

fn relative_path(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let rel_path = slash_path(relative);
    (!rel_path.is_empty()).then_some(rel_path)
}

fn slash_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
