use crate::error::{BundlerError, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::path::Path;

/// Name of the per-root ignore source.
pub const DEFAULT_IGNORE_FILE: &str = ".lcbignore";

struct IgnoreRule {
    glob: GlobMatcher,
    negation: bool,
    /// Patterns without a `/` are matched against the basename only.
    basename_only: bool,
}

/// Gitignore-style matcher over `/`-separated relative paths.
///
/// Rules are evaluated in declaration order and the last matching rule decides,
/// so a later `!pattern` re-includes whatever an earlier rule excluded and a
/// later plain pattern excludes it again. Specificity plays no part.
#[derive(Default)]
pub struct IgnoreMatcher {
    rules: Vec<IgnoreRule>,
}

impl IgnoreMatcher {
    /// Matcher that never ignores anything.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile ignore-file text. Patterns that fail to compile are dropped.
    pub fn compile(contents: &str) -> Self {
        let mut rules = Vec::new();

        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (negation, pattern) = match line.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, line),
            };

            // Decided on the raw pattern, before the directory / anchor markers go.
            let basename_only = !pattern.contains('/');
            let pattern = pattern.strip_suffix('/').unwrap_or(pattern);
            let pattern = pattern.strip_prefix('/').unwrap_or(pattern);
            if pattern.is_empty() {
                continue;
            }

            let glob = match GlobBuilder::new(pattern).literal_separator(true).build() {
                Ok(glob) => glob.compile_matcher(),
                Err(err) => {
                    log::debug!("Skipping invalid ignore pattern {line:?}: {err}");
                    continue;
                }
            };

            rules.push(IgnoreRule {
                glob,
                negation,
                basename_only,
            });
        }

        Self { rules }
    }

    /// Load the matcher from an ignore file. A missing file is not an error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let matcher = Self::compile(&contents);
                log::debug!(
                    "Loaded {} ignore rules from {}",
                    matcher.len(),
                    path.display()
                );
                Ok(matcher)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::empty()),
            Err(source) => Err(BundlerError::IgnoreFile {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Matcher for `<root>/<file_name>`.
    pub fn for_root(root: impl AsRef<Path>, file_name: &str) -> Result<Self> {
        Self::from_file(root.as_ref().join(file_name))
    }

    pub fn is_ignored(&self, rel_path: &str) -> bool {
        let basename = rel_path.rsplit('/').next().unwrap_or(rel_path);

        let mut ignored = false;
        for rule in &self.rules {
            let candidate = if rule.basename_only {
                basename
            } else {
                rel_path
            };
            if rule.glob.is_match(candidate) {
                ignored = !rule.negation;
            }
        }
        ignored
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn negation_reincludes_after_broad_exclusion() {
        let matcher = IgnoreMatcher::compile("*.md\n!important.md\n");
        assert!(matcher.is_ignored("readme.md"));
        assert!(matcher.is_ignored("notes/todo.md"));
        assert!(!matcher.is_ignored("important.md"));
        assert!(!matcher.is_ignored("sub/important.md"));
    }

    #[test]
    fn last_matching_rule_wins() {
        let matcher = IgnoreMatcher::compile("!keep.md\n*.md\n");
        assert!(matcher.is_ignored("keep.md"));

        let matcher = IgnoreMatcher::compile("drafts\n!drafts\ndrafts\n");
        assert!(matcher.is_ignored("drafts"));
    }

    #[test]
    fn skips_blank_lines_and_comments() {
        let matcher = IgnoreMatcher::compile("\n   \n# *.md\n  #also a comment\n");
        assert!(matcher.is_empty());
        assert!(!matcher.is_ignored("a.md"));
    }

    #[test]
    fn basename_patterns_match_at_any_depth() {
        let matcher = IgnoreMatcher::compile("  drafts  \n");
        assert!(matcher.is_ignored("drafts"));
        assert!(matcher.is_ignored("docs/drafts"));
        assert!(!matcher.is_ignored("docs/drafts.md"));
    }

    #[test]
    fn slash_patterns_match_the_full_relative_path() {
        let matcher = IgnoreMatcher::compile("docs/*.md\n/private/\n");
        assert!(matcher.is_ignored("docs/a.md"));
        assert!(!matcher.is_ignored("docs/sub/a.md"));
        assert!(!matcher.is_ignored("a.md"));
        assert!(matcher.is_ignored("private"));
        assert!(!matcher.is_ignored("docs/private"));
    }

    #[test]
    fn double_star_crosses_directories() {
        let matcher = IgnoreMatcher::compile("archive/**\n");
        assert!(matcher.is_ignored("archive/2020/old.md"));
        assert!(!matcher.is_ignored("current/new.md"));
    }

    #[test]
    fn invalid_patterns_contribute_no_rule() {
        let matcher = IgnoreMatcher::compile("[unclosed\n*.tmp.md\n");
        assert_eq!(matcher.len(), 1);
        assert!(matcher.is_ignored("x.tmp.md"));
        assert!(!matcher.is_ignored("[unclosed"));
    }

    #[test]
    fn missing_file_yields_empty_matcher() {
        let temp = tempdir().unwrap();
        let matcher = IgnoreMatcher::from_file(temp.path().join(DEFAULT_IGNORE_FILE)).unwrap();
        assert!(matcher.is_empty());
        assert!(!matcher.is_ignored("anything.md"));
    }

    #[test]
    fn reads_rules_from_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(DEFAULT_IGNORE_FILE);
        fs::write(&path, "# drafts\ndraft-*.md\n").unwrap();

        let matcher = IgnoreMatcher::from_file(&path).unwrap();
        assert_eq!(matcher.len(), 1);
        assert!(matcher.is_ignored("notes/draft-1.md"));
        assert!(!matcher.is_ignored("notes/final.md"));
    }

    #[test]
    fn unreadable_ignore_source_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(DEFAULT_IGNORE_FILE);
        fs::create_dir(&path).unwrap();

        let err = IgnoreMatcher::from_file(&path).err().expect("directory is not readable");
        assert!(matches!(err, BundlerError::IgnoreFile { .. }));
    }
}
