use serde::Serialize;
use std::path::PathBuf;

/// Statistics about a bundling run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BundleStats {
    /// Files handed to the bundler
    pub files_found: usize,

    /// Files that made it into a part
    pub files_bundled: usize,

    /// Files dropped because they could not be read
    pub files_skipped: usize,

    /// Output documents, in part order
    pub parts: Vec<PathBuf>,

    pub bytes_written: u64,

    /// Display paths of skipped files with the read error
    pub skipped: Vec<String>,
}

impl BundleStats {
    pub fn new(files_found: usize) -> Self {
        Self {
            files_found,
            ..Self::default()
        }
    }

    pub fn add_skipped(&mut self, display_path: &str, error: &std::io::Error) {
        self.files_skipped += 1;
        self.skipped.push(format!("{display_path}: {error}"));
    }

    pub fn add_part(&mut self, path: PathBuf, files: usize, bytes: u64) {
        self.parts.push(path);
        self.files_bundled += files;
        self.bytes_written += bytes;
    }
}
