use anyhow::{bail, Context as AnyhowContext, Result};
use context_bundler::clean_path;
use std::path::{Component, Path, PathBuf};

/// Validate `--dir` arguments and make them usable as labelled roots.
///
/// No arguments means the current directory. Roots whose cleaned form ends in
/// `.` or `..` are made absolute so that they carry a meaningful label.
pub(crate) fn resolve_roots(dirs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let requested: Vec<PathBuf> = if dirs.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        dirs.to_vec()
    };

    let mut roots = Vec::with_capacity(requested.len());
    for dir in requested {
        let root = if needs_absolute(&dir) {
            std::fs::canonicalize(&dir)
                .with_context(|| format!("Could not resolve directory {}", dir.display()))?
        } else {
            dir
        };

        if !root.exists() {
            bail!("directory does not exist: {}", root.display());
        }
        if !root.is_dir() {
            bail!("not a directory: {}", root.display());
        }
        roots.push(root);
    }
    Ok(roots)
}

fn needs_absolute(dir: &Path) -> bool {
    matches!(
        clean_path(dir).components().next_back(),
        Some(Component::CurDir) | Some(Component::ParentDir) | None
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn dot_becomes_absolute() {
        assert!(needs_absolute(Path::new(".")));
        assert!(needs_absolute(Path::new("./")));
        assert!(needs_absolute(Path::new("docs/../..")));
        assert!(!needs_absolute(Path::new("./docs")));
        assert!(!needs_absolute(Path::new("lib/docs")));
    }

    #[test]
    fn rejects_missing_and_non_directories() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("file.md");
        fs::write(&file, "x").unwrap();

        let err = resolve_roots(&[temp.path().join("missing")]).unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        let err = resolve_roots(&[file]).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn keeps_valid_roots_in_order() {
        let temp = tempdir().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();

        let roots = resolve_roots(&[b.clone(), a.clone()]).unwrap();
        assert_eq!(roots, vec![b, a]);
    }

    #[test]
    fn defaults_to_current_directory() {
        let roots = resolve_roots(&[]).unwrap();
        assert_eq!(roots.len(), 1);
        assert!(roots[0].is_absolute());
    }
}
