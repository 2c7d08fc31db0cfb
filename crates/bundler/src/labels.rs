use std::path::{Component, Path, PathBuf};

/// Display labels for a set of roots, in root-argument order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLabels {
    entries: Vec<(PathBuf, String)>,
}

impl SourceLabels {
    pub fn get(&self, root: &Path) -> Option<&str> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == root)
            .map(|(_, label)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.entries
            .iter()
            .map(|(root, label)| (root.as_path(), label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Default label: basename of the cleaned path.
///
/// `./docs` -> `docs`, `/srv/project/specs/` -> `specs`.
pub fn derive_label(root: &Path) -> String {
    base_name(&clean_path(root))
}

/// Assign a unique label to every root.
///
/// Roots sharing a basename are prefixed with their parent's basename
/// (`project1/docs` -> `project1-docs`). When there is no usable parent, or the
/// prefixed labels still collide (`a/x/docs`, `b/x/docs`), the whole cleaned
/// path is used with separators turned into hyphens.
pub fn resolve_labels(roots: &[PathBuf]) -> SourceLabels {
    let bases: Vec<String> = roots.iter().map(|root| derive_label(root)).collect();
    let prefixed: Vec<String> = roots
        .iter()
        .zip(&bases)
        .map(|(root, base)| {
            if occurrences(&bases, base) > 1 {
                disambiguate(root, base)
            } else {
                base.clone()
            }
        })
        .collect();

    let entries = roots
        .iter()
        .zip(&bases)
        .zip(&prefixed)
        .map(|((root, base), label)| {
            let label = if occurrences(&bases, base) > 1 && occurrences(&prefixed, label) > 1 {
                full_path_label(root)
            } else {
                label.clone()
            };
            (root.clone(), label)
        })
        .collect();

    SourceLabels { entries }
}

fn occurrences(labels: &[String], label: &str) -> usize {
    labels.iter().filter(|other| *other == label).count()
}

fn disambiguate(root: &Path, base: &str) -> String {
    let clean = clean_path(root);
    let parent = clean
        .parent()
        .map(|parent| {
            if parent.as_os_str().is_empty() {
                ".".to_string()
            } else {
                base_name(parent)
            }
        })
        .unwrap_or_else(|| base_name(&clean));

    if parent == "." || parent == std::path::MAIN_SEPARATOR_STR {
        full_path_label(root)
    } else {
        format!("{parent}-{base}")
    }
}

fn full_path_label(root: &Path) -> String {
    clean_path(root)
        .to_string_lossy()
        .replace(['/', std::path::MAIN_SEPARATOR], "-")
}

/// Lexical path normalization: drops `.` segments, folds `..` into the
/// preceding segment and removes trailing separators. Empty becomes `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

fn base_name(path: &Path) -> String {
    match path.components().next_back() {
        Some(Component::Normal(name)) => name.to_string_lossy().into_owned(),
        Some(Component::RootDir) => std::path::MAIN_SEPARATOR_STR.to_string(),
        Some(Component::ParentDir) => "..".to_string(),
        Some(Component::Prefix(prefix)) => prefix.as_os_str().to_string_lossy().into_owned(),
        Some(Component::CurDir) | None => ".".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels_for(roots: &[&str]) -> Vec<String> {
        let roots: Vec<PathBuf> = roots.iter().map(PathBuf::from).collect();
        let labels = resolve_labels(&roots);
        labels.iter().map(|(_, label)| label.to_string()).collect()
    }

    #[test]
    fn derive_label_uses_cleaned_basename() {
        assert_eq!(derive_label(Path::new("./docs")), "docs");
        assert_eq!(derive_label(Path::new("/srv/project/specs/")), "specs");
        assert_eq!(derive_label(Path::new("a/b/../c")), "c");
    }

    #[test]
    fn unique_basenames_are_used_directly() {
        assert_eq!(labels_for(&["docs", "specs/api"]), vec!["docs", "api"]);
    }

    #[test]
    fn colliding_basenames_get_parent_prefix() {
        assert_eq!(
            labels_for(&["project1/docs", "project2/docs", "notes"]),
            vec!["project1-docs", "project2-docs", "notes"]
        );
    }

    #[test]
    fn colliding_prefixed_labels_fall_back_to_full_path() {
        assert_eq!(
            labels_for(&["a/x/docs", "b/x/docs", "c/docs"]),
            vec!["a-x-docs", "b-x-docs", "c-docs"]
        );
    }

    #[test]
    fn root_without_parent_falls_back_to_full_path() {
        assert_eq!(labels_for(&["docs", "lib/docs"]), vec!["docs", "lib-docs"]);
    }

    #[cfg(unix)]
    #[test]
    fn filesystem_root_parent_falls_back_to_full_path() {
        assert_eq!(
            labels_for(&["/docs", "/srv/docs"]),
            vec!["-docs", "srv-docs"]
        );
    }

    #[test]
    fn resolution_is_stable_and_lookup_by_root_works() {
        let roots = vec![PathBuf::from("a/docs"), PathBuf::from("b/docs")];
        let first = resolve_labels(&roots);
        let second = resolve_labels(&roots);
        assert_eq!(first, second);
        assert_eq!(first.get(Path::new("b/docs")), Some("b-docs"));
        assert_eq!(first.get(Path::new("c/docs")), None);
    }

    #[test]
    fn clean_path_is_lexical() {
        assert_eq!(clean_path(Path::new("./a//b/./c/")), PathBuf::from("a/b/c"));
        assert_eq!(clean_path(Path::new("a/..")), PathBuf::from("."));
        assert_eq!(clean_path(Path::new("../x")), PathBuf::from("../x"));
    }
}
