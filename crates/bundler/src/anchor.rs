/// In-document link target for a display path.
///
/// Lowercases, drops path separators outright and keeps only `[a-z0-9_-]`:
/// `chapters/Chapter-1.md` -> `chapterschapter-1md`. Distinct paths may
/// collapse to the same anchor.
pub fn path_to_anchor(path: &str) -> String {
    path.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::path_to_anchor;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_separators_and_punctuation() {
        assert_eq!(path_to_anchor("chapters/chapter-1.md"), "chapterschapter-1md");
        assert_eq!(path_to_anchor("Docs\\API Guide.md"), "docsapiguidemd");
        assert_eq!(path_to_anchor("lib-docs/snake_case.MD"), "lib-docssnake_casemd");
        assert_eq!(path_to_anchor("notes/café.md"), "notescafmd");
    }

    #[test]
    fn distinct_paths_may_collide() {
        assert_eq!(path_to_anchor("a/b.md"), path_to_anchor("ab.md"));
    }
}
