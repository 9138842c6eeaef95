//! Repository-relative path resolution.

/// True for references that point off the repository (`http://`, `https://`)
pub fn is_absolute_url(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Directory portion of a repository path: `/unit1/docs/a.md` → `/unit1/docs`
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Resolve `reference` against `base_path` with filesystem semantics.
///
/// `.` segments are dropped, `..` pops one segment (never above the root),
/// and a reference starting with `/` resolves from the root. The result is
/// always `/`-prefixed with no `.`/`..` segments left.
pub fn resolve(base_path: &str, reference: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    let base = if reference.starts_with('/') { "" } else { base_path };

    for part in base.split('/').chain(reference.split('/')) {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    format!("/{}", segments.join("/"))
}
