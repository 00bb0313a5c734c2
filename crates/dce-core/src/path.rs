//! Path normalization shared by VCS output, symbol maps and tasks.
//!
//! Git reports paths relative to the repository root while the symbol
//! extractor may report them with a leading `./`, an absolute `/` or the
//! repository directory name. Paths that both come from git are compared
//! with [`same_path`]; [`paths_match`] is for lookups into the symbol map.

/// Strips `./` prefixes and leading separators, and converts `\` to `/`.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = path.trim().replace('\\', "/");
    loop {
        if let Some(rest) = normalized.strip_prefix("./") {
            normalized = rest.to_string();
        } else if let Some(rest) = normalized.strip_prefix('/') {
            normalized = rest.to_string();
        } else {
            break;
        }
    }
    normalized
}

/// Normalizes `path` and drops a single leading `repo_name/` segment.
pub fn strip_repo_prefix(path: &str, repo_name: &str) -> String {
    let normalized = normalize_path(path);
    if repo_name.is_empty() {
        return normalized;
    }
    match normalized.strip_prefix(repo_name) {
        Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/').to_string(),
        _ => normalized,
    }
}

/// Whether two repository-relative paths name the same file.
pub fn same_path(a: &str, b: &str) -> bool {
    let a = normalize_path(a);
    !a.is_empty() && a == normalize_path(b)
}

/// Two paths match when their normalized forms are equal or one is a
/// `/`-aligned suffix of the other.
pub fn paths_match(a: &str, b: &str) -> bool {
    let a = normalize_path(a);
    let b = normalize_path(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || a.ends_with(&format!("/{b}")) || b.ends_with(&format!("/{a}"))
}
