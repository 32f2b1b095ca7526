use std::path::{Path, PathBuf};

/// Return `true` when `s` starts with `<word chars>://`.
pub fn has_scheme(s: &str) -> bool {
    match s.find("://") {
        Some(0) | None => false,
        Some(i) => s[..i].chars().all(|c| c.is_alphanumeric() || c == '_'),
    }
}

/// `file://` uri for a local path, made absolute against the current directory.
pub fn file_uri(path: &Path) -> String {
    let abs = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", abs.display())
}

/// Resolve a user-supplied document reference.
///
/// Strings that already carry a scheme pass through; existing local paths become `file://`
/// uris; anything else is assumed to be a web address.
pub fn resolve_uri(arg: &str) -> String {
    if has_scheme(arg) {
        return arg.to_string();
    }
    let path = Path::new(arg);
    if path.exists() {
        return file_uri(path);
    }
    format!("http://{arg}")
}

/// Local filesystem path named by a `file://` uri or a scheme-less string.
pub fn file_path(uri: &str) -> Option<PathBuf> {
    if let Some(rest) = uri.strip_prefix("file://") {
        return Some(PathBuf::from(rest));
    }
    if has_scheme(uri) {
        return None;
    }
    Some(PathBuf::from(uri))
}
