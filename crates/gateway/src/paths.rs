//! Path resolution for served files
//!
//! The sole traversal defense: a requested path is lexically normalized,
//! joined onto the base directory, then resolved through the filesystem,
//! and must land at or under the canonicalized base directory. Root and
//! parent-directory components in the request are stripped, so absolute
//! and `../`-prefixed inputs are reinterpreted relative to the base.

use std::io;
use std::path::{Component, Path, PathBuf};

use buildrelay_common::Error;

/// Resolve `requested` to an absolute path nested under `base`.
///
/// `base` must already be canonicalized. Returns:
/// - 400 when the request normalizes to nothing
/// - 403 when the resolved path escapes the base directory
/// - 404 when the target does not exist
pub fn resolve_within_base(base: &Path, requested: &str) -> Result<PathBuf, Error> {
    let mut relative = PathBuf::new();
    for component in Path::new(requested).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            // collapse inner "..", strip leading ".."
            Component::ParentDir => {
                relative.pop();
            }
            Component::CurDir => {}
            // absolute inputs are reinterpreted relative to the base
            Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(Error::Validation("filename is required".to_string()));
    }

    let candidate = base.join(&relative);
    if !candidate.starts_with(base) {
        return Err(Error::Forbidden("path escapes base directory".to_string()));
    }

    // Resolve symlinks before the containment check; a link pointing
    // outside the base directory must not be followed.
    match candidate.canonicalize() {
        Ok(resolved) if resolved.starts_with(base) => Ok(resolved),
        Ok(_) => Err(Error::Forbidden("path escapes base directory".to_string())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::NotFound(e.to_string())),
        Err(e) => Err(Error::Internal(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn base_with_file(name: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(name), b"artifact bytes").unwrap();
        let base = dir.path().canonicalize().unwrap();
        (dir, base)
    }

    #[test]
    fn test_resolves_plain_file() {
        let (_dir, base) = base_with_file("abc123");
        let resolved = resolve_within_base(&base, "abc123").unwrap();
        assert_eq!(resolved, base.join("abc123"));
    }

    #[test]
    fn test_resolves_nested_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/build.zip"), b"x").unwrap();
        let base = dir.path().canonicalize().unwrap();

        let resolved = resolve_within_base(&base, "nested/build.zip").unwrap();
        assert_eq!(resolved, base.join("nested/build.zip"));
    }

    #[test]
    fn test_traversal_is_confined() {
        let (_dir, base) = base_with_file("abc123");
        // leading ".." segments are stripped, so this resolves inside the
        // base (and then 404s on the missing file) rather than escaping
        let result = resolve_within_base(&base, "../../etc/passwd");
        match result {
            Err(Error::NotFound(_)) | Err(Error::Forbidden(_)) => {}
            other => panic!("traversal must not resolve: {other:?}"),
        }
    }

    #[test]
    fn test_inner_parent_segments_collapse() {
        let (_dir, base) = base_with_file("abc123");
        let resolved = resolve_within_base(&base, "nested/../abc123").unwrap();
        assert_eq!(resolved, base.join("abc123"));
    }

    #[test]
    fn test_absolute_path_reinterpreted() {
        let (_dir, base) = base_with_file("abc123");
        // "/abc123" is treated as relative to the base
        let resolved = resolve_within_base(&base, "/abc123").unwrap();
        assert_eq!(resolved, base.join("abc123"));

        // "/etc/passwd" stays inside the sandbox and misses
        let result = resolve_within_base(&base, "/etc/passwd");
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_only_dots_is_rejected() {
        let (_dir, base) = base_with_file("abc123");
        assert!(matches!(
            resolve_within_base(&base, "."),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            resolve_within_base(&base, "../.."),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let (_dir, base) = base_with_file("abc123");
        assert!(matches!(
            resolve_within_base(&base, "missing.zip"),
            Err(Error::NotFound(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_is_forbidden() {
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret"), b"leak").unwrap();

        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret"), dir.path().join("link"))
            .unwrap();
        let base = dir.path().canonicalize().unwrap();

        assert!(matches!(
            resolve_within_base(&base, "link"),
            Err(Error::Forbidden(_))
        ));
    }
}
