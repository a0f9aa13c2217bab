//! Request path to bundled-asset resolution.

use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};

/// Root document served for client-side routes.
pub const INDEX_DOCUMENT: &str = "index.html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetResolution {
    /// Canonical path of a regular file inside the asset root.
    Found(PathBuf),
    /// No asset for this path; the SPA fallback should answer.
    NotFoundFallback,
    /// No asset and no root document either.
    NotFoundNoIndex,
}

/// Resolves a request path against `asset_root`.
///
/// Paths that would leave the root (`..`, encoded `..`, symlinks pointing
/// outside) resolve exactly like a missing file.
pub async fn resolve(request_path: &str, asset_root: &Path) -> AssetResolution {
    let Some(relative) = sanitize(request_path) else {
        tracing::debug!(path = %request_path, "Rejected asset path");
        return AssetResolution::NotFoundFallback;
    };

    if relative.as_os_str().is_empty() {
        return AssetResolution::NotFoundFallback;
    }

    match contained_file(asset_root, &relative).await {
        Some(path) => AssetResolution::Found(path),
        None => AssetResolution::NotFoundFallback,
    }
}

/// Locates the root document, [`AssetResolution::NotFoundNoIndex`] when the
/// bundle (or the whole asset root) is absent.
pub async fn locate_index(asset_root: &Path) -> AssetResolution {
    match contained_file(asset_root, Path::new(INDEX_DOCUMENT)).await {
        Some(path) => AssetResolution::Found(path),
        None => AssetResolution::NotFoundNoIndex,
    }
}

async fn contained_file(asset_root: &Path, relative: &Path) -> Option<PathBuf> {
    // Canonicalize both sides so symlinks cannot point outside the root
    let root = tokio::fs::canonicalize(asset_root).await.ok()?;
    let candidate = tokio::fs::canonicalize(root.join(relative)).await.ok()?;

    if !candidate.starts_with(&root) {
        tracing::debug!(path = %relative.display(), "Asset path escapes the asset root");
        return None;
    }

    let metadata = tokio::fs::metadata(&candidate).await.ok()?;
    metadata.is_file().then_some(candidate)
}

/// Decodes the URL path into a relative filesystem path made only of normal
/// components. `None` for anything that tries to climb out.
fn sanitize(request_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(request_path).decode_utf8().ok()?;

    let mut relative = PathBuf::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s if s.contains('\\') || s.contains('\0') => return None,
            s => {
                let mut components = Path::new(s).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(_)), None) => relative.push(s),
                    _ => return None,
                }
            }
        }
    }

    Some(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn bundle() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<html>spa</html>").unwrap();
        fs::write(dir.path().join("app.js"), "console.log('app')").unwrap();
        fs::create_dir(dir.path().join("css")).unwrap();
        fs::write(dir.path().join("css/site.css"), "body{}").unwrap();
        fs::write(dir.path().join("my file.txt"), "spaced").unwrap();
        dir
    }

    #[test]
    fn sanitize_keeps_normal_segments() {
        assert_eq!(sanitize("/css/site.css"), Some(PathBuf::from("css/site.css")));
        assert_eq!(sanitize("/./css//site.css"), Some(PathBuf::from("css/site.css")));
        assert_eq!(sanitize("/"), Some(PathBuf::new()));
    }

    #[test]
    fn sanitize_rejects_traversal() {
        assert_eq!(sanitize("/../etc/passwd"), None);
        assert_eq!(sanitize("/css/../../secret"), None);
        assert_eq!(sanitize("/%2e%2e/secret"), None);
        assert_eq!(sanitize("/..%2fsecret"), None);
        assert_eq!(sanitize("/a%5c..%5csecret"), None);
        assert_eq!(sanitize("/a%00b"), None);
    }

    #[tokio::test]
    async fn existing_files_are_found() {
        let dir = bundle();
        let root = dir.path().canonicalize().unwrap();

        assert_eq!(
            resolve("/app.js", dir.path()).await,
            AssetResolution::Found(root.join("app.js"))
        );
        assert_eq!(
            resolve("/css/site.css", dir.path()).await,
            AssetResolution::Found(root.join("css/site.css"))
        );
        assert_eq!(
            resolve("/my%20file.txt", dir.path()).await,
            AssetResolution::Found(root.join("my file.txt"))
        );
    }

    #[tokio::test]
    async fn missing_files_and_directories_fall_back() {
        let dir = bundle();

        assert_eq!(
            resolve("/nonexistent.js", dir.path()).await,
            AssetResolution::NotFoundFallback
        );
        assert_eq!(resolve("/css", dir.path()).await, AssetResolution::NotFoundFallback);
        assert_eq!(resolve("/", dir.path()).await, AssetResolution::NotFoundFallback);
    }

    #[tokio::test]
    async fn traversal_resolves_like_a_missing_file() {
        let outer = TempDir::new().unwrap();
        fs::write(outer.path().join("secret.txt"), "top secret").unwrap();
        let root = outer.path().join("static");
        fs::create_dir(&root).unwrap();

        for path in ["/../secret.txt", "/%2e%2e/secret.txt", "/static/../../secret.txt"] {
            assert_eq!(
                resolve(path, &root).await,
                AssetResolution::NotFoundFallback,
                "{path} must not escape"
            );
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinks_out_of_the_root_are_refused() {
        let outer = TempDir::new().unwrap();
        fs::write(outer.path().join("secret.txt"), "top secret").unwrap();
        let root = outer.path().join("static");
        fs::create_dir(&root).unwrap();
        std::os::unix::fs::symlink(outer.path().join("secret.txt"), root.join("leak.txt")).unwrap();

        assert_eq!(
            resolve("/leak.txt", &root).await,
            AssetResolution::NotFoundFallback
        );
    }

    #[tokio::test]
    async fn index_lookup_distinguishes_missing_bundle() {
        let dir = bundle();
        assert!(matches!(
            locate_index(dir.path()).await,
            AssetResolution::Found(_)
        ));

        let empty = TempDir::new().unwrap();
        assert_eq!(
            locate_index(empty.path()).await,
            AssetResolution::NotFoundNoIndex
        );
        assert_eq!(
            locate_index(&empty.path().join("missing")).await,
            AssetResolution::NotFoundNoIndex
        );
    }
}
