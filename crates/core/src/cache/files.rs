//! Cache file removal without opening the database.

use std::path::Path;

use crate::Error;

/// Remove every file next to `base_path` whose name starts with its file name.
///
/// With a base of `.../howpopular/cache1` this removes `cache1.sqlite` along
/// with SQLite side files such as `cache1.sqlite-wal`. A missing directory is
/// not an error. Returns the number of removed files.
pub fn remove_cache_files(base_path: &Path) -> Result<usize, Error> {
    let Some(prefix) = base_path.file_name().and_then(|name| name.to_str()) else {
        return Err(Error::InvalidInput(format!("invalid cache path: {}", base_path.display())));
    };
    let dir = match base_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut removed = 0;
    for entry in entries {
        let entry = entry?;
        let matches = entry.file_name().to_str().is_some_and(|name| name.starts_with(prefix));
        if matches && entry.file_type()?.is_file() {
            std::fs::remove_file(entry.path())?;
            tracing::debug!("removed cache file {}", entry.path().display());
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CacheStore;
    use crate::cache::CacheRequest;
    use crate::cache::responses::CachedResponse;

    #[test]
    fn test_missing_directory_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("absent").join("cache1");
        assert_eq!(remove_cache_files(&base).unwrap(), 0);
    }

    #[test]
    fn test_removes_only_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cache1.sqlite"), b"db").unwrap();
        std::fs::write(dir.path().join("cache1.sqlite-wal"), b"wal").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"keep").unwrap();

        let removed = remove_cache_files(&dir.path().join("cache1")).unwrap();
        assert_eq!(removed, 2);
        assert!(!dir.path().join("cache1.sqlite").exists());
        assert!(!dir.path().join("cache1.sqlite-wal").exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_removed_store_reopens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("cache1");
        let path = base.with_extension("sqlite");
        let request = CacheRequest::get("https://www.google.com/search?q=rust");

        let store = CacheStore::open(&path).await.unwrap();
        store
            .get_or_fetch(&request, || async { Ok(CachedResponse::live(200, "cached".into())) })
            .await
            .unwrap();
        store.close().await.unwrap();

        assert!(remove_cache_files(&base).unwrap() >= 1);

        let reopened = CacheStore::open(&path).await.unwrap();
        assert!(reopened.lookup(&request).await.unwrap().is_none());
        reopened.close().await.unwrap();
    }
}
