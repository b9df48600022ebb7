//! Recursive directory traversal.

use std::path::{Path, PathBuf};

use coffer_common::Result;

/// Collect every file beneath `dir`, descending into subdirectories.
///
/// Only files are returned; symlinks are not followed.
pub async fn walk(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];

    while let Some(current) = stack.pop() {
        let mut entries = tokio::fs::read_dir(&current).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                stack.push(entry.path());
            } else if file_type.is_file() {
                files.push(entry.path());
            }
        }
    }

    Ok(files)
}

/// Synchronous variant of [`walk`].
pub fn walk_sync(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];

    while let Some(current) = stack.pop() {
        for entry in std::fs::read_dir(&current)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                stack.push(entry.path());
            } else if file_type.is_file() {
                files.push(entry.path());
            }
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_common::Error;

    async fn build_tree(root: &Path) {
        tokio::fs::create_dir_all(root.join("sub/deep")).await.unwrap();
        tokio::fs::write(root.join("a.txt"), b"a").await.unwrap();
        tokio::fs::write(root.join("sub/b.txt"), b"b").await.unwrap();
        tokio::fs::write(root.join("sub/deep/c.txt"), b"c").await.unwrap();
    }

    fn sorted_names(mut paths: Vec<PathBuf>) -> Vec<String> {
        paths.sort();
        paths
            .into_iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect()
    }

    #[tokio::test]
    async fn test_walk_collects_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        build_tree(dir.path()).await;

        let files = walk(dir.path()).await.unwrap();

        assert_eq!(files.len(), 3);
        assert_eq!(sorted_names(files), vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[tokio::test]
    async fn test_walk_sync_matches_async() {
        let dir = tempfile::tempdir().unwrap();
        build_tree(dir.path()).await;

        let mut async_files = walk(dir.path()).await.unwrap();
        let mut sync_files = walk_sync(dir.path()).unwrap();
        async_files.sort();
        sync_files.sort();

        assert_eq!(async_files, sync_files);
    }

    #[tokio::test]
    async fn test_walk_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(walk(dir.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_walk_missing_directory_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        assert!(matches!(walk(&missing).await, Err(Error::Io(_))));
    }
}
