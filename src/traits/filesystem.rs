use anyhow::{Context, Result};
#[cfg(test)]
use std::collections::HashMap;
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::sync::{Arc, RwLock};

/// Trait for filesystem operations to enable testing with mocks
pub trait FileSystem: Send + Sync {
    /// Read file contents as string
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write string contents to file
    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    /// Write raw bytes to file
    fn write_bytes(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Create directory and all parent directories
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Remove directory and all its contents
    fn remove_dir_all(&self, path: &Path) -> Result<()>;

    /// Move a file, replacing the destination if it exists
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Check if path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file
    fn is_file(&self, path: &Path) -> bool;

    /// Walk directory recursively and return every entry below it
    fn walk_dir(&self, path: &Path, max_depth: usize) -> Result<Vec<PathBuf>>;
}

/// Real filesystem implementation using std::fs
pub struct RealFileSystem;

impl RealFileSystem {
    fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create parent directory: {:?}", parent))?;
        }

        Ok(())
    }
}

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        Self::ensure_parent(path)?;
        std::fs::write(path, contents).with_context(|| format!("Failed to write file: {:?}", path))
    }

    fn write_bytes(&self, path: &Path, contents: &[u8]) -> Result<()> {
        Self::ensure_parent(path)?;
        std::fs::write(path, contents).with_context(|| format!("Failed to write file: {:?}", path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {:?}", path))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory: {:?}", path))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        Self::ensure_parent(to)?;

        // rename fails across mount points (the scratch dir usually lives in /tmp)
        if std::fs::rename(from, to).is_err() {
            std::fs::copy(from, to)
                .with_context(|| format!("Failed to move {:?} to {:?}", from, to))?;
            std::fs::remove_file(from)
                .with_context(|| format!("Failed to remove file: {:?}", from))?;
        }

        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn walk_dir(&self, path: &Path, max_depth: usize) -> Result<Vec<PathBuf>> {
        use walkdir::WalkDir;

        let mut paths = Vec::new();
        for entry in WalkDir::new(path).max_depth(max_depth) {
            let entry = entry.context("Failed to walk directory")?;
            paths.push(entry.path().to_path_buf());
        }

        Ok(paths)
    }
}

/// Mock filesystem implementation for testing (in-memory)
#[cfg(test)]
pub struct MockFileSystem {
    files: Arc<RwLock<HashMap<PathBuf, Vec<u8>>>>,
    directories: Arc<RwLock<HashMap<PathBuf, ()>>>,
}

#[cfg(test)]
#[allow(dead_code)]
impl MockFileSystem {
    /// Create new empty mock filesystem
    pub fn new() -> Self {
        Self {
            files: Arc::new(RwLock::new(HashMap::new())),
            directories: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get captured file contents for testing assertions
    pub fn get_file_contents(&self, path: &Path) -> Option<String> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Raw bytes of a written file
    pub fn get_file_bytes(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.read().unwrap().get(path).cloned()
    }

    /// Check if file was written
    pub fn has_file(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    /// List all files in mock filesystem
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.files.read().unwrap().keys().cloned().collect()
    }
}

#[cfg(test)]
impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = self
            .get_file_bytes(path)
            .with_context(|| format!("File not found in mock filesystem: {:?}", path))?;
        String::from_utf8(bytes).with_context(|| format!("File is not UTF-8: {:?}", path))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        self.write_bytes(path, contents.as_bytes())
    }

    fn write_bytes(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }

        self.files
            .write()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut directories = self.directories.write().unwrap();
        directories.insert(path.to_path_buf(), ());

        let mut current = path;
        while let Some(parent) = current.parent() {
            directories.insert(parent.to_path_buf(), ());
            current = parent;
        }

        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        self.directories
            .write()
            .unwrap()
            .retain(|dir_path, _| !dir_path.starts_with(path));
        self.files
            .write()
            .unwrap()
            .retain(|file_path, _| !file_path.starts_with(path));

        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let contents = self
            .files
            .write()
            .unwrap()
            .remove(from)
            .with_context(|| format!("File not found in mock filesystem: {:?}", from))?;

        self.write_bytes(to, &contents)
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
            || self.directories.read().unwrap().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    fn walk_dir(&self, path: &Path, max_depth: usize) -> Result<Vec<PathBuf>> {
        let files = self.files.read().unwrap();
        let directories = self.directories.read().unwrap();

        let mut entries = Vec::new();

        if directories.contains_key(path) {
            entries.push(path.to_path_buf());
        }

        let candidates = files.keys().chain(directories.keys());
        for entry_path in candidates {
            if entry_path == path {
                continue;
            }

            if let Ok(relative) = entry_path.strip_prefix(path)
                && relative.components().count() <= max_depth
            {
                entries.push(entry_path.clone());
            }
        }

        entries.sort();
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_rename_moves_contents() {
        let fs = MockFileSystem::new();
        let from = PathBuf::from("/scratch/sumologic/dashboard/dashboard.tf");
        let to = PathBuf::from("/dest/resources/dashboards.tf");
        fs.write(&from, "resource {}").unwrap();

        fs.rename(&from, &to).unwrap();

        assert!(!fs.has_file(&from));
        assert_eq!(fs.get_file_contents(&to).as_deref(), Some("resource {}"));
        assert!(fs.exists(Path::new("/dest/resources")));
    }

    #[test]
    fn test_mock_remove_dir_all_drops_nested_files() {
        let fs = MockFileSystem::new();
        fs.write(Path::new("/scratch/a/b.tf"), "x").unwrap();
        fs.write(Path::new("/keep/c.tf"), "y").unwrap();

        fs.remove_dir_all(Path::new("/scratch")).unwrap();

        assert!(!fs.exists(Path::new("/scratch/a/b.tf")));
        assert!(!fs.exists(Path::new("/scratch")));
        assert!(fs.exists(Path::new("/keep/c.tf")));
    }

    #[test]
    fn test_mock_walk_dir_respects_depth() {
        let fs = MockFileSystem::new();
        fs.write(Path::new("/root/one.tf"), "").unwrap();
        fs.write(Path::new("/root/nested/deeper/two.tf"), "").unwrap();

        let shallow = fs.walk_dir(Path::new("/root"), 1).unwrap();
        assert!(shallow.contains(&PathBuf::from("/root/one.tf")));
        assert!(!shallow.contains(&PathBuf::from("/root/nested/deeper/two.tf")));

        let deep = fs.walk_dir(Path::new("/root"), 3).unwrap();
        assert!(deep.contains(&PathBuf::from("/root/nested/deeper/two.tf")));
    }

    #[test]
    fn test_real_filesystem_rename_creates_parent() {
        let temp = tempfile::tempdir().unwrap();
        let from = temp.path().join("scratch/dashboard.tf");
        let to = temp.path().join("dest/resources/dashboards.tf");
        let fs = RealFileSystem;
        fs.write(&from, "content").unwrap();

        fs.rename(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(fs.read_to_string(&to).unwrap(), "content");
    }
}
