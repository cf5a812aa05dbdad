//! Input file discovery

use std::path::{Path, PathBuf};
use log::{debug, warn};
use walkdir::WalkDir;

/// A file found under a discovery root, with its position in the sorted listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub index: usize,
    pub path: PathBuf,
}

impl DiscoveredFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Case-sensitive `*.{ext}` match on the file name.
///
/// Multi-dot extensions (`ogg.opus`) and bare names (`.wav`) match too.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    extensions.iter().any(|ext| {
        name.strip_suffix(ext.as_str())
            .is_some_and(|stem| stem.ends_with('.'))
    })
}

/// Recursively lists files under `root` whose extension is one of `extensions`.
///
/// Paths are sorted so indices are reproducible across filesystems. Directory
/// symlinks are not followed; unreadable entries are skipped with a warning.
pub fn discover_files(root: &Path, extensions: &[String]) -> Vec<DiscoveredFile> {
    let mut paths: Vec<PathBuf> = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        // `Path::is_file` resolves file symlinks; directory links are never descended.
        let path = entry.path();
        if path.is_file() && has_extension(path, extensions) {
            paths.push(path.to_path_buf());
        }
    }

    paths.sort();
    debug!("Discovered {} files under {}", paths.len(), root.display());

    paths
        .into_iter()
        .enumerate()
        .map(|(index, path)| DiscoveredFile { index, path })
        .collect()
}
