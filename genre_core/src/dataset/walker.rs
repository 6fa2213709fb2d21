//! Dataset directory traversal
//!
//! Yields one [`DirListing`] per directory, root first, parents before their
//! children. Entries are sorted by file name so an unchanged tree is always
//! visited in the same order.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{PrepError, Result};

/// One directory together with its immediate children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirListing {
    pub dir: PathBuf,
    /// Distance from the dataset root (the root itself is 0)
    pub depth: usize,
    pub subdirs: Vec<String>,
    pub files: Vec<PathBuf>,
}

impl DirListing {
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    /// Final path component, used as the semantic label of a genre directory
    pub fn name(&self) -> String {
        self.dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.dir.display().to_string())
    }
}

/// Lazy pre-order walk over every directory below (and including) a root
pub struct DatasetWalk {
    dirs: walkdir::IntoIter,
}

/// Start walking `root`.
pub fn walk(root: &Path) -> Result<DatasetWalk> {
    if !root.exists() {
        return Err(PrepError::RootNotFound(root.to_path_buf()));
    }

    if !root.is_dir() {
        return Err(PrepError::NotADirectory(root.to_path_buf()));
    }

    let dirs = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    Ok(DatasetWalk { dirs })
}

impl Iterator for DatasetWalk {
    type Item = Result<DirListing>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.dirs.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            let depth = entry.depth();
            return Some(list_dir(entry.into_path(), depth));
        }
    }
}

fn list_dir(dir: PathBuf, depth: usize) -> Result<DirListing> {
    let mut subdirs = Vec::new();
    let mut files = Vec::new();

    let children = WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in children {
        let entry = entry?;
        // Symlinked directories are listed but never descended into.
        if entry.path().is_dir() {
            subdirs.push(entry.file_name().to_string_lossy().into_owned());
        } else {
            files.push(entry.into_path());
        }
    }

    Ok(DirListing {
        dir,
        depth,
        subdirs,
        files,
    })
}
