//! Rebuilds the nested directory structure from a flat recursive listing.

use std::collections::BTreeMap;

use tracing::debug;

use crate::api::{EntryKind, PathEntry};
use crate::error::{RepoTreeError, Result};

/// One directory: its own files, in listing order, and its subdirectories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    pub files: Vec<String>,
    pub subdirs: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    /// Returns the subdirectory `name`, creating it if missing.
    fn subdir_mut(&mut self, name: &str, path: &str) -> Result<&mut TreeNode> {
        if self.files.iter().any(|f| f == name) {
            return Err(RepoTreeError::PathConflict(path.to_string()));
        }
        Ok(self.subdirs.entry(name.to_string()).or_default())
    }

    fn add_file(&mut self, name: &str, path: &str) -> Result<()> {
        if self.subdirs.contains_key(name) {
            return Err(RepoTreeError::PathConflict(path.to_string()));
        }
        if !self.files.iter().any(|f| f == name) {
            self.files.push(name.to_string());
        }
        Ok(())
    }

    /// Number of files and directories below this node.
    pub fn len(&self) -> usize {
        self.files.len()
            + self
                .subdirs
                .values()
                .map(|d| 1 + d.len())
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.subdirs.is_empty()
    }
}

/// The root directory, named after the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTree {
    pub name: String,
    pub root: TreeNode,
}

impl RepoTree {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: TreeNode::default(),
        }
    }

    /// Inserts one listing entry, creating any missing parent directories.
    pub fn insert(&mut self, entry: &PathEntry) -> Result<()> {
        let segments: Vec<&str> = entry.path.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(RepoTreeError::MalformedEntry(entry.path.clone()));
        }
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(RepoTreeError::MalformedEntry(entry.path.clone()));
        };

        let mut current = &mut self.root;
        for part in parents {
            current = current.subdir_mut(part, &entry.path)?;
        }

        match entry.kind {
            EntryKind::Directory => {
                current.subdir_mut(leaf, &entry.path)?;
            }
            EntryKind::File => current.add_file(leaf, &entry.path)?,
            EntryKind::Submodule | EntryKind::Other => {
                debug!(path = %entry.path, kind = ?entry.kind, "Skipping non-file tree entry");
            }
        }
        Ok(())
    }
}

/// Builds the tree for `repo_name` from a flat listing, in any order.
pub fn build_tree<'a, I>(repo_name: &str, entries: I) -> Result<RepoTree>
where
    I: IntoIterator<Item = &'a PathEntry>,
{
    let mut tree = RepoTree::new(repo_name);
    for entry in entries {
        tree.insert(entry)?;
    }
    debug!(repo = repo_name, nodes = tree.root.len(), "Built repository tree");
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> PathEntry {
        PathEntry::new(path, EntryKind::File)
    }

    fn dir(path: &str) -> PathEntry {
        PathEntry::new(path, EntryKind::Directory)
    }

    #[test]
    fn parents_are_synthesized() {
        let tree = build_tree("demo", &[file("a/b/c.txt")]).unwrap();
        let b = &tree.root.subdirs["a"].subdirs["b"];
        assert_eq!(b.files, vec!["c.txt"]);
        assert!(b.subdirs.is_empty());
        assert!(tree.root.files.is_empty());
        assert!(tree.root.subdirs["a"].files.is_empty());
    }

    #[test]
    fn directory_creation_is_idempotent() {
        let once = build_tree("demo", &[dir("src"), file("src/lib.rs")]).unwrap();
        let twice = build_tree("demo", &[dir("src"), dir("src"), file("src/lib.rs")]).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_directories_are_kept() {
        let tree = build_tree("demo", &[dir("empty")]).unwrap();
        assert!(tree.root.subdirs["empty"].is_empty());
    }

    #[test]
    fn demo_listing_matches_expected_structure() {
        let entries = [file("src/main.py"), dir("src"), file("README.md")];
        let tree = build_tree("demo", &entries).unwrap();
        assert_eq!(tree.name, "demo");
        assert_eq!(tree.root.files, vec!["README.md"]);
        assert_eq!(tree.root.subdirs.len(), 1);
        assert_eq!(tree.root.subdirs["src"].files, vec!["main.py"]);
        assert!(tree.root.subdirs["src"].subdirs.is_empty());
    }

    #[test]
    fn files_keep_listing_order() {
        let tree = build_tree("demo", &[file("b.txt"), file("a.txt"), file("b.txt")]).unwrap();
        assert_eq!(tree.root.files, vec!["b.txt", "a.txt"]);
    }

    #[test]
    fn file_and_directory_with_same_name_conflict() {
        let err = build_tree("demo", &[file("x"), file("x/y")]).unwrap_err();
        assert!(matches!(err, RepoTreeError::PathConflict(p) if p == "x/y"));

        let err = build_tree("demo", &[dir("x"), file("x")]).unwrap_err();
        assert!(matches!(err, RepoTreeError::PathConflict(_)));
    }

    #[test]
    fn empty_segments_are_rejected() {
        for path in ["", "a//b", "/a", "a/"] {
            let err = build_tree("demo", &[file(path)]).unwrap_err();
            assert!(matches!(err, RepoTreeError::MalformedEntry(_)), "{:?}", path);
        }
    }

    #[test]
    fn submodules_create_parents_only() {
        let entries = [PathEntry::new("vendor/lib", EntryKind::Submodule)];
        let tree = build_tree("demo", &entries).unwrap();
        let vendor = &tree.root.subdirs["vendor"];
        assert!(vendor.is_empty());
    }

    #[test]
    fn len_counts_files_and_directories() {
        let tree = build_tree("demo", &[file("a/b/c.txt"), file("d.txt")]).unwrap();
        assert_eq!(tree.root.len(), 4);
    }
}
