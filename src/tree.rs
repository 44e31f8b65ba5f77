use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::file_types::FileFilter;
use crate::filesystem::{join_path, Storage};
use crate::models::{ExpandedSet, NodeKind, StorageEntry, TreeNode};

/// Primary sort key for a name: decomposed, stripped of accents, lowercased.
pub fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Orders two entries of the same folder: folders before files, then by name.
///
/// Names compare on their accent- and case-folded form first, so "Éclair"
/// sorts with the e's. Lowercase, then exact comparisons break ties so the
/// order stays total.
pub fn compare_entries(a_kind: NodeKind, a_name: &str, b_kind: NodeKind, b_name: &str) -> Ordering {
    match (a_kind, b_kind) {
        (NodeKind::Folder, NodeKind::File) => Ordering::Less,
        (NodeKind::File, NodeKind::Folder) => Ordering::Greater,
        _ => collation_key(a_name)
            .cmp(&collation_key(b_name))
            .then_with(|| a_name.to_lowercase().cmp(&b_name.to_lowercase()))
            .then_with(|| a_name.cmp(b_name)),
    }
}

/// Builds a snapshot of the whole vault, starting at the storage root.
///
/// Folders whose path is in `expanded` come out expanded. A folder that
/// cannot be listed is left out of the snapshot and the walk continues with
/// its siblings; if the root itself cannot be listed the result is empty.
pub fn build_tree<S: Storage>(
    storage: &S,
    expanded: &ExpandedSet,
    filter: FileFilter,
) -> Vec<TreeNode<S::Handle>> {
    let root = storage.root();
    match build_children(storage, &root, "", expanded, filter) {
        Ok(nodes) => nodes,
        Err(e) => {
            log::warn!("Could not list vault root: {}", e);
            Vec::new()
        }
    }
}

fn build_children<S: Storage>(
    storage: &S,
    folder: &S::Handle,
    folder_path: &str,
    expanded: &ExpandedSet,
    filter: FileFilter,
) -> Result<Vec<TreeNode<S::Handle>>> {
    let mut entries: Vec<StorageEntry<S::Handle>> = storage.list_children(folder)?;
    entries.sort_by(|a, b| compare_entries(a.kind, &a.name, b.kind, &b.name));

    let mut nodes = Vec::with_capacity(entries.len());
    for entry in entries {
        let path = join_path(folder_path, &entry.name);
        match entry.kind {
            NodeKind::Folder => {
                match build_children(storage, &entry.handle, &path, expanded, filter) {
                    Ok(children) => nodes.push(TreeNode {
                        expanded: expanded.contains(&path),
                        name: entry.name,
                        path,
                        kind: NodeKind::Folder,
                        children,
                        handle: entry.handle,
                    }),
                    Err(e) => log::warn!("Skipping folder '{}': {}", path, e),
                }
            }
            NodeKind::File if filter.accepts(&entry.name) => nodes.push(TreeNode {
                name: entry.name,
                path,
                kind: NodeKind::File,
                children: Vec::new(),
                expanded: false,
                handle: entry.handle,
            }),
            NodeKind::File => {}
        }
    }
    Ok(nodes)
}

/// Paths of every node in pre-order, folders first at each level.
pub fn walk_paths<H>(nodes: &[TreeNode<H>]) -> Vec<String> {
    let mut paths = Vec::new();
    for node in nodes {
        paths.push(node.path.clone());
        paths.extend(walk_paths(&node.children));
    }
    paths
}
