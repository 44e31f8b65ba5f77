//! Context menu actions run against the vault.
//!
//! Each function validates the user's input, performs one storage call and
//! reports what changed. Empty
//! or unchanged input comes back as [`ExplorerError::UserInput`], which the
//! view treats as a silent no-op.

use crate::error::{ExplorerError, Result};
use crate::file_types::{extension_of, file_stem};
use crate::filesystem::{base_name, join_path, parent_path, validate_name, Storage};
use crate::models::{NodeKind, TreeNode};

/// Upper bound on " copy N" suffixes tried when duplicating
const MAX_DUPLICATE_ATTEMPTS: usize = 1000;

/// What a successful action changed in the vault
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Renamed { from: String, to: String },
    Created { path: String },
    Deleted { path: String },
}

/// Trims dialog input, rejecting empty submissions.
pub fn normalize_input(input: &str) -> Result<&str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ExplorerError::UserInput("empty name".to_string()));
    }
    Ok(trimmed)
}

/// Appends `.ext` unless the name already ends with it (case-insensitively).
pub fn with_default_extension(name: &str, ext: &str) -> String {
    let ext = ext.trim_start_matches('.');
    if ext.is_empty() || extension_of(name).as_deref() == Some(ext.to_lowercase().as_str()) {
        name.to_string()
    } else {
        format!("{}.{}", name, ext)
    }
}

/// Name of the `n`th duplicate of `name`: "a copy.md", "a copy 2.md", ...
pub fn duplicate_name(name: &str, n: usize) -> String {
    let stem = file_stem(name);
    let ext = &name[stem.len()..];
    if n <= 1 {
        format!("{} copy{}", stem, ext)
    } else {
        format!("{} copy {}{}", stem, n, ext)
    }
}

/// Renames a file or folder in place. A file keeps its extension when the
/// new name has none.
pub fn rename_entry<S: Storage>(storage: &S, node: &TreeNode<S::Handle>, input: &str) -> Result<ActionOutcome> {
    let typed = normalize_input(input)?;
    let new_name = match (node.kind, extension_of(&node.name)) {
        (NodeKind::File, Some(ext)) if extension_of(typed).is_none() => format!("{}.{}", typed, ext),
        _ => typed.to_string(),
    };
    if new_name == node.name {
        return Err(ExplorerError::UserInput("name unchanged".to_string()));
    }
    validate_name(&new_name)?;

    let to = join_path(parent_path(&node.path), &new_name);
    storage.rename(&node.handle, &to)?;
    Ok(ActionOutcome::Renamed {
        from: node.path.clone(),
        to,
    })
}

pub fn create_subfolder<S: Storage>(storage: &S, folder: &TreeNode<S::Handle>, input: &str) -> Result<ActionOutcome> {
    let name = validate_name(normalize_input(input)?)?;
    let path = join_path(&folder.path, name);
    storage.create_folder(&path)?;
    Ok(ActionOutcome::Created { path })
}

/// Creates an empty file in `folder`, adding the default extension once.
pub fn create_file<S: Storage>(
    storage: &S,
    folder: &TreeNode<S::Handle>,
    input: &str,
    default_extension: &str,
) -> Result<ActionOutcome> {
    let name = with_default_extension(normalize_input(input)?, default_extension);
    validate_name(&name)?;
    let path = join_path(&folder.path, &name);
    storage.create_file(&path, "")?;
    Ok(ActionOutcome::Created { path })
}

/// Copies a file, byte for byte, next to itself under the first free "copy" name.
pub fn duplicate_file<S: Storage>(storage: &S, node: &TreeNode<S::Handle>) -> Result<ActionOutcome> {
    let parent = parent_path(&node.path);

    let path = (1..=MAX_DUPLICATE_ATTEMPTS)
        .map(|n| join_path(parent, &duplicate_name(&node.name, n)))
        .find(|candidate| !storage.exists(candidate))
        .ok_or_else(|| ExplorerError::mutation("duplicate", &node.path, "no free name for the copy"))?;

    storage.copy(&node.handle, &path)?;
    Ok(ActionOutcome::Created { path })
}

/// Moves a file into the folder at `destination` (`""` or `/` for the root).
pub fn move_file<S: Storage>(storage: &S, node: &TreeNode<S::Handle>, destination: &str) -> Result<ActionOutcome> {
    let destination = destination.trim().trim_matches('/');
    if destination == parent_path(&node.path) {
        return Err(ExplorerError::UserInput("destination unchanged".to_string()));
    }
    if !destination.is_empty() {
        for component in destination.split('/') {
            validate_name(component)?;
        }
        if !storage.exists(destination) {
            return Err(ExplorerError::mutation(
                "move",
                &node.path,
                format!("folder '{}' does not exist", destination),
            ));
        }
    }

    let to = join_path(destination, base_name(&node.path));
    storage.rename(&node.handle, &to)?;
    Ok(ActionOutcome::Renamed {
        from: node.path.clone(),
        to,
    })
}

/// Moves a file or folder to the trash.
pub fn delete_entry<S: Storage>(storage: &S, node: &TreeNode<S::Handle>) -> Result<ActionOutcome> {
    storage.trash(&node.handle)?;
    Ok(ActionOutcome::Deleted {
        path: node.path.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_types::FileFilter;
    use crate::filesystem::LocalVault;
    use crate::models::{find_node, ExpandedSet};
    use crate::tree::build_tree;
    use proptest::prelude::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn vault_with(files: &[&str]) -> (tempfile::TempDir, LocalVault) {
        let temp_dir = tempdir().unwrap();
        for file in files {
            let path = temp_dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, format!("body of {}", file)).unwrap();
        }
        let vault = LocalVault::new(temp_dir.path());
        (temp_dir, vault)
    }

    fn node(vault: &LocalVault, path: &str) -> TreeNode<PathBuf> {
        let tree = build_tree(vault, &ExpandedSet::new(), FileFilter::AllFiles);
        find_node(&tree, path).cloned().unwrap()
    }

    fn root_node(vault: &LocalVault) -> TreeNode<PathBuf> {
        TreeNode {
            name: String::new(),
            path: String::new(),
            kind: NodeKind::Folder,
            children: vec![],
            expanded: true,
            handle: vault.root(),
        }
    }

    #[test]
    fn test_with_default_extension_once() {
        assert_eq!(with_default_extension("note", "md"), "note.md");
        assert_eq!(with_default_extension("note.md", "md"), "note.md");
        assert_eq!(with_default_extension("note.MD", "md"), "note.MD");
        assert_eq!(with_default_extension("note.txt", "md"), "note.txt.md");
        assert_eq!(with_default_extension("note", ".md"), "note.md");
    }

    #[test]
    fn test_duplicate_name() {
        assert_eq!(duplicate_name("a.md", 1), "a copy.md");
        assert_eq!(duplicate_name("a.md", 3), "a copy 3.md");
        assert_eq!(duplicate_name("README", 2), "README copy 2");
    }

    #[test]
    fn test_empty_or_unchanged_input_is_user_error() {
        let (_temp_dir, vault) = vault_with(&["a.md"]);
        let a = node(&vault, "a.md");

        assert!(matches!(rename_entry(&vault, &a, "   "), Err(ExplorerError::UserInput(_))));
        assert!(matches!(rename_entry(&vault, &a, "a.md"), Err(ExplorerError::UserInput(_))));
        assert!(matches!(rename_entry(&vault, &a, "a"), Err(ExplorerError::UserInput(_))));
        assert!(vault.exists("a.md"));
    }

    #[test]
    fn test_rename_keeps_extension() {
        let (_temp_dir, vault) = vault_with(&["Notes/a.md"]);
        let a = node(&vault, "Notes/a.md");

        let outcome = rename_entry(&vault, &a, "b").unwrap();
        assert_eq!(
            outcome,
            ActionOutcome::Renamed { from: "Notes/a.md".into(), to: "Notes/b.md".into() }
        );
        assert!(vault.exists("Notes/b.md"));
    }

    #[test]
    fn test_rename_folder() {
        let (_temp_dir, vault) = vault_with(&["Old/a.md"]);
        let folder = node(&vault, "Old");
        rename_entry(&vault, &folder, "New").unwrap();
        assert!(vault.exists("New/a.md"));
        assert!(!vault.exists("Old"));
    }

    #[test]
    fn test_rename_rejects_separator() {
        let (_temp_dir, vault) = vault_with(&["a.md"]);
        let a = node(&vault, "a.md");
        let err = rename_entry(&vault, &a, "x/y.md").unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidName(_)));
        assert!(vault.exists("a.md"));
    }

    #[test]
    fn test_rename_onto_existing_fails_without_change() {
        let (_temp_dir, vault) = vault_with(&["a.md", "b.md"]);
        let a = node(&vault, "a.md");
        let err = rename_entry(&vault, &a, "b.md").unwrap_err();
        assert!(matches!(err, ExplorerError::StorageMutation { .. }));
        assert!(vault.exists("a.md"));
    }

    #[test]
    fn test_create_file_appends_extension_once() {
        let (_temp_dir, vault) = vault_with(&["Notes/a.md"]);
        let notes = node(&vault, "Notes");

        create_file(&vault, &notes, "note", "md").unwrap();
        create_file(&vault, &notes, "typed.md", "md").unwrap();

        assert!(vault.exists("Notes/note.md"));
        assert!(vault.exists("Notes/typed.md"));
        assert!(!vault.exists("Notes/typed.md.md"));
    }

    #[test]
    fn test_create_at_root_and_subfolder() {
        let (_temp_dir, vault) = vault_with(&[]);
        let root = root_node(&vault);

        assert_eq!(
            create_subfolder(&vault, &root, " Projects ").unwrap(),
            ActionOutcome::Created { path: "Projects".into() }
        );
        assert!(vault.exists("Projects"));
        assert!(matches!(create_subfolder(&vault, &root, ""), Err(ExplorerError::UserInput(_))));
    }

    #[test]
    fn test_duplicate_picks_free_name() {
        let (_temp_dir, vault) = vault_with(&["Notes/a.md", "Notes/a copy.md"]);
        let a = node(&vault, "Notes/a.md");

        let outcome = duplicate_file(&vault, &a).unwrap();
        assert_eq!(outcome, ActionOutcome::Created { path: "Notes/a copy 2.md".into() });
        let copy = vault.resolve("Notes/a copy 2.md").unwrap();
        assert_eq!(vault.read_text(&copy).unwrap(), "body of Notes/a.md");
    }

    #[test]
    fn test_duplicate_binary_file() {
        let (temp_dir, vault) = vault_with(&[]);
        let bytes: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0xff, 0xd8];
        fs::write(temp_dir.path().join("photo.png"), &bytes).unwrap();
        let photo = node(&vault, "photo.png");

        let outcome = duplicate_file(&vault, &photo).unwrap();
        assert_eq!(outcome, ActionOutcome::Created { path: "photo copy.png".into() });
        assert_eq!(fs::read(temp_dir.path().join("photo copy.png")).unwrap(), bytes);
    }

    #[test]
    fn test_hidden_names_are_rejected() {
        let (temp_dir, vault) = vault_with(&["Notes/a.md", "b.md"]);
        let notes = node(&vault, "Notes");
        let b = node(&vault, "b.md");

        let invalid = |result: Result<ActionOutcome>| matches!(result, Err(ExplorerError::InvalidName(_)));
        assert!(invalid(rename_entry(&vault, &notes, ".trash")));
        assert!(invalid(rename_entry(&vault, &b, ".b.md")));
        assert!(invalid(create_subfolder(&vault, &notes, ".hidden")));
        assert!(invalid(create_file(&vault, &notes, ".draft", "md")));
        assert!(invalid(move_file(&vault, &b, ".trash")));

        assert!(!temp_dir.path().join(".trash").exists());
        delete_entry(&vault, &b).unwrap();
        let trashed: Vec<String> = fs::read_dir(&vault.trash_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(trashed, vec!["b.md".to_string()]);
        assert!(vault.exists("Notes/a.md"));
    }

    #[test]
    fn test_move_file_between_folders() {
        let (_temp_dir, vault) = vault_with(&["Notes/a.md", "Projects/x.md"]);
        let a = node(&vault, "Notes/a.md");

        assert!(matches!(move_file(&vault, &a, "Notes"), Err(ExplorerError::UserInput(_))));
        assert!(matches!(move_file(&vault, &a, "Nowhere"), Err(ExplorerError::StorageMutation { .. })));

        move_file(&vault, &a, "/Projects/").unwrap();
        assert!(vault.exists("Projects/a.md"));

        let moved = node(&vault, "Projects/a.md");
        move_file(&vault, &moved, "").unwrap();
        assert!(vault.exists("a.md"));
    }

    #[test]
    fn test_delete_moves_to_trash() {
        let (_temp_dir, vault) = vault_with(&["Notes/a.md", "Notes/Sub/b.md", "keep.md"]);
        let notes = node(&vault, "Notes");

        let outcome = delete_entry(&vault, &notes).unwrap();
        assert_eq!(outcome, ActionOutcome::Deleted { path: "Notes".into() });

        let tree = build_tree(&vault, &ExpandedSet::new(), FileFilter::MarkdownOnly);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].path, "keep.md");
        assert!(vault.trash_dir.join("Notes").join("Sub").join("b.md").exists());
    }

    #[test]
    fn test_rename_round_trip_restores_snapshot() {
        let (_temp_dir, vault) = vault_with(&["Notes/A.md", "Notes/c.md", "Other/x.md"]);
        let expanded: ExpandedSet = ["Notes".to_string()].into_iter().collect();
        let before = build_tree(&vault, &expanded, FileFilter::MarkdownOnly);

        let a = find_node(&before, "Notes/A.md").cloned().unwrap();
        rename_entry(&vault, &a, "B.md").unwrap();
        let middle = build_tree(&vault, &expanded, FileFilter::MarkdownOnly);
        assert!(find_node(&middle, "Notes/A.md").is_none());

        let b = find_node(&middle, "Notes/B.md").cloned().unwrap();
        rename_entry(&vault, &b, "A.md").unwrap();
        let after = build_tree(&vault, &expanded, FileFilter::MarkdownOnly);

        assert_eq!(before, after);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The default extension appears exactly once whether or not it was typed.
        #[test]
        fn prop_default_extension_exactly_once(stem in "[a-zA-Z0-9 _-]{1,20}", typed in any::<bool>()) {
            let input = if typed { format!("{}.md", stem) } else { stem.clone() };
            let name = with_default_extension(&input, "md");
            prop_assert_eq!(name, format!("{}.md", stem));
        }
    }
}
