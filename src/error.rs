/// Errors raised while reading or mutating the vault.
///
/// None of these are fatal: the view catches every error at the action
/// boundary, reports it (or ignores it, for [`ExplorerError::UserInput`]) and
/// stays interactive.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExplorerError {
    /// A folder listing or file read failed. The builder skips the subtree.
    #[error("Failed to read '{path}': {message}")]
    StorageRead { path: String, message: String },

    /// A rename, create or delete failed. The action is aborted.
    #[error("Failed to {action} '{path}': {message}")]
    StorageMutation {
        action: &'static str,
        path: String,
        message: String,
    },

    /// Empty or unchanged input submitted to a dialog.
    #[error("Nothing to do: {0}")]
    UserInput(String),

    /// A name the vault cannot hold (separators, traversal).
    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl ExplorerError {
    pub fn read(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::StorageRead {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn mutation(
        action: &'static str,
        path: impl Into<String>,
        err: impl std::fmt::Display,
    ) -> Self {
        Self::StorageMutation {
            action,
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Whether the error should be surfaced to the user as a notice.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::UserInput(_))
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_message_names_action_and_path() {
        let err = ExplorerError::mutation("rename", "Notes/a.md", "permission denied");
        assert_eq!(
            err.to_string(),
            "Failed to rename 'Notes/a.md': permission denied"
        );
    }

    #[test]
    fn test_user_input_is_silent() {
        assert!(!ExplorerError::UserInput("empty name".into()).is_user_visible());
        assert!(ExplorerError::InvalidName("a/b".into()).is_user_visible());
        assert!(ExplorerError::read("x", "gone").is_user_visible());
    }
}
