// Command tree construction error types

use thiserror::Error;

/// Result type for tree construction operations
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors raised while building a command tree
///
/// All of these are fatal at construction time; a program with a malformed
/// tree must not start serving completion requests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Two sibling commands were registered under the same name
    #[error("duplicate command '{name}' under '{parent}'")]
    DuplicateName { parent: String, name: String },

    /// Attempt to attach a node that already has a parent
    #[error("command '{0}' already has a parent")]
    AlreadyParented(String),

    /// Two flags with the same name were registered on one command
    #[error("duplicate flag '--{flag}' on command '{command}'")]
    DuplicateFlag { command: String, flag: String },
}
