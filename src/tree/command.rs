// Command node definition and construction input

use std::fmt;
use std::sync::Arc;

use crate::tree::arena::CommandId;
use crate::tree::flag::{Completer, CompletionBehavior, FlagSet};

/// Action executed when a command is dispatched outside completion mode
pub type RunFn = Arc<dyn Fn(&[String]) + Send + Sync>;

/// Construction input for a single command node
pub struct CommandSpec {
    pub(crate) name: String,
    pub(crate) short: Option<String>,
    pub(crate) run: Option<RunFn>,
    pub(crate) args_completion: CompletionBehavior,
}

impl CommandSpec {
    /// Start a spec for a command with the given name (the token users type)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short: None,
            run: None,
            args_completion: CompletionBehavior::None,
        }
    }

    /// Attach a one-line description, shown next to the name in listings
    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = Some(short.into());
        self
    }

    /// Attach a run action
    pub fn run<F>(mut self, run: F) -> Self
    where
        F: Fn(&[String]) + Send + Sync + 'static,
    {
        self.run = Some(Arc::new(run));
        self
    }

    /// Attach an argument-completion callback
    pub fn complete_args_with(mut self, completer: Completer) -> Self {
        self.args_completion = CompletionBehavior::Function(completer);
        self
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("short", &self.short)
            .finish_non_exhaustive()
    }
}

/// A command node stored in the tree arena
pub struct CommandNode {
    pub(crate) name: String,
    pub(crate) short: Option<String>,
    pub(crate) parent: Option<CommandId>,
    pub(crate) children: Vec<CommandId>,
    pub(crate) run: Option<RunFn>,
    pub(crate) args_completion: CompletionBehavior,
    pub(crate) flags: FlagSet,
    pub(crate) persistent_flags: FlagSet,
}

impl CommandNode {
    pub(crate) fn from_spec(spec: CommandSpec) -> Self {
        Self {
            name: spec.name,
            short: spec.short,
            parent: None,
            children: Vec::new(),
            run: spec.run,
            args_completion: spec.args_completion,
            flags: FlagSet::default(),
            persistent_flags: FlagSet::default(),
        }
    }

    /// Literal token users type to reach this command
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line description, if any
    pub fn short(&self) -> Option<&str> {
        self.short.as_deref()
    }

    /// Parent id, `None` for the root or a detached node
    pub fn parent(&self) -> Option<CommandId> {
        self.parent
    }

    /// Child ids in insertion order
    pub fn children(&self) -> &[CommandId] {
        &self.children
    }

    /// Run action, if any
    pub fn run_action(&self) -> Option<&RunFn> {
        self.run.as_ref()
    }

    /// Argument-completion behavior of this command
    pub fn args_completion(&self) -> &CompletionBehavior {
        &self.args_completion
    }

    /// Flags declared directly on this command
    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    /// Flags inherited by this command's whole subtree
    pub fn persistent_flags(&self) -> &FlagSet {
        &self.persistent_flags
    }
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("name", &self.name)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
