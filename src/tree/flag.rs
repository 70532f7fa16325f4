// Flag definitions and per-flag completion behavior

use std::fmt;
use std::sync::Arc;

use crate::engine::{CompletionReply, CompletionRequest};

/// Signature of a user-supplied completion callback
pub type CompletionFn = Arc<dyn Fn(&CompletionRequest) -> CompletionReply + Send + Sync>;

/// A completion callback together with its declared filtering contract
///
/// The `prefiltered` declaration is authoritative: the engine filters
/// candidates by prefix exactly once, and skips that pass for callbacks
/// that declare they already restrict their output to the in-progress
/// token. The declaration is recorded here at registration, never
/// inferred from the callback's output.
#[derive(Clone)]
pub struct Completer {
    func: CompletionFn,
    prefiltered: bool,
}

impl Completer {
    /// Wrap a callback whose candidates the engine filters by prefix
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&CompletionRequest) -> CompletionReply + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            prefiltered: false,
        }
    }

    /// Wrap a callback that already restricts candidates to the in-progress token
    pub fn prefiltered<F>(func: F) -> Self
    where
        F: Fn(&CompletionRequest) -> CompletionReply + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            prefiltered: true,
        }
    }

    /// Whether the callback declared that it filters its own candidates
    pub fn is_prefiltered(&self) -> bool {
        self.prefiltered
    }

    /// Invoke the callback
    pub fn call(&self, request: &CompletionRequest) -> CompletionReply {
        (self.func)(request)
    }
}

impl fmt::Debug for Completer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completer")
            .field("prefiltered", &self.prefiltered)
            .finish_non_exhaustive()
    }
}

/// How candidates are produced for a flag value or argument position
#[derive(Debug, Clone, Default)]
pub enum CompletionBehavior {
    /// No completion registered
    #[default]
    None,
    /// User callback produces the reply
    Function(Completer),
    /// Restrict completion to subdirectories of the given base directory
    SubdirsOf(String),
}

/// Value kind a flag accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// Flag takes a string value in the following token or after '='
    String,
    /// Boolean switch, consumes no value token
    Bool,
}

/// A named flag owned by exactly one command
#[derive(Debug, Clone)]
pub struct Flag {
    pub name: String,
    pub shorthand: Option<char>,
    pub kind: FlagKind,
    pub default: String,
    pub usage: String,
    pub completion: CompletionBehavior,
}

impl Flag {
    /// Create a string-valued flag
    pub fn string(name: impl Into<String>, default: impl Into<String>, usage: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shorthand: None,
            kind: FlagKind::String,
            default: default.into(),
            usage: usage.into(),
            completion: CompletionBehavior::None,
        }
    }

    /// Create a boolean flag
    pub fn bool(name: impl Into<String>, default: bool, usage: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shorthand: None,
            kind: FlagKind::Bool,
            default: default.to_string(),
            usage: usage.into(),
            completion: CompletionBehavior::None,
        }
    }

    /// Attach a single-character shorthand
    pub fn shorthand(mut self, shorthand: char) -> Self {
        self.shorthand = Some(shorthand);
        self
    }

    /// Attach a value-completion callback
    pub fn complete_with(mut self, completer: Completer) -> Self {
        self.completion = CompletionBehavior::Function(completer);
        self
    }

    /// Restrict value completion to subdirectories of `base`
    pub fn subdirs_of(mut self, base: impl Into<String>) -> Self {
        self.completion = CompletionBehavior::SubdirsOf(base.into());
        self
    }

    /// Whether the flag consumes a value token
    pub fn takes_value(&self) -> bool {
        matches!(self.kind, FlagKind::String)
    }
}

/// Ordered set of flags owned by one command
#[derive(Debug, Clone, Default)]
pub struct FlagSet {
    flags: Vec<Flag>,
}

impl FlagSet {
    /// Whether a flag with the given long name exists
    pub fn contains(&self, name: &str) -> bool {
        self.flags.iter().any(|f| f.name == name)
    }

    /// Append a flag; callers check `contains` first for duplicate handling
    pub fn push(&mut self, flag: Flag) {
        self.flags.push(flag);
    }

    /// Iterate flags in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.iter()
    }

    /// Look up a flag by exact long name
    pub fn get(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.name == name)
    }
}
