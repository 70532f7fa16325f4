pub mod engine;
pub mod shells;
pub mod tree;

pub use engine::{Candidate, CompletionReply, Directive};
pub use shells::Shell;
pub use tree::{CommandId, CommandSpec, CommandTree, Completer, CompletionBehavior, Flag, FlagKind};
