// Command/flag tree module
// Arena-based command registry with per-node completion behavior

pub mod arena;
pub mod command;
pub mod error;
pub mod flag;

pub use arena::{CommandId, CommandTree};
pub use command::{CommandNode, CommandSpec, RunFn};
pub use error::{TreeError, TreeResult};
pub use flag::{Completer, CompletionBehavior, CompletionFn, Flag, FlagKind, FlagSet};
