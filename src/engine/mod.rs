// Completion resolution engine and the directive protocol
// Turns a partial command line plus a command tree into (candidates, directive)

pub mod candidate;
pub mod directive;
pub mod error;
pub mod output;
pub mod resolver;

pub use candidate::Candidate;
pub use directive::{CompletionReply, Directive};
pub use error::{EngineError, EngineResult};
pub use output::{render, write_to, DIRECTIVE_SENTINEL};
pub use resolver::{resolve, CompletionRequest};

use crate::tree::CommandTree;

/// Reserved word switching the host program into hidden completion mode
pub const COMPLETE_COMMAND: &str = "__complete";
/// Hidden completion mode with candidate descriptions suppressed
pub const COMPLETE_NO_DESC_COMMAND: &str = "__completeNoDesc";

/// Resolve a hidden-mode request and render the line-oriented payload
///
/// `words` is everything after the hidden completion command; the final
/// word is the one under completion, possibly empty. An empty candidate
/// set is a valid result; only an unusable invocation is an error.
pub fn run_completion(tree: &CommandTree, words: &[String], with_descriptions: bool) -> EngineResult<String> {
    let reply = resolver::resolve(tree, words)?;
    Ok(output::render(&reply, with_descriptions))
}
