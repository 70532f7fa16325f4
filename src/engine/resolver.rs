// Resolution engine: maps a partial command line to a completion reply

use log::{debug, warn};

use crate::engine::candidate::Candidate;
use crate::engine::directive::CompletionReply;
use crate::engine::error::{EngineError, EngineResult};
use crate::tree::{CommandId, CommandTree, Completer, CompletionBehavior, Flag};

/// Context handed to a completion callback
#[derive(Debug)]
pub struct CompletionRequest<'a> {
    /// Command the completion applies to
    pub command: CommandId,
    /// Positional arguments already consumed before the in-progress token
    pub args: &'a [String],
    /// In-progress token text
    pub to_complete: &'a str,
}

/// Tree position reached after consuming the already-typed words
struct WalkState<'t> {
    target: CommandId,
    args: Vec<String>,
    pending_flag: Option<&'t Flag>,
    flags_terminated: bool,
}

/// Resolve a hidden-mode word list into a completion reply
///
/// `words` is everything after the hidden completion command; the final
/// word is the one under completion and may be empty. Resolution is
/// deterministic: identical tree and words yield an identical reply.
pub fn resolve(tree: &CommandTree, words: &[String]) -> EngineResult<CompletionReply> {
    let (to_complete, prior) = words.split_last().ok_or_else(|| {
        EngineError::MalformedInvocation("expected at least the word being completed".to_string())
    })?;

    let state = walk(tree, prior);
    debug!(
        "completing {:?} at '{}' with {} positional arg(s)",
        to_complete,
        tree.node(state.target).name(),
        state.args.len()
    );

    // A value-taking flag in the previous word claims this position.
    if let Some(flag) = state.pending_flag {
        return Ok(complete_flag_value(&state, flag, to_complete));
    }

    // A bare '-' or '--' still means the user is typing a flag.
    if !state.flags_terminated && to_complete.starts_with('-') {
        // `--name=prefix` completes the value, anything else the flag names.
        if let Some((name_token, value)) = to_complete.split_once('=') {
            let reply = match find_flag(tree, state.target, name_token) {
                Some(flag) => complete_flag_value(&state, flag, value),
                None => CompletionReply::empty().no_file_fallback(),
            };
            return Ok(reply);
        }
        return Ok(complete_flag_names(tree, &state, to_complete));
    }

    Ok(complete_arguments(tree, &state, to_complete))
}

/// Consume the already-typed words, tracking the deepest matched command,
/// positional arguments, and flag state
fn walk<'t>(tree: &'t CommandTree, tokens: &[String]) -> WalkState<'t> {
    let mut target = tree.root();
    let mut args: Vec<String> = Vec::new();
    let mut pending_flag: Option<&'t Flag> = None;
    let mut flags_terminated = false;

    for token in tokens {
        if pending_flag.take().is_some() {
            // Token consumed as the pending flag's value.
            continue;
        }
        if !flags_terminated && token == "--" {
            flags_terminated = true;
            continue;
        }
        if !flags_terminated && is_flag_token(token) {
            if token.contains('=') {
                // Inline value, nothing left to consume.
                continue;
            }
            if let Some(flag) = find_flag(tree, target, token) {
                if flag.takes_value() {
                    pending_flag = Some(flag);
                }
            }
            // Unknown flags are treated as boolean: deterministic, and the
            // worst case is offering completions one position early.
            continue;
        }
        if args.is_empty() {
            if let Some(child) = tree.child_named(target, token) {
                target = child;
                continue;
            }
        }
        args.push(token.clone());
    }

    WalkState {
        target,
        args,
        pending_flag,
        flags_terminated,
    }
}

fn is_flag_token(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

/// Resolve a flag token (`--name` or `-s`) to a visible flag of the
/// target command
///
/// Exact long names and shorthands win; otherwise an unambiguous prefix of
/// a single long name matches.
fn find_flag<'t>(tree: &'t CommandTree, command: CommandId, token: &str) -> Option<&'t Flag> {
    let visible = tree.visible_flags(command);
    let name = token.trim_start_matches('-');
    if name.is_empty() {
        return None;
    }

    if !token.starts_with("--") {
        let mut chars = name.chars();
        if let (Some(shorthand), None) = (chars.next(), chars.next()) {
            if let Some(flag) = visible.iter().copied().find(|f| f.shorthand == Some(shorthand)) {
                return Some(flag);
            }
        }
    }

    if let Some(flag) = visible.iter().copied().find(|f| f.name == name) {
        return Some(flag);
    }

    let mut matches = visible.iter().copied().filter(|f| f.name.starts_with(name));
    match (matches.next(), matches.next()) {
        (Some(flag), None) => Some(flag),
        (Some(_), Some(_)) => {
            warn!("flag prefix '-{name}' is ambiguous");
            None
        }
        _ => None,
    }
}

/// Complete the value position of a flag
fn complete_flag_value(state: &WalkState, flag: &Flag, to_complete: &str) -> CompletionReply {
    let reply = match &flag.completion {
        CompletionBehavior::Function(completer) => invoke(completer, state, to_complete),
        CompletionBehavior::SubdirsOf(base) => CompletionReply::Directories(Some(base.clone())),
        CompletionBehavior::None => CompletionReply::empty().no_file_fallback(),
    };
    debug!("value of '--{}' resolved to directive {}", flag.name, reply.directive());
    reply
}

/// Offer the names of every visible flag
fn complete_flag_names(tree: &CommandTree, state: &WalkState, to_complete: &str) -> CompletionReply {
    let long_only = to_complete.starts_with("--");
    let mut items = Vec::new();
    for flag in tree.visible_flags(state.target) {
        items.push(Candidate::with_description(format!("--{}", flag.name), flag.usage.clone()));
        if !long_only {
            if let Some(shorthand) = flag.shorthand {
                items.push(Candidate::with_description(format!("-{shorthand}"), flag.usage.clone()));
            }
        }
    }
    CompletionReply::candidates(filter_by_prefix(items, to_complete)).no_file_fallback()
}

/// Complete a positional argument: subcommand names merged with the
/// target's argument completer
fn complete_arguments(tree: &CommandTree, state: &WalkState, to_complete: &str) -> CompletionReply {
    let node = tree.node(state.target);

    let mut items = Vec::new();
    if state.args.is_empty() {
        for &child in node.children() {
            let child_node = tree.node(child);
            if child_node.name().starts_with(to_complete) {
                items.push(match child_node.short() {
                    Some(short) => Candidate::with_description(child_node.name(), short),
                    None => Candidate::new(child_node.name()),
                });
            }
        }
    }

    match node.args_completion() {
        CompletionBehavior::Function(completer) => match invoke(completer, state, to_complete) {
            CompletionReply::Candidates {
                items: more,
                no_space,
                no_file_fallback,
            } => {
                items.extend(more);
                CompletionReply::Candidates {
                    items,
                    no_space,
                    no_file_fallback,
                }
            }
            non_literal => {
                if !items.is_empty() {
                    debug!(
                        "discarding {} subcommand candidate(s); interpretations are never mixed",
                        items.len()
                    );
                }
                non_literal
            }
        },
        CompletionBehavior::SubdirsOf(base) => CompletionReply::Directories(Some(base.clone())),
        CompletionBehavior::None => {
            if items.is_empty() {
                // Nothing applies: leave the shell's own filename logic on.
                CompletionReply::empty()
            } else {
                CompletionReply::candidates(items).no_file_fallback()
            }
        }
    }
}

/// Invoke a callback and apply the central prefix filter unless the
/// callback declared its output prefiltered
fn invoke(completer: &Completer, state: &WalkState, to_complete: &str) -> CompletionReply {
    let request = CompletionRequest {
        command: state.target,
        args: &state.args,
        to_complete,
    };
    let reply = completer.call(&request);
    match reply {
        CompletionReply::Candidates {
            items,
            no_space,
            no_file_fallback,
        } if !completer.is_prefiltered() => CompletionReply::Candidates {
            items: filter_by_prefix(items, to_complete),
            no_space,
            no_file_fallback,
        },
        CompletionReply::Failed => {
            warn!("completion callback failed; suppressing completion for this position");
            CompletionReply::Failed
        }
        other => other,
    }
}

/// Ordinal byte-wise prefix filter, preserving the input order
fn filter_by_prefix(items: Vec<Candidate>, prefix: &str) -> Vec<Candidate> {
    items
        .into_iter()
        .filter(|candidate| candidate.value.starts_with(prefix))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::directive::Directive;
    use crate::tree::{CommandSpec, Flag};

    fn words(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn animals() -> Vec<Candidate> {
        vec![
            Candidate::with_description("bear", "an animal"),
            Candidate::with_description("bearpaw", "a dessert"),
            Candidate::new("dog"),
            Candidate::with_description("unicorn", "mythical"),
        ]
    }

    fn sample_tree() -> CommandTree {
        let mut tree = CommandTree::new(CommandSpec::new("testprog"));
        let root = tree.root();

        tree.command(
            root,
            CommandSpec::new("nospace").complete_args_with(Completer::new(|_req| {
                CompletionReply::candidates(animals()).no_space()
            })),
        )
        .unwrap();

        tree.command(
            root,
            CommandSpec::new("error")
                .complete_args_with(Completer::new(|_req| CompletionReply::Failed)),
        )
        .unwrap();

        tree.flag(
            root,
            Flag::string("customComp", "", "custom completions").complete_with(Completer::new(
                |_req| {
                    CompletionReply::candidates(vec![
                        Candidate::with_description("firstComp", "the first value"),
                        Candidate::with_description("secondComp", "the second value"),
                        Candidate::new("forthComp"),
                    ])
                    .no_file_fallback()
                },
            )),
        )
        .unwrap();

        tree.flag(root, Flag::string("theme", "", "theme to use").subdirs_of("dir"))
            .unwrap();

        tree
    }

    #[test]
    fn test_missing_word_is_malformed() {
        let tree = sample_tree();
        let err = resolve(&tree, &[]).unwrap_err();
        assert!(matches!(err, EngineError::MalformedInvocation(_)));
    }

    #[test]
    fn test_central_prefix_filter_preserves_order() {
        let tree = sample_tree();
        let reply = resolve(&tree, &words(&["nospace", "bear"])).unwrap();
        match reply {
            CompletionReply::Candidates { items, no_space, .. } => {
                assert!(no_space);
                let values: Vec<&str> = items.iter().map(|c| c.value.as_str()).collect();
                assert_eq!(values, vec!["bear", "bearpaw"]);
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn test_empty_token_matches_everything() {
        let tree = sample_tree();
        let reply = resolve(&tree, &words(&["nospace", ""])).unwrap();
        match reply {
            CompletionReply::Candidates { items, .. } => assert_eq!(items.len(), 4),
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn test_exact_match_is_still_offered() {
        let tree = sample_tree();
        let reply = resolve(&tree, &words(&["nospace", "dog"])).unwrap();
        match reply {
            CompletionReply::Candidates { items, .. } => {
                assert_eq!(items, vec![Candidate::new("dog")]);
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn test_prefiltered_callback_is_not_filtered_again() {
        let mut tree = CommandTree::new(CommandSpec::new("testprog"));
        let root = tree.root();
        // Callback filters on its own, deliberately keeping a non-prefix
        // candidate the engine must not remove.
        tree.command(
            root,
            CommandSpec::new("own").complete_args_with(Completer::prefiltered(|_req| {
                CompletionReply::candidates(vec![Candidate::new("unrelated")])
            })),
        )
        .unwrap();

        let reply = resolve(&tree, &words(&["own", "bear"])).unwrap();
        match reply {
            CompletionReply::Candidates { items, .. } => {
                assert_eq!(items, vec![Candidate::new("unrelated")]);
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn test_subcommand_names_complete_with_descriptions() {
        let mut tree = CommandTree::new(CommandSpec::new("testprog"));
        let root = tree.root();
        let sub = tree
            .command(root, CommandSpec::new("prefix").short("completions filtered on prefix"))
            .unwrap();
        tree.command(sub, CommandSpec::new("nospace").short("no space directive"))
            .unwrap();
        tree.command(sub, CommandSpec::new("nofile").short("no file directive"))
            .unwrap();

        let reply = resolve(&tree, &words(&["prefix", "nos"])).unwrap();
        match reply {
            CompletionReply::Candidates { items, no_file_fallback, .. } => {
                assert!(no_file_fallback);
                assert_eq!(items, vec![Candidate::with_description("nospace", "no space directive")]);
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn test_subcommands_not_offered_after_positional_args() {
        let mut tree = CommandTree::new(CommandSpec::new("testprog"));
        let root = tree.root();
        tree.command(root, CommandSpec::new("sub")).unwrap();

        let reply = resolve(&tree, &words(&["stray", "su"])).unwrap();
        assert_eq!(reply, CompletionReply::empty());
    }

    #[test]
    fn test_flag_value_completion_from_previous_word() {
        let tree = sample_tree();
        let reply = resolve(&tree, &words(&["--customComp", "f"])).unwrap();
        match reply {
            CompletionReply::Candidates { items, no_file_fallback, .. } => {
                assert!(no_file_fallback);
                let values: Vec<&str> = items.iter().map(|c| c.value.as_str()).collect();
                assert_eq!(values, vec!["firstComp", "forthComp"]);
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn test_flag_value_completion_inline_equals() {
        let tree = sample_tree();
        let reply = resolve(&tree, &words(&["--customComp=sec"])).unwrap();
        match reply {
            CompletionReply::Candidates { items, .. } => {
                assert_eq!(
                    items,
                    vec![Candidate::with_description("secondComp", "the second value")]
                );
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn test_directory_scoped_flag_without_callback() {
        let tree = sample_tree();
        let reply = resolve(&tree, &words(&["--theme", ""])).unwrap();
        assert_eq!(reply, CompletionReply::Directories(Some("dir".to_string())));
    }

    #[test]
    fn test_flag_without_completion_suppresses_file_fallback() {
        let mut tree = CommandTree::new(CommandSpec::new("testprog"));
        let root = tree.root();
        tree.flag(root, Flag::string("plain", "", "no completion here")).unwrap();

        let reply = resolve(&tree, &words(&["--plain", ""])).unwrap();
        assert_eq!(reply, CompletionReply::empty().no_file_fallback());
    }

    #[test]
    fn test_flag_name_completion() {
        let tree = sample_tree();
        let reply = resolve(&tree, &words(&["--c"])).unwrap();
        match reply {
            CompletionReply::Candidates { items, no_file_fallback, .. } => {
                assert!(no_file_fallback);
                assert_eq!(
                    items,
                    vec![Candidate::with_description("--customComp", "custom completions")]
                );
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn test_flag_partial_name_resolves_when_unambiguous() {
        let tree = sample_tree();
        let reply = resolve(&tree, &words(&["--th", ""])).unwrap();
        assert_eq!(reply, CompletionReply::Directories(Some("dir".to_string())));
    }

    #[test]
    fn test_double_dash_disables_flag_recognition() {
        let mut tree = CommandTree::new(CommandSpec::new("testprog"));
        let root = tree.root();
        tree.command(
            root,
            CommandSpec::new("dasharg").complete_args_with(Completer::new(|_req| {
                CompletionReply::candidates(vec![Candidate::with_description(
                    "--arg",
                    "an arg starting with dashes",
                )])
            })),
        )
        .unwrap();

        let reply = resolve(&tree, &words(&["dasharg", "--", "--a"])).unwrap();
        match reply {
            CompletionReply::Candidates { items, .. } => {
                assert_eq!(items[0].value, "--arg");
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn test_non_literal_reply_suppresses_subcommand_names() {
        let mut tree = CommandTree::new(CommandSpec::new("testprog"));
        let root = tree.root();
        let themes = tree
            .command(
                root,
                CommandSpec::new("themes")
                    .complete_args_with(Completer::new(|_req| CompletionReply::Directories(None))),
            )
            .unwrap();
        tree.command(themes, CommandSpec::new("list").short("list themes")).unwrap();

        // "list" matches the child by prefix, but the directory filter must
        // replace it wholesale rather than mix interpretations.
        let reply = resolve(&tree, &words(&["themes", "li"])).unwrap();
        assert_eq!(reply, CompletionReply::Directories(None));
    }

    #[test]
    fn test_failed_callback_propagates() {
        let tree = sample_tree();
        let reply = resolve(&tree, &words(&["error", "bear"])).unwrap();
        assert_eq!(reply, CompletionReply::Failed);
        assert_eq!(reply.directive(), Directive::ERROR);
    }

    #[test]
    fn test_callback_receives_positional_args() {
        let mut tree = CommandTree::new(CommandSpec::new("testprog"));
        let root = tree.root();
        tree.command(
            root,
            CommandSpec::new("echoargs").complete_args_with(Completer::prefiltered(|req| {
                CompletionReply::candidates(vec![Candidate::new(format!(
                    "{}:{}",
                    req.args.len(),
                    req.to_complete
                ))])
            })),
        )
        .unwrap();

        let reply = resolve(&tree, &words(&["echoargs", "one", "two", "thr"])).unwrap();
        match reply {
            CompletionReply::Candidates { items, .. } => {
                assert_eq!(items[0].value, "2:thr");
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }
}
