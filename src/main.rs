use std::env;
use std::process::ExitCode;

use anyhow::Result;

use kanzen::engine::{self, Candidate, CompletionReply};
use kanzen::shells::Shell;
use kanzen::tree::{CommandSpec, CommandTree, Completer, Flag};

// Demo host program: a command tree exercising every directive the engine
// can produce, wired to hidden completion mode and the script generators.

const COMPLETIONS: [&str; 4] = [
    "bear\tan animal",
    "bearpaw\ta dessert",
    "dog",
    "unicorn\tmythical",
];

const SPECIAL_CHAR_COMPLETIONS: [&str; 7] =
    ["at@", "equal=", "slash/", "colon:", "period.", "comma,", "letter"];

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("kanzen: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let tree = build_tree()?;
    let args: Vec<String> = env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some(engine::COMPLETE_COMMAND) => {
            print!("{}", engine::run_completion(&tree, &args[1..], true)?);
        }
        Some(engine::COMPLETE_NO_DESC_COMMAND) => {
            print!("{}", engine::run_completion(&tree, &args[1..], false)?);
        }
        _ => execute(&tree, &args),
    }
    Ok(())
}

/// Dispatch a plain invocation through the tree
fn execute(tree: &CommandTree, args: &[String]) {
    let mut current = tree.root();
    let mut leftover: Vec<String> = Vec::new();
    let mut positionals = 0;

    for token in args {
        if !token.starts_with('-') && positionals == 0 {
            if let Some(child) = tree.child_named(current, token) {
                current = child;
                continue;
            }
            positionals += 1;
        }
        leftover.push(token.clone());
    }

    match tree.node(current).run_action() {
        Some(run) => run(&leftover),
        None => print_help(tree, current),
    }
}

/// Print the subcommand listing of a command
fn print_help(tree: &CommandTree, command: kanzen::CommandId) {
    let node = tree.node(command);
    println!("USAGE:");
    println!("    {} <COMMAND> [OPTIONS]", node.name());
    println!();
    println!("COMMANDS:");
    for &child in node.children() {
        let child = tree.node(child);
        match child.short() {
            Some(short) => println!("    {:<16} {}", child.name(), short),
            None => println!("    {}", child.name()),
        }
    }
}

fn animal_candidates() -> Vec<Candidate> {
    COMPLETIONS.iter().map(|line| Candidate::from_line(line)).collect()
}

fn animals_filtered_by(prefix: &str) -> Vec<Candidate> {
    animal_candidates()
        .into_iter()
        .filter(|candidate| candidate.value.starts_with(prefix))
        .collect()
}

fn build_tree() -> Result<CommandTree> {
    let mut tree = CommandTree::new(
        CommandSpec::new("kanzen")
            .short("shell completion resolution engine demo")
            .run(|_args| println!("kanzen called")),
    );
    let root = tree.root();

    tree.flag(
        root,
        Flag::string("customComp", "", "test custom completions for flag values").complete_with(
            Completer::new(|_req| {
                CompletionReply::candidates(vec![
                    Candidate::with_description("firstComp", "the first value"),
                    Candidate::with_description("secondComp", "the second value"),
                    Candidate::new("forthComp"),
                ])
                .no_file_fallback()
            }),
        ),
    )?;
    tree.flag(
        root,
        Flag::string("theme", "", "theme to use (located in ./dir/THEMENAME/)").subdirs_of("dir"),
    )?;

    // Commands whose callbacks filter on the in-progress token themselves.
    let prefix = tree.command(
        root,
        CommandSpec::new("prefix").short("completions filtered on prefix"),
    )?;
    tree.command(
        prefix,
        CommandSpec::new("default")
            .short("Directive: default")
            .run(|_args| {})
            .complete_args_with(Completer::prefiltered(|req| {
                CompletionReply::candidates(animals_filtered_by(req.to_complete))
            })),
    )?;
    tree.command(
        prefix,
        CommandSpec::new("nospace")
            .short("Directive: no space")
            .run(|_args| {})
            .complete_args_with(Completer::prefiltered(|req| {
                CompletionReply::candidates(animals_filtered_by(req.to_complete)).no_space()
            })),
    )?;
    tree.command(
        prefix,
        CommandSpec::new("nospacechar")
            .short("Directive: no space, with comps ending in @=/:.,")
            .run(|_args| {})
            .complete_args_with(Completer::prefiltered(|req| {
                let items = SPECIAL_CHAR_COMPLETIONS
                    .iter()
                    .copied()
                    .filter(|value| value.starts_with(req.to_complete))
                    .map(Candidate::new)
                    .collect();
                CompletionReply::candidates(items).no_space()
            })),
    )?;
    tree.command(
        prefix,
        CommandSpec::new("nofile")
            .short("Directive: nofilecomp")
            .run(|_args| {})
            .complete_args_with(Completer::prefiltered(|req| {
                CompletionReply::candidates(animals_filtered_by(req.to_complete)).no_file_fallback()
            })),
    )?;
    tree.command(
        prefix,
        CommandSpec::new("nofilenospace")
            .short("Directive: nospace and nofilecomp")
            .run(|_args| {})
            .complete_args_with(Completer::prefiltered(|req| {
                CompletionReply::candidates(animals_filtered_by(req.to_complete))
                    .no_space()
                    .no_file_fallback()
            })),
    )?;

    // Commands whose callbacks return everything; the engine filters.
    let noprefix = tree.command(
        root,
        CommandSpec::new("noprefix").short("completions NOT filtered on prefix"),
    )?;
    tree.command(
        noprefix,
        CommandSpec::new("default")
            .short("Directive: default")
            .run(|_args| {})
            .complete_args_with(Completer::new(|_req| {
                CompletionReply::candidates(animal_candidates())
            })),
    )?;
    tree.command(
        noprefix,
        CommandSpec::new("nospace")
            .short("Directive: no space")
            .run(|_args| {})
            .complete_args_with(Completer::new(|_req| {
                CompletionReply::candidates(animal_candidates()).no_space()
            })),
    )?;
    tree.command(
        noprefix,
        CommandSpec::new("nofile")
            .short("Directive: nofilecomp")
            .run(|_args| {})
            .complete_args_with(Completer::new(|_req| {
                CompletionReply::candidates(animal_candidates()).no_file_fallback()
            })),
    )?;
    tree.command(
        noprefix,
        CommandSpec::new("nofilenospace")
            .short("Directive: nospace and nofilecomp")
            .run(|_args| {})
            .complete_args_with(Completer::new(|_req| {
                CompletionReply::candidates(animal_candidates())
                    .no_space()
                    .no_file_fallback()
            })),
    )?;

    tree.command(
        root,
        CommandSpec::new("fileext")
            .short("Directive: fileext")
            .run(|_args| {})
            .complete_args_with(Completer::new(|_req| {
                CompletionReply::FileExtensions(vec!["yaml".to_string(), "json".to_string()])
            })),
    )?;
    tree.command(
        root,
        CommandSpec::new("dir")
            .short("Directive: dirs in the current directory")
            .run(|_args| {})
            .complete_args_with(Completer::new(|_req| CompletionReply::Directories(None))),
    )?;
    tree.command(
        root,
        CommandSpec::new("subdir")
            .short("Directive: dirs under ./dir")
            .run(|_args| {})
            .complete_args_with(Completer::new(|_req| {
                CompletionReply::Directories(Some("dir".to_string()))
            })),
    )?;
    tree.command(
        root,
        CommandSpec::new("error")
            .short("Directive: error")
            .run(|_args| {})
            .complete_args_with(Completer::new(|_req| CompletionReply::Failed)),
    )?;

    // Wants the literal argument --arg, reachable after a '--'.
    let dasharg = tree.command(
        root,
        CommandSpec::new("dasharg")
            .short("Wants argument --arg")
            .run(|_args| {})
            .complete_args_with(Completer::new(|_req| {
                CompletionReply::candidates(vec![Candidate::with_description(
                    "--arg",
                    "an arg starting with dashes",
                )])
            })),
    )?;
    tree.flag(dasharg, Flag::bool("flag", false, "a flag"))?;

    add_completion_command(&mut tree)?;

    Ok(tree)
}

/// The `completion <shell>` subtree emitting the generated glue scripts
fn add_completion_command(tree: &mut CommandTree) -> Result<()> {
    let root = tree.root();
    let completion = tree.command(
        root,
        CommandSpec::new("completion").short("Generate shell completion scripts"),
    )?;
    tree.persistent_flag(
        completion,
        Flag::bool("no-descriptions", false, "disable completion descriptions"),
    )?;

    for shell in Shell::ALL {
        tree.command(
            completion,
            CommandSpec::new(shell.to_string())
                .short(format!("Generate the {shell} completion script"))
                .run(move |args| {
                    let with_descriptions =
                        !args.iter().any(|arg| arg == "--no-descriptions");
                    print!("{}", shell.script("kanzen", with_descriptions));
                })
                .complete_args_with(Completer::new(|_req| {
                    CompletionReply::empty().no_file_fallback()
                })),
        )?;
    }
    Ok(())
}
