// Generated shell script content checks

use kanzen::Shell;

#[test]
fn every_shell_declares_the_directive_constants() {
    for shell in Shell::ALL {
        let script = shell.script("kanzen", true);
        for (name, value) in [
            ("Error", 1),
            ("NoSpace", 2),
            ("NoFileComp", 4),
            ("FilterFileExt", 8),
            ("FilterDirs", 16),
        ] {
            assert!(
                script.contains(&format!("hellCompDirective{name}")),
                "{shell} script misses the {name} directive constant"
            );
            assert!(
                script.contains(&value.to_string()),
                "{shell} script misses the {name} bit value"
            );
        }
    }
}

#[test]
fn every_shell_invokes_hidden_completion_mode() {
    for shell in Shell::ALL {
        assert!(shell.script("kanzen", true).contains("__complete"));
        assert!(shell.script("kanzen", false).contains("__completeNoDesc"));
    }
}

#[test]
fn scripts_are_bound_to_the_program_name() {
    assert!(Shell::Bash
        .script("kanzen", true)
        .contains("complete -o default -F __start_kanzen kanzen"));
    assert!(Shell::Zsh.script("kanzen", true).starts_with("#compdef kanzen"));
    assert!(Shell::Fish.script("kanzen", true).contains("complete -c kanzen"));
    assert!(Shell::PowerShell
        .script("kanzen", true)
        .contains("Register-ArgumentCompleter -CommandName 'kanzen'"));
}

#[test]
fn generation_is_deterministic() {
    for shell in Shell::ALL {
        assert_eq!(shell.script("kanzen", true), shell.script("kanzen", true));
    }
}

#[test]
fn hyphenated_program_names_stay_valid_identifiers() {
    for shell in Shell::ALL {
        let script = shell.script("acme-cli", true);
        assert!(!script.contains("__acme-cli_"), "{shell} script leaks a hyphen into identifiers");
    }
}

#[test]
fn shell_names_parse_back() {
    for shell in Shell::ALL {
        assert_eq!(shell.to_string().parse::<Shell>().unwrap(), shell);
    }
}
