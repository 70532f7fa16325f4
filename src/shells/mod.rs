// Shell script generators
// One emitter per supported shell, all speaking the directive protocol

pub mod bash;
pub mod fish;
pub mod powershell;
pub mod zsh;

use std::fmt;
use std::io;
use std::str::FromStr;

use crate::engine::{COMPLETE_COMMAND, COMPLETE_NO_DESC_COMMAND};

/// The four supported completion targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

impl Shell {
    /// All supported shells, in listing order
    pub const ALL: [Shell; 4] = [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell];

    /// Generate the glue script for this shell
    pub fn script(self, program: &str, with_descriptions: bool) -> String {
        match self {
            Shell::Bash => bash::script(program, with_descriptions),
            Shell::Zsh => zsh::script(program, with_descriptions),
            Shell::Fish => fish::script(program, with_descriptions),
            Shell::PowerShell => powershell::script(program, with_descriptions),
        }
    }

    /// Generate the glue script directly into a writer
    pub fn write_script<W: io::Write>(
        self,
        writer: &mut W,
        program: &str,
        with_descriptions: bool,
    ) -> io::Result<()> {
        writer.write_all(self.script(program, with_descriptions).as_bytes())
    }

    /// Detect the current shell from the environment
    pub fn detect() -> Option<Shell> {
        if let Ok(shell) = std::env::var("SHELL") {
            if shell.contains("bash") {
                return Some(Shell::Bash);
            } else if shell.contains("zsh") {
                return Some(Shell::Zsh);
            } else if shell.contains("fish") {
                return Some(Shell::Fish);
            }
        }

        // Check for PowerShell on Windows
        #[cfg(windows)]
        {
            if std::env::var("PSModulePath").is_ok() {
                return Some(Shell::PowerShell);
            }
        }

        None
    }

    /// Installation instructions for this shell
    pub fn install_instructions(self, program: &str) -> String {
        match self {
            Shell::Bash => format!(
                r#"# Bash completion installation:
#
# 1. Generate the completion script:
#    {program} completion bash > ~/.local/share/bash-completion/completions/{program}
#
# 2. Or add to your ~/.bashrc:
#    eval "$({program} completion bash)"
#
# 3. Reload your shell:
#    source ~/.bashrc
"#
            ),
            Shell::Zsh => format!(
                r#"# Zsh completion installation:
#
# 1. Generate the completion script:
#    {program} completion zsh > "${{fpath[1]}}/_{program}"
#
# 2. Or add to your ~/.zshrc:
#    eval "$({program} completion zsh)"
#
# 3. Reload your shell:
#    source ~/.zshrc
#
# Note: You may need to run 'compinit' after adding the completion
"#
            ),
            Shell::Fish => format!(
                r#"# Fish completion installation:
#
# 1. Generate the completion script:
#    {program} completion fish > ~/.config/fish/completions/{program}.fish
#
# 2. Or add to your config.fish:
#    {program} completion fish | source
#
# 3. Reload your shell:
#    source ~/.config/fish/config.fish
"#
            ),
            Shell::PowerShell => format!(
                r#"# PowerShell completion installation:
#
# 1. Generate the completion script:
#    {program} completion powershell | Out-String | Invoke-Expression
#
# 2. Or add to your PowerShell profile:
#    {program} completion powershell >> $PROFILE
#
# 3. Reload your profile:
#    . $PROFILE
"#
            ),
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
            Shell::PowerShell => "powershell",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Shell {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bash" => Ok(Shell::Bash),
            "zsh" => Ok(Shell::Zsh),
            "fish" => Ok(Shell::Fish),
            "powershell" => Ok(Shell::PowerShell),
            other => Err(format!("unsupported shell: {other}")),
        }
    }
}

/// Program name made safe for use inside shell function identifiers
pub(crate) fn sanitize_name(program: &str) -> String {
    program
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Hidden command word the generated scripts must invoke
pub(crate) fn hidden_command(with_descriptions: bool) -> &'static str {
    if with_descriptions {
        COMPLETE_COMMAND
    } else {
        COMPLETE_NO_DESC_COMMAND
    }
}
