// PowerShell completion script generation

use crate::shells::{hidden_command, sanitize_name};

/// Generate the PowerShell glue script for `program`
///
/// Registers a native argument completer that converts candidate lines
/// into `CompletionResult` objects, with descriptions surfaced as
/// tooltips. The no-space directive is honored by omitting the trailing
/// space the completer would normally supply; the file-filter directives
/// defer to PowerShell's own provider completion.
pub fn script(program: &str, with_descriptions: bool) -> String {
    TEMPLATE
        .replace("%NAME%", &sanitize_name(program))
        .replace("%COMPLETE%", hidden_command(with_descriptions))
        .replace("%PROG%", program)
}

const TEMPLATE: &str = r#"# powershell completion for %PROG%

function __%NAME%_debug {
    if ($env:BASH_COMP_DEBUG_FILE) {
        "$args" | Out-File -Append -FilePath "$env:BASH_COMP_DEBUG_FILE"
    }
}

[scriptblock]$__%NAME%CompleterBlock = {
    param(
        $WordToComplete,
        $CommandAst,
        $CursorPosition
    )

    # Directive bits, mirrored from the completion engine.
    $ShellCompDirectiveError = 1
    $ShellCompDirectiveNoSpace = 2
    $ShellCompDirectiveNoFileComp = 4
    $ShellCompDirectiveFilterFileExt = 8
    $ShellCompDirectiveFilterDirs = 16

    $Command = $CommandAst.CommandElements
    $Command = "$Command"
    __%NAME%_debug "========= starting completion logic =========="
    __%NAME%_debug "WordToComplete: $WordToComplete Command: $Command CursorPosition: $CursorPosition"

    # Only consider the command up to the cursor.
    if ($Command.Length -gt $CursorPosition) {
        $Command = $Command.Substring(0, $CursorPosition)
    }
    __%NAME%_debug "Truncated command: $Command"

    # Ask the program itself for completions.
    $Program, $Arguments = $Command.Split(" ", 2)
    $RequestComp = "& '$Program' %COMPLETE% $Arguments"

    if ($WordToComplete -eq "") {
        # The cursor follows a space: request completion of a fresh empty word.
        $RequestComp = $RequestComp + ' ""'
    }

    __%NAME%_debug "Calling $RequestComp"
    $Out = Invoke-Expression $RequestComp 2>$null | Where-Object { $_ -ne "" }

    if (-not $Out) {
        __%NAME%_debug "No output from completion request"
        return
    }
    if ($Out -isnot [array]) {
        $Out = @($Out)
    }

    # The directive sits on the final line after the sentinel.
    [int]$Directive = 0
    $Last = $Out[-1]
    if ($Last.StartsWith(':')) {
        $Directive = [int]$Last.Substring(1)
        if ($Out.Count -gt 1) {
            $Out = $Out[0..($Out.Count - 2)]
        } else {
            $Out = @()
        }
    }
    __%NAME%_debug "Directive: $Directive"
    __%NAME%_debug "Completions: $Out"

    if (($Directive -band $ShellCompDirectiveError) -ne 0) {
        # The completion function failed; offer nothing.
        return
    }

    if ((($Directive -band $ShellCompDirectiveFilterFileExt) -ne 0) -or
        (($Directive -band $ShellCompDirectiveFilterDirs) -ne 0)) {
        # File filtering is left to PowerShell's own provider completion.
        __%NAME%_debug "File or directory filtering requested; deferring to default completion"
        return
    }

    $Space = " "
    if (($Directive -band $ShellCompDirectiveNoSpace) -ne 0) {
        # The completer supplies the trailing space, so omit it.
        $Space = ""
    }

    $Values = $Out | ForEach-Object {
        # Candidate lines are value, or value<TAB>description.
        $Name, $Description = $_.Split("`t", 2)
        if (-not $Description) {
            $Description = $Name
        }
        [PSCustomObject]@{ Name = $Name; Description = $Description }
    }

    # The program may not have filtered by prefix; do it here.
    $Values = @($Values | Where-Object { $_.Name -like "$WordToComplete*" })

    if ($Values.Count -eq 0) {
        if (($Directive -band $ShellCompDirectiveNoFileComp) -ne 0) {
            # An empty result would make PowerShell fall back to file
            # completion; return the word itself so nothing changes.
            [System.Management.Automation.CompletionResult]::new($WordToComplete, $WordToComplete, 'ParameterValue', ' ')
        }
        return
    }

    $Values | ForEach-Object {
        [System.Management.Automation.CompletionResult]::new("$($_.Name)$Space", $_.Name, 'ParameterValue', $_.Description)
    }
}

Register-ArgumentCompleter -CommandName '%PROG%' -ScriptBlock $__%NAME%CompleterBlock -Native
"#;
