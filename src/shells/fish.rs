// Fish completion script generation

use crate::shells::{hidden_command, sanitize_name};

/// Generate the fish glue script for `program`
///
/// Fish renders `value\tdescription` pairs natively, so candidate lines
/// pass through untouched. Fish offers no extension or base-directory
/// filtering hooks, so both filter directives fall back to fish's own file
/// completion; the no-space directive is emulated with a fake second
/// candidate that prevents fish from closing the token.
pub fn script(program: &str, with_descriptions: bool) -> String {
    TEMPLATE
        .replace("%NAME%", &sanitize_name(program))
        .replace("%COMPLETE%", hidden_command(with_descriptions))
        .replace("%PROG%", program)
}

const TEMPLATE: &str = r#"# fish completion for %PROG%

function __%NAME%_debug
    set -l file "$BASH_COMP_DEBUG_FILE"
    if test -n "$file"
        echo "$argv" >> $file
    end
end

function __%NAME%_perform_completion
    __%NAME%_debug "Starting __%NAME%_perform_completion"

    # All words up to the cursor, plus the (escaped) token being completed.
    set -l args (commandline -opc)
    set -l lastArg (string escape -- (commandline -ct))

    __%NAME%_debug "args: $args"
    __%NAME%_debug "last arg: $lastArg"

    set -l requestComp "$args[1] %COMPLETE% $args[2..-1] $lastArg"

    __%NAME%_debug "Calling $requestComp"
    set -l results (eval $requestComp 2> /dev/null)

    # Drop any trailing empty lines after the directive.
    for line in $results[-1..1]
        if test -z "$line"
            set results $results[1..-2]
        else
            break
        end
    end

    set -l comps $results[1..-2]
    set -l directiveLine $results[-1]

    # When completing --flag=value the matches must keep the flag prefix.
    set -l flagPrefix (string match -r -- '-.*=' "$lastArg")

    __%NAME%_debug "Comps: $comps"
    __%NAME%_debug "DirectiveLine: $directiveLine"
    __%NAME%_debug "flagPrefix: $flagPrefix"

    for comp in $comps
        printf "%s%s\n" "$flagPrefix" "$comp"
    end

    printf "%s\n" "$directiveLine"
end

# Fills __%NAME%_comp_results with the program's completion choices.
# Returns false when fish should perform file completion instead.
function __%NAME%_prepare_completions
    __%NAME%_debug ""
    __%NAME%_debug "========= starting completion logic =========="

    # Start fresh
    set --erase __%NAME%_comp_results

    set -l results (__%NAME%_perform_completion)
    __%NAME%_debug "Completion results: $results"

    if test -z "$results"
        __%NAME%_debug "No completion, probably due to a failure"
        # Might as well do file completion, in case it helps
        return 1
    end

    set -l directive (string sub --start 2 $results[-1])
    set --global __%NAME%_comp_results $results[1..-2]

    __%NAME%_debug "Completions are: $__%NAME%_comp_results"
    __%NAME%_debug "Directive is: $directive"

    set -l shellCompDirectiveError 1
    set -l shellCompDirectiveNoSpace 2
    set -l shellCompDirectiveNoFileComp 4
    set -l shellCompDirectiveFilterFileExt 8
    set -l shellCompDirectiveFilterDirs 16

    if test -z "$directive"
        set directive 0
    end

    set -l compErr (math (math --scale 0 $directive / $shellCompDirectiveError) % 2)
    if test $compErr -eq 1
        __%NAME%_debug "Received error directive: aborting."
        # Might as well do file completion, in case it helps
        return 1
    end

    set -l filefilter (math (math --scale 0 $directive / $shellCompDirectiveFilterFileExt) % 2)
    set -l dirfilter (math (math --scale 0 $directive / $shellCompDirectiveFilterDirs) % 2)
    if test $filefilter -eq 1; or test $dirfilter -eq 1
        __%NAME%_debug "Fish has no file or directory filtering hooks; using file completion"
        return 1
    end

    set -l nospace (math (math --scale 0 $directive / $shellCompDirectiveNoSpace) % 2)
    set -l nofiles (math (math --scale 0 $directive / $shellCompDirectiveNoFileComp) % 2)

    __%NAME%_debug "nospace: $nospace, nofiles: $nofiles"

    # To handle nospace or a possible file-completion fallback we must know
    # how many candidates match the current token; the program may not have
    # filtered them by prefix, so do it here.
    if test $nospace -ne 0; or test $nofiles -eq 0
        set -l prefix (commandline -t | string escape --style=regex)
        __%NAME%_debug "prefix: $prefix"

        set -l completions (string match -r -- "^$prefix.*" $__%NAME%_comp_results)
        set --global __%NAME%_comp_results $completions
        __%NAME%_debug "Filtered completions are: $__%NAME%_comp_results"

        set -l numComps (count $__%NAME%_comp_results)
        __%NAME%_debug "numComps: $numComps"

        if test $numComps -eq 1; and test $nospace -ne 0
            # A lone candidate would be accepted with a trailing space;
            # add a fake dotted variant so fish keeps the token open.
            set -l split (string split --max 1 \t $__%NAME%_comp_results[1])
            set --global __%NAME%_comp_results $split[1] $split[1].
            __%NAME%_debug "Forcing the fake completion: $__%NAME%_comp_results"
        end

        if test $numComps -eq 0; and test $nofiles -eq 0
            __%NAME%_debug "Requesting file completion"
            return 1
        end
    end

    return 0
end

# Fish loads completions lazily, so trigger the existing ones before
# removing them in favor of ours.
if type -q "%PROG%"
    complete --do-complete "%PROG% " > /dev/null 2>&1
end

# Remove any pre-existing completions for the program.
complete -c %PROG% -e

complete -c %PROG% -n '__%NAME%_prepare_completions' -f -a '$__%NAME%_comp_results'
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_registers_completion_function() {
        let script = script("kanzen", true);
        assert!(script.contains("complete -c kanzen -n '__kanzen_prepare_completions'"));
        assert!(script.contains("complete -c kanzen -e"));
        assert!(!script.contains("%NAME%"));
    }

    #[test]
    fn test_script_switches_hidden_command_for_descriptions() {
        assert!(script("kanzen", true).contains("__complete"));
        assert!(script("kanzen", false).contains("__completeNoDesc"));
    }

    #[test]
    fn test_filter_directives_fall_back_to_file_completion() {
        let script = script("kanzen", true);
        assert!(script.contains("shellCompDirectiveFilterFileExt 8"));
        assert!(script.contains("shellCompDirectiveFilterDirs 16"));
        assert!(script.contains("using file completion"));
    }
}
