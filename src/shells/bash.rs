// Bash completion script generation

use crate::shells::{hidden_command, sanitize_name};

/// Generate the bash glue script for `program`
///
/// The script re-invokes the program in hidden completion mode, parses the
/// sentinel-terminated payload, and maps directive bits onto `compopt` and
/// `_filedir` calls.
pub fn script(program: &str, with_descriptions: bool) -> String {
    TEMPLATE
        .replace("%NAME%", &sanitize_name(program))
        .replace("%COMPLETE%", hidden_command(with_descriptions))
        .replace("%PROG%", program)
}

const TEMPLATE: &str = r#"# bash completion for %PROG%                               -*- shell-script -*-

__%NAME%_debug()
{
    if [[ -n ${BASH_COMP_DEBUG_FILE:-} ]]; then
        echo "$*" >>"${BASH_COMP_DEBUG_FILE}"
    fi
}

# Minimal replacement for _init_completion, for bash-completion-less setups.
__%NAME%_init_completion()
{
    COMPREPLY=()
    _get_comp_words_by_ref "$@" cur prev words cword
}

__%NAME%_get_completion_results()
{
    local requestComp lastParam lastChar args

    # Ask the program itself for completions, re-passing every word typed
    # so far. Calling ${words[0]} keeps aliases working.
    args=("${words[@]:1}")
    requestComp="${words[0]} %COMPLETE% ${args[*]}"

    lastParam=${words[$((${#words[@]}-1))]}
    lastChar=${lastParam:$((${#lastParam}-1)):1}
    __%NAME%_debug "lastParam ${lastParam}, lastChar ${lastChar}"

    if [[ -z ${cur} && ${lastChar} != = ]]; then
        # The cursor follows a space: request completion of a fresh empty word.
        __%NAME%_debug "Adding an extra empty parameter"
        requestComp="${requestComp} ''"
    fi

    # Bash splits words on =, so cur may hold only the value half of
    # --flag=value; the program expects the full token.
    if [[ ${cur} == -*=* ]]; then
        cur="${cur#*=}"
    fi

    __%NAME%_debug "Calling ${requestComp}"
    out=$(eval "${requestComp}" 2>/dev/null)

    # The directive integer sits after the final : of the output.
    directive=${out##*:}
    out=${out%:*}
    if [[ ${directive} == "${out}" ]]; then
        # No directive line found.
        directive=0
    fi
    __%NAME%_debug "The completion directive is: ${directive}"
    __%NAME%_debug "The completions are: ${out}"
}

__%NAME%_process_completion_results()
{
    local shellCompDirectiveError=1
    local shellCompDirectiveNoSpace=2
    local shellCompDirectiveNoFileComp=4
    local shellCompDirectiveFilterFileExt=8
    local shellCompDirectiveFilterDirs=16

    if (((directive & shellCompDirectiveError) != 0)); then
        # The completion function failed; offer nothing.
        return
    fi

    if (((directive & shellCompDirectiveNoSpace) != 0)); then
        if [[ $(type -t compopt) == builtin ]]; then
            __%NAME%_debug "Activating nospace"
            compopt -o nospace
        fi
    fi
    if (((directive & shellCompDirectiveNoFileComp) != 0)); then
        if [[ $(type -t compopt) == builtin ]]; then
            __%NAME%_debug "Deactivating file completion"
            compopt +o default
        fi
    fi

    if (((directive & shellCompDirectiveFilterFileExt) != 0)); then
        # The candidates are file extensions, not literal values.
        local fullFilter filter filteringCmd
        for filter in ${out}; do
            fullFilter+="$filter|"
        done
        filteringCmd="_filedir $fullFilter"
        __%NAME%_debug "File filtering command: $filteringCmd"
        $filteringCmd
    elif (((directive & shellCompDirectiveFilterDirs) != 0)); then
        # The single candidate, if any, is the base directory to list.
        local subdir
        subdir=${out%%$'\n'*}
        if [[ -n $subdir ]]; then
            __%NAME%_debug "Listing directories in $subdir"
            pushd "$subdir" >/dev/null 2>&1 && _filedir -d && popd >/dev/null 2>&1 || return
        else
            __%NAME%_debug "Listing directories in ."
            _filedir -d
        fi
    else
        __%NAME%_handle_standard_completion_case
    fi
}

__%NAME%_handle_standard_completion_case()
{
    local tab=$'\t' comp

    # Fast path when no candidate carries a description.
    if [[ ${out} != *$tab* ]]; then
        IFS=$'\n' read -ra COMPREPLY -d '' < <(compgen -W "${out}" -- "${cur}")
        return 0
    fi

    local longest=0
    local compline
    # Width of the longest matching value, for description alignment.
    while IFS='' read -r compline; do
        [[ -z ${compline} ]] && continue
        comp=${compline%%"$tab"*}
        if ((${#comp} > longest)); then
            longest=${#comp}
        fi
    done < <(compgen -W "${out}" -- "${cur}")

    local completions=()
    while IFS='' read -r comp; do
        [[ -z ${comp} ]] && continue
        completions+=("$comp")
    done < <(compgen -W "${out}" -- "${cur}")

    COMPREPLY=("${completions[@]}")

    if ((${#COMPREPLY[*]} == 1)); then
        # A single candidate is inserted directly; drop its description.
        comp="${COMPREPLY[0]%%"$tab"*}"
        COMPREPLY[0]=${comp}
    else
        __%NAME%_format_comp_descriptions ${longest}
    fi
}

__%NAME%_format_comp_descriptions()
{
    local tab=$'\t'
    local comp desc maxdesclength
    local longest=$1

    local i ci
    for ci in ${!COMPREPLY[*]}; do
        comp=${COMPREPLY[ci]}
        if [[ ${comp} == *$tab* ]]; then
            desc=${comp#*"$tab"}
            comp=${comp%%"$tab"*}

            maxdesclength=$((${COLUMNS:-80} - longest - 4))
            if ((maxdesclength > 8)); then
                for ((i = ${#comp}; i < longest; i++)); do
                    comp+=" "
                done
            else
                maxdesclength=$((${COLUMNS:-80} - ${#comp} - 4))
            fi

            if ((maxdesclength > 0)); then
                if ((${#desc} > maxdesclength)); then
                    desc=${desc:0:maxdesclength}
                fi
                comp+="  (${desc})"
            fi
        fi
        COMPREPLY[ci]=${comp}
    done
}

__start_%NAME%()
{
    local cur prev words cword split
    COMPREPLY=()

    if declare -F _init_completion >/dev/null 2>&1; then
        _init_completion -n =: || return
    else
        __%NAME%_init_completion -n =: || return
    fi

    __%NAME%_debug "========= starting completion logic =========="
    __%NAME%_debug "cur is ${cur}, words[*] is ${words[*]}, cword is ${cword}"

    # Only consider the words up to the cursor.
    words=("${words[@]:0:$cword+1}")

    local out directive
    __%NAME%_get_completion_results
    __%NAME%_process_completion_results
}

if [[ $(type -t compopt) == builtin ]]; then
    complete -o default -F __start_%NAME% %PROG%
else
    complete -o default -o nospace -F __start_%NAME% %PROG%
fi

# ex: ts=4 sw=4 et filetype=sh
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_substitutes_program_name() {
        let script = script("kanzen", true);
        assert!(script.contains("complete -o default -F __start_kanzen kanzen"));
        assert!(script.contains("__kanzen_get_completion_results"));
        assert!(!script.contains("%NAME%"));
        assert!(!script.contains("%PROG%"));
    }

    #[test]
    fn test_script_switches_hidden_command_for_descriptions() {
        assert!(script("kanzen", true).contains("__complete"));
        assert!(script("kanzen", false).contains("__completeNoDesc"));
    }

    #[test]
    fn test_script_sanitizes_function_names() {
        let script = script("my-tool", true);
        assert!(script.contains("__start_my_tool"));
        assert!(script.contains("complete -o default -F __start_my_tool my-tool"));
    }

    #[test]
    fn test_script_declares_every_directive_bit() {
        let script = script("kanzen", true);
        assert!(script.contains("shellCompDirectiveError=1"));
        assert!(script.contains("shellCompDirectiveNoSpace=2"));
        assert!(script.contains("shellCompDirectiveNoFileComp=4"));
        assert!(script.contains("shellCompDirectiveFilterFileExt=8"));
        assert!(script.contains("shellCompDirectiveFilterDirs=16"));
    }
}
