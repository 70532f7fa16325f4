// Zsh completion script generation

use crate::shells::{hidden_command, sanitize_name};

/// Generate the zsh glue script for `program`
///
/// Candidates flow through `_describe`, which renders the tab-separated
/// descriptions; the filter directives map onto `_files` glob and
/// directory modes.
pub fn script(program: &str, with_descriptions: bool) -> String {
    TEMPLATE
        .replace("%NAME%", &sanitize_name(program))
        .replace("%COMPLETE%", hidden_command(with_descriptions))
        .replace("%PROG%", program)
}

const TEMPLATE: &str = r#"#compdef %PROG%
compdef _%NAME% %PROG%

# zsh completion for %PROG%

__%NAME%_debug()
{
    local file="$BASH_COMP_DEBUG_FILE"
    if [[ -n ${file} ]]; then
        echo "$*" >> "${file}"
    fi
}

_%NAME%()
{
    local shellCompDirectiveError=1
    local shellCompDirectiveNoSpace=2
    local shellCompDirectiveNoFileComp=4
    local shellCompDirectiveFilterFileExt=8
    local shellCompDirectiveFilterDirs=16

    local lastParam lastChar flagPrefix requestComp out directive comp lastComp noSpace
    local -a completions

    __%NAME%_debug "\n========= starting completion logic =========="
    __%NAME%_debug "CURRENT: ${CURRENT}, words[*]: ${words[*]}"

    # Only consider the words up to the cursor.
    words=("${=words[1,CURRENT]}")
    __%NAME%_debug "Truncated words[*]: ${words[*]},"

    lastParam=${words[-1]}
    lastChar=${lastParam[-1]}
    __%NAME%_debug "lastParam: ${lastParam}, lastChar: ${lastChar}"

    # Ask the program itself for completions.
    requestComp="${words[1]} %COMPLETE% ${words[2,-1]}"
    if [ "${lastChar}" = "" ]; then
        # The cursor follows a space: request completion of a fresh empty word.
        __%NAME%_debug "Adding an extra empty parameter"
        requestComp="${requestComp} \"\""
    fi

    __%NAME%_debug "About to call: eval ${requestComp}"
    out=$(eval ${requestComp} 2>/dev/null)
    __%NAME%_debug "completion output: ${out}"

    # The directive integer sits after the final : of the output.
    directive=${out##*:}
    out=${out%:*}
    if [ "${directive}" = "${out}" ]; then
        # No directive line found.
        directive=0
    fi

    __%NAME%_debug "directive: ${directive}"
    __%NAME%_debug "completions: ${out}"

    if [ $((directive & shellCompDirectiveError)) -ne 0 ]; then
        # The completion function failed; offer nothing.
        return
    fi

    # When completing --flag=value, the matches must keep the flag prefix.
    if [[ "${lastParam}" = -*=* ]]; then
        flagPrefix="-P ${lastParam%%=*}="
    fi

    local tab="$(printf '\t')"
    while IFS='\n' read -r comp; do
        if [ -n "$comp" ]; then
            # _describe wants value:description, so escape any : in the
            # value and turn the tab separator into a :.
            comp=${comp//:/\\:}
            comp=${comp/$tab/:}
            __%NAME%_debug "Adding completion: ${comp}"
            completions+=${comp}
            lastComp=$comp
        fi
    done < <(printf "%s\n" "${out[@]}")

    if [ $((directive & shellCompDirectiveNoSpace)) -ne 0 ]; then
        __%NAME%_debug "Activating nospace"
        noSpace="-S ''"
    fi

    if [ $((directive & shellCompDirectiveFilterFileExt)) -ne 0 ]; then
        # The candidates are file extensions: build a glob per extension.
        local filteringCmd
        filteringCmd='_files'
        for filter in ${completions[@]}; do
            if [ ${filter[1]} != '*' ]; then
                filter="\*.$filter"
            fi
            filteringCmd+=" -g $filter"
        done
        filteringCmd+=" ${flagPrefix}"
        __%NAME%_debug "File filtering command: $filteringCmd"
        _arguments '*:filename:'"$filteringCmd"
    elif [ $((directive & shellCompDirectiveFilterDirs)) -ne 0 ]; then
        # The single candidate, if any, is the base directory to list.
        local subdir
        subdir="${completions[1]}"
        if [ -n "$subdir" ]; then
            __%NAME%_debug "Listing directories in $subdir"
            pushd "${subdir}" >/dev/null 2>&1
        else
            __%NAME%_debug "Listing directories in ."
        fi

        local result
        _arguments '*:dirname:_files -/'" ${flagPrefix}"
        result=$?
        if [ -n "$subdir" ]; then
            popd >/dev/null 2>&1
        fi
        return $result
    elif [ $((${#completions[@]})) -eq 0 ]; then
        if [ $((directive & shellCompDirectiveNoFileComp)) -eq 0 ]; then
            __%NAME%_debug "No completions and file completion allowed"
            _arguments '*:filename:_files'" ${flagPrefix}"
        fi
    else
        _describe "completions" completions $(echo $noSpace) $(echo $flagPrefix)
    fi
}

# Run directly when sourced rather than autoloaded via fpath.
if [ "$funcstack[1]" = "_%NAME%" ]; then
    _%NAME%
fi
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_registers_compdef() {
        let script = script("kanzen", true);
        assert!(script.starts_with("#compdef kanzen"));
        assert!(script.contains("compdef _kanzen kanzen"));
        assert!(!script.contains("%NAME%"));
    }

    #[test]
    fn test_script_switches_hidden_command_for_descriptions() {
        assert!(script("kanzen", true).contains("__complete"));
        assert!(script("kanzen", false).contains("__completeNoDesc"));
    }

    #[test]
    fn test_script_maps_directives_to_zsh_options() {
        let script = script("kanzen", true);
        assert!(script.contains("noSpace=\"-S ''\""));
        assert!(script.contains("_files -/"));
        assert!(script.contains("-g $filter"));
        assert!(script.contains("_describe"));
    }
}
