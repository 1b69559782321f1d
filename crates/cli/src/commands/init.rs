//! Shell integration scripts printed by `uv-autoenv init`

use tracing::debug;
use uv_autoenv_core::Shell;

/// Generate the integration script for `shell`
#[must_use]
pub fn execute_init(shell: Shell) -> String {
    debug!(shell = %shell, "Generating shell integration");
    match shell {
        Shell::Bash => generate_bash_integration(),
        Shell::Zsh => generate_zsh_integration(),
        Shell::Fish => generate_fish_integration(),
    }
}

/// Generate Bash shell integration script
fn generate_bash_integration() -> String {
    r#"# uv-autoenv Bash shell integration
# Add this to your ~/.bashrc:
#   eval "$(uv-autoenv init bash)"

# Environments already active when the shell starts belong to the user
export UV_AUTOENV_ACTIVATED=0

__uv_autoenv_activate_hooks=()
__uv_autoenv_deactivate_hooks=()

uv_autoenv_add_post_hook_on_activate() {
    __uv_autoenv_activate_hooks+=("$1")
}

uv_autoenv_add_post_hook_on_deactivate() {
    __uv_autoenv_deactivate_hooks+=("$1")
}

# Run registered hooks in order; a failing hook does not stop the others
__uv_autoenv_run_hooks() {
    local __uv_autoenv_hook
    local -a __uv_autoenv_hooks
    case "$1" in
        activate) __uv_autoenv_hooks=("${__uv_autoenv_activate_hooks[@]}") ;;
        deactivate) __uv_autoenv_hooks=("${__uv_autoenv_deactivate_hooks[@]}") ;;
    esac
    for __uv_autoenv_hook in "${__uv_autoenv_hooks[@]}"; do
        eval "$__uv_autoenv_hook" || printf 'uv-autoenv: hook failed: %s\n' "$__uv_autoenv_hook" >&2
    done
    return 0
}

__uv_autoenv_hook() {
    eval "$(uv-autoenv hook --shell bash --dir "$PWD" 2>/dev/null)"
}

# Bash has no directory-change event, so compare $PWD before each prompt
__uv_autoenv_prompt() {
    local __uv_autoenv_status=$?
    if [[ "${__uv_autoenv_last_pwd-}" != "$PWD" ]]; then
        __uv_autoenv_last_pwd="$PWD"
        __uv_autoenv_hook
    fi
    return $__uv_autoenv_status
}

# Bash 5.1+ accepts PROMPT_COMMAND as an array
if [[ "$(declare -p PROMPT_COMMAND 2>/dev/null)" == "declare -a"* ]]; then
    PROMPT_COMMAND=(__uv_autoenv_prompt "${PROMPT_COMMAND[@]}")
elif [[ -n "$PROMPT_COMMAND" ]]; then
    PROMPT_COMMAND="__uv_autoenv_prompt; $PROMPT_COMMAND"
else
    PROMPT_COMMAND="__uv_autoenv_prompt"
fi

# Also run on shell startup
__uv_autoenv_last_pwd="$PWD"
__uv_autoenv_hook
"#
    .to_string()
}

/// Generate Zsh shell integration script
fn generate_zsh_integration() -> String {
    r#"# uv-autoenv Zsh shell integration
# Add this to your ~/.zshrc:
#   eval "$(uv-autoenv init zsh)"

# Environments already active when the shell starts belong to the user
export UV_AUTOENV_ACTIVATED=0

typeset -ga __uv_autoenv_activate_hooks __uv_autoenv_deactivate_hooks
__uv_autoenv_activate_hooks=()
__uv_autoenv_deactivate_hooks=()

uv_autoenv_add_post_hook_on_activate() {
    __uv_autoenv_activate_hooks+=("$1")
}

uv_autoenv_add_post_hook_on_deactivate() {
    __uv_autoenv_deactivate_hooks+=("$1")
}

# Run registered hooks in order; a failing hook does not stop the others
__uv_autoenv_run_hooks() {
    local __uv_autoenv_hook
    local -a __uv_autoenv_hooks
    case "$1" in
        activate) __uv_autoenv_hooks=("${__uv_autoenv_activate_hooks[@]}") ;;
        deactivate) __uv_autoenv_hooks=("${__uv_autoenv_deactivate_hooks[@]}") ;;
    esac
    for __uv_autoenv_hook in "${__uv_autoenv_hooks[@]}"; do
        eval "$__uv_autoenv_hook" || print -u2 -r -- "uv-autoenv: hook failed: $__uv_autoenv_hook"
    done
    return 0
}

__uv_autoenv_hook() {
    eval "$(uv-autoenv hook --shell zsh --dir "$PWD" 2>/dev/null)"
}

autoload -U add-zsh-hook
add-zsh-hook chpwd __uv_autoenv_hook

# Also run on shell startup
__uv_autoenv_hook
"#
    .to_string()
}

/// Generate Fish shell integration script
fn generate_fish_integration() -> String {
    r#"# uv-autoenv Fish shell integration
# Add this to your ~/.config/fish/config.fish:
#   uv-autoenv init fish | source

# Environments already active when the shell starts belong to the user
set -gx UV_AUTOENV_ACTIVATED 0

set -g __uv_autoenv_activate_hooks
set -g __uv_autoenv_deactivate_hooks

function uv_autoenv_add_post_hook_on_activate
    set -ga __uv_autoenv_activate_hooks $argv[1]
end

function uv_autoenv_add_post_hook_on_deactivate
    set -ga __uv_autoenv_deactivate_hooks $argv[1]
end

# Run registered hooks in order; a failing hook does not stop the others
function __uv_autoenv_run_hooks
    set -l hooks
    switch $argv[1]
        case activate
            set hooks $__uv_autoenv_activate_hooks
        case deactivate
            set hooks $__uv_autoenv_deactivate_hooks
    end
    for hook in $hooks
        eval $hook; or echo "uv-autoenv: hook failed: $hook" >&2
    end
    return 0
end

function __uv_autoenv_hook --on-variable PWD
    uv-autoenv hook --shell fish --dir "$PWD" 2>/dev/null | source
end

# Also run on shell startup
__uv_autoenv_hook
"#
    .to_string()
}
