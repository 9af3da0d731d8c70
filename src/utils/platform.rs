//! Platform helpers: tool executable lookup, host core count and path
//! separator handling for CMake arguments.

use std::path::MAIN_SEPARATOR;

use crate::constants::FALLBACK_CORE_COUNT;

/// Returns the executable to run for `tool`.
///
/// `env_var` (for example `RBUILD_CMAKE`) overrides the default when it is set
/// to a non-empty value.
#[must_use]
pub fn tool_command(tool: &str, env_var: &str) -> String {
    match std::env::var(env_var) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => tool.to_string(),
    }
}

/// Returns true if `cmd` can be found on `PATH` (or is a path to an executable).
#[must_use]
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Number of cores used for the native build's `-j` flag.
#[must_use]
pub fn available_cores() -> usize {
    std::thread::available_parallelism().map_or(FALLBACK_CORE_COUNT, std::num::NonZeroUsize::get)
}

/// Replaces the host path separator with `/`, the form CMake expects.
///
/// On Unix this is the identity; on Windows `C:\deps\x` becomes `C:/deps/x`.
#[must_use]
pub fn to_forward_slashes(arg: &str) -> String {
    arg.replace(MAIN_SEPARATOR, "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_cores_positive() {
        assert!(available_cores() >= 1);
    }

    #[test]
    fn test_forward_slashes_on_host() {
        let arg = format!("-DCMAKE_TOOLCHAIN_FILE=deps{MAIN_SEPARATOR}cget{MAIN_SEPARATOR}cget.cmake");
        assert_eq!(to_forward_slashes(&arg), "-DCMAKE_TOOLCHAIN_FILE=deps/cget/cget.cmake");
    }

    #[test]
    fn test_tool_command_default_when_unset() {
        assert_eq!(tool_command("cmake", "RBUILD_TEST_UNSET_TOOL_VAR"), "cmake");
    }
}
