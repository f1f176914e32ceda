use crate::error::LaunchError;
use nix::unistd::{AccessFlags, access};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Name of the variable holding the executable search path.
pub const PATH_VAR: &str = "PATH";

/// Upper bound, in bytes, for a path built from a search-path entry.
pub const MAX_PATH_LEN: usize = 4096;

/// Resolve `program` to the path of the executable to run, using the `PATH`
/// of the current process.
///
/// See [`resolve_in`] for the lookup rules.
pub fn resolve(program: &str) -> Result<PathBuf, LaunchError> {
    let search_path = std::env::var_os(PATH_VAR);
    resolve_in(program, search_path.as_deref())
}

/// Resolve `program` against an explicit search path.
///
/// Behavior:
/// - Name starting with `/`: returned as-is. Nothing is checked here; a
///   missing or non-executable file shows up when the child is started.
/// - Anything else: each non-empty directory of `search_path` is tried in
///   order and the first `dir/program` the current user may execute wins.
/// - `search_path` of `None` means the variable is unset, which is an error.
///   There is no default search path.
pub fn resolve_in(program: &str, search_path: Option<&OsStr>) -> Result<PathBuf, LaunchError> {
    resolve_with(program, search_path, is_executable)
}

/// Same as [`resolve_in`], with the execute-permission check supplied by the
/// caller. `probe` is called once per candidate, in search-path order, and
/// never again after it returns `true`.
pub fn resolve_with<F>(
    program: &str,
    search_path: Option<&OsStr>,
    mut probe: F,
) -> Result<PathBuf, LaunchError>
where
    F: FnMut(&Path) -> bool,
{
    if program.is_empty() {
        return Err(LaunchError::EmptyCommand);
    }

    if program.starts_with('/') {
        return Ok(PathBuf::from(program));
    }

    let search_path = search_path.ok_or(LaunchError::MissingSearchPath { var: PATH_VAR })?;

    for dir in std::env::split_paths(search_path) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        let candidate = dir.join(program);
        let len = candidate.as_os_str().len();
        if len >= MAX_PATH_LEN {
            return Err(LaunchError::PathTooLong { len });
        }
        trace!(candidate = %candidate.display(), "probing");
        if probe(&candidate) {
            debug!(program, resolved = %candidate.display(), "resolved executable");
            return Ok(candidate);
        }
    }

    Err(LaunchError::NotFound {
        program: program.to_owned(),
    })
}

/// Whether the current user may execute `path`, as answered by `access(2)`.
pub fn is_executable(path: &Path) -> bool {
    access(path, AccessFlags::X_OK).is_ok()
}
