use std::io;
use std::path::PathBuf;

/// Everything that can stop a launch.
///
/// None of these are recoverable: the binary prints the message and exits
/// with [`LaunchError::exit_code`].
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// Wrong number of positional arguments.
    #[error("Usage: {program} <inp> <cmd> <out>")]
    Usage { program: String },

    #[error("Failed to open input file {}", path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open output file {}", path.display())]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("command line is not valid UTF-8")]
    NonUtf8Command,

    /// The command line held no tokens, so there is no program to run.
    #[error("empty command: no program name to resolve")]
    EmptyCommand,

    #[error("{var} environment variable not set")]
    MissingSearchPath { var: &'static str },

    #[error("Command not found: {program}")]
    NotFound { program: String },

    /// A search-path candidate reached the path length ceiling.
    #[error("candidate path is {len} bytes, limit is {}", crate::external::MAX_PATH_LEN)]
    PathTooLong { len: usize },

    #[error("Fork failed for {}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("execv failed for {}", path.display())]
    Exec {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("waiting for child failed")]
    Wait {
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    /// Status the whole program exits with when this error ends the run.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
