use crate::error::LaunchError;
use crate::external::{self, PATH_VAR};
use crate::io_adapters::{Input, Output};
use crate::lexer;
use std::ffi::OsString;
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus};
use tracing::debug;

/// Conventional process exit code: 0 for success, anything else for failure.
pub type ExitCode = i32;

/// The three positional inputs of one launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Input file, or `-` for the inherited standard input.
    pub input: OsString,
    /// Program name followed by its space separated arguments.
    pub command: String,
    /// Output file, or `-` for the inherited standard output.
    pub output: OsString,
}

impl Invocation {
    /// Build an invocation from a full argument list, program name first.
    ///
    /// Anything other than exactly three arguments after the program name is
    /// a usage error.
    pub fn from_args<I, T>(args: I) -> Result<Self, LaunchError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let program = args
            .first()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_owned());

        if args.len() != 4 {
            return Err(LaunchError::Usage { program });
        }

        let output = args.pop().unwrap_or_default();
        let command = args
            .pop()
            .unwrap_or_default()
            .into_string()
            .map_err(|_| LaunchError::NonUtf8Command)?;
        let input = args.pop().unwrap_or_default();

        Ok(Self {
            input,
            command,
            output,
        })
    }
}

/// Progress of a single launch. Every stage requires the one before it;
/// any failure moves straight to [`Stage::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    InputOpened,
    OutputOpened,
    ArgsReady,
    PathResolved,
    Spawned,
    Waited,
    Cleaned,
    Failed,
}

/// Runs one command with redirected standard input and output and reports
/// its exit code.
///
/// Example
/// ```no_run
/// use redir::{Invocation, Launcher};
/// let inv = Invocation::from_args(["redir", "-", "echo ok", "-"]).unwrap();
/// let code = Launcher::new(inv).run().unwrap();
/// assert_eq!(code, 0);
/// ```
pub struct Launcher {
    invocation: Invocation,
    search_path: Option<OsString>,
    stage: Stage,
}

impl Launcher {
    /// Create a launcher that resolves programs against the current `PATH`.
    pub fn new(invocation: Invocation) -> Self {
        Self {
            invocation,
            search_path: std::env::var_os(PATH_VAR),
            stage: Stage::Init,
        }
    }

    /// Resolve programs against `search_path` instead of the process `PATH`.
    /// `None` behaves like an unset variable.
    pub fn with_search_path(mut self, search_path: Option<OsString>) -> Self {
        self.search_path = search_path;
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Launch the command and wait for it.
    ///
    /// Returns the child's exit code. Files opened on the way are closed
    /// before this returns, whether it succeeds or not.
    pub fn run(&mut self) -> Result<ExitCode, LaunchError> {
        let result = self.try_run();
        if let Err(err) = &result {
            debug!(stage = ?self.stage, error = %err, "launch failed");
            self.advance(Stage::Failed);
        }
        result
    }

    fn try_run(&mut self) -> Result<ExitCode, LaunchError> {
        let input = Input::open(&self.invocation.input)?;
        self.advance(Stage::InputOpened);

        let output = Output::open(&self.invocation.output)?;
        self.advance(Stage::OutputOpened);

        let argv = lexer::split(&self.invocation.command);
        let Some(program) = argv.first() else {
            return Err(LaunchError::EmptyCommand);
        };
        self.advance(Stage::ArgsReady);

        let path = external::resolve_in(program, self.search_path.as_deref())?;
        self.advance(Stage::PathResolved);

        let mut child = spawn(&path, &argv, input, output)?;
        self.advance(Stage::Spawned);
        debug!(pid = child.id(), path = %path.display(), "child started");

        let status = child.wait().map_err(|source| LaunchError::Wait { source })?;
        self.advance(Stage::Waited);

        drop(argv);
        drop(path);
        self.advance(Stage::Cleaned);
        Ok(exit_code(status))
    }

    fn advance(&mut self, next: Stage) {
        debug!(from = ?self.stage, to = ?next, "stage");
        self.stage = next;
    }
}

/// Start `path` with `argv` (program name included) and the given streams.
///
/// The redirected files move into the `Command`; dropping it right after the
/// spawn closes this process's copies, leaving only the child's.
fn spawn(path: &Path, argv: &[String], input: Input, output: Output) -> Result<Child, LaunchError> {
    let mut command = Command::new(path);
    if let Some((arg0, rest)) = argv.split_first() {
        command.arg0(arg0).args(rest);
    }
    command.stdin(input.into_stdio()).stdout(output.into_stdio());

    let child = command.spawn();
    drop(command);
    child.map_err(|source| spawn_error(path.to_path_buf(), source))
}

/// Failures to create the process at all are [`LaunchError::Spawn`]; anything
/// else happened while replacing the child's image.
fn spawn_error(path: PathBuf, source: std::io::Error) -> LaunchError {
    use nix::errno::Errno;

    match source.raw_os_error().map(Errno::from_raw) {
        Some(Errno::EAGAIN | Errno::ENOMEM) => LaunchError::Spawn { path, source },
        _ => LaunchError::Exec { path, source },
    }
}

/// Map a child's status to the code this process exits with.
pub fn exit_code(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(code) => code,
        None => terminated_by_signal(status),
    }
}

fn terminated_by_signal(status: ExitStatus) -> ExitCode {
    if let Some(signal) = status.signal() {
        128 + signal
    } else {
        255
    }
}

/// Convenience for callers holding raw arguments: parse them and launch.
pub fn launch<I, T>(args: I) -> Result<ExitCode, LaunchError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    Launcher::new(Invocation::from_args(args)?).run()
}
