//! Run one command with its standard input and output redirected.
//!
//! `redir <input> <command> <output>` opens `input` and `output` (`-` keeps
//! the caller's stream), splits `command` on spaces, finds the program on
//! `PATH`, runs it and exits with its status.
//!
//! The work is split into three stages: [`lexer`] turns the command string
//! into an argument vector, [`external`] resolves the program to a path, and
//! [`Launcher`] wires the streams and starts the child.

pub mod error;
pub mod external;
pub mod io_adapters;
pub mod launcher;
pub mod lexer;

pub use error::LaunchError;
pub use launcher::{ExitCode, Invocation, Launcher, Stage, launch};
