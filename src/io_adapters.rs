use crate::error::LaunchError;
use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::process::Stdio;

/// Argument value meaning "use the stream inherited from the caller".
pub const INHERIT: &str = "-";

/// Mode for newly created output files: owner read/write, everyone else read.
pub const OUTPUT_MODE: u32 = 0o644;

/// Where the child's standard input comes from.
#[derive(Debug)]
pub enum Input {
    /// The launcher's own standard input.
    Inherit,
    /// A file opened read-only.
    File(File),
}

impl Input {
    /// Open the input named on the command line, `-` meaning inherit.
    pub fn open(arg: &OsStr) -> Result<Self, LaunchError> {
        if arg == OsStr::new(INHERIT) {
            return Ok(Input::Inherit);
        }
        File::open(arg)
            .map(Input::File)
            .map_err(|source| LaunchError::OpenInput {
                path: Path::new(arg).to_path_buf(),
                source,
            })
    }

    pub fn is_inherited(&self) -> bool {
        matches!(self, Input::Inherit)
    }

    /// Hand the stream over to a child process.
    ///
    /// The file moves into the returned [`Stdio`]; it is closed in this
    /// process once the `Stdio` (or the `Command` holding it) is dropped.
    pub fn into_stdio(self) -> Stdio {
        match self {
            Input::Inherit => Stdio::inherit(),
            Input::File(file) => file.into(),
        }
    }
}

/// Where the child's standard output goes.
#[derive(Debug)]
pub enum Output {
    /// The launcher's own standard output.
    Inherit,
    /// A file created or truncated for writing.
    File(File),
}

impl Output {
    /// Open the output named on the command line, `-` meaning inherit.
    ///
    /// An existing file is truncated; a new one is created with [`OUTPUT_MODE`]
    /// (subject to the umask).
    pub fn open(arg: &OsStr) -> Result<Self, LaunchError> {
        if arg == OsStr::new(INHERIT) {
            return Ok(Output::Inherit);
        }
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(OUTPUT_MODE)
            .open(arg)
            .map(Output::File)
            .map_err(|source| LaunchError::OpenOutput {
                path: Path::new(arg).to_path_buf(),
                source,
            })
    }

    pub fn is_inherited(&self) -> bool {
        matches!(self, Output::Inherit)
    }

    /// See [`Input::into_stdio`].
    pub fn into_stdio(self) -> Stdio {
        match self {
            Output::Inherit => Stdio::inherit(),
            Output::File(file) => file.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;

    #[test]
    fn dash_means_inherit() {
        assert!(Input::open(OsStr::new("-")).unwrap().is_inherited());
        assert!(Output::open(OsStr::new("-")).unwrap().is_inherited());
    }

    #[test]
    fn input_file_is_opened_for_reading() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("in.txt");
        fs::write(&path, "data").unwrap();

        match Input::open(path.as_os_str()).unwrap() {
            Input::File(mut f) => {
                let mut s = String::new();
                f.read_to_string(&mut s).unwrap();
                assert_eq!(s, "data");
            }
            Input::Inherit => panic!("expected a file"),
        }
    }

    #[test]
    fn missing_input_is_an_open_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("absent");
        let err = Input::open(path.as_os_str()).unwrap_err();
        assert!(matches!(err, LaunchError::OpenInput { .. }));
    }

    #[test]
    fn output_is_truncated() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.txt");
        fs::write(&path, "old contents").unwrap();

        let out = Output::open(path.as_os_str()).unwrap();
        assert!(!out.is_inherited());
        drop(out);
        assert_eq!(fs::read(&path).unwrap(), b"");
    }

    #[test]
    fn output_is_created_without_exec_bits() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("new.txt");
        drop(Output::open(path.as_os_str()).unwrap());

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode & !OUTPUT_MODE, 0, "mode {mode:o} exceeds {OUTPUT_MODE:o}");
    }

    #[test]
    fn output_in_missing_dir_is_an_open_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("no/such/dir/out");
        let err = Output::open(path.as_os_str()).unwrap_err();
        assert!(matches!(err, LaunchError::OpenOutput { .. }));
    }
}
