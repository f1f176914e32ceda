//! Splitting of the command string into an argument vector.

/// The only character that separates arguments.
const DELIMITER: char = ' ';

/// Split a command line into its argument tokens.
///
/// Runs of spaces act as a single separator and leading or trailing spaces
/// are ignored, so no token is ever empty. There is no quoting or escaping:
/// an argument cannot contain a space. Tabs and other whitespace are kept
/// inside tokens.
///
/// The first token, if any, is the program name. The end of the returned
/// vector is the end of the argument list.
pub fn split(command: &str) -> Vec<String> {
    command
        .split(DELIMITER)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}
