use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Variable holding the log filter, e.g. `REDIR_LOG=debug`.
const LOG_ENV: &str = "REDIR_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<i32> {
    let code = redir::launch(std::env::args_os())?;
    Ok(code)
}

fn main() {
    init_tracing();

    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            err.downcast_ref::<redir::LaunchError>()
                .map_or(1, redir::LaunchError::exit_code)
        }
    };
    std::process::exit(code);
}
