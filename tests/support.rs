use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

/// Run the `loglens` binary with `dir` as its working directory.
///
/// # Errors
///
/// Returns an error if the binary cannot be located or spawned.
pub fn run_loglens<I, S>(dir: &Path, args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = loglens_bin()?;
    Command::new(bin)
        .args(args)
        .current_dir(dir)
        .env("LOGLENS_LOG", "error")
        .output()
        .map_err(|err| format!("run loglens failed: {}", err))
}

/// Run `loglens` and return its stdout, failing on a non-zero exit.
///
/// # Errors
///
/// Returns an error if the command fails or prints invalid UTF-8.
pub fn run_ok<I, S>(dir: &Path, args: I) -> Result<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = run_loglens(dir, args)?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    String::from_utf8(output.stdout).map_err(|err| format!("stdout not UTF-8: {}", err))
}

#[must_use]
pub fn describe(output: &Output) -> String {
    format!(
        "status: {}\nstdout: {}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

fn loglens_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_loglens").map_or_else(
        || Err("CARGO_BIN_EXE_loglens missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
