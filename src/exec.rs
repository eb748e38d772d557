//! Boundary for invoking external command-line tools.
//!
//! Every pipeline stage funnels its tool calls through [`run`], which logs
//! the literal argument list and working directory, captures the combined
//! tool output for diagnostics, and fails on non-zero exit with that output
//! attached. No retries, no timeouts: a tool runs to completion or to its
//! own failure.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}:\n{output}")]
    NonZeroExit {
        program: String,
        status: std::process::ExitStatus,
        output: String,
    },
}

/// Runs an external tool and returns its combined stdout/stderr text.
///
/// `cwd` sets the working directory of the child; decks rendered with
/// stage-relative paths rely on it. `stdin` is fed to the child when given
/// (some tools read their deck from standard input).
pub fn run<S: AsRef<str>>(
    program: &str,
    args: &[S],
    cwd: Option<&Path>,
    stdin: Option<&[u8]>,
) -> Result<String, Error> {
    let args: Vec<&str> = args.iter().map(|arg| arg.as_ref()).collect();
    log::debug!("running: {} {}", program, args.join(" "));
    if let Some(dir) = cwd {
        log::debug!("in: {}", dir.display());
    }

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let mut child = command.spawn().map_err(|source| Error::Spawn {
        program: program.to_string(),
        source,
    })?;

    if let Some(bytes) = stdin {
        // the handle is dropped after writing so the child sees EOF
        let mut handle = child.stdin.take().expect("stdin was piped");
        handle.write_all(bytes).map_err(|source| Error::Spawn {
            program: program.to_string(),
            source,
        })?;
    }

    let result = child.wait_with_output().map_err(|source| Error::Spawn {
        program: program.to_string(),
        source,
    })?;

    let mut output = String::from_utf8_lossy(&result.stdout).into_owned();
    output.push_str(&String::from_utf8_lossy(&result.stderr));

    if !result.status.success() {
        return Err(Error::NonZeroExit {
            program: program.to_string(),
            status: result.status,
            output,
        });
    }

    if !output.is_empty() {
        log::debug!("{}", output);
    }
    Ok(output)
}
