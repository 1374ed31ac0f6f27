//! # Interactive Database Shell
//!
//! `db shell` hands the connection string to `psql`. When `psql` is not installed it is run from
//! the official `postgres` image through `docker` instead.
//!
//! The decision is made in two explicit steps so the DSN rewrite needed on macOS is easy to see
//! and to test:
//!
//! 1. [`SessionStrategy::probe`] looks for `psql` on the search path.
//! 2. [`SessionPlan::new`] turns the strategy into the exact command line to run.
use crate::Error;
use std::{
    env,
    ffi::OsStr,
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
};
use tokio::process::Command;

/// The interactive client binary.
pub const PSQL: &str = "psql";

/// Host name under which Docker Desktop exposes the host to containers.
pub const DOCKER_HOST_ALIAS: &str = "host.docker.internal";

const LOOPBACK_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

const DOCKER_ADVISORY: &str = "encore: no 'psql' executable found in $PATH; using docker to run 'psql' instead.\n\n\
                               Note: install psql to hide this message.";

/// How the interactive session will be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStrategy {
    /// `psql` was found at this path.
    Local(PathBuf),
    /// `psql` runs inside an ephemeral `postgres` container.
    Container,
}

impl SessionStrategy {
    /// Looks for an executable `psql` in the directories of `path_var` (usually `$PATH`).
    pub fn probe(path_var: Option<&OsStr>) -> Self {
        match path_var.and_then(|paths| find_executable(PSQL, paths)) {
            Some(path) => SessionStrategy::Local(path),
            None => SessionStrategy::Container,
        }
    }

    /// Probes the `PATH` of the current process.
    pub fn probe_env() -> Self {
        Self::probe(env::var_os("PATH").as_deref())
    }
}

/// Host operating systems that matter for container networking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    /// Containers run in a VM and cannot reach the host's loopback interface.
    MacOs,
    Other,
}

impl HostOs {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            HostOs::MacOs
        } else {
            HostOs::Other
        }
    }
}

/// A fully resolved command line for the interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Printed to stderr before launching.
    pub advisory: Option<&'static str>,
}

impl SessionPlan {
    pub fn new(strategy: SessionStrategy, dsn: &str, host_os: HostOs) -> Self {
        match strategy {
            SessionStrategy::Local(program) => Self {
                program,
                args: vec![dsn.to_string()],
                advisory: None,
            },
            SessionStrategy::Container => {
                let dsn = match host_os {
                    HostOs::MacOs => rewrite_for_container(dsn),
                    HostOs::Other => dsn.to_string(),
                };

                Self {
                    program: PathBuf::from("docker"),
                    args: vec![
                        "run".to_string(),
                        "-it".to_string(),
                        "--rm".to_string(),
                        "--network=host".to_string(),
                        "postgres".to_string(),
                        PSQL.to_string(),
                        dsn,
                    ],
                    advisory: Some(DOCKER_ADVISORY),
                }
            }
        }
    }

    /// Runs the session with the terminal attached and waits for it to finish.
    ///
    /// Interrupts are swallowed by the parent while the child runs: the terminal delivers them
    /// to the whole foreground process group, so the child still sees them.
    pub async fn run(self) -> Result<i32, Error> {
        let program = self.program.display().to_string();

        if let Some(advisory) = self.advisory {
            eprintln!("{advisory}");
        }

        tracing::debug!(program, "starting interactive session");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::ChildProcessFailed {
                program: program.clone(),
                reason: format!("failed to start: {e}"),
                code: None,
            })?;

        let status = loop {
            tokio::select! {
                status = child.wait() => break status,
                res = tokio::signal::ctrl_c() => match res {
                    Ok(()) => tracing::trace!("ignoring interrupt while the session is running"),
                    Err(e) => {
                        tracing::debug!(error = %e, "cannot listen for interrupts");
                        break child.wait().await;
                    }
                },
            }
        };

        let status = status.map_err(|e| Error::ChildProcessFailed {
            program: program.clone(),
            reason: e.to_string(),
            code: None,
        })?;

        check_status(program, status)
    }
}

fn check_status(program: String, status: ExitStatus) -> Result<i32, Error> {
    if status.success() {
        return Ok(0);
    }

    Err(Error::ChildProcessFailed {
        program,
        reason: status.to_string(),
        code: status.code(),
    })
}

/// Points loopback hosts in `dsn` at the Docker host alias. Everything else is kept byte for byte.
pub fn rewrite_for_container(dsn: &str) -> String {
    LOOPBACK_HOSTS
        .iter()
        .fold(dsn.to_string(), |dsn, host| dsn.replace(host, DOCKER_HOST_ALIAS))
}

fn find_executable(name: &str, paths: &OsStr) -> Option<PathBuf> {
    env::split_paths(paths)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.with_extension("exe").is_file() || path.is_file()
}
