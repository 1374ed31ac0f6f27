//! # Service Resolution
//!
//! Works out which service a command targets.
//!
//! There are two modes:
//!
//! 1. **Migrations walk** ([`resolve_service`]): used by `db shell` and `db conn-uri`. Starting at
//!    the invocation directory, each directory up to (but excluding) the application root is
//!    checked for a `migrations` folder. The first one that also resolves to a package wins, so a
//!    nested service always takes priority over its ancestors.
//! 2. **Nearest package** ([`nearest_package`]): used by `db reset` without arguments. Only the
//!    invocation directory itself is resolved.
//!
//! Package resolution is owned by the application's toolchain and is consumed through the
//! [`PackageResolver`] trait.
use crate::{AppRoot, Error};
use std::{
    fmt,
    path::{Path, PathBuf},
};
use tokio::process::Command;

/// Name of the directory marking a service that owns a database.
pub const MIGRATIONS_DIR: &str = "migrations";

/// Package pattern matching only the given directory, without recursing.
pub const CURRENT_DIR_PATTERN: &str = ".";

/// The name of a backend service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceName(String);

impl ServiceName {
    /// Wraps a user-supplied name as is. Validation is left to the daemon.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derives the service name from a resolved package path (its last segment).
    pub fn from_package(pkg: &str) -> Self {
        let base = pkg.rsplit('/').find(|s| !s.is_empty()).unwrap_or(pkg);
        Self(base.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PackageResolveError {
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Resolves the logical packages rooted at a directory.
pub trait PackageResolver {
    /// Returns the package paths matching `pattern` inside `dir`.
    ///
    /// The pattern [`CURRENT_DIR_PATTERN`] restricts the lookup to `dir` itself.
    fn resolve_packages(
        &self,
        dir: &Path,
        pattern: &str,
    ) -> impl Future<Output = Result<Vec<String>, PackageResolveError>>;
}

/// Resolves packages with the Go toolchain (`go list`).
#[derive(Debug, Clone)]
pub struct GoPackageResolver {
    go: PathBuf,
}

impl Default for GoPackageResolver {
    fn default() -> Self {
        Self {
            go: PathBuf::from("go"),
        }
    }
}

impl GoPackageResolver {
    /// Uses a specific `go` binary instead of the one on `$PATH`.
    pub fn with_binary(go: impl Into<PathBuf>) -> Self {
        Self { go: go.into() }
    }
}

impl PackageResolver for GoPackageResolver {
    async fn resolve_packages(
        &self,
        dir: &Path,
        pattern: &str,
    ) -> Result<Vec<String>, PackageResolveError> {
        let program = self.go.display().to_string();

        let output = Command::new(&self.go)
            .args(["list", "-find", "-f", "{{.ImportPath}}", pattern])
            .current_dir(dir)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| PackageResolveError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PackageResolveError::Failed {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }
}

/// Determines the service targeted by `db shell` and `db conn-uri`.
///
/// An explicit name is returned unchanged without touching the filesystem. Otherwise the
/// migrations walk described in the module docs runs; `command` names the subcommand in the
/// error note when nothing is found.
pub async fn resolve_service(
    app_root: &AppRoot,
    explicit: Option<String>,
    resolver: &impl PackageResolver,
    command: &'static str,
) -> Result<ServiceName, Error> {
    if let Some(name) = explicit {
        return Ok(ServiceName::new(name));
    }

    for rel in candidate_dirs(app_root.relative()) {
        let abs = app_root.root().join(rel);
        if !abs.join(MIGRATIONS_DIR).exists() {
            continue;
        }

        // Resolution failures only mean this directory is not a service.
        match resolver.resolve_packages(&abs, CURRENT_DIR_PATTERN).await {
            Ok(pkgs) => {
                if let Some(pkg) = pkgs.first() {
                    let name = ServiceName::from_package(pkg);
                    tracing::debug!(service = %name, "resolved service from migrations");
                    return Ok(name);
                }
            }
            Err(err) => {
                tracing::debug!(dir = %abs.display(), error = %err, "skipping unresolvable directory");
            }
        }
    }

    Err(Error::ServiceNotFound { command })
}

/// Determines the single service rooted at the invocation directory, used by `db reset`.
pub async fn nearest_package(
    app_root: &AppRoot,
    resolver: &impl PackageResolver,
) -> Result<ServiceName, Error> {
    let dir = app_root.current_dir();

    let pkgs = resolver
        .resolve_packages(&dir, CURRENT_DIR_PATTERN)
        .await
        .map_err(|source| Error::PackageResolution {
            dir: dir.clone(),
            source,
        })?;

    pkgs.first()
        .map(|pkg| ServiceName::from_package(pkg))
        .ok_or(Error::ServiceNotFound { command: "reset" })
}

/// `rel` and each of its parents, stopping before the application root.
fn candidate_dirs(rel: &Path) -> impl Iterator<Item = &Path> {
    rel.ancestors()
        .take_while(|p| !p.as_os_str().is_empty() && *p != Path::new("."))
}
