use crate::{BoxError, resolve::PackageResolveError};
use std::path::PathBuf;

/// Errors that end an `encore` invocation.
///
/// None of these are retried: the CLI reports the first one it hits and exits.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "no encore.app found in the current directory or any parent directory.\n\n\
         Note: run this command from within an Encore application."
    )]
    NotInApplication,

    #[error("{0}")]
    InvalidArguments(String),

    #[error(
        "could not find an Encore service with a database in this directory (or any of the parent directories).\n\n\
         Note: You can specify a service name to connect to it directly using the command 'encore db {command} <service-name>'."
    )]
    ServiceNotFound { command: &'static str },

    #[error("could not resolve packages in '{}': {source}", dir.display())]
    PackageResolution {
        dir: PathBuf,
        #[source]
        source: PackageResolveError,
    },

    #[error(
        "could not detect language from output.\n\n\
         Note: you can specify the language explicitly with --lang."
    )]
    LanguageDetectionFailed { output: Option<PathBuf> },

    #[error("could not reach the Encore daemon at '{addr}': {source}")]
    BackendUnavailable {
        addr: String,
        #[source]
        source: BoxError,
    },

    #[error("{context}: {}", status.message())]
    BackendError {
        context: String,
        #[source]
        status: tonic::Status,
    },

    #[error("{program} failed: {reason}")]
    ChildProcessFailed {
        program: String,
        reason: String,
        code: Option<i32>,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(context: impl Into<String>) -> impl FnOnce(std::io::Error) -> Self {
        let context = context.into();
        move |source| Error::Io { context, source }
    }

    pub(crate) fn backend(context: impl Into<String>) -> impl FnOnce(tonic::Status) -> Self {
        let context = context.into();
        move |status| Error::BackendError { context, status }
    }

    /// The exit code the process should terminate with for this error.
    ///
    /// A child that exited with its own non-zero code hands that code through.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ChildProcessFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}
