use colored::*;
use encore_core::Error;

/// A wrapper struct for a formatted, colored string.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.0)
    }
}

impl From<Error> for FormattedString {
    fn from(err: Error) -> Self {
        FormattedString::from(&err)
    }
}

impl From<&Error> for FormattedString {
    fn from(err: &Error) -> Self {
        let title = match err {
            Error::NotInApplication => "Not in an Encore app:",
            Error::InvalidArguments(_) => "Invalid arguments:",
            Error::ServiceNotFound { .. } | Error::PackageResolution { .. } => {
                "Service not found:"
            }
            Error::LanguageDetectionFailed { .. } => "Unknown language:",
            Error::BackendUnavailable { .. } => "Daemon unavailable:",
            Error::BackendError { .. } => "Daemon error:",
            Error::ChildProcessFailed { .. } => "Command failed:",
            Error::Io { .. } => "I/O error:",
        };

        FormattedString(format!("{} {}", title.red().bold(), err))
    }
}
