//! # Application Root
//!
//! Every command operates on an Encore application, identified by the `encore.app` file at its
//! root. This module finds that root from the invocation directory.
use crate::Error;
use std::path::{Path, PathBuf};

/// Name of the file marking the root of an Encore application.
pub const APP_MARKER: &str = "encore.app";

/// The application the CLI was invoked in.
///
/// Computed once per invocation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRoot {
    root: PathBuf,
    relative: PathBuf,
}

impl AppRoot {
    /// Walks upward from `current_dir` until a directory containing [`APP_MARKER`] is found.
    ///
    /// # Returns
    ///
    /// * `Ok(AppRoot)` - The application root and `current_dir` relative to it (`"."` for the root itself).
    /// * `Err(Error::NotInApplication)` - The filesystem root was reached without finding the marker.
    pub fn locate(current_dir: &Path) -> Result<Self, Error> {
        let root = current_dir
            .ancestors()
            .find(|dir| dir.join(APP_MARKER).is_file())
            .ok_or(Error::NotInApplication)?;

        let relative = match current_dir.strip_prefix(root) {
            Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
            Ok(rel) => rel.to_path_buf(),
            Err(_) => PathBuf::from("."),
        };

        tracing::debug!(root = %root.display(), relative = %relative.display(), "located app root");

        Ok(Self {
            root: root.to_path_buf(),
            relative,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// The absolute invocation directory.
    pub fn current_dir(&self) -> PathBuf {
        self.root.join(&self.relative)
    }

    /// The root as a string, as the daemon expects it on the wire.
    pub(crate) fn root_string(&self) -> String {
        self.root.to_string_lossy().into_owned()
    }
}
