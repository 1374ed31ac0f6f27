#![allow(dead_code)]

use encore_core::{
    AppRoot,
    resolve::{PackageResolveError, PackageResolver},
};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

pub const MODULE: &str = "encore.app";

/// File marking a directory as a package for [`FakeResolver`].
pub const PKG_FILE: &str = "pkg.go";

/// File making [`FakeResolver`] fail for a directory.
pub const BROKEN_FILE: &str = "broken";

/// Resolves a directory to `encore.app/<relative dir>` when it contains [`PKG_FILE`].
pub struct FakeResolver {
    root: PathBuf,
    pub calls: Mutex<Vec<PathBuf>>,
}

impl FakeResolver {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl PackageResolver for FakeResolver {
    async fn resolve_packages(
        &self,
        dir: &Path,
        pattern: &str,
    ) -> Result<Vec<String>, PackageResolveError> {
        assert_eq!(pattern, ".");
        self.calls.lock().unwrap().push(dir.to_path_buf());

        if dir.join(BROKEN_FILE).exists() {
            return Err(PackageResolveError::Spawn {
                program: "go".to_string(),
                source: std::io::Error::other("cannot parse package"),
            });
        }

        if !dir.join(PKG_FILE).exists() {
            return Ok(vec![]);
        }

        let rel = dir.strip_prefix(&self.root).unwrap();
        Ok(vec![format!("{MODULE}/{}", rel.display())])
    }
}

/// Fails the test if any package resolution happens.
pub struct PanicResolver;

impl PackageResolver for PanicResolver {
    async fn resolve_packages(
        &self,
        dir: &Path,
        _pattern: &str,
    ) -> Result<Vec<String>, PackageResolveError> {
        panic!("unexpected package resolution in {}", dir.display())
    }
}

/// A temporary Encore application.
pub struct TestApp {
    pub dir: tempfile::TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("encore.app"), "{}").unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Creates a package directory, optionally owning a database.
    pub fn package(&self, rel: &str, migrations: bool) -> &Self {
        let dir = self.root().join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(PKG_FILE), "package x\n").unwrap();
        if migrations {
            fs::create_dir_all(dir.join("migrations")).unwrap();
        }
        self
    }

    pub fn dir(&self, rel: &str) -> &Self {
        fs::create_dir_all(self.root().join(rel)).unwrap();
        self
    }

    pub fn touch(&self, rel: &str) -> &Self {
        fs::write(self.root().join(rel), "").unwrap();
        self
    }

    /// The application as seen from `rel`.
    pub fn at(&self, rel: &str) -> AppRoot {
        let dir = match rel {
            "." => self.root().to_path_buf(),
            rel => self.root().join(rel),
        };
        AppRoot::locate(&dir).unwrap()
    }

    pub fn resolver(&self) -> FakeResolver {
        FakeResolver::new(self.root())
    }
}
