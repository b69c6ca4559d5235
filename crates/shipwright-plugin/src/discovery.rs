// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Directory scan that loads every matching module and registers it.
//!
//! Discovery is the only place where per-module failures are downgraded to
//! log lines: a broken file never prevents the others from loading.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use shipwright_core::{CapabilityKind, IdentifierSource, ShipwrightError};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::loader::ModuleLoader;
use crate::registry::{identifier_of, PluginRegistry};

/// What to scan and how to register what is found.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    pub directory: PathBuf,
    /// Glob matched against file names.
    pub pattern: String,
    pub kinds: Vec<CapabilityKind>,
    pub identifier: IdentifierSource,
}

impl DiscoveryOptions {
    /// Scan `directory` for platform shared libraries, trying every kind.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            pattern: platform_pattern().to_string(),
            kinds: CapabilityKind::ALL.to_vec(),
            identifier: IdentifierSource::default(),
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = CapabilityKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    pub fn with_identifier(mut self, identifier: IdentifierSource) -> Self {
        self.identifier = identifier;
        self
    }
}

fn platform_pattern() -> &'static str {
    if cfg!(target_os = "windows") {
        "*.dll"
    } else if cfg!(target_os = "macos") {
        "*.dylib"
    } else {
        "*.so"
    }
}

/// A plugin stored in the registry during a discovery run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub kind: CapabilityKind,
    pub id: String,
    pub path: PathBuf,
}

/// A module or registration that did not make it into the registry.
#[derive(Debug, Clone)]
pub struct DiscoveryFailure {
    pub path: PathBuf,
    pub kind: Option<CapabilityKind>,
    pub reason: String,
}

/// Summary of a discovery run.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    pub registered: Vec<Registration>,
    pub failures: Vec<DiscoveryFailure>,
}

impl DiscoveryReport {
    /// Registrations of one kind, in the order they happened.
    pub fn registered_of(&self, kind: CapabilityKind) -> impl Iterator<Item = &Registration> {
        self.registered.iter().filter(move |r| r.kind == kind)
    }

    fn merge(&mut self, other: DiscoveryReport) {
        self.registered.extend(other.registered);
        self.failures.extend(other.failures);
    }
}

/// Loads every module in a directory into a registry.
pub struct Discovery {
    registry: Arc<PluginRegistry>,
    loader: ModuleLoader,
    options: DiscoveryOptions,
}

impl Discovery {
    pub fn new(registry: Arc<PluginRegistry>, loader: ModuleLoader, options: DiscoveryOptions) -> Self {
        Self {
            registry,
            loader,
            options,
        }
    }

    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    /// Load matching modules one after another on the calling thread.
    pub fn run(&self) -> Result<DiscoveryReport, ShipwrightError> {
        let files = self.candidates()?;
        let mut report = DiscoveryReport::default();
        for path in files {
            report.merge(process_guarded(&self.registry, &self.loader, &self.options, &path));
        }
        log_summary(&report);
        Ok(report)
    }

    /// Load matching modules in parallel on tokio's blocking pool.
    pub async fn run_concurrent(&self) -> Result<DiscoveryReport, ShipwrightError> {
        let options = self.options.clone();
        let files = tokio::task::spawn_blocking(move || list_candidates(&options))
            .await
            .map_err(|e| ShipwrightError::Internal(format!("plugin directory scan failed: {e}")))??;
        let mut tasks = JoinSet::new();
        for path in files {
            let registry = self.registry.clone();
            let loader = self.loader.clone();
            let options = self.options.clone();
            tasks.spawn_blocking(move || process_guarded(&registry, &loader, &options, &path));
        }

        let mut report = DiscoveryReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => report.merge(outcome),
                Err(e) if e.is_panic() => {
                    error!(error = %e, "plugin discovery task panicked");
                }
                Err(e) => {
                    error!(error = %e, "plugin discovery task did not complete");
                }
            }
        }
        log_summary(&report);
        Ok(report)
    }

    /// Regular files in the plugin directory whose name matches the pattern,
    /// sorted by path.
    pub fn candidates(&self) -> Result<Vec<PathBuf>, ShipwrightError> {
        list_candidates(&self.options)
    }
}

fn list_candidates(options: &DiscoveryOptions) -> Result<Vec<PathBuf>, ShipwrightError> {
    let directory = &options.directory;
    let invalid = |reason: String| ShipwrightError::InvalidPluginRoot {
        path: directory.clone(),
        reason,
    };

    let pattern = glob::Pattern::new(&options.pattern)
        .map_err(|e| invalid(format!("invalid pattern `{}`: {e}", options.pattern)))?;
    let entries = std::fs::read_dir(directory).map_err(|e| invalid(e.to_string()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| invalid(e.to_string()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            debug!(path = %path.display(), "file name is not valid UTF-8, skipping");
            continue;
        };
        if pattern.matches(name) {
            files.push(path);
        }
    }
    files.sort();
    debug!(directory = %directory.display(), count = files.len(), "plugin candidates found");
    Ok(files)
}

fn log_summary(report: &DiscoveryReport) {
    info!(
        registered = report.registered.len(),
        failures = report.failures.len(),
        "plugin discovery finished"
    );
}

/// Process one file, turning a panic inside module code into a failure entry.
fn process_guarded(
    registry: &PluginRegistry,
    loader: &ModuleLoader,
    options: &DiscoveryOptions,
    path: &Path,
) -> DiscoveryReport {
    panic::catch_unwind(AssertUnwindSafe(|| process_file(registry, loader, options, path)))
        .unwrap_or_else(|payload| {
            let reason = format!("panicked: {}", panic_message(payload.as_ref()));
            error!(path = %path.display(), reason = %reason, "plugin module panicked during discovery");
            DiscoveryReport {
                registered: Vec::new(),
                failures: vec![DiscoveryFailure {
                    path: path.to_path_buf(),
                    kind: None,
                    reason,
                }],
            }
        })
}

fn process_file(
    registry: &PluginRegistry,
    loader: &ModuleLoader,
    options: &DiscoveryOptions,
    path: &Path,
) -> DiscoveryReport {
    let mut report = DiscoveryReport::default();

    let module = match loader.open(path) {
        Ok(module) => module,
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to load plugin module");
            report.failures.push(DiscoveryFailure {
                path: path.to_path_buf(),
                kind: None,
                reason: e.to_string(),
            });
            return report;
        }
    };

    for &kind in &options.kinds {
        let handle = match module.narrow(kind) {
            Ok(handle) => handle,
            Err(e) => {
                debug!(path = %path.display(), kind = %kind, reason = %e, "module does not provide kind, skipping");
                continue;
            }
        };

        let source = options.identifier;
        match registry.register(kind, handle, |plugin| identifier_of(source, plugin)) {
            Ok(id) => {
                info!(path = %path.display(), kind = %kind, plugin_id = %id, "registered plugin");
                report.registered.push(Registration {
                    kind,
                    id,
                    path: path.to_path_buf(),
                });
            }
            Err(e @ ShipwrightError::AlreadyRegistered { .. }) => {
                warn!(path = %path.display(), kind = %kind, error = %e, "duplicate plugin identifier, keeping the first");
                report.failures.push(DiscoveryFailure {
                    path: path.to_path_buf(),
                    kind: Some(kind),
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                error!(path = %path.display(), kind = %kind, error = %e, "failed to register plugin");
                report.failures.push(DiscoveryFailure {
                    path: path.to_path_buf(),
                    kind: Some(kind),
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn candidates_filter_by_file_name_pattern() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.so");
        touch(dir.path(), "a.so");
        touch(dir.path(), "readme.txt");
        std::fs::create_dir(dir.path().join("nested.so")).unwrap();

        let discovery = Discovery::new(
            Arc::new(PluginRegistry::new()),
            ModuleLoader::new(),
            DiscoveryOptions::new(dir.path()).with_pattern("*.so"),
        );
        let files = discovery.candidates().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.so", "b.so"]);
    }

    #[test]
    fn missing_directory_is_invalid_root() {
        let discovery = Discovery::new(
            Arc::new(PluginRegistry::new()),
            ModuleLoader::new(),
            DiscoveryOptions::new("/nonexistent/shipwright/plugins"),
        );
        assert!(matches!(
            discovery.run().unwrap_err(),
            ShipwrightError::InvalidPluginRoot { .. }
        ));
    }

    #[test]
    fn bad_pattern_is_invalid_root() {
        let dir = tempfile::tempdir().unwrap();
        let discovery = Discovery::new(
            Arc::new(PluginRegistry::new()),
            ModuleLoader::new(),
            DiscoveryOptions::new(dir.path()).with_pattern("[*.so"),
        );
        let err = discovery.candidates().unwrap_err();
        assert!(err.to_string().contains("invalid pattern"), "got {err}");
    }

    #[test]
    fn empty_directory_yields_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Arc::new(PluginRegistry::new());
        let discovery = Discovery::new(
            registry.clone(),
            ModuleLoader::new(),
            DiscoveryOptions::new(dir.path()),
        );
        let report = discovery.run().unwrap();
        assert!(report.registered.is_empty());
        assert!(report.failures.is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn unloadable_files_are_reported_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.so"), b"garbage").unwrap();
        std::fs::write(dir.path().join("two.so"), b"more garbage").unwrap();

        let registry = Arc::new(PluginRegistry::new());
        let discovery = Discovery::new(
            registry.clone(),
            ModuleLoader::new(),
            DiscoveryOptions::new(dir.path()).with_pattern("*.so"),
        );
        let report = discovery.run().unwrap();
        assert_eq!(report.failures.len(), 2);
        assert!(report.failures.iter().all(|f| f.kind.is_none()));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn concurrent_run_on_missing_directory_is_invalid_root() {
        let discovery = Discovery::new(
            Arc::new(PluginRegistry::new()),
            ModuleLoader::new(),
            DiscoveryOptions::new("/nonexistent/shipwright/plugins"),
        );
        assert!(matches!(
            discovery.run_concurrent().await.unwrap_err(),
            ShipwrightError::InvalidPluginRoot { .. }
        ));
    }

    #[cfg(unix)]
    #[tracing_test::traced_test]
    #[test]
    fn non_utf8_file_names_are_logged_and_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "ok.so");
        let odd = dir.path().join(OsStr::from_bytes(b"bad\xff.so"));
        if std::fs::write(&odd, b"").is_err() {
            // Some filesystems refuse non-UTF-8 names.
            return;
        }

        let discovery = Discovery::new(
            Arc::new(PluginRegistry::new()),
            ModuleLoader::new(),
            DiscoveryOptions::new(dir.path()).with_pattern("*.so"),
        );
        let files = discovery.candidates().unwrap();
        assert_eq!(files, vec![dir.path().join("ok.so")]);
        assert!(logs_contain("file name is not valid UTF-8"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_run_reports_every_file() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            std::fs::write(dir.path().join(format!("bad{i}.so")), b"nope").unwrap();
        }
        let discovery = Discovery::new(
            Arc::new(PluginRegistry::new()),
            ModuleLoader::new(),
            DiscoveryOptions::new(dir.path()).with_pattern("*.so"),
        );
        let report = discovery.run_concurrent().await.unwrap();
        assert_eq!(report.failures.len(), 5);
    }

    #[test]
    fn panic_message_extracts_payload() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
